//! Observable status feed backing the terminal-style display panel.
//!
//! Append-only and capped: once full, the oldest line is dropped for each
//! new one. Entries are ordered by the events that produced them. Every
//! line is mirrored to `tracing` at a matching level for the diagnostic
//! log.

use std::collections::VecDeque;

use chrono::Utc;
use uuid::Uuid;

use crate::types::{FeedEntry, FeedLevel};

/// Most recent entries kept; older ones are dropped first.
pub const FEED_CAPACITY: usize = 50;

/// The in-session status feed.
#[derive(Debug, Default)]
pub struct Feed {
    entries: VecDeque<FeedEntry>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line, evicting the oldest once at capacity.
    pub fn push(&mut self, level: FeedLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            FeedLevel::Warn => tracing::warn!(target: "feed", "{message}"),
            FeedLevel::Error => tracing::error!(target: "feed", "{message}"),
            _ => tracing::info!(target: "feed", "{message}"),
        }

        if self.entries.len() >= FEED_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(FeedEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level,
            message,
        });
    }

    /// Entries oldest-first.
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
