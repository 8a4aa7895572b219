//! Core domain types for standup
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One standup run, from roster registration through completion |
//! | **Participant** | A roster member with a lifecycle status and a speaking clock |
//! | **Active speaker** | The single participant currently `Speaking`, if any |
//! | **Pending pool** | Participants still eligible for selection |
//! | **Feed** | The observable, capped status log driving the terminal panel |
//! | **History entry** | The persisted record written once per completed session |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::store::{Store, CONFIG_KEY};

/// Default per-speaker limit in minutes.
pub const DEFAULT_MAX_MINUTES: u32 = 5;

/// Default per-speaker limit in seconds (5 minutes).
pub const DEFAULT_MAX_SECONDS: u32 = DEFAULT_MAX_MINUTES * 60;

/// Fallback roster used when no session configuration was ever saved.
pub const DEFAULT_NAMES: [&str; 4] = ["John Doe", "Jane Smith", "Alex Miller", "Sam Reed"];

// ============================================
// Participants
// ============================================

/// Lifecycle state of a roster member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantStatus {
    /// Waiting in the selection pool.
    Pending,
    /// Holding the floor right now.
    Speaking,
    /// Reported and done.
    Completed,
    /// Marked unreachable and passed over.
    Skipped,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Pending => "PENDING",
            ParticipantStatus::Speaking => "SPEAKING",
            ParticipantStatus::Completed => "COMPLETED",
            ParticipantStatus::Skipped => "SKIPPED",
        }
    }

    /// True for `Completed` and `Skipped`, the states a rewind can undo.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ParticipantStatus::Completed | ParticipantStatus::Skipped)
    }
}

/// One registered standup participant.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Unique identifier, assigned at registration, immutable.
    pub id: Uuid,
    /// Trimmed display name.
    pub name: String,
    pub status: ParticipantStatus,
    /// Accumulated floor time in seconds. Only moves via the one-second
    /// speaking clock while active, or back to zero via rewind.
    pub speaking_secs: u32,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: ParticipantStatus::Pending,
            speaking_secs: 0,
        }
    }
}

/// How an active turn ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The speaker reported and is done.
    Completed,
    /// The speaker was unreachable; passed over.
    Skipped,
    /// The turn is pushed back into the pending pool.
    Deferred,
}

// ============================================
// Status feed
// ============================================

/// Severity of a feed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedLevel {
    Info,
    Warn,
    Success,
    Error,
}

impl FeedLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedLevel::Info => "INFO",
            FeedLevel::Warn => "WARN",
            FeedLevel::Success => "SUCCESS",
            FeedLevel::Error => "ERROR",
        }
    }
}

/// One line of the observable status feed. In-memory only.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: FeedLevel,
    pub message: String,
}

// ============================================
// Persisted documents
// ============================================

/// The persisted record of one completed session.
///
/// Written exactly once at completion, prepended newest-first to the history
/// document, never mutated afterward. Field names stay camelCase on the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Day-scoped display identifier (`YYYY-MM-DD-<millis>`). Collisions
    /// within one millisecond are acceptable; this is not a primary key.
    pub id: String,
    pub date: DateTime<Utc>,
    /// Names in the order turns reached a terminal status.
    pub participants_order: Vec<String>,
    /// Who leads the next session.
    pub next_owner: String,
    /// Sum of all speaking clocks, in seconds.
    pub total_duration: u32,
    pub created_at: DateTime<Utc>,
}

/// Persisted session defaults (the setup screen's storage hub).
///
/// Wire format is a camelCase document:
/// `{ "names": [...], "maxTimeMinutes": n, "autoTransition": b }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub names: Vec<String>,
    pub max_time_minutes: u32,
    pub auto_transition: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|s| s.to_string()).collect(),
            max_time_minutes: DEFAULT_MAX_MINUTES,
            auto_transition: true,
        }
    }
}

impl SessionConfig {
    /// Per-speaker limit in seconds.
    pub fn max_seconds(&self) -> u32 {
        self.max_time_minutes * 60
    }

    /// Decodes the persisted document leniently: a missing or mistyped
    /// field falls back to its default without failing the others, and a
    /// document that is not JSON at all yields the full defaults.
    pub fn from_json(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => return Self::default(),
        };

        let mut config = Self::default();
        if let Some(names) = value.get("names").and_then(|v| v.as_array()) {
            config.names = names
                .iter()
                .filter_map(|n| n.as_str())
                .map(str::to_owned)
                .collect();
        }
        if let Some(minutes) = value.get("maxTimeMinutes").and_then(|v| v.as_u64()) {
            config.max_time_minutes = minutes as u32;
        }
        if let Some(auto) = value.get("autoTransition").and_then(|v| v.as_bool()) {
            config.auto_transition = auto;
        }
        config
    }

    /// Reads the saved document from the store, or defaults when absent.
    pub fn load(store: &dyn Store) -> Self {
        store
            .get(CONFIG_KEY)
            .map(|raw| Self::from_json(&raw))
            .unwrap_or_default()
    }

    /// Writes the document through the store.
    pub fn save(&self, store: &mut dyn Store) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        store.set(CONFIG_KEY, &raw)
    }
}
