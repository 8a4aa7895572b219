//! # standup-core
//!
//! Core library for standup, a terminal daily-standup turn runner.
//!
//! This library provides:
//! - The session state machine: roster, turn outcomes, speaking clocks
//! - The randomized selector and the summary reveal as scheduler-driven runs
//! - Bounded history recording behind a key-value persistence port
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! The engine is single-threaded and timer-driven. The host owns a clock
//! (wall time in the TUI, a hand-advanced counter in tests) and feeds it to
//! [`Engine::advance`]; every delay in the system is a slot in the
//! [`scheduler::Scheduler`], which keeps the whole state machine
//! deterministic. Randomness enters only through the [`rng::Picker`] seam,
//! split into decision draws and cosmetic display draws.
//!
//! ## Example
//!
//! ```rust
//! use standup_core::{Engine, MemoryStore, RandomPicker, TurnOutcome};
//!
//! let mut engine = Engine::new(
//!     Box::new(MemoryStore::new()),
//!     Box::new(RandomPicker::new()),
//!     Box::new(RandomPicker::new()),
//! );
//! engine.start(&["Alice".into(), "Bob".into()], false, 300);
//! engine.execute_selection();
//! engine.advance(80 * 15); // selection scan finishes, a speaker holds the floor
//! engine.advance(80 * 15 + 3_000); // three seconds on their clock
//! engine.act(TurnOutcome::Completed);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use engine::{Engine, Phase, RevealRun, SelectionRun, Summary};
pub use error::{Error, Result};
pub use feed::Feed;
pub use rng::{Picker, RandomPicker, ScriptedPicker};
pub use session::{AddOutcome, Session};
pub use store::{FileStore, MemoryStore, Store};
pub use types::*;

// Public modules
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod format;
pub mod history;
pub mod logging;
pub mod messages;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod types;
