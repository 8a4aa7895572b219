//! Status feed wording.
//!
//! The feed speaks in the product's mock-terminal voice; keeping the
//! strings in one place keeps the engine readable.

/// Lines seeded into the feed at startup.
pub const BOOT_BANNER: [&str; 4] = [
    "Initializing daily_scheduler.sh...",
    "Loading participant kernel...",
    "Establishing secure connection to Standup-Mainframe...",
    "Status: READY. Awaiting run command.",
];

pub const SCANNING: &str = "Scanning candidate pool for available nodes...";
pub const AUTO_TRANSITION: &str = "AUTO_TRANSITION_PROTOCOL: Searching for next available node...";
pub const SESSION_DONE: &str = "Standup cycle completed successfully.";
pub const RESET: &str = "System reset requested. Returning to setup kernel.";

pub fn target_locked(name: &str) -> String {
    format!("Target locked: {name}. Initializing clock.")
}

pub fn deferred(name: &str) -> String {
    format!("Process deferred: {name} moved to wait queue.")
}

pub fn skipped(name: &str) -> String {
    format!("User unreachable: {name} marked as SKIPPED.")
}

pub fn completed(name: &str) -> String {
    format!("Task finished: {name} reported status successfully.")
}

pub fn duplicate(name: &str) -> String {
    format!("Node [{name}] already exists in the system.")
}

pub fn registered(name: &str) -> String {
    format!("New node registered: [{name}] added to queue.")
}

pub fn rewound(name: &str) -> String {
    format!("Registry reverted: Node [{name}] re-queued.")
}

pub fn session_started(count: usize) -> String {
    format!("System initialized with {count} participants.")
}

pub fn auto_mode(enabled: bool) -> String {
    let state = if enabled { "ENABLED" } else { "DISABLED" };
    format!("Auto-transition mode: {state}")
}

pub fn time_limit(secs: u32) -> String {
    format!("Time limit per node: {}m {}s", secs / 60, secs % 60)
}
