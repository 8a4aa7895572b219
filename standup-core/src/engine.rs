//! Turn controller: the timer-driven engine behind a standup session.
//!
//! The engine owns the roster, the timer table, the status feed, the
//! document store handle, and the two random pickers. Hosts drive it with
//! user actions plus [`Engine::advance`], which moves the virtual clock and
//! fires every due timer. All control flow (the speaking clock, the
//! selection scan, the auto-transition wait, the summary reveal) runs
//! through the scheduler, so nothing here depends on wall-clock time.

use uuid::Uuid;

use crate::feed::Feed;
use crate::history;
use crate::messages;
use crate::rng::Picker;
use crate::scheduler::{Scheduler, TimerKind};
use crate::session::{AddOutcome, Session};
use crate::store::Store;
use crate::types::{
    FeedLevel, HistoryEntry, Participant, SessionConfig, TurnOutcome, DEFAULT_MAX_SECONDS,
};

/// Speaking clock period.
const SPEAK_TICK_MS: u64 = 1_000;

/// Selection animation: step interval and step count.
const SELECT_STEP_MS: u64 = 80;
const SELECT_STEPS: u32 = 15;

/// Idle delay before auto-transition kicks off a selection.
const AUTO_SELECT_DELAY_MS: u64 = 1_500;

/// Reveal animation: step interval and step count.
const REVEAL_STEP_MS: u64 = 75;
const REVEAL_STEPS: u32 = 40;

/// Top-level lifecycle of one standup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Editing the roster and knobs.
    #[default]
    Setup,
    /// Turns in progress.
    Running,
    /// Every turn resolved; stats and the owner reveal.
    Summary,
}

/// A selection animation in flight.
///
/// Candidates are captured when the run starts; the winner always comes
/// from this set, so participants added mid-scan wait for the next round.
#[derive(Debug)]
pub struct SelectionRun {
    candidates: Vec<(Uuid, String)>,
    steps_done: u32,
    /// Name currently flashed by the scan (cosmetic).
    pub guess: String,
}

/// The summary screen's owner reveal.
#[derive(Debug)]
pub struct RevealRun {
    steps_done: u32,
    /// Name currently flashed, or the owner once revealed.
    pub guess: String,
    pub revealed: bool,
}

impl RevealRun {
    /// Scan progress in percent.
    pub fn progress(&self) -> u16 {
        (self.steps_done * 100 / REVEAL_STEPS).min(100) as u16
    }
}

/// Stats snapshot computed once when a session completes.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Who leads the next session. One decision draw, shared with the
    /// recorded history entry.
    pub next_owner: String,
    pub total_secs: u32,
    pub completed: usize,
    pub participant_count: usize,
}

/// The session engine. See the module docs for the driving contract.
pub struct Engine {
    session: Session,
    scheduler: Scheduler,
    feed: Feed,
    store: Box<dyn Store>,
    decision: Box<dyn Picker>,
    display: Box<dyn Picker>,
    phase: Phase,
    auto_transition: bool,
    max_speaking_secs: u32,
    selection: Option<SelectionRun>,
    reveal: Option<RevealRun>,
    summary: Option<Summary>,
    now_ms: u64,
}

impl Engine {
    pub fn new(store: Box<dyn Store>, decision: Box<dyn Picker>, display: Box<dyn Picker>) -> Self {
        let mut feed = Feed::new();
        for line in messages::BOOT_BANNER {
            feed.push(FeedLevel::Info, line);
        }
        Self {
            session: Session::default(),
            scheduler: Scheduler::new(),
            feed,
            store,
            decision,
            display,
            phase: Phase::Setup,
            auto_transition: true,
            max_speaking_secs: DEFAULT_MAX_SECONDS,
            selection: None,
            reveal: None,
            summary: None,
            now_ms: 0,
        }
    }

    // ========== Read accessors ==========

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn participants(&self) -> &[Participant] {
        self.session.participants()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn selection(&self) -> Option<&SelectionRun> {
        self.selection.as_ref()
    }

    pub fn reveal(&self) -> Option<&RevealRun> {
        self.reveal.as_ref()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn auto_transition(&self) -> bool {
        self.auto_transition
    }

    pub fn max_speaking_secs(&self) -> u32 {
        self.max_speaking_secs
    }

    // ========== Persisted documents ==========

    pub fn load_session_config(&self) -> SessionConfig {
        SessionConfig::load(self.store.as_ref())
    }

    /// Best-effort write-through; a failing store is logged, not fatal.
    pub fn save_session_config(&mut self, config: &SessionConfig) {
        if let Err(err) = config.save(self.store.as_mut()) {
            tracing::warn!("failed to persist session config: {err}");
        }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        history::load(self.store.as_ref())
    }

    pub fn clear_history(&mut self) {
        if let Err(err) = history::clear(self.store.as_mut()) {
            tracing::warn!("failed to clear history: {err}");
        }
    }

    // ========== Lifecycle ==========

    /// Starts a session with the given roster and knobs. No-op when the
    /// names boil down to an empty roster.
    pub fn start(&mut self, names: &[String], auto_transition: bool, max_speaking_secs: u32) {
        let session = Session::new(names);
        if session.is_empty() {
            return;
        }
        self.session = session;
        self.auto_transition = auto_transition;
        self.max_speaking_secs = max_speaking_secs.max(1);
        self.phase = Phase::Running;
        self.selection = None;
        self.reveal = None;
        self.summary = None;
        self.scheduler.cancel_all();

        self.feed
            .push(FeedLevel::Success, messages::session_started(self.session.len()));
        self.feed
            .push(FeedLevel::Info, messages::auto_mode(auto_transition));
        self.feed
            .push(FeedLevel::Info, messages::time_limit(self.max_speaking_secs));
        self.sync_auto_select();
    }

    /// Abandons the run and returns to setup. The roster survives with
    /// statuses and clocks cleared; the feed restarts with the reset notice.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.session.reset();
        self.selection = None;
        self.reveal = None;
        self.summary = None;
        self.phase = Phase::Setup;
        self.feed.clear();
        self.feed.push(FeedLevel::Warn, messages::RESET);
    }

    // ========== Clock ==========

    /// Advances the virtual clock and fires every timer due on the way.
    /// The clock never moves backwards.
    pub fn advance(&mut self, now_ms: u64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        while let Some(kind) = self.scheduler.next_due(self.now_ms) {
            match kind {
                TimerKind::SpeakingClock => self.session.tick(),
                TimerKind::SelectionStep => self.selection_step(),
                TimerKind::AutoSelect => {
                    self.feed.push(FeedLevel::Info, messages::AUTO_TRANSITION);
                    self.begin_selection();
                }
                TimerKind::RevealStep => self.reveal_step(),
            }
        }
        self.after_mutation(false);
    }

    // ========== Turn operations ==========

    /// The manual-mode trigger: kicks off a selection run. No-op while one
    /// is already running, while someone is speaking, or when the pending
    /// pool is empty.
    pub fn execute_selection(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.begin_selection();
    }

    /// Ends the active turn with `outcome`. Guarded no-op when no one holds
    /// the floor.
    pub fn act(&mut self, outcome: TurnOutcome) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(name) = self.session.act(outcome) else {
            return;
        };
        self.scheduler.cancel(TimerKind::SpeakingClock);
        let (level, message) = match outcome {
            TurnOutcome::Completed => (FeedLevel::Success, messages::completed(&name)),
            TurnOutcome::Skipped => (FeedLevel::Warn, messages::skipped(&name)),
            TurnOutcome::Deferred => (FeedLevel::Warn, messages::deferred(&name)),
        };
        self.feed.push(level, message);
        self.after_mutation(false);
    }

    /// Registers a new pending participant mid-session. Duplicate names
    /// (case-insensitive) are rejected with a warning in the feed.
    pub fn add_participant(&mut self, name: &str) {
        if self.phase != Phase::Running {
            return;
        }
        match self.session.add(name) {
            AddOutcome::Added => {
                self.feed.push(FeedLevel::Info, messages::registered(name.trim()));
            }
            AddOutcome::Duplicate => {
                self.feed.push(FeedLevel::Warn, messages::duplicate(name.trim()));
            }
            AddOutcome::Empty => {}
        }
        self.after_mutation(true);
    }

    /// Re-queues a finished participant. Guarded no-op for pending or
    /// speaking ones.
    pub fn rewind(&mut self, id: Uuid) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(name) = self.session.rewind(id) else {
            return;
        };
        self.feed.push(FeedLevel::Info, messages::rewound(&name));
        self.after_mutation(true);
    }

    // ========== Internals ==========

    /// Post-mutation bookkeeping. `roster_changed` restarts a pending
    /// auto-select delay: the idle wait starts over whenever its inputs
    /// change.
    fn after_mutation(&mut self, roster_changed: bool) {
        self.check_completion();
        if roster_changed {
            self.scheduler.cancel(TimerKind::AutoSelect);
        }
        self.sync_auto_select();
    }

    /// Arms the auto-select delay while the idle condition holds, cancels
    /// it as soon as it stops holding. Never two armed delays at once.
    fn sync_auto_select(&mut self) {
        let idle = self.phase == Phase::Running
            && self.auto_transition
            && self.selection.is_none()
            && self.session.active_speaker().is_none()
            && self.session.pending_count() > 0;
        if idle {
            if !self.scheduler.is_scheduled(TimerKind::AutoSelect) {
                self.scheduler
                    .schedule_once(TimerKind::AutoSelect, self.now_ms, AUTO_SELECT_DELAY_MS);
            }
        } else {
            self.scheduler.cancel(TimerKind::AutoSelect);
        }
    }

    /// Completes the session exactly once: the phase moves to `Summary`,
    /// so re-evaluation while the condition keeps holding cannot re-fire.
    fn check_completion(&mut self) {
        if self.phase != Phase::Running || self.selection.is_some() {
            return;
        }
        if self.session.is_terminal() {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Summary;
        self.scheduler.cancel_all();
        self.feed.push(FeedLevel::Success, messages::SESSION_DONE);

        // One decision draw over the full roster, shared by the history
        // entry and the reveal.
        let participants = self.session.participants();
        let next_owner = participants[self.decision.pick(participants.len())].name.clone();

        let total_secs = self.session.total_speaking_secs();
        let entry = history::new_entry(
            self.session.completion_order(),
            next_owner.clone(),
            total_secs,
        );
        if let Err(err) = history::record(self.store.as_mut(), entry) {
            tracing::warn!("failed to record session history: {err}");
        }

        self.summary = Some(Summary {
            next_owner,
            total_secs,
            completed: self.session.completed_count(),
            participant_count: self.session.len(),
        });

        let guess = self.display_name();
        self.reveal = Some(RevealRun {
            steps_done: 0,
            guess,
            revealed: false,
        });
        self.scheduler
            .schedule_repeating(TimerKind::RevealStep, self.now_ms, REVEAL_STEP_MS);
    }

    fn begin_selection(&mut self) {
        if self.selection.is_some() || self.session.active_speaker().is_some() {
            return;
        }
        let candidates: Vec<(Uuid, String)> = self
            .session
            .pending()
            .map(|p| (p.id, p.name.clone()))
            .collect();
        if candidates.is_empty() {
            return;
        }
        self.scheduler.cancel(TimerKind::AutoSelect);
        self.feed.push(FeedLevel::Info, messages::SCANNING);

        let idx = self.display.pick(candidates.len());
        let guess = candidates[idx].1.clone();
        self.selection = Some(SelectionRun {
            candidates,
            steps_done: 0,
            guess,
        });
        self.scheduler
            .schedule_repeating(TimerKind::SelectionStep, self.now_ms, SELECT_STEP_MS);
    }

    fn selection_step(&mut self) {
        let (len, steps_done) = match self.selection.as_mut() {
            Some(run) => {
                run.steps_done += 1;
                (run.candidates.len(), run.steps_done)
            }
            None => return,
        };

        if steps_done < SELECT_STEPS {
            let idx = self.display.pick(len);
            if let Some(run) = self.selection.as_mut() {
                run.guess = run.candidates[idx].1.clone();
            }
            return;
        }

        // Final step: commit a winner from the captured candidate set.
        self.scheduler.cancel(TimerKind::SelectionStep);
        let winner_idx = self.decision.pick(len);
        if let Some(run) = self.selection.take() {
            let (id, name) = run.candidates[winner_idx].clone();
            if self.session.start_speaking(id) {
                self.feed
                    .push(FeedLevel::Success, messages::target_locked(&name));
                self.scheduler
                    .schedule_repeating(TimerKind::SpeakingClock, self.now_ms, SPEAK_TICK_MS);
            }
        }
    }

    fn reveal_step(&mut self) {
        let steps_done = match self.reveal.as_mut() {
            Some(run) if !run.revealed => {
                run.steps_done += 1;
                run.steps_done
            }
            _ => return,
        };

        if steps_done < REVEAL_STEPS {
            let guess = self.display_name();
            if let Some(run) = self.reveal.as_mut() {
                run.guess = guess;
            }
            return;
        }

        self.scheduler.cancel(TimerKind::RevealStep);
        let owner = self.summary.as_ref().map(|s| s.next_owner.clone());
        if let (Some(run), Some(owner)) = (self.reveal.as_mut(), owner) {
            run.guess = owner;
            run.revealed = true;
        }
    }

    /// Random roster name for a cosmetic scan frame.
    fn display_name(&mut self) -> String {
        let len = self.session.len();
        let idx = self.display.pick(len);
        self.session.participants()[idx].name.clone()
    }
}
