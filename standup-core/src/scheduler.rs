//! Timer table over a virtual millisecond clock.
//!
//! Every delay in the engine (the one-second speaking clock, the
//! selection and reveal animation steps, the auto-transition wait) is a
//! slot in this table. The host advances the clock explicitly and drains
//! due slots one at a time, so the whole engine is a deterministic state
//! machine under test: no wall-clock intervals, no orphaned timers.

/// Timers the engine can arm.
///
/// One slot per kind: scheduling a kind again replaces its previous slot,
/// so duplicate concurrent timers cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Repeating one-second speaking clock.
    SpeakingClock,
    /// Repeating selection animation step.
    SelectionStep,
    /// One-shot auto-transition delay.
    AutoSelect,
    /// Repeating reveal animation step.
    RevealStep,
}

#[derive(Debug)]
struct Slot {
    kind: TimerKind,
    due_at: u64,
    period: Option<u64>,
}

/// The timer table. All times are milliseconds on the host's clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    slots: Vec<Slot>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `kind` to fire once, `delay` ms from `now`. Replaces any
    /// existing slot of the same kind.
    pub fn schedule_once(&mut self, kind: TimerKind, now: u64, delay: u64) {
        self.cancel(kind);
        self.slots.push(Slot {
            kind,
            due_at: now + delay,
            period: None,
        });
    }

    /// Arms `kind` to fire every `period` ms, starting one period from
    /// `now`. Replaces any existing slot of the same kind.
    pub fn schedule_repeating(&mut self, kind: TimerKind, now: u64, period: u64) {
        debug_assert!(period > 0);
        self.cancel(kind);
        self.slots.push(Slot {
            kind,
            due_at: now + period,
            period: Some(period),
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.slots.retain(|slot| slot.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.slots.clear();
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.slots.iter().any(|slot| slot.kind == kind)
    }

    /// Pops the earliest slot due at or before `now`.
    ///
    /// Slots fire strictly in due-time order across kinds. A repeating slot
    /// re-arms by one period on each fire, so a clock jump of N periods
    /// fires it N times. Callers drain in a loop and may cancel or
    /// reschedule between fires; cancellation takes effect immediately.
    pub fn next_due(&mut self, now: u64) -> Option<TimerKind> {
        let idx = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.due_at <= now)
            .min_by_key(|(_, slot)| slot.due_at)
            .map(|(idx, _)| idx)?;

        let kind = self.slots[idx].kind;
        match self.slots[idx].period {
            Some(period) => self.slots[idx].due_at += period,
            None => {
                self.slots.swap_remove(idx);
            }
        }
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, now: u64) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        while let Some(kind) = scheduler.next_due(now) {
            fired.push(kind);
        }
        fired
    }

    #[test]
    fn test_once_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(TimerKind::AutoSelect, 0, 1_500);

        assert!(drain(&mut scheduler, 1_499).is_empty());
        assert_eq!(drain(&mut scheduler, 1_500), vec![TimerKind::AutoSelect]);
        assert!(drain(&mut scheduler, 10_000).is_empty());
        assert!(!scheduler.is_scheduled(TimerKind::AutoSelect));
    }

    #[test]
    fn test_repeating_fires_once_per_period() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(TimerKind::SpeakingClock, 0, 1_000);

        // An 11-second jump yields exactly 11 ticks.
        assert_eq!(drain(&mut scheduler, 11_000).len(), 11);
        assert!(drain(&mut scheduler, 11_999).is_empty());
        assert_eq!(drain(&mut scheduler, 12_000).len(), 1);
    }

    #[test]
    fn test_scheduling_replaces_existing_slot() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(TimerKind::AutoSelect, 0, 1_500);
        scheduler.schedule_once(TimerKind::AutoSelect, 1_000, 1_500);

        // The earlier deadline is gone; only the rescheduled one fires.
        assert!(drain(&mut scheduler, 2_000).is_empty());
        assert_eq!(drain(&mut scheduler, 2_500), vec![TimerKind::AutoSelect]);
    }

    #[test]
    fn test_cancel_removes_slot() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(TimerKind::SelectionStep, 0, 80);
        scheduler.cancel(TimerKind::SelectionStep);

        assert!(!scheduler.is_scheduled(TimerKind::SelectionStep));
        assert!(drain(&mut scheduler, 1_000).is_empty());
    }

    #[test]
    fn test_fires_in_due_time_order_across_kinds() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(TimerKind::RevealStep, 0, 75);
        scheduler.schedule_once(TimerKind::AutoSelect, 0, 100);

        let fired = drain(&mut scheduler, 160);
        assert_eq!(
            fired,
            vec![
                TimerKind::RevealStep, // 75
                TimerKind::AutoSelect, // 100
                TimerKind::RevealStep, // 150
            ]
        );
    }
}
