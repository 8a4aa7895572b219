//! Roster state machine.
//!
//! Per-participant lifecycle: `Pending → Speaking → {Completed | Skipped |
//! Pending}` (a deferred turn goes back to the pool). At most one
//! participant is `Speaking` at any time, and the active-speaker pointer
//! names it exactly when one exists.

use uuid::Uuid;

use crate::types::{Participant, ParticipantStatus, TurnOutcome};

/// What [`Session::add`] did with a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The trimmed name already exists (case-insensitive); roster unchanged.
    Duplicate,
    /// The name was empty after trimming; ignored.
    Empty,
}

/// The in-session roster plus the active-speaker pointer.
#[derive(Debug, Default)]
pub struct Session {
    participants: Vec<Participant>,
    active: Option<Uuid>,
    /// Ids in the order turns reached a terminal status. Kept explicitly:
    /// roster order does not encode it.
    completed_order: Vec<Uuid>,
}

impl Session {
    /// Builds a roster from the setup names. Names are trimmed and empties
    /// dropped; duplicates are allowed here, since uniqueness is only
    /// enforced for mid-session additions.
    pub fn new(names: &[String]) -> Self {
        let participants = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(Participant::new)
            .collect();
        Self {
            participants,
            active: None,
            completed_order: Vec::new(),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn active_speaker(&self) -> Option<&Participant> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn pending(&self) -> impl Iterator<Item = &Participant> {
        self.participants
            .iter()
            .filter(|p| p.status == ParticipantStatus::Pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn completed_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.status == ParticipantStatus::Completed)
            .count()
    }

    /// Registers a new pending participant mid-session.
    pub fn add(&mut self, name: &str) -> AddOutcome {
        let name = name.trim();
        if name.is_empty() {
            return AddOutcome::Empty;
        }
        let lowered = name.to_lowercase();
        if self
            .participants
            .iter()
            .any(|p| p.name.to_lowercase() == lowered)
        {
            return AddOutcome::Duplicate;
        }
        self.participants.push(Participant::new(name));
        AddOutcome::Added
    }

    /// Gives `id` the floor. Fails when someone already has it or `id` is
    /// not a pending participant.
    pub fn start_speaking(&mut self, id: Uuid) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(participant) = self
            .participants
            .iter_mut()
            .find(|p| p.id == id && p.status == ParticipantStatus::Pending)
        else {
            return false;
        };
        participant.status = ParticipantStatus::Speaking;
        self.active = Some(id);
        true
    }

    /// One second of floor time for the active speaker, if any.
    pub fn tick(&mut self) {
        if let Some(id) = self.active {
            if let Some(participant) = self.participants.iter_mut().find(|p| p.id == id) {
                participant.speaking_secs += 1;
            }
        }
    }

    /// Ends the active turn. Returns the speaker's name, or `None` when no
    /// one held the floor (callers treat that as a guarded no-op).
    pub fn act(&mut self, outcome: TurnOutcome) -> Option<String> {
        let id = self.active?;
        let participant = self.participants.iter_mut().find(|p| p.id == id)?;
        participant.status = match outcome {
            TurnOutcome::Completed => ParticipantStatus::Completed,
            TurnOutcome::Skipped => ParticipantStatus::Skipped,
            TurnOutcome::Deferred => ParticipantStatus::Pending,
        };
        let name = participant.name.clone();
        if participant.status.is_terminal() {
            self.completed_order.push(id);
        }
        self.active = None;
        Some(name)
    }

    /// Re-queues a `Completed`/`Skipped` participant with a zeroed clock and
    /// drops them from the completion order. Returns the name on success;
    /// `Speaking` and `Pending` participants are left alone.
    pub fn rewind(&mut self, id: Uuid) -> Option<String> {
        let participant = self.participants.iter_mut().find(|p| p.id == id)?;
        if !participant.status.is_terminal() {
            return None;
        }
        participant.status = ParticipantStatus::Pending;
        participant.speaking_secs = 0;
        let name = participant.name.clone();
        self.completed_order.retain(|done| *done != id);
        Some(name)
    }

    /// True once a non-empty roster has no pending members and no speaker.
    pub fn is_terminal(&self) -> bool {
        !self.participants.is_empty()
            && self.active.is_none()
            && self
                .participants
                .iter()
                .all(|p| p.status != ParticipantStatus::Pending)
    }

    pub fn total_speaking_secs(&self) -> u32 {
        self.participants.iter().map(|p| p.speaking_secs).sum()
    }

    /// Names in the order turns reached a terminal status.
    pub fn completion_order(&self) -> Vec<String> {
        self.completed_order
            .iter()
            .filter_map(|id| self.get(*id).map(|p| p.name.clone()))
            .collect()
    }

    /// Everyone back to `Pending` with zeroed clocks.
    pub fn reset(&mut self) {
        for participant in &mut self.participants {
            participant.status = ParticipantStatus::Pending;
            participant.speaking_secs = 0;
        }
        self.active = None;
        self.completed_order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn speaker_id(session: &Session, name: &str) -> Uuid {
        session
            .participants()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .unwrap()
    }

    #[test]
    fn test_new_trims_and_drops_empty_names() {
        let session = Session::new(&names(&["  Alice  ", "", "   ", "Bob"]));
        let roster: Vec<_> = session.participants().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(roster, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_add_rejects_case_insensitive_duplicate() {
        let mut session = Session::new(&names(&["Alice"]));
        assert_eq!(session.add("alice"), AddOutcome::Duplicate);
        assert_eq!(session.add("  ALICE  "), AddOutcome::Duplicate);
        assert_eq!(session.len(), 1);
        assert_eq!(session.add("Bob"), AddOutcome::Added);
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_at_most_one_speaker() {
        let mut session = Session::new(&names(&["A", "B"]));
        let a = speaker_id(&session, "A");
        let b = speaker_id(&session, "B");

        assert!(session.start_speaking(a));
        assert!(!session.start_speaking(b));

        let speaking = session
            .participants()
            .iter()
            .filter(|p| p.status == ParticipantStatus::Speaking)
            .count();
        assert_eq!(speaking, 1);
    }

    #[test]
    fn test_tick_only_touches_active_speaker() {
        let mut session = Session::new(&names(&["A", "B"]));
        let a = speaker_id(&session, "A");
        session.start_speaking(a);

        for _ in 0..5 {
            session.tick();
        }
        assert_eq!(session.get(a).unwrap().speaking_secs, 5);
        assert_eq!(session.active_speaker().unwrap().name, "A");

        let b = speaker_id(&session, "B");
        assert_eq!(session.get(b).unwrap().speaking_secs, 0);

        // No speaker, no effect.
        session.act(TurnOutcome::Completed);
        session.tick();
        assert_eq!(session.get(a).unwrap().speaking_secs, 5);
    }

    #[test]
    fn test_act_requires_active_speaker() {
        let mut session = Session::new(&names(&["A"]));
        assert!(session.act(TurnOutcome::Completed).is_none());
    }

    #[test]
    fn test_defer_returns_to_pool() {
        let mut session = Session::new(&names(&["A"]));
        let a = speaker_id(&session, "A");
        session.start_speaking(a);
        session.tick();

        assert_eq!(session.act(TurnOutcome::Deferred).as_deref(), Some("A"));
        let p = session.get(a).unwrap();
        assert_eq!(p.status, ParticipantStatus::Pending);
        // Deferring keeps the accumulated time; only rewind zeroes it.
        assert_eq!(p.speaking_secs, 1);
        assert!(session.active_speaker().is_none());
        assert!(session.completion_order().is_empty());
    }

    #[test]
    fn test_rewind_is_idempotent_and_guarded() {
        let mut session = Session::new(&names(&["A", "B"]));
        let a = speaker_id(&session, "A");

        // Pending participant: untouched.
        assert!(session.rewind(a).is_none());

        session.start_speaking(a);
        session.tick();
        // Speaking participant: untouched.
        assert!(session.rewind(a).is_none());

        session.act(TurnOutcome::Completed);
        assert_eq!(session.rewind(a).as_deref(), Some("A"));
        let p = session.get(a).unwrap();
        assert_eq!(p.status, ParticipantStatus::Pending);
        assert_eq!(p.speaking_secs, 0);

        // Second rewind leaves the same state.
        assert!(session.rewind(a).is_none());
        let p = session.get(a).unwrap();
        assert_eq!(p.status, ParticipantStatus::Pending);
        assert_eq!(p.speaking_secs, 0);
    }

    #[test]
    fn test_completion_order_follows_act_not_roster() {
        let mut session = Session::new(&names(&["A", "B", "C"]));
        let a = speaker_id(&session, "A");
        let b = speaker_id(&session, "B");
        let c = speaker_id(&session, "C");

        session.start_speaking(b);
        session.act(TurnOutcome::Completed);
        session.start_speaking(c);
        session.act(TurnOutcome::Skipped);
        session.start_speaking(a);
        session.act(TurnOutcome::Completed);

        assert_eq!(session.completion_order(), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_rewind_drops_from_completion_order() {
        let mut session = Session::new(&names(&["A", "B"]));
        let a = speaker_id(&session, "A");
        let b = speaker_id(&session, "B");

        session.start_speaking(a);
        session.act(TurnOutcome::Completed);
        session.start_speaking(b);
        session.act(TurnOutcome::Completed);
        assert_eq!(session.completion_order(), vec!["A", "B"]);

        session.rewind(a);
        assert_eq!(session.completion_order(), vec!["B"]);

        // Completing again re-appends at the new position.
        session.start_speaking(a);
        session.act(TurnOutcome::Completed);
        assert_eq!(session.completion_order(), vec!["B", "A"]);
    }

    #[test]
    fn test_terminal_condition() {
        let mut session = Session::new(&names(&["A"]));
        assert!(!session.is_terminal());

        let a = speaker_id(&session, "A");
        session.start_speaking(a);
        assert!(!session.is_terminal());

        session.act(TurnOutcome::Completed);
        assert!(session.is_terminal());

        // Empty roster is never terminal.
        assert!(!Session::default().is_terminal());
    }

    #[test]
    fn test_reset_requeues_everyone() {
        let mut session = Session::new(&names(&["A", "B"]));
        let a = speaker_id(&session, "A");
        session.start_speaking(a);
        session.tick();
        session.act(TurnOutcome::Completed);

        session.reset();
        assert!(session.active_speaker().is_none());
        assert!(session.completion_order().is_empty());
        for p in session.participants() {
            assert_eq!(p.status, ParticipantStatus::Pending);
            assert_eq!(p.speaking_secs, 0);
        }
    }
}
