//! Wrapping `u16` sequence numbers stamped on intents.
//!
//! The authority applies intents from a controller strictly in send order; anything that
//! is not newer than the last accepted number is a duplicate or arrived late.

/// Wrapping intent sequence number.
pub type IntentSeq = u16;

/// Returns whether `s1` is newer than `s2`, accounting for wrap-around.
///
/// sequence_greater_than(2, 1) is true,
/// sequence_greater_than(0, 65535) is true,
/// sequence_greater_than(1, 1) is false.
pub fn sequence_greater_than(s1: IntentSeq, s2: IntentSeq) -> bool {
    ((s1 > s2) && (s1 - s2 <= 32768)) || ((s1 < s2) && (s2 - s1 > 32768))
}

pub fn sequence_less_than(s1: IntentSeq, s2: IntentSeq) -> bool {
    sequence_greater_than(s2, s1)
}

/// Per-actor sequence bookkeeping on the authority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceGate {
    last_accepted: Option<IntentSeq>,
}

impl SequenceGate {
    /// Resumes a gate from a persisted last-accepted number.
    pub fn resume(last_accepted: Option<IntentSeq>) -> Self {
        Self { last_accepted }
    }

    /// Accepts `seq` if it is newer than everything seen so far.
    pub fn accept(&mut self, seq: IntentSeq) -> bool {
        match self.last_accepted {
            Some(last) if !sequence_greater_than(seq, last) => false,
            _ => {
                self.last_accepted = Some(seq);
                true
            }
        }
    }

    /// Forgets history so the next sequence number is accepted unconditionally.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    pub fn last_accepted(&self) -> Option<IntentSeq> {
        self.last_accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn greater_than_handles_wrap_around() {
        assert!(sequence_greater_than(2, 1));
        assert!(!sequence_greater_than(1, 2));
        assert!(!sequence_greater_than(1, 1));
        assert!(sequence_greater_than(0, u16::MAX));
        assert!(sequence_less_than(u16::MAX, 3));
    }

    #[test]
    fn gate_rejects_duplicates_and_stale() {
        let mut gate = SequenceGate::default();
        assert!(gate.accept(10));
        assert!(!gate.accept(10));
        assert!(!gate.accept(9));
        assert!(gate.accept(11));
        assert_eq!(gate.last_accepted(), Some(11));
    }

    #[test]
    fn gate_accepts_across_wrap() {
        let mut gate = SequenceGate::default();
        assert!(gate.accept(u16::MAX));
        assert!(gate.accept(0));
        assert!(!gate.accept(u16::MAX));
    }

    #[test]
    fn resumed_gate_remembers_history() {
        let mut gate = SequenceGate::resume(Some(10));
        assert!(!gate.accept(10));
        assert!(!gate.accept(9));
        assert!(gate.accept(11));
    }

    #[test]
    fn reset_accepts_any_next_number() {
        let mut gate = SequenceGate::default();
        gate.accept(500);
        gate.reset();
        assert!(gate.accept(3));
    }

    proptest! {
        #[test]
        fn successor_is_always_newer(s in any::<u16>()) {
            prop_assert!(sequence_greater_than(s.wrapping_add(1), s));
            prop_assert!(!sequence_greater_than(s, s.wrapping_add(1)));
        }
    }
}
