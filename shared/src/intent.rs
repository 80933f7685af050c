use serde::{Deserialize, Serialize};

use crate::{ActorId, PeerId, sequence::IntentSeq};

/// Per-tick input produced by an actor's controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Horizontal axis. Expected in [-1, 1]; the authority clamps it regardless.
    pub horizontal: f32,
    /// True only on the sample where the jump button was newly pressed.
    pub jump: bool,
}

impl Intent {
    pub fn new(horizontal: f32, jump: bool) -> Self {
        Self { horizontal, jump }
    }

    /// Horizontal axis clamped to [-1, 1]. NaN counts as no input.
    pub fn clamped_horizontal(&self) -> f32 {
        clamp_axis(self.horizontal)
    }
}

/// Clamps an axis value to [-1, 1], mapping NaN to 0.
#[inline]
pub fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// An intent in flight from a controller to the authority.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentMessage {
    pub actor_id: ActorId,
    /// Peer that produced the intent; must be the actor's controller.
    pub sender: PeerId,
    pub seq: IntentSeq,
    pub intent: Intent,
}

/// Controller-side input sampling.
///
/// Runs once per render/input frame. The horizontal axis is last-sample-wins; a jump is
/// detected on the press edge and stays pending until the intent is taken for sending, so
/// a press between two sends is never lost.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntentSampler {
    pending: Option<Intent>,
    jump_was_held: bool,
}

impl IntentSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame of input.
    pub fn sample(&mut self, horizontal: f32, jump_held: bool) {
        let pressed = jump_held && !self.jump_was_held;
        self.jump_was_held = jump_held;

        let jump = pressed || self.pending.is_some_and(|p| p.jump);
        self.pending = Some(Intent::new(clamp_axis(horizontal), jump));
    }

    /// Returns the latest unsent intent and clears it.
    pub fn take(&mut self) -> Option<Intent> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<&Intent> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamp_bounds_out_of_range_values() {
        assert_eq!(Intent::new(2.0, false).clamped_horizontal(), 1.0);
        assert_eq!(Intent::new(-7.5, false).clamped_horizontal(), -1.0);
        assert_eq!(Intent::new(0.25, false).clamped_horizontal(), 0.25);
        assert_eq!(Intent::new(f32::NAN, false).clamped_horizontal(), 0.0);
    }

    #[test]
    fn sampler_keeps_only_last_horizontal() {
        let mut sampler = IntentSampler::new();
        sampler.sample(0.5, false);
        sampler.sample(-0.3, false);

        assert_eq!(sampler.take(), Some(Intent::new(-0.3, false)));
        assert_eq!(sampler.take(), None);
    }

    #[test]
    fn sampler_jump_is_edge_triggered() {
        let mut sampler = IntentSampler::new();
        sampler.sample(0.0, true);
        assert!(sampler.take().unwrap().jump);

        // Still held: no new press.
        sampler.sample(0.0, true);
        assert!(!sampler.take().unwrap().jump);

        sampler.sample(0.0, false);
        sampler.sample(0.0, true);
        assert!(sampler.take().unwrap().jump);
    }

    #[test]
    fn sampler_jump_survives_later_samples_until_taken() {
        let mut sampler = IntentSampler::new();
        sampler.sample(0.0, true);
        sampler.sample(1.0, false);
        sampler.sample(0.5, false);

        assert_eq!(sampler.take(), Some(Intent::new(0.5, true)));
    }

    proptest! {
        #[test]
        fn clamped_axis_is_always_in_range(h in any::<f32>()) {
            let c = clamp_axis(h);
            prop_assert!((-1.0..=1.0).contains(&c));
        }
    }
}
