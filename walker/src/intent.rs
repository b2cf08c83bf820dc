//! Per-frame motion intents.
//!
//! Input devices are polled elsewhere. The walker only sees the set of actions held this frame.

use crate::{bitmask_flags::BitmaskFlags, define_bitmask_flags};

define_bitmask_flags!(Action, u8, {
    Forward,
    Backward,
    Left,
    Right,
});

/// The set of actions active this frame.
pub type MotionIntents = BitmaskFlags<u8>;

/// Anything that can report whether an action is held.
pub trait InputSource {
    fn is_active(&self, action: Action) -> bool;

    fn intents(&self) -> MotionIntents {
        let mut intents = MotionIntents::empty();
        for action in [Action::Forward, Action::Backward, Action::Left, Action::Right] {
            if self.is_active(action) {
                intents.add(action);
            }
        }
        intents
    }
}

impl InputSource for MotionIntents {
    fn is_active(&self, action: Action) -> bool {
        self.has(action)
    }

    fn intents(&self) -> MotionIntents {
        *self
    }
}

/// Motion reported to the animation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Forward,
    Backward,
    Turn,
}

/// Axes decoded from a set of intents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Decoded {
    /// +1 turns left, -1 turns right.
    pub turn: f32,
    /// -1 is forward, +1 is backward.
    pub advance: f32,
    pub motion: Option<Motion>,
}

/// Decode held actions into turn/advance axes.
///
/// Opposite actions cancel on their axis. When several actions are held the reported motion
/// is the last one in the order left, right, forward, backward.
pub fn decode(intents: MotionIntents) -> Decoded {
    let mut decoded = Decoded::default();

    if intents.has(Action::Left) {
        decoded.turn += 1.0;
        decoded.motion = Some(Motion::Turn);
    }
    if intents.has(Action::Right) {
        decoded.turn -= 1.0;
        decoded.motion = Some(Motion::Turn);
    }
    if intents.has(Action::Forward) {
        decoded.advance -= 1.0;
        decoded.motion = Some(Motion::Forward);
    }
    if intents.has(Action::Backward) {
        decoded.advance += 1.0;
        decoded.motion = Some(Motion::Backward);
    }

    decoded
}
