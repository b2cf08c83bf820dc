use crate::intent::Motion;

/// Pose frame of the walk clip shown while standing still.
pub const IDLE_POSE_FRAME: u32 = 5;

/// What the animation layer should be playing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationCue {
    Run { rate: f32 },
    Walk { rate: f32 },
    /// Stop the current clip and hold a single frame of the walk clip.
    Idle { pose_frame: u32 },
}

/// Clip playback lives outside this crate.
pub trait AnimationPlayer {
    fn play(&mut self, cue: AnimationCue);
}

pub fn select_cue(motion: Option<Motion>) -> AnimationCue {
    match motion {
        Some(Motion::Forward) => AnimationCue::Run { rate: 1.0 },
        Some(Motion::Backward) => AnimationCue::Walk { rate: -1.0 },
        Some(Motion::Turn) => AnimationCue::Walk { rate: 1.0 },
        None => AnimationCue::Idle {
            pose_frame: IDLE_POSE_FRAME,
        },
    }
}

/// Forwards cues to a player only when they change, so looping clips are not restarted.
#[derive(Debug, Default)]
pub struct CueTracker {
    current: Option<AnimationCue>,
}

impl CueTracker {
    pub fn current(&self) -> Option<AnimationCue> {
        self.current
    }

    /// Returns true if the cue was sent.
    pub fn apply(&mut self, cue: AnimationCue, player: &mut impl AnimationPlayer) -> bool {
        if self.current == Some(cue) {
            return false;
        }
        self.current = Some(cue);
        player.play(cue);
        true
    }
}
