//! Stand-in animation driver.
//!
//! Rendering is out of scope, but states still wait on two clip callbacks:
//! a designated keyframe and clip completion. This driver times those events
//! from a fixed clip table keyed by the animator bool that selects the clip.

use crate::components::{Animator, ClipPlayer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub name: &'static str,
    /// Seconds into the clip at which the keyframe callback fires.
    pub keyframe: Option<f32>,
    /// Clip length; `None` loops and never reports completion.
    pub length: Option<f32>,
}

/// Clips that raise callbacks. Overlays come before the base state clip they
/// play over, so the first raised entry wins.
pub const CLIPS: &[Clip] = &[
    Clip {
        name: "climbLedge",
        keyframe: None,
        length: Some(0.5),
    },
    Clip {
        name: "ledgeClimbState",
        keyframe: Some(0.1),
        length: None,
    },
    Clip {
        name: "land",
        keyframe: None,
        length: Some(0.1),
    },
    Clip {
        name: "attack",
        keyframe: Some(0.15),
        length: Some(0.35),
    },
    Clip {
        name: "meleeAttack",
        keyframe: Some(0.2),
        length: Some(0.5),
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipEvents {
    pub keyframe: bool,
    pub finished: bool,
}

fn select_clip(anim: &Animator) -> Option<&'static Clip> {
    CLIPS.iter().find(|clip| anim.get_bool(clip.name))
}

/// Advance the cursor by `dt` and report which callbacks fire this frame.
///
/// A different clip, or the same clip in a new visit, restarts from zero.
pub fn advance_clip(player: &mut ClipPlayer, anim: &Animator, visit_started: f32, dt: f32) -> ClipEvents {
    let clip = select_clip(anim);
    let name = clip.map(|clip| clip.name);
    if player.clip != name || player.visit_started != Some(visit_started) {
        *player = ClipPlayer {
            clip: name,
            visit_started: Some(visit_started),
            ..ClipPlayer::default()
        };
    }

    let Some(clip) = clip else {
        return ClipEvents::default();
    };

    player.elapsed += dt;
    let mut events = ClipEvents::default();
    if let Some(at) = clip.keyframe {
        if !player.keyframe_fired && player.elapsed >= at {
            player.keyframe_fired = true;
            events.keyframe = true;
        }
    }
    if let Some(length) = clip.length {
        if !player.finish_fired && player.elapsed >= length {
            player.finish_fired = true;
            events.finished = true;
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_keyframe_then_finish_once() {
        let mut anim = Animator::default();
        anim.set_bool("attack", true);
        let mut player = ClipPlayer::default();

        let steps: Vec<ClipEvents> = (0..8).map(|_| advance_clip(&mut player, &anim, 0.0, 0.06)).collect();

        assert_eq!(steps.iter().filter(|e| e.keyframe).count(), 1);
        assert_eq!(steps.iter().filter(|e| e.finished).count(), 1);
        assert!(steps[2].keyframe);
        assert!(steps[5].finished);
    }

    #[test]
    fn overlay_clip_takes_over_and_restarts() {
        let mut anim = Animator::default();
        anim.set_bool("ledgeClimbState", true);
        let mut player = ClipPlayer::default();

        let hang = advance_clip(&mut player, &anim, 1.0, 0.2);
        assert!(hang.keyframe);

        anim.set_bool("climbLedge", true);
        let first = advance_clip(&mut player, &anim, 1.0, 0.2);
        assert_eq!(player.clip, Some("climbLedge"));
        assert!(!first.finished);

        let done = advance_clip(&mut player, &anim, 1.0, 0.4);
        assert!(done.finished);
    }

    #[test]
    fn reentering_a_state_replays_its_clip() {
        let mut anim = Animator::default();
        anim.set_bool("attack", true);
        let mut player = ClipPlayer::default();

        assert!(advance_clip(&mut player, &anim, 0.0, 0.4).finished);
        assert!(!advance_clip(&mut player, &anim, 0.0, 0.4).finished);
        assert!(advance_clip(&mut player, &anim, 0.8, 0.4).finished);
    }

    #[test]
    fn looping_states_raise_nothing() {
        let mut anim = Animator::default();
        anim.set_bool("idle", true);
        let mut player = ClipPlayer::default();

        assert_eq!(advance_clip(&mut player, &anim, 0.0, 10.0), ClipEvents::default());
        assert_eq!(player.clip, None);
    }
}
