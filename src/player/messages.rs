use bevy::prelude::*;

use super::state::LocomotionMode;

/// Locomotion event messages emitted by the player controller.
///
/// Consumers subscribe with `MessageReader<LocomotionMessage>` to trigger
/// sound effects, particles, HUD updates, or other feedback.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub enum LocomotionMessage {
    ModeChanged {
        from: LocomotionMode,
        to: LocomotionMode,
    },
    Jumped,
    Crouched,
    StoodUp,
    SlideStarted,
    SlideEnded,
    WallRunStarted,
    WallRunEnded,
    WallJumped,
}
