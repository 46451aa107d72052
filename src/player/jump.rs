use bevy::prelude::*;

use super::input::MovementInput;
use super::messages::LocomotionMessage;
use super::state::*;
use crate::physics::{AvianBody, BodyComponents, ForceMode, PhysicsBody, sensors::Sensors};

/// Counts down the jump cooldown; the exiting-slope window closes with it
pub fn tick_jump_cooldown(jump: &mut JumpState, dt: f32) {
    if jump.cooldown > 0.0 {
        jump.cooldown -= dt;
        if jump.cooldown <= 0.0 {
            jump.cooldown = 0.0;
            jump.exiting_slope = false;
        }
    }
}

/// Jumps if the key went down this frame, the cooldown has elapsed, and the body is grounded.
///
/// Vertical velocity is zeroed first so every jump reaches the same height.
pub fn try_jump<B: PhysicsBody + ?Sized>(
    body: &mut B,
    jump: &mut JumpState,
    config: &PlayerConfig,
    pressed: bool,
    grounded: bool,
) -> bool {
    if !(pressed && jump.ready() && grounded) {
        return false;
    }

    jump.exiting_slope = true;
    jump.cooldown = config.jump_cooldown;

    body.reset_vertical_velocity();
    body.apply_force(Vec3::Y * config.jump_force, ForceMode::Impulse);
    true
}

/// Handles jump input and the jump cooldown
pub fn handle_jump(
    mut query: Query<
        (
            BodyComponents,
            &PlayerConfig,
            &MovementInput,
            &Sensors,
            &mut JumpState,
        ),
        With<Player>,
    >,
    mut writer: MessageWriter<LocomotionMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut body, config, input, sensors, mut jump) in &mut query {
        tick_jump_cooldown(&mut jump, dt);

        let mut body = AvianBody::from_query(&mut body, dt);
        if try_jump(&mut body, &mut jump, config, input.jump.pressed, sensors.grounded) {
            debug!("jump");
            writer.write(LocomotionMessage::Jumped);
        }
    }
}
