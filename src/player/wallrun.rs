use bevy::prelude::*;

use super::input::MovementInput;
use super::messages::LocomotionMessage;
use super::state::*;
use crate::physics::sensors::Sensors;
use crate::physics::{AvianBody, BodyComponents, ForceMode, PhysicsBody, WallReading};

/// What changed during one wall-run update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallRunTransition {
    Attached,
    Detached,
    /// Jumped off the wall; the body is already detached
    WallJumped,
}

/// Wall-run state machine, run once per frame.
///
/// Attaching needs a wall on either side, forward input, enough clearance
/// below, and no active exit cooldown. Gravity is switched in the same
/// call that changes `state.active`.
pub fn update_wall_run_state<B: PhysicsBody + ?Sized>(
    body: &mut B,
    state: &mut WallRunState,
    walls: &WallReading,
    above_ground: bool,
    input: &MovementInput,
    config: &PlayerConfig,
    dt: f32,
) -> Option<WallRunTransition> {
    let can_attach = walls.any() && input.axes.y > 0.0 && above_ground && !state.exiting();

    if can_attach {
        let mut transition = None;
        if !state.active {
            attach(body, state);
            transition = Some(WallRunTransition::Attached);
        }

        if input.jump.pressed {
            wall_jump(body, state, walls, config);
            transition = Some(WallRunTransition::WallJumped);
        }

        return transition;
    }

    let transition = if state.active {
        detach(body, state);
        Some(WallRunTransition::Detached)
    } else {
        None
    };

    if state.exiting() {
        state.exit_cooldown = (state.exit_cooldown - dt).max(0.0);
    }

    transition
}

fn attach<B: PhysicsBody + ?Sized>(body: &mut B, state: &mut WallRunState) {
    state.active = true;
    body.set_gravity_enabled(false);
}

fn detach<B: PhysicsBody + ?Sized>(body: &mut B, state: &mut WallRunState) {
    state.active = false;
    body.set_gravity_enabled(true);
}

/// Pushes the body up and away from the wall and opens the exit window
fn wall_jump<B: PhysicsBody + ?Sized>(
    body: &mut B,
    state: &mut WallRunState,
    walls: &WallReading,
    config: &PlayerConfig,
) {
    let Some(wall_normal) = walls.normal() else {
        return;
    };

    state.exit_cooldown = config.exit_wall_time;
    detach(body, state);

    let impulse = Vec3::Y * config.wall_jump_up_force + wall_normal * config.wall_jump_side_force;
    body.reset_vertical_velocity();
    body.apply_force(impulse, ForceMode::Impulse);
}

/// Run direction along the wall, picking whichever sign better matches `forward`
pub fn wall_forward(wall_normal: Vec3, forward: Vec3) -> Vec3 {
    let along = wall_normal.cross(Vec3::Y);
    if (forward - along).length() > (forward + along).length() {
        -along
    } else {
        along
    }
}

/// Wall-run forces for one fixed tick.
///
/// Vertical velocity is pinned every tick so gravity can't creep in. The
/// inward push keeps the body on convex walls unless the player is steering
/// away from the wall.
pub fn wall_run_movement<B: PhysicsBody + ?Sized>(
    body: &mut B,
    walls: &WallReading,
    orientation: &Orientation,
    input: &MovementInput,
    config: &PlayerConfig,
) {
    let Some(wall_normal) = walls.normal() else {
        return;
    };

    body.set_gravity_enabled(false);
    body.reset_vertical_velocity();

    let forward = wall_forward(wall_normal, *orientation.forward());
    body.apply_force(forward * config.wall_run_force, ForceMode::Force);

    if input.wall_up.held {
        body.set_vertical_velocity(config.wall_climb_speed);
    }
    if input.wall_down.held {
        body.set_vertical_velocity(-config.wall_climb_speed);
    }

    let steering_away = (walls.left.is_some() && input.axes.x > 0.0)
        || (walls.right.is_some() && input.axes.x < 0.0);
    if !steering_away {
        body.apply_force(-wall_normal * config.wall_stick_force, ForceMode::Force);
    }
}

/// Attaches to and detaches from walls, and handles wall jumps
pub fn update_wall_run(
    mut query: Query<
        (
            BodyComponents,
            &PlayerConfig,
            &MovementInput,
            &Sensors,
            &mut WallRunState,
        ),
        With<Player>,
    >,
    mut writer: MessageWriter<LocomotionMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut body, config, input, sensors, mut state) in &mut query {
        let mut body = AvianBody::from_query(&mut body, dt);

        let transition = update_wall_run_state(
            &mut body,
            &mut state,
            &sensors.walls,
            sensors.above_ground,
            input,
            config,
            dt,
        );

        match transition {
            Some(WallRunTransition::Attached) => {
                debug!("wall run started");
                writer.write(LocomotionMessage::WallRunStarted);
            }
            Some(WallRunTransition::Detached) => {
                debug!("wall run ended");
                writer.write(LocomotionMessage::WallRunEnded);
            }
            Some(WallRunTransition::WallJumped) => {
                debug!("wall jump");
                writer.write(LocomotionMessage::WallJumped);
                writer.write(LocomotionMessage::WallRunEnded);
            }
            None => {}
        }
    }
}
