use avian3d::prelude::*;
use bevy::prelude::*;

use super::input::MovementInput;
use super::messages::LocomotionMessage;
use super::slide::{slide_movement, stop_slide};
use super::speed::{MoveSpeed, lerp_rate};
use super::state::*;
use super::wallrun::wall_run_movement;
use crate::physics::sensors::{Sensors, detect_slope, detect_walls, probe_ground};
use crate::physics::{
    AvianBody, BodyComponents, ForceMode, GameLayer, PhysicsBody, Raycaster, SlopeReading,
};

/// Everything mode arbitration looks at
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeContext {
    pub wall_running: bool,
    pub sliding: bool,
    pub crouch_held: bool,
    pub sprint_held: bool,
    pub grounded: bool,
    pub on_slope: bool,
    pub vertical_velocity: f32,
}

/// Picks the single active mode and its target speed.
///
/// First match wins: wall-running, sliding, crouching, sprinting, walking,
/// airborne. Airborne returns no target so momentum carries through the air.
pub fn resolve_mode(ctx: &ModeContext, config: &PlayerConfig) -> (LocomotionMode, Option<f32>) {
    if ctx.wall_running {
        (LocomotionMode::WallRunning, Some(config.wall_run_speed))
    } else if ctx.sliding {
        // only a downhill slide earns slide speed
        let downhill = ctx.vertical_velocity < config.slide_slope_vertical_threshold;
        let target = if ctx.on_slope && downhill {
            config.slide_speed
        } else {
            config.sprint_speed
        };
        (LocomotionMode::Sliding, Some(target))
    } else if ctx.crouch_held {
        (LocomotionMode::Crouching, Some(config.crouch_speed))
    } else if ctx.grounded && ctx.sprint_held {
        (LocomotionMode::Sprinting, Some(config.sprint_speed))
    } else if ctx.grounded {
        (LocomotionMode::Walking, Some(config.walk_speed))
    } else {
        (LocomotionMode::Airborne, None)
    }
}

/// Gravity is off while wall-running or standing on a walkable slope
pub fn gravity_enabled_for(mode: LocomotionMode, slope: &SlopeReading) -> bool {
    mode != LocomotionMode::WallRunning && !slope.on_slope
}

/// Shared locomotion force toward `direction`.
///
/// On a slope the push follows the surface, with extra downforce whenever
/// the body is lifting off it. `vertical_velocity` is sampled before any
/// force this tick. Air control is a fraction of ground control.
pub fn base_movement<B: PhysicsBody + ?Sized>(
    body: &mut B,
    direction: Vec3,
    vertical_velocity: f32,
    speed: f32,
    sensors: &Sensors,
    exiting_slope: bool,
    config: &PlayerConfig,
) {
    if sensors.slope.on_slope && !exiting_slope {
        let force = sensors.slope.project(direction) * speed * config.slope_force;
        body.apply_force(force, ForceMode::Force);

        if vertical_velocity > 0.0 {
            body.apply_force(Vec3::NEG_Y * config.slope_adhesion_force, ForceMode::Force);
        }
    } else if sensors.grounded {
        let force = direction.normalize_or_zero() * speed * config.ground_force;
        body.apply_force(force, ForceMode::Force);
    } else {
        let force =
            direction.normalize_or_zero() * speed * config.ground_force * config.air_multiplier;
        body.apply_force(force, ForceMode::Force);
    }
}

/// Read-only inputs to one fixed tick of force application
pub struct ForceContext<'a> {
    pub config: &'a PlayerConfig,
    pub input: &'a MovementInput,
    pub orientation: &'a Orientation,
    pub sensors: &'a Sensors,
    pub exiting_slope: bool,
    pub speed: f32,
}

/// Runs the force routine of the arbitrated mode. Returns true if a slide timed out.
///
/// This is the only place forces are written during a fixed tick.
pub fn apply_mode_forces<B: PhysicsBody + ?Sized>(
    body: &mut B,
    mode: LocomotionMode,
    slide: &mut SlideState,
    ctx: &ForceContext,
    dt: f32,
) -> bool {
    let direction = ctx.orientation.move_direction(ctx.input.axes);
    let vertical = body.velocity().y;
    base_movement(
        body,
        direction,
        vertical,
        ctx.speed,
        ctx.sensors,
        ctx.exiting_slope,
        ctx.config,
    );

    let mut slide_ended = false;
    match mode {
        LocomotionMode::WallRunning => {
            wall_run_movement(body, &ctx.sensors.walls, ctx.orientation, ctx.input, ctx.config);
        }
        LocomotionMode::Sliding => {
            let slope = &ctx.sensors.slope;
            if slide_movement(body, slide, direction, vertical, slope, ctx.config, dt) {
                stop_slide(body, slide, ctx.input.crouch.held, ctx.config);
                slide_ended = true;
            }
        }
        _ => {}
    }

    body.set_gravity_enabled(gravity_enabled_for(mode, &ctx.sensors.slope));
    slide_ended
}

/// Caps speed at `speed`.
///
/// On a slope the full velocity is capped; elsewhere only the horizontal
/// part, so jumps and falls keep their vertical speed.
pub fn limit_velocity<B: PhysicsBody + ?Sized>(body: &mut B, speed: f32, slope_active: bool) {
    let velocity = body.velocity();

    if slope_active {
        if velocity.length() > speed {
            body.set_velocity(velocity.normalize_or_zero() * speed);
        }
    } else {
        let flat = Vec3::new(velocity.x, 0.0, velocity.z);
        if flat.length() > speed {
            let limited = flat.normalize_or_zero() * speed;
            body.set_velocity(Vec3::new(limited.x, velocity.y, limited.z));
        }
    }
}

/// Runs every probe from `origin`
pub fn read_sensors<R: Raycaster + ?Sized>(
    raycaster: &R,
    origin: Vec3,
    orientation: &Orientation,
    config: &PlayerConfig,
) -> Sensors {
    let ground: LayerMask = GameLayer::Ground.into();
    let wall: LayerMask = GameLayer::Wall.into();

    Sensors {
        grounded: probe_ground(raycaster, origin, config.ground_probe_distance(), ground),
        slope: detect_slope(
            raycaster,
            origin,
            config.slope_probe_distance(),
            config.max_slope_angle,
            ground,
        ),
        walls: detect_walls(
            raycaster,
            origin,
            orientation.right(),
            config.wall_check_distance,
            wall,
        ),
        above_ground: !probe_ground(raycaster, origin, config.min_jump_height, ground),
    }
}

/// Refreshes ground, slope, wall, and height probes via raycasts.
///
/// Rays start at the physics `Position`; the interpolated `Transform` lags it.
pub fn update_sensors(
    spatial_query: SpatialQuery,
    mut query: Query<(&Position, &PlayerConfig, &Orientation, &mut Sensors), With<Player>>,
) {
    for (position, config, orientation, mut sensors) in &mut query {
        *sensors = read_sensors(&spatial_query, position.0, orientation, config);
    }
}

/// Arbitrates the locomotion mode, requests its target speed, and syncs drag and gravity
pub fn resolve_locomotion(
    mut query: Query<
        (
            BodyComponents,
            &PlayerConfig,
            &MovementInput,
            &Sensors,
            &WallRunState,
            &mut SlideState,
            &mut LocomotionMode,
            &mut MoveSpeed,
        ),
        With<Player>,
    >,
    mut writer: MessageWriter<LocomotionMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut body, config, input, sensors, wall_run, mut slide, mut mode, mut speed) in &mut query {
        let mut body = AvianBody::from_query(&mut body, dt);

        // a wall run outranks a slide, so the slide ends rather than lingering underneath
        if wall_run.active && slide.active {
            stop_slide(&mut body, &mut slide, input.crouch.held, config);
            debug!("slide cancelled by wall run");
            writer.write(LocomotionMessage::SlideEnded);
        }

        let ctx = ModeContext {
            wall_running: wall_run.active,
            sliding: slide.active,
            crouch_held: input.crouch.held,
            sprint_held: input.sprint.held,
            grounded: sensors.grounded,
            on_slope: sensors.slope.on_slope,
            vertical_velocity: body.velocity().y,
        };
        let (next, target) = resolve_mode(&ctx, config);

        if *mode != next {
            debug!("locomotion mode {:?} -> {:?}", *mode, next);
            writer.write(LocomotionMessage::ModeChanged {
                from: *mode,
                to: next,
            });
            *mode = next;
        }

        if let Some(target) = target {
            speed.request(target, config.speed_snap_threshold);
        }

        body.set_drag(if sensors.grounded { config.ground_drag } else { 0.0 });
        body.set_gravity_enabled(gravity_enabled_for(next, &sensors.slope));
    }
}

/// Advances any in-flight speed interpolation, faster on steeper slopes
pub fn advance_move_speed(
    mut query: Query<(&PlayerConfig, &Sensors, &mut MoveSpeed), With<Player>>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (config, sensors, mut speed) in &mut query {
        if !speed.is_interpolating() {
            continue;
        }

        let slope_angle = sensors.slope.on_slope.then_some(sensors.slope.angle);
        let rate = lerp_rate(
            config.speed_increase_multiplier,
            config.slope_increase_multiplier,
            slope_angle,
        );
        speed.advance(dt, rate);
    }
}

/// Clamps body velocity to the current speed
pub fn limit_speed(
    mut query: Query<(BodyComponents, &Sensors, &JumpState, &MoveSpeed), With<Player>>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut body, sensors, jump, speed) in &mut query {
        let mut body = AvianBody::from_query(&mut body, dt);
        let slope_active = sensors.slope.on_slope && !jump.exiting_slope;
        limit_velocity(&mut body, speed.current, slope_active);
    }
}

/// Applies the active mode's forces on the fixed timestep
pub fn apply_locomotion_forces(
    mut query: Query<
        (
            BodyComponents,
            &PlayerConfig,
            &MovementInput,
            &Orientation,
            &Sensors,
            &JumpState,
            &MoveSpeed,
            &LocomotionMode,
            &mut SlideState,
        ),
        With<Player>,
    >,
    mut writer: MessageWriter<LocomotionMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut body, config, input, orientation, sensors, jump, speed, mode, mut slide) in
        &mut query
    {
        let mut body = AvianBody::from_query(&mut body, dt);
        let ctx = ForceContext {
            config,
            input,
            orientation,
            sensors,
            exiting_slope: jump.exiting_slope,
            speed: speed.current,
        };

        if apply_mode_forces(&mut body, *mode, &mut slide, &ctx, dt) {
            debug!("slide timed out");
            writer.write(LocomotionMessage::SlideEnded);
        }
    }
}
