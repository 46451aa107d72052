use bevy::prelude::*;

use super::input::MovementInput;
use super::messages::LocomotionMessage;
use super::state::*;
use crate::physics::{AvianBody, BodyComponents, ForceMode, PhysicsBody, SlopeReading};

/// Starts a slide: shrinks the body, pushes it down, and resets the timer
pub fn start_slide<B: PhysicsBody + ?Sized>(
    body: &mut B,
    slide: &mut SlideState,
    config: &PlayerConfig,
) {
    slide.active = true;
    slide.remaining = config.max_slide_time;

    body.set_vertical_scale(config.slide_y_scale);
    body.apply_force(Vec3::NEG_Y * config.slide_impulse, ForceMode::Impulse);
}

/// Ends a slide and restores the scale in the same step.
///
/// Crouch edges are ignored while sliding, so a crouch still held here
/// drops the body to crouch height instead of standing it up.
pub fn stop_slide<B: PhysicsBody + ?Sized>(
    body: &mut B,
    slide: &mut SlideState,
    crouch_held: bool,
    config: &PlayerConfig,
) {
    slide.active = false;
    slide.remaining = 0.0;

    let y_scale = if crouch_held {
        config.crouch_y_scale
    } else {
        config.stand_y_scale
    };
    body.set_vertical_scale(y_scale);
}

/// Applies slide input edges. Returns the message to emit, if any.
///
/// A slide needs the key to go down while some movement input is held.
pub fn update_slide_input<B: PhysicsBody + ?Sized>(
    body: &mut B,
    slide: &mut SlideState,
    input: &MovementInput,
    config: &PlayerConfig,
) -> Option<LocomotionMessage> {
    if input.slide.pressed && input.has_direction() {
        start_slide(body, slide, config);
        return Some(LocomotionMessage::SlideStarted);
    }

    if input.slide.released && slide.active {
        stop_slide(body, slide, input.crouch.held, config);
        return Some(LocomotionMessage::SlideEnded);
    }

    None
}

/// Slide forces for one fixed tick. Returns true once the timer has run out;
/// the caller stops the slide.
///
/// `vertical_velocity` is sampled before any force this tick. On flat ground
/// or moving up a slope the slide pushes along the raw input direction and
/// burns its timer; sliding down a slope follows the surface and never
/// times out.
pub fn slide_movement<B: PhysicsBody + ?Sized>(
    body: &mut B,
    slide: &mut SlideState,
    direction: Vec3,
    vertical_velocity: f32,
    slope: &SlopeReading,
    config: &PlayerConfig,
    dt: f32,
) -> bool {
    if !slide.active {
        return false;
    }

    if !slope.on_slope || vertical_velocity > config.slide_uphill_threshold {
        body.apply_force(direction.normalize_or_zero() * config.slide_force, ForceMode::Force);
        slide.remaining -= dt;
    } else {
        body.apply_force(slope.project(direction) * config.slide_force, ForceMode::Force);
    }

    slide.remaining <= 0.0
}

/// Starts and stops slides from input
pub fn update_slide(
    mut query: Query<
        (BodyComponents, &PlayerConfig, &MovementInput, &mut SlideState),
        With<Player>,
    >,
    mut writer: MessageWriter<LocomotionMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut body, config, input, mut slide) in &mut query {
        let mut body = AvianBody::from_query(&mut body, dt);

        if let Some(message) = update_slide_input(&mut body, &mut slide, input, config) {
            debug!("{message:?}");
            writer.write(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::crouch::start_crouch;
    use crate::physics::body::testing::TestBody;

    fn pressed_slide(axes: Vec2) -> MovementInput {
        let mut input = MovementInput {
            axes,
            ..default()
        };
        input.slide.press();
        input
    }

    #[test]
    fn slide_needs_movement_input() {
        let config = PlayerConfig::default();
        let mut body = TestBody::default();
        let mut slide = SlideState::default();

        let input = pressed_slide(Vec2::ZERO);
        let message = update_slide_input(&mut body, &mut slide, &input, &config);
        assert_eq!(message, None);
        assert!(!slide.active);
        assert_eq!(body.scale.y, config.stand_y_scale);
    }

    #[test]
    fn slide_start_shrinks_and_pushes_down() {
        let config = PlayerConfig::default();
        let mut body = TestBody::default();
        let mut slide = SlideState::default();

        let message = update_slide_input(&mut body, &mut slide, &pressed_slide(Vec2::Y), &config);
        assert_eq!(message, Some(LocomotionMessage::SlideStarted));
        assert!(slide.active);
        assert_eq!(slide.remaining, config.max_slide_time);
        assert_eq!(body.scale.y, config.slide_y_scale);
        assert_eq!(body.impulses, vec![Vec3::NEG_Y * config.slide_impulse]);
    }

    #[test]
    fn releasing_the_key_ends_the_slide() {
        let config = PlayerConfig::default();
        let mut body = TestBody::default();
        let mut slide = SlideState::default();
        start_slide(&mut body, &mut slide, &config);

        let mut input = MovementInput::default();
        input.slide.release();
        let message = update_slide_input(&mut body, &mut slide, &input, &config);

        assert_eq!(message, Some(LocomotionMessage::SlideEnded));
        assert!(!slide.active);
        assert_eq!(body.scale.y, config.stand_y_scale);
    }

    #[test]
    fn flat_slide_times_out_and_restores_scale() {
        let config = PlayerConfig {
            max_slide_time: 1.0,
            ..default()
        };
        let mut body = TestBody::default();
        let mut slide = SlideState::default();
        start_slide(&mut body, &mut slide, &config);

        let dt = 1.0 / 50.0;
        let flat = SlopeReading::default();
        let mut ticks = 0;
        while !slide_movement(&mut body, &mut slide, Vec3::NEG_Z, 0.0, &flat, &config, dt) {
            assert_eq!(body.scale.y, config.slide_y_scale);
            ticks += 1;
            assert!(ticks < 100, "slide never ended");
        }

        // 1.0s at 50Hz, allowing for float accumulation
        assert!((49..=50).contains(&ticks));
        assert!(slide.remaining <= 0.0);
    }

    #[test]
    fn downhill_slide_follows_the_slope_without_timing_out() {
        let config = PlayerConfig::default();
        let normal = Quat::from_rotation_x(-25f32.to_radians()) * Vec3::Y;
        let slope = SlopeReading::from_normal(normal, config.max_slope_angle);
        assert!(slope.on_slope);

        let mut body = TestBody::default();
        let mut slide = SlideState::default();
        start_slide(&mut body, &mut slide, &config);
        body.forces.clear();

        for _ in 0..200 {
            let timed_out =
                slide_movement(&mut body, &mut slide, Vec3::NEG_Z, -3.0, &slope, &config, 0.02);
            assert!(!timed_out);
        }

        assert!(slide.active);
        assert_eq!(slide.remaining, config.max_slide_time);
        let force = body.forces[0];
        assert!(force.dot(normal).abs() < 1.0e-3);
        assert!((force.length() - config.slide_force).abs() < 1.0e-3);
    }

    #[test]
    fn uphill_slide_uses_raw_direction_and_times_out() {
        let config = PlayerConfig::default();
        let slope = SlopeReading::from_normal(
            Quat::from_rotation_x(25f32.to_radians()) * Vec3::Y,
            config.max_slope_angle,
        );

        let mut body = TestBody::default();
        let mut slide = SlideState::default();
        start_slide(&mut body, &mut slide, &config);
        let direction = Vec3::new(0.0, 0.0, -2.0);
        slide_movement(&mut body, &mut slide, direction, 1.0, &slope, &config, 0.1);
        assert_eq!(body.forces[0], Vec3::NEG_Z * config.slide_force);
        assert!(slide.remaining < config.max_slide_time);
    }

    #[test]
    fn slide_ending_under_a_held_crouch_returns_to_crouch_height() {
        let config = PlayerConfig::default();
        let mut body = TestBody::default();
        let mut slide = SlideState::default();

        let mut input = MovementInput {
            axes: Vec2::Y,
            ..default()
        };
        input.crouch.press();
        input.slide.press();
        assert!(start_crouch(&mut body, &config, &slide));
        update_slide_input(&mut body, &mut slide, &input, &config);
        assert!(slide.active);

        input.crouch.clear_edges();
        input.slide.clear_edges();
        input.slide.release();
        let message = update_slide_input(&mut body, &mut slide, &input, &config);

        assert_eq!(message, Some(LocomotionMessage::SlideEnded));
        assert!(!slide.active);
        assert_eq!(body.scale.y, config.crouch_y_scale);
    }

    #[test]
    fn slide_ending_without_crouch_stands_up() {
        let config = PlayerConfig::default();
        let mut body = TestBody::default();
        let mut slide = SlideState::default();
        start_slide(&mut body, &mut slide, &config);

        stop_slide(&mut body, &mut slide, false, &config);
        assert_eq!(body.scale.y, config.stand_y_scale);
    }
}
