use bevy::prelude::*;

use super::input::MovementInput;
use super::messages::LocomotionMessage;
use super::state::*;
use crate::physics::{AvianBody, BodyComponents, ForceMode, PhysicsBody};

/// Shrinks the body to crouch height and pushes it down so it doesn't float.
///
/// Does nothing while sliding; the slide owns the body's scale.
pub fn start_crouch<B: PhysicsBody + ?Sized>(
    body: &mut B,
    config: &PlayerConfig,
    slide: &SlideState,
) -> bool {
    if slide.active {
        return false;
    }

    body.set_vertical_scale(config.crouch_y_scale);
    body.apply_force(Vec3::NEG_Y * config.crouch_impulse, ForceMode::Impulse);
    true
}

/// Restores standing height unless a slide owns the scale
pub fn stop_crouch<B: PhysicsBody + ?Sized>(
    body: &mut B,
    config: &PlayerConfig,
    slide: &SlideState,
) -> bool {
    if slide.active {
        return false;
    }

    body.set_vertical_scale(config.stand_y_scale);
    true
}

/// Applies crouch key edges to the body's scale
pub fn handle_crouch(
    mut query: Query<(BodyComponents, &PlayerConfig, &MovementInput, &SlideState), With<Player>>,
    mut writer: MessageWriter<LocomotionMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut body, config, input, slide) in &mut query {
        let mut body = AvianBody::from_query(&mut body, dt);

        if input.crouch.pressed && start_crouch(&mut body, config, slide) {
            writer.write(LocomotionMessage::Crouched);
        }

        if input.crouch.released && stop_crouch(&mut body, config, slide) {
            writer.write(LocomotionMessage::StoodUp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::testing::TestBody;

    #[test]
    fn crouch_shrinks_and_grounds_the_body() {
        let config = PlayerConfig::default();
        let mut body = TestBody::default();

        assert!(start_crouch(&mut body, &config, &SlideState::default()));
        assert_eq!(body.scale, Vec3::new(1.0, config.crouch_y_scale, 1.0));
        assert_eq!(body.impulses, vec![Vec3::NEG_Y * config.crouch_impulse]);

        assert!(stop_crouch(&mut body, &config, &SlideState::default()));
        assert_eq!(body.scale.y, config.stand_y_scale);
    }

    #[test]
    fn crouch_leaves_slide_scale_alone() {
        let config = PlayerConfig::default();
        let mut body = TestBody {
            scale: Vec3::new(1.0, config.slide_y_scale, 1.0),
            ..default()
        };
        let slide = SlideState {
            active: true,
            remaining: 0.5,
        };

        assert!(!start_crouch(&mut body, &config, &slide));
        assert!(!stop_crouch(&mut body, &config, &slide));
        assert_eq!(body.scale.y, config.slide_y_scale);
        assert!(body.impulses.is_empty());
    }
}
