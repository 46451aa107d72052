use bevy::prelude::*;

use crate::player::{Player, PlayerConfig};

/// Camera that tracks the player's eye position
#[derive(Component, Clone, Copy, Debug)]
pub struct FpsCamera {
    /// Eye height below the top of the standing body
    pub eye_inset: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self { eye_inset: 0.1 }
    }
}

/// Copies the player's position to the camera, lowered with the body's vertical scale
pub fn sync_camera_to_player(
    player_query: Query<(&Transform, &PlayerConfig), With<Player>>,
    mut camera_query: Query<(&mut Transform, &FpsCamera), Without<Player>>,
) {
    let Ok((player_transform, config)) = player_query.single() else {
        return;
    };

    let eye = config.player_height * 0.5 * player_transform.scale.y;
    for (mut transform, camera) in &mut camera_query {
        transform.translation = player_transform.translation + Vec3::Y * (eye - camera.eye_inset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_follows_and_drops_with_crouch() {
        let mut app = App::new();
        app.add_systems(Update, sync_camera_to_player);

        let config = PlayerConfig::default();
        let player = app
            .world_mut()
            .spawn((Player, config, Transform::from_xyz(3.0, 2.0, -1.0)))
            .id();
        let camera = app
            .world_mut()
            .spawn((FpsCamera::default(), Transform::default()))
            .id();

        app.update();
        let standing = app.world().get::<Transform>(camera).unwrap().translation;
        assert!((standing - Vec3::new(3.0, 2.9, -1.0)).length() < 1.0e-5);

        app.world_mut()
            .get_mut::<Transform>(player)
            .unwrap()
            .scale
            .y = config.crouch_y_scale;
        app.update();
        let crouched = app.world().get::<Transform>(camera).unwrap().translation;
        assert!(crouched.y < standing.y);
        assert_eq!(crouched.x, 3.0);
    }
}
