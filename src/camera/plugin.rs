use bevy::prelude::*;

use super::follow::sync_camera_to_player;

/// Plugin for FPS camera follow
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        // After the body has moved and been rescaled this frame
        app.add_systems(PostUpdate, sync_camera_to_player);
    }
}
