pub mod camera;
pub mod physics;
pub mod player;

pub use camera::CameraPlugin;
pub use physics::PhysicsPlugin;
pub use player::PlayerPlugin;

use bevy::prelude::*;

/// Unified plugin that adds physics, the locomotion controller, and camera follow.
pub struct ParkourPlugin;

impl Plugin for ParkourPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<PhysicsPlugin>() {
            app.add_plugins(PhysicsPlugin);
        }
        if !app.is_plugin_added::<PlayerPlugin>() {
            app.add_plugins(PlayerPlugin);
        }
        if !app.is_plugin_added::<CameraPlugin>() {
            app.add_plugins(CameraPlugin);
        }
    }
}

pub mod prelude {
    pub use crate::camera::{CameraPlugin, FpsCamera};
    pub use crate::physics::{GameLayer, PhysicsBody, PhysicsPlugin, Raycaster};
    pub use crate::player::{
        spawn_player, LocomotionMessage, LocomotionMode, MoveSpeed, MovementInput, Orientation,
        Player, PlayerConfig, PlayerPlugin,
    };
    pub use crate::ParkourPlugin;
}
