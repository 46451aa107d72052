use avian3d::prelude::*;
use bevy::prelude::*;

/// Gravity magnitude in m/s^2, matched to the force tuning in `PlayerConfig`
pub const GRAVITY: f32 = 9.81;

/// Plugin that sets up the Avian3D physics engine
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            PhysicsPlugins::default()
                .with_length_unit(1.0), // 1 unit = 1 meter
        );

        // The controller toggles gravity per body through `GravityScale`
        app.insert_resource(Gravity(Vec3::NEG_Y * GRAVITY));
    }
}
