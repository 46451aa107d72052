use avian3d::prelude::*;

/// Collision layers for the physics simulation
#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum GameLayer {
    #[default]
    Default,
    /// Player character
    Player,
    /// Walkable world geometry, probed by the ground and slope sensors
    Ground,
    /// Runnable walls, probed by the wall sensor
    Wall,
}
