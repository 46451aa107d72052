pub mod body;
mod layers;
mod plugin;
pub mod sensors;

pub use body::{AvianBody, BodyComponents, ForceMode, PhysicsBody, RayHit, Raycaster};
pub use layers::GameLayer;
pub use plugin::{PhysicsPlugin, GRAVITY};
pub use sensors::{SlopeReading, WallReading};
