mod follow;
mod plugin;

pub use follow::*;
pub use plugin::CameraPlugin;
