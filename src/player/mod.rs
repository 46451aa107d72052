mod crouch;
pub mod input;
mod jump;
mod messages;
pub mod movement;
mod plugin;
pub mod slide;
mod speed;
mod state;
pub mod wallrun;

pub use input::{ButtonState, MovementInput};
pub use messages::LocomotionMessage;
pub use movement::{resolve_mode, ModeContext};
pub use plugin::{spawn_player, PlayerPlugin};
pub use speed::{MoveSpeed, SpeedLerp};
pub use state::*;
