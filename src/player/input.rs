use bevy::ecs::observer::On;
use bevy::prelude::{Component, EntityEvent, Query, Vec2};
use bevy_enhanced_input::prelude::*;

/// Move in a direction (WASD)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct MoveAction;

/// Jump action
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct JumpAction;

/// Sprint action (hold)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct SprintAction;

/// Crouch action (hold)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct CrouchAction;

/// Slide action (hold to keep sliding)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct SlideAction;

/// Run upward while attached to a wall
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct WallUpAction;

/// Run downward while attached to a wall
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct WallDownAction;

/// Held state of a button plus its edges for the current frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub held: bool,
    /// Went down this frame
    pub pressed: bool,
    /// Went up this frame
    pub released: bool,
}

impl ButtonState {
    pub fn press(&mut self) {
        self.held = true;
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.held = false;
        self.released = true;
    }

    pub fn clear_edges(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}

/// Per-frame snapshot of everything the controller reads from input
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct MovementInput {
    /// Strafe (x) and forward (y) axes, each in [-1, 1]
    pub axes: Vec2,
    pub jump: ButtonState,
    pub sprint: ButtonState,
    pub crouch: ButtonState,
    pub slide: ButtonState,
    pub wall_up: ButtonState,
    pub wall_down: ButtonState,
}

impl MovementInput {
    pub fn has_direction(&self) -> bool {
        self.axes != Vec2::ZERO
    }

    fn buttons_mut(&mut self) -> [&mut ButtonState; 6] {
        [
            &mut self.jump,
            &mut self.sprint,
            &mut self.crouch,
            &mut self.slide,
            &mut self.wall_up,
            &mut self.wall_down,
        ]
    }
}

/// A boolean action backed by one of the [`MovementInput`] buttons
pub trait ButtonAction: InputAction {
    fn button(input: &mut MovementInput) -> &mut ButtonState;
}

macro_rules! button_action {
    ($action:ty, $field:ident) => {
        impl ButtonAction for $action {
            fn button(input: &mut MovementInput) -> &mut ButtonState {
                &mut input.$field
            }
        }
    };
}

button_action!(JumpAction, jump);
button_action!(SprintAction, sprint);
button_action!(CrouchAction, crouch);
button_action!(SlideAction, slide);
button_action!(WallUpAction, wall_up);
button_action!(WallDownAction, wall_down);

/// System to handle move input via observer
pub fn handle_move_input(trigger: On<Fire<MoveAction>>, mut query: Query<&mut MovementInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.axes = trigger.value.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }
}

/// Clear move input when all movement keys are released
pub fn handle_move_end(trigger: On<Complete<MoveAction>>, mut query: Query<&mut MovementInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.axes = Vec2::ZERO;
    }
}

/// Records a button press
pub fn handle_button_start<A: ButtonAction>(
    trigger: On<Start<A>>,
    mut query: Query<&mut MovementInput>,
) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        A::button(&mut input).press();
    }
}

/// Records a button release
pub fn handle_button_end<A: ButtonAction>(
    trigger: On<Complete<A>>,
    mut query: Query<&mut MovementInput>,
) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        A::button(&mut input).release();
    }
}

/// Clears pressed/released edges (should run at end of frame)
pub fn clear_input_edges(mut query: Query<&mut MovementInput>) {
    for mut input in &mut query {
        for button in input.buttons_mut() {
            button.clear_edges();
        }
    }
}
