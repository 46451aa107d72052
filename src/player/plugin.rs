use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::crouch::handle_crouch;
use super::input::*;
use super::jump::handle_jump;
use super::messages::LocomotionMessage;
use super::movement::*;
use super::slide::update_slide;
use super::speed::MoveSpeed;
use super::state::*;
use super::wallrun::update_wall_run;
use crate::physics::sensors::Sensors;
use crate::physics::GameLayer;

/// Plugin for the first-person locomotion controller
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin);

        // Register input context for player
        app.add_input_context::<Player>();

        // Input observers
        app.add_observer(handle_move_input);
        app.add_observer(handle_move_end);
        add_button_observers::<JumpAction>(app);
        add_button_observers::<SprintAction>(app);
        add_button_observers::<CrouchAction>(app);
        add_button_observers::<SlideAction>(app);
        add_button_observers::<WallUpAction>(app);
        add_button_observers::<WallDownAction>(app);

        app.add_message::<LocomotionMessage>();

        // Spawn player on startup
        app.add_systems(Startup, spawn_player);

        // Per-frame state: subsystems first, then arbitration, then speed
        app.add_systems(
            Update,
            (
                update_sensors,
                handle_jump,
                handle_crouch,
                update_slide,
                update_wall_run,
                resolve_locomotion,
                advance_move_speed,
                limit_speed,
            )
                .chain(),
        );

        // Forces only on the fixed step
        app.add_systems(FixedUpdate, apply_locomotion_forces);

        // Clear input edges at end of frame
        app.add_systems(Last, clear_input_edges);
    }
}

fn add_button_observers<A: ButtonAction>(app: &mut App) {
    app.add_observer(handle_button_start::<A>);
    app.add_observer(handle_button_end::<A>);
}

/// The player is on its own layer and collides with ground and walls
pub fn player_collision_layers() -> CollisionLayers {
    CollisionLayers::new(GameLayer::Player, [GameLayer::Ground, GameLayer::Wall])
}

/// Spawns the player entity with all required components
pub fn spawn_player(mut commands: Commands) {
    let config = PlayerConfig::default();
    let capsule_height = config.player_height - config.radius * 2.0;

    commands
        .spawn((
            Player,
            config,
            LocomotionMode::default(),
            MoveSpeed::new(config.walk_speed),
            Sensors::default(),
            JumpState::default(),
            SlideState::default(),
            WallRunState::default(),
            Orientation::default(),
            MovementInput::default(),
        ))
        .insert((
            // Physics - dynamic body with locked rotation; the controller owns velocity
            RigidBody::Dynamic,
            Collider::capsule(config.radius, capsule_height),
            player_collision_layers(),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            LinearDamping(0.0),
            GravityScale(1.0),
            Mass(1.0),
            TranslationInterpolation,
            Friction::new(0.0),
            Restitution::new(0.0),
        ))
        .insert((
            Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)),
            Visibility::default(),
        ))
        .insert(
            // Input bindings
            actions!(Player[
                (
                    Action::<MoveAction>::new(),
                    bindings![
                        (KeyCode::KeyW, SwizzleAxis::YXZ),
                        (KeyCode::KeyS, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::KeyD,
                        (KeyCode::KeyA, Negate::all()),
                    ],
                ),
                (
                    Action::<JumpAction>::new(),
                    bindings![KeyCode::Space, GamepadButton::South],
                ),
                (
                    Action::<SprintAction>::new(),
                    bindings![KeyCode::ShiftLeft, GamepadButton::LeftThumb],
                ),
                (
                    Action::<CrouchAction>::new(),
                    bindings![KeyCode::KeyC, GamepadButton::RightThumb],
                ),
                (
                    Action::<SlideAction>::new(),
                    bindings![KeyCode::ControlLeft, GamepadButton::East],
                ),
                (
                    Action::<WallUpAction>::new(),
                    bindings![KeyCode::KeyE, GamepadButton::RightTrigger],
                ),
                (
                    Action::<WallDownAction>::new(),
                    bindings![KeyCode::KeyQ, GamepadButton::LeftTrigger],
                ),
            ]),
        );
}
