use bevy::prelude::*;

/// Marker component for the player entity (also used as input context)
#[derive(Component, Default)]
pub struct Player;

/// Player movement configuration
#[derive(Component, Clone, Copy, Debug)]
pub struct PlayerConfig {
    /// Walking speed in m/s
    pub walk_speed: f32,
    /// Sprinting speed in m/s
    pub sprint_speed: f32,
    /// Crouching speed in m/s
    pub crouch_speed: f32,
    /// Downhill slide speed in m/s
    pub slide_speed: f32,
    /// Wall-running speed in m/s
    pub wall_run_speed: f32,
    /// Target speed changes larger than this are interpolated instead of snapped
    pub speed_snap_threshold: f32,
    /// Rate of speed interpolation (m/s of change per second)
    pub speed_increase_multiplier: f32,
    /// Extra interpolation rate while on a slope
    pub slope_increase_multiplier: f32,
    /// Linear damping while grounded
    pub ground_drag: f32,
    /// Force coefficient for grounded movement
    pub ground_force: f32,
    /// Force coefficient for movement along a slope
    pub slope_force: f32,
    /// Downward force keeping the body on a slope while it moves upward
    pub slope_adhesion_force: f32,
    /// Fraction of ground steering authority available in the air (0.0-1.0)
    pub air_multiplier: f32,
    /// Upward jump impulse
    pub jump_force: f32,
    /// Seconds between jumps, also the length of the exiting-slope window
    pub jump_cooldown: f32,
    /// Standing vertical scale of the body
    pub stand_y_scale: f32,
    /// Vertical scale while crouching
    pub crouch_y_scale: f32,
    /// Downward impulse applied when the body shrinks
    pub crouch_impulse: f32,
    /// Height of the standing body, used to size the probes
    pub player_height: f32,
    /// Collider radius
    pub radius: f32,
    /// Extra ground probe length below the body's feet
    pub ground_probe_margin: f32,
    /// Extra slope probe length below the body's feet
    pub slope_probe_margin: f32,
    /// Steepest walkable slope, in radians
    pub max_slope_angle: f32,
    /// Longest slide on flat ground or uphill, in seconds
    pub max_slide_time: f32,
    /// Continuous slide force
    pub slide_force: f32,
    /// Vertical scale while sliding
    pub slide_y_scale: f32,
    /// Downward impulse applied when a slide starts
    pub slide_impulse: f32,
    /// Vertical speed above which a slide on a slope counts as flat or uphill
    pub slide_uphill_threshold: f32,
    /// Vertical speed below which a slope slide targets `slide_speed`
    pub slide_slope_vertical_threshold: f32,
    /// Continuous force along the wall while wall-running
    pub wall_run_force: f32,
    /// Inward force holding the body against the wall
    pub wall_stick_force: f32,
    /// Upward component of the wall-jump impulse
    pub wall_jump_up_force: f32,
    /// Wall-normal component of the wall-jump impulse
    pub wall_jump_side_force: f32,
    /// Vertical speed while holding wall-up or wall-down
    pub wall_climb_speed: f32,
    /// Reach of the lateral wall probes
    pub wall_check_distance: f32,
    /// Minimum clearance below the body required to attach to a wall
    pub min_jump_height: f32,
    /// Seconds after a wall jump before the body may attach again
    pub exit_wall_time: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            sprint_speed: 10.0,
            crouch_speed: 3.5,
            slide_speed: 30.0,
            wall_run_speed: 15.0,
            speed_snap_threshold: 4.0,
            speed_increase_multiplier: 1.5,
            slope_increase_multiplier: 2.5,
            ground_drag: 5.0,
            ground_force: 10.0,
            slope_force: 20.0,
            slope_adhesion_force: 80.0,
            air_multiplier: 0.4,
            jump_force: 12.0,
            jump_cooldown: 0.25,
            stand_y_scale: 1.0,
            crouch_y_scale: 0.5,
            crouch_impulse: 5.0,
            player_height: 2.0,
            radius: 0.5,
            ground_probe_margin: 0.2,
            slope_probe_margin: 0.3,
            max_slope_angle: 40.0_f32.to_radians(),
            max_slide_time: 0.75,
            slide_force: 200.0,
            slide_y_scale: 0.5,
            slide_impulse: 5.0,
            slide_uphill_threshold: -0.1,
            slide_slope_vertical_threshold: 0.1,
            wall_run_force: 200.0,
            wall_stick_force: 100.0,
            wall_jump_up_force: 7.0,
            wall_jump_side_force: 12.0,
            wall_climb_speed: 3.0,
            wall_check_distance: 0.7,
            min_jump_height: 2.0,
            exit_wall_time: 0.2,
        }
    }
}

impl PlayerConfig {
    /// Length of the grounded probe from the body center
    pub fn ground_probe_distance(&self) -> f32 {
        self.player_height * 0.5 + self.ground_probe_margin
    }

    /// Length of the slope probe from the body center
    pub fn slope_probe_distance(&self) -> f32 {
        self.player_height * 0.5 + self.slope_probe_margin
    }
}

/// The single, arbitrated locomotion mode of a body
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocomotionMode {
    #[default]
    Walking,
    Sprinting,
    WallRunning,
    Crouching,
    Sliding,
    Airborne,
}

/// Facing of the body, written by the host application (typically from mouse look)
#[derive(Component, Clone, Copy, Debug, Default, Deref, DerefMut)]
pub struct Orientation(pub Quat);

impl Orientation {
    /// Facing with the given yaw in radians
    pub fn from_yaw(yaw: f32) -> Self {
        Self(Quat::from_rotation_y(yaw))
    }

    /// Horizontal forward direction
    pub fn forward(&self) -> Dir3 {
        Dir3::new(flatten(self.0 * Vec3::NEG_Z)).unwrap_or(Dir3::NEG_Z)
    }

    /// Horizontal right direction
    pub fn right(&self) -> Dir3 {
        Dir3::new(flatten(self.0 * Vec3::X)).unwrap_or(Dir3::X)
    }

    /// Unnormalized movement direction for a pair of input axes
    pub fn move_direction(&self, axes: Vec2) -> Vec3 {
        *self.forward() * axes.y + *self.right() * axes.x
    }
}

fn flatten(direction: Vec3) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.z)
}

/// Jump cooldown and the exiting-slope window that follows a jump
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct JumpState {
    /// Seconds until the next jump is allowed
    pub cooldown: f32,
    /// Slope adhesion is suppressed while set
    pub exiting_slope: bool,
}

impl JumpState {
    pub fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }
}

/// Slide subsystem state
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SlideState {
    pub active: bool,
    /// Seconds left before a flat or uphill slide ends
    pub remaining: f32,
}

/// Wall-run subsystem state
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct WallRunState {
    pub active: bool,
    /// Seconds left in the post-wall-jump window that blocks reattaching
    pub exit_cooldown: f32,
}

impl WallRunState {
    pub fn exiting(&self) -> bool {
        self.exit_cooldown > 0.0
    }
}
