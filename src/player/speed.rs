use bevy::prelude::*;

/// Progress of a smoothed speed change
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SpeedLerp {
    #[default]
    Idle,
    Running {
        start: f32,
        target: f32,
        /// Accumulated, rate-scaled time; the lerp completes at `difference`
        progress: f32,
        difference: f32,
    },
}

/// Target and smoothed speed shared by every locomotion mode
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct MoveSpeed {
    /// Desired speed for the active mode
    pub target: f32,
    /// Speed that force application and clamping actually use
    pub current: f32,
    last_target: f32,
    lerp: SpeedLerp,
}

impl MoveSpeed {
    pub fn new(speed: f32) -> Self {
        Self {
            target: speed,
            current: speed,
            last_target: speed,
            lerp: SpeedLerp::Idle,
        }
    }

    pub fn lerp(&self) -> SpeedLerp {
        self.lerp
    }

    pub fn is_interpolating(&self) -> bool {
        matches!(self.lerp, SpeedLerp::Running { .. })
    }

    /// Sets a new target speed.
    ///
    /// Jumps larger than `snap_threshold` start an interpolation from the
    /// current speed, replacing any in-flight one. Smaller changes snap and
    /// cancel it; an unchanged target leaves a running interpolation alone.
    pub fn request(&mut self, target: f32, snap_threshold: f32) {
        let target = target.max(0.0);
        let delta = (target - self.last_target).abs();
        self.target = target;

        if delta > snap_threshold && self.current != 0.0 {
            let difference = (target - self.current).abs();
            if difference > 0.0 {
                self.lerp = SpeedLerp::Running {
                    start: self.current,
                    target,
                    progress: 0.0,
                    difference,
                };
            } else {
                self.lerp = SpeedLerp::Idle;
            }
        } else if delta > 0.0 || !self.is_interpolating() {
            self.current = target;
            self.lerp = SpeedLerp::Idle;
        }

        self.last_target = target;
    }

    /// Advances a running interpolation by `dt` scaled by `rate`
    pub fn advance(&mut self, dt: f32, rate: f32) {
        let SpeedLerp::Running {
            start,
            target,
            progress,
            difference,
        } = &mut self.lerp
        else {
            return;
        };

        *progress += dt * rate;
        if *progress >= *difference {
            self.current = *target;
            self.lerp = SpeedLerp::Idle;
            return;
        }

        self.current = *start + (*target - *start) * (*progress / *difference);
    }
}

/// Interpolation rate for the current surface.
///
/// Steeper slopes finish the transition faster, by up to double at 90 degrees.
pub fn lerp_rate(
    speed_increase_multiplier: f32,
    slope_increase_multiplier: f32,
    slope_angle: Option<f32>,
) -> f32 {
    match slope_angle {
        Some(angle) => {
            let slope_angle_increase = 1.0 + angle / std::f32::consts::FRAC_PI_2;
            speed_increase_multiplier * slope_increase_multiplier * slope_angle_increase
        }
        None => speed_increase_multiplier,
    }
}
