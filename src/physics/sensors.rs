use avian3d::prelude::*;
use bevy::prelude::*;

use super::body::Raycaster;

/// Angles (radians) below this count as flat ground rather than a slope
pub const FLAT_EPSILON: f32 = 1.0e-3;

/// Surface beneath the body, as seen by the slope probe
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlopeReading {
    /// True only for walkable, non-flat surfaces
    pub on_slope: bool,
    pub normal: Vec3,
    /// Angle between world up and the surface normal, in radians
    pub angle: f32,
}

impl Default for SlopeReading {
    fn default() -> Self {
        Self {
            on_slope: false,
            normal: Vec3::Y,
            angle: 0.0,
        }
    }
}

impl SlopeReading {
    /// Classifies a surface normal against the walkable limit
    pub fn from_normal(normal: Vec3, max_slope_angle: f32) -> Self {
        let angle = Vec3::Y.angle_between(normal);
        Self {
            on_slope: angle > FLAT_EPSILON && angle < max_slope_angle,
            normal,
            angle,
        }
    }

    /// Projects a movement direction onto the slope plane and renormalizes it.
    ///
    /// Keeps movement tangent to inclined ground instead of pushing into or
    /// away from the surface.
    pub fn project(&self, direction: Vec3) -> Vec3 {
        direction.reject_from_normalized(self.normal).normalize_or_zero()
    }
}

/// Casts the slope probe straight down from `origin`
pub fn detect_slope<R: Raycaster + ?Sized>(
    raycaster: &R,
    origin: Vec3,
    probe_distance: f32,
    max_slope_angle: f32,
    mask: LayerMask,
) -> SlopeReading {
    raycaster
        .raycast(origin, Dir3::NEG_Y, probe_distance, mask)
        .map(|hit| SlopeReading::from_normal(hit.normal, max_slope_angle))
        .unwrap_or_default()
}

/// Walls found by the lateral probes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WallReading {
    /// Normal of the wall on the left, if any
    pub left: Option<Vec3>,
    /// Normal of the wall on the right, if any
    pub right: Option<Vec3>,
}

impl WallReading {
    pub fn any(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// The normal to run along; the right wall wins when both sides hit
    pub fn normal(&self) -> Option<Vec3> {
        self.right.or(self.left)
    }
}

/// Casts left and right of the body's facing
pub fn detect_walls<R: Raycaster + ?Sized>(
    raycaster: &R,
    origin: Vec3,
    right: Dir3,
    check_distance: f32,
    mask: LayerMask,
) -> WallReading {
    let cast = |direction: Dir3| {
        raycaster
            .raycast(origin, direction, check_distance, mask)
            .map(|hit| hit.normal)
    };

    WallReading {
        left: cast(-right),
        right: cast(right),
    }
}

/// True if anything on `mask` lies within `distance` below `origin`
pub fn probe_ground<R: Raycaster + ?Sized>(
    raycaster: &R,
    origin: Vec3,
    distance: f32,
    mask: LayerMask,
) -> bool {
    raycaster
        .raycast(origin, Dir3::NEG_Y, distance, mask)
        .is_some()
}

/// Per-frame sensor results for a controlled body
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Sensors {
    /// Short ground probe hit
    pub grounded: bool,
    pub slope: SlopeReading,
    pub walls: WallReading,
    /// Nothing within the minimum wall-run height below the body
    pub above_ground: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::testing::TestWorld;

    const MAX_SLOPE: f32 = 0.7; // ~40 degrees

    fn tilted(degrees: f32) -> Vec3 {
        Quat::from_rotation_x(degrees.to_radians()) * Vec3::Y
    }

    #[test]
    fn flat_ground_is_not_a_slope() {
        let world = TestWorld::default().with_floor(1.0, Vec3::Y);
        let reading = detect_slope(&world, Vec3::ZERO, 1.3, MAX_SLOPE, LayerMask::ALL);
        assert!(!reading.on_slope);
        assert_eq!(reading.angle, 0.0);
    }

    #[test]
    fn walkable_incline_is_a_slope() {
        let world = TestWorld::default().with_floor(1.1, tilted(20.0));
        let reading = detect_slope(&world, Vec3::ZERO, 1.3, MAX_SLOPE, LayerMask::ALL);
        assert!(reading.on_slope);
        assert!((reading.angle - 20f32.to_radians()).abs() < 1.0e-4);
    }

    #[test]
    fn steep_incline_is_not_walkable() {
        let world = TestWorld::default().with_floor(1.1, tilted(60.0));
        let reading = detect_slope(&world, Vec3::ZERO, 1.3, MAX_SLOPE, LayerMask::ALL);
        assert!(!reading.on_slope);
    }

    #[test]
    fn missed_probe_reports_no_slope() {
        let world = TestWorld::default().with_floor(5.0, tilted(20.0));
        let reading = detect_slope(&world, Vec3::ZERO, 1.3, MAX_SLOPE, LayerMask::ALL);
        assert_eq!(reading, SlopeReading::default());
    }

    #[test]
    fn projection_is_tangent_and_normalized() {
        let reading = SlopeReading::from_normal(tilted(30.0), MAX_SLOPE);
        let projected = reading.project(Vec3::NEG_Z * 3.0);
        assert!(projected.dot(reading.normal).abs() < 1.0e-5);
        assert!((projected.length() - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn right_wall_wins_when_both_sides_hit() {
        let world = TestWorld::default()
            .with_hit(Vec3::X, 0.5, Vec3::NEG_X)
            .with_hit(Vec3::NEG_X, 0.5, Vec3::X);
        let walls = detect_walls(&world, Vec3::ZERO, Dir3::X, 0.7, LayerMask::ALL);
        assert_eq!(walls.left, Some(Vec3::X));
        assert_eq!(walls.right, Some(Vec3::NEG_X));
        assert_eq!(walls.normal(), Some(Vec3::NEG_X));
    }

    #[test]
    fn walls_out_of_reach_are_ignored() {
        let world = TestWorld::default().with_hit(Vec3::X, 2.0, Vec3::NEG_X);
        let walls = detect_walls(&world, Vec3::ZERO, Dir3::X, 0.7, LayerMask::ALL);
        assert!(!walls.any());
        assert_eq!(walls.normal(), None);
    }

    #[test]
    fn ground_probe_respects_distance() {
        let world = TestWorld::default().with_floor(1.1, Vec3::Y);
        assert!(probe_ground(&world, Vec3::ZERO, 1.2, LayerMask::ALL));
        assert!(!probe_ground(&world, Vec3::ZERO, 1.0, LayerMask::ALL));
    }
}
