//! The narrow seam between the movement controller and the physics engine.
//!
//! Controller logic only talks to [`PhysicsBody`] and [`Raycaster`]; the Avian
//! implementations below are the only code that touches rigid body components.

use avian3d::prelude::*;
use bevy::prelude::*;

/// How a force vector is applied to a body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, integrated over the current timestep
    Force,
    /// Instantaneous change in momentum
    Impulse,
}

/// Result of a raycast hit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub normal: Vec3,
}

/// Raycasting against world geometry.
pub trait Raycaster {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

impl Raycaster for SpatialQuery<'_, '_> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let filter = SpatialQueryFilter::default().with_mask(mask);
        self.cast_ray(origin, direction, max_distance, true, &filter)
            .map(|hit| RayHit {
                distance: hit.distance,
                normal: hit.normal,
            })
    }
}

/// Mutable access to the controlled rigid body.
///
/// Holding one of these is the capability to write velocity and forces. The
/// fixed-step dispatcher hands it to exactly one mode routine per tick.
pub trait PhysicsBody {
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn apply_force(&mut self, force: Vec3, mode: ForceMode);
    fn set_drag(&mut self, drag: f32);
    fn gravity_enabled(&self) -> bool;
    fn set_gravity_enabled(&mut self, enabled: bool);
    fn scale(&self) -> Vec3;
    fn set_scale(&mut self, scale: Vec3);

    /// Zeroes the vertical component of velocity, keeping horizontal motion
    fn reset_vertical_velocity(&mut self) {
        let velocity = self.velocity();
        self.set_velocity(Vec3::new(velocity.x, 0.0, velocity.z));
    }

    /// Sets the vertical component of velocity directly
    fn set_vertical_velocity(&mut self, vertical: f32) {
        let velocity = self.velocity();
        self.set_velocity(Vec3::new(velocity.x, vertical, velocity.z));
    }

    /// Sets only the Y scale, leaving the horizontal silhouette alone
    fn set_vertical_scale(&mut self, y: f32) {
        let scale = self.scale();
        self.set_scale(Vec3::new(scale.x, y, scale.z));
    }
}

/// Query data needed to build an [`AvianBody`]
pub type BodyComponents = (
    &'static mut LinearVelocity,
    &'static mut LinearDamping,
    &'static mut GravityScale,
    &'static mut Transform,
    &'static ComputedMass,
);

/// [`PhysicsBody`] over an Avian dynamic rigid body.
///
/// Forces are integrated straight into `LinearVelocity` (`dv = F / m * dt`,
/// impulses `dv = J / m`) so the controller sees the result immediately,
/// the same frame it clamps speed. Drag maps to `LinearDamping` and the
/// gravity toggle to `GravityScale`.
pub struct AvianBody<'a> {
    velocity: &'a mut LinearVelocity,
    damping: &'a mut LinearDamping,
    gravity: &'a mut GravityScale,
    transform: &'a mut Transform,
    inverse_mass: f32,
    dt: f32,
}

impl<'a> AvianBody<'a> {
    pub fn new(
        velocity: &'a mut LinearVelocity,
        damping: &'a mut LinearDamping,
        gravity: &'a mut GravityScale,
        transform: &'a mut Transform,
        mass: &ComputedMass,
        dt: f32,
    ) -> Self {
        let mass = mass.value();
        let inverse_mass = if mass > 0.0 && mass.is_finite() {
            1.0 / mass
        } else {
            0.0
        };

        Self {
            velocity,
            damping,
            gravity,
            transform,
            inverse_mass,
            dt,
        }
    }

    /// Builds the adapter from a [`BodyComponents`] query item
    pub fn from_query(
        (velocity, damping, gravity, transform, mass): &'a mut (
            Mut<'_, LinearVelocity>,
            Mut<'_, LinearDamping>,
            Mut<'_, GravityScale>,
            Mut<'_, Transform>,
            &ComputedMass,
        ),
        dt: f32,
    ) -> Self {
        Self::new(velocity, damping, gravity, transform, *mass, dt)
    }
}

impl PhysicsBody for AvianBody<'_> {
    fn velocity(&self) -> Vec3 {
        self.velocity.0
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity.0 = velocity;
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        let delta_v = match mode {
            ForceMode::Force => force * self.inverse_mass * self.dt,
            ForceMode::Impulse => force * self.inverse_mass,
        };
        self.velocity.0 += delta_v;
    }

    fn set_drag(&mut self, drag: f32) {
        self.damping.0 = drag;
    }

    fn gravity_enabled(&self) -> bool {
        self.gravity.0 != 0.0
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity.0 = if enabled { 1.0 } else { 0.0 };
    }

    fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory body with unit mass and a fixed timestep
    #[derive(Debug, Clone)]
    pub struct TestBody {
        pub velocity: Vec3,
        pub drag: f32,
        pub gravity: bool,
        pub scale: Vec3,
        pub dt: f32,
        pub impulses: Vec<Vec3>,
        pub forces: Vec<Vec3>,
    }

    impl Default for TestBody {
        fn default() -> Self {
            Self {
                velocity: Vec3::ZERO,
                drag: 0.0,
                gravity: true,
                scale: Vec3::ONE,
                dt: 1.0 / 64.0,
                impulses: Vec::new(),
                forces: Vec::new(),
            }
        }
    }

    impl PhysicsBody for TestBody {
        fn velocity(&self) -> Vec3 {
            self.velocity
        }

        fn set_velocity(&mut self, velocity: Vec3) {
            self.velocity = velocity;
        }

        fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
            match mode {
                ForceMode::Force => {
                    self.forces.push(force);
                    self.velocity += force * self.dt;
                }
                ForceMode::Impulse => {
                    self.impulses.push(force);
                    self.velocity += force;
                }
            }
        }

        fn set_drag(&mut self, drag: f32) {
            self.drag = drag;
        }

        fn gravity_enabled(&self) -> bool {
            self.gravity
        }

        fn set_gravity_enabled(&mut self, enabled: bool) {
            self.gravity = enabled;
        }

        fn scale(&self) -> Vec3 {
            self.scale
        }

        fn set_scale(&mut self, scale: Vec3) {
            self.scale = scale;
        }
    }

    /// Static set of ray hits keyed by cast direction; masks are ignored
    #[derive(Debug, Default, Clone)]
    pub struct TestWorld {
        surfaces: Vec<(Vec3, RayHit)>,
    }

    impl TestWorld {
        pub fn with_hit(mut self, direction: Vec3, distance: f32, normal: Vec3) -> Self {
            self.surfaces.push((
                direction.normalize(),
                RayHit {
                    distance,
                    normal: normal.normalize(),
                },
            ));
            self
        }

        /// Ground `distance` below the origin with the given surface normal
        pub fn with_floor(self, distance: f32, normal: Vec3) -> Self {
            self.with_hit(Vec3::NEG_Y, distance, normal)
        }
    }

    impl Raycaster for TestWorld {
        fn raycast(
            &self,
            _origin: Vec3,
            direction: Dir3,
            max_distance: f32,
            _mask: LayerMask,
        ) -> Option<RayHit> {
            self.surfaces
                .iter()
                .find(|(dir, hit)| dir.dot(*direction) > 0.99 && hit.distance <= max_distance)
                .map(|(_, hit)| *hit)
        }
    }
}
