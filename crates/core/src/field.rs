//! Force fields and the per-field integration step.
//!
//! A [`Field`] maps a particle's state to a velocity delta. Fields are shared
//! between many particles (`Arc<dyn Field>`) and keep no mutable state that a
//! force evaluation reads, so particles can be moved in parallel. Stochastic
//! fields draw from the random stream of the particle being perturbed.

use crate::error::EngineError;
use crate::field_kind::FieldKind;
use crate::prng::Xorshift64;
use crate::state::{Dim, StateVector};
use glam::DVec3;
use std::fmt;

/// Time step of the rotation, attractor and Brownian force laws.
pub const DEFAULT_DT: f64 = 0.1;
/// Time step of the spherical Brownian force law.
pub const SPHERICAL_DT: f64 = 0.05;

/// A force law acting on particles.
pub trait Field: Send + Sync + fmt::Debug {
    /// Which variant this is.
    fn kind(&self) -> FieldKind;

    /// Velocity delta `(vx, vy, vz)` for a particle in `state`.
    ///
    /// All three components are always returned; axes a field does not model
    /// are zero.
    fn force_at_location(
        &self,
        state: &StateVector,
        rng: &mut Xorshift64,
    ) -> Result<DVec3, EngineError>;

    /// One Euler step of `state` under this field.
    ///
    /// For every complete axis pair, position advances by the *current*
    /// velocity, then velocity advances by the force evaluated at the
    /// pre-step state. Incomplete pairs and every other dimension pass
    /// through untouched. A state with no complete pair is returned as-is
    /// without evaluating the force.
    fn perturb(
        &self,
        state: &StateVector,
        rng: &mut Xorshift64,
    ) -> Result<StateVector, EngineError> {
        if !state.has_axis_pair() {
            return Ok(*state);
        }
        let force = self.force_at_location(state, rng)?;
        if !force.is_finite() {
            return Err(EngineError::NonFinite {
                field: self.kind().identifier(),
            });
        }

        let mut next = *state;
        for (axis, &(pos, vel)) in Dim::AXES.iter().enumerate() {
            if let (Some(p), Some(v)) = (state.get(pos), state.get(vel)) {
                next.set(pos, p + v);
                next.set(vel, v + force[axis]);
            }
        }
        Ok(next)
    }

    /// Hook run once per tick after every particle moved. A no-op for all
    /// current force laws.
    fn deform(&self, _tick: u64) {}
}

/// Planar position of a state, with absent coordinates read as zero.
fn planar_position(state: &StateVector) -> (f64, f64) {
    (state.get_or_zero(Dim::X), state.get_or_zero(Dim::Y))
}

/// `1 / sqrt(x^2 + y^2)`, failing exactly at the origin.
fn inverse_radius(kind: FieldKind, x: f64, y: f64) -> Result<f64, EngineError> {
    let r = x.hypot(y);
    if r == 0.0 {
        return Err(EngineError::Singularity {
            field: kind.identifier(),
            x,
            y,
        });
    }
    Ok(1.0 / r)
}

/// Independent standard-normal draw per axis, scaled by `dt`.
fn gaussian_kick(rng: &mut Xorshift64, dt: f64) -> DVec3 {
    let dx = rng.next_gaussian();
    let dy = rng.next_gaussian();
    let dz = rng.next_gaussian();
    DVec3::new(dx, dy, dz) * dt
}

/// Solid-body rotation about the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationField {
    pub dt: f64,
}

impl Default for RotationField {
    fn default() -> Self {
        Self { dt: DEFAULT_DT }
    }
}

impl Field for RotationField {
    fn kind(&self) -> FieldKind {
        FieldKind::Rotation
    }

    fn force_at_location(
        &self,
        state: &StateVector,
        _rng: &mut Xorshift64,
    ) -> Result<DVec3, EngineError> {
        let (x, y) = planar_position(state);
        Ok(DVec3::new(-y * self.dt, x * self.dt, 0.0))
    }
}

/// Rotation combined with an inward pull, normalised by radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationAttractorField {
    pub dt: f64,
}

impl Default for RotationAttractorField {
    fn default() -> Self {
        Self { dt: DEFAULT_DT }
    }
}

impl Field for RotationAttractorField {
    fn kind(&self) -> FieldKind {
        FieldKind::RotationAttractor
    }

    fn force_at_location(
        &self,
        state: &StateVector,
        _rng: &mut Xorshift64,
    ) -> Result<DVec3, EngineError> {
        let (x, y) = planar_position(state);
        let dr = inverse_radius(self.kind(), x, y)?;
        Ok(DVec3::new(
            (-y - 2.0 * x) * self.dt * dr,
            (x - 2.0 * y) * self.dt * dr,
            0.0,
        ))
    }
}

/// Pure inward pull toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractorField {
    pub dt: f64,
}

impl Default for AttractorField {
    fn default() -> Self {
        Self { dt: DEFAULT_DT }
    }
}

impl Field for AttractorField {
    fn kind(&self) -> FieldKind {
        FieldKind::Attractor
    }

    fn force_at_location(
        &self,
        state: &StateVector,
        _rng: &mut Xorshift64,
    ) -> Result<DVec3, EngineError> {
        let (x, y) = planar_position(state);
        let dr = inverse_radius(self.kind(), x, y)?;
        Ok(DVec3::new(-x * self.dt * dr, -y * self.dt * dr, 0.0))
    }
}

/// Isotropic random walk in velocity space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrownianField {
    pub dt: f64,
}

impl Default for BrownianField {
    fn default() -> Self {
        Self { dt: DEFAULT_DT }
    }
}

impl Field for BrownianField {
    fn kind(&self) -> FieldKind {
        FieldKind::Brownian
    }

    fn force_at_location(
        &self,
        _state: &StateVector,
        rng: &mut Xorshift64,
    ) -> Result<DVec3, EngineError> {
        Ok(gaussian_kick(rng, self.dt))
    }
}

/// Brownian motion with a smaller step.
///
/// Meant to keep particles on a spherical shell, but the radial correction
/// (`r/|r| - r`) is not applied yet, so it currently behaves like a damped
/// [`BrownianField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalBrownianField {
    pub dt: f64,
}

impl Default for SphericalBrownianField {
    fn default() -> Self {
        Self { dt: SPHERICAL_DT }
    }
}

impl Field for SphericalBrownianField {
    fn kind(&self) -> FieldKind {
        FieldKind::SphericalBrownian
    }

    fn force_at_location(
        &self,
        _state: &StateVector,
        rng: &mut Xorshift64,
    ) -> Result<DVec3, EngineError> {
        Ok(gaussian_kick(rng, self.dt))
    }
}

/// Inert field: zero force everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatField;

impl Field for FlatField {
    fn kind(&self) -> FieldKind {
        FieldKind::Flat
    }

    fn force_at_location(
        &self,
        _state: &StateVector,
        _rng: &mut Xorshift64,
    ) -> Result<DVec3, EngineError> {
        Ok(DVec3::ZERO)
    }
}
