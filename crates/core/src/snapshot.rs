//! Read-only per-frame view of a particle for renderers.

use crate::color::Srgb;
use crate::state::{Dim, StateVector};
use serde::{Deserialize, Serialize};

/// Flat `(x, y, z, color, size)` record for one particle in one frame.
///
/// `z` is 0 for planar particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: Srgb,
    pub size: f64,
}

impl ParticleSnapshot {
    pub fn from_state(state: &StateVector, color: Srgb) -> Self {
        Self {
            x: state.get_or_zero(Dim::X),
            y: state.get_or_zero(Dim::Y),
            z: state.get_or_zero(Dim::Z),
            color,
            size: state.get_or_zero(Dim::M),
        }
    }
}
