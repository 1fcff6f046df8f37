//! Sparse particle state keyed by a closed set of dimensions.
//!
//! A [`StateVector`] holds at most one value per [`Dim`]. Which dimensions
//! are present is part of the state: a planar particle simply has no `z` or
//! `vz`, and the integration step only touches axis pairs whose position and
//! velocity are both present.

use serde::{Deserialize, Serialize};

/// Named dimension of a particle's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dim {
    X,
    Y,
    Z,
    Vx,
    Vy,
    Vz,
    /// Radius, mass and display size all at once.
    M,
}

impl Dim {
    /// Every dimension, in storage order.
    pub const ALL: [Dim; 7] = [Dim::X, Dim::Y, Dim::Z, Dim::Vx, Dim::Vy, Dim::Vz, Dim::M];

    /// Position/velocity pairs, in the order the integrator visits them.
    pub const AXES: [(Dim, Dim); 3] = [(Dim::X, Dim::Vx), (Dim::Y, Dim::Vy), (Dim::Z, Dim::Vz)];

    fn slot(self) -> usize {
        match self {
            Dim::X => 0,
            Dim::Y => 1,
            Dim::Z => 2,
            Dim::Vx => 3,
            Dim::Vy => 4,
            Dim::Vz => 5,
            Dim::M => 6,
        }
    }

    /// Short key used in logs and serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Dim::X => "x",
            Dim::Y => "y",
            Dim::Z => "z",
            Dim::Vx => "vx",
            Dim::Vy => "vy",
            Dim::Vz => "vz",
            Dim::M => "m",
        }
    }
}

/// Fixed-capacity sparse map from [`Dim`] to a real value.
///
/// `Copy`, so archiving a state into history is a plain value copy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateVector {
    values: [Option<f64>; 7],
}

impl StateVector {
    /// Creates a state with no dimensions present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, dim: Dim, value: f64) -> Self {
        self.set(dim, value);
        self
    }

    /// Planar particle at `(x, y)` at rest with size `m`.
    pub fn planar(x: f64, y: f64, m: f64) -> Self {
        Self::new()
            .with(Dim::X, x)
            .with(Dim::Y, y)
            .with(Dim::Vx, 0.0)
            .with(Dim::Vy, 0.0)
            .with(Dim::M, m)
    }

    /// Spatial particle at `(x, y, z)` at rest with size `m`.
    pub fn spatial(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self::planar(x, y, m).with(Dim::Z, z).with(Dim::Vz, 0.0)
    }

    pub fn get(&self, dim: Dim) -> Option<f64> {
        self.values[dim.slot()]
    }

    /// Value of `dim`, or 0.0 when absent.
    pub fn get_or_zero(&self, dim: Dim) -> f64 {
        self.get(dim).unwrap_or(0.0)
    }

    pub fn set(&mut self, dim: Dim, value: f64) {
        self.values[dim.slot()] = Some(value);
    }

    pub fn remove(&mut self, dim: Dim) -> Option<f64> {
        self.values[dim.slot()].take()
    }

    pub fn contains(&self, dim: Dim) -> bool {
        self.get(dim).is_some()
    }

    /// True if at least one position/velocity pair is complete.
    pub fn has_axis_pair(&self) -> bool {
        Dim::AXES
            .iter()
            .any(|&(pos, vel)| self.contains(pos) && self.contains(vel))
    }

    /// Present dimensions with their values, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Dim, f64)> + '_ {
        Dim::ALL
            .iter()
            .filter_map(move |&dim| self.get(dim).map(|v| (dim, v)))
    }

    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
