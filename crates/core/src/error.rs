//! Error types for the particle-systems core.

use thiserror::Error;

/// Errors produced while building or advancing a particle system.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An attractor-class field was queried exactly at the origin, where its
    /// inverse-radius term is undefined.
    #[error("{field} field is singular at ({x}, {y}): inverse radius undefined at the origin")]
    Singularity {
        field: &'static str,
        x: f64,
        y: f64,
    },

    /// A force law produced a NaN or infinite component.
    #[error("{field} field produced a non-finite force")]
    NonFinite { field: &'static str },

    /// A field-type identifier was not recognized and strict mode is on.
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    /// A particle group referenced a field profile that was never defined.
    #[error("unknown field profile: {0}")]
    UnknownProfile(String),

    /// A particle group asked for an unusable number of particles.
    #[error(
        "invalid particle count {0}: expected 1 to {max} particles in total",
        max = crate::config::MAX_PARTICLES
    )]
    InvalidParticleCount(usize),

    /// A particle group asked for a spatial dimension other than 2 or 3.
    #[error("invalid spatial dimensions {0}: expected 2 or 3")]
    InvalidSpatialDims(usize),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Width or height was zero when creating a frame.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// An animation was requested with no frames to encode.
    #[error("animation has no frames")]
    EmptyAnimation,

    /// A requested scenario name was not found in the registry.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
