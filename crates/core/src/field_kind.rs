//! Field factory: maps field-type identifiers to [`Field`] instances.
//!
//! Identifiers come from configuration. Each variant accepts its legacy
//! spaced name (`"linear rotation"`) and a kebab alias (`"rotation"`).
//! Lookups are permissive by default: an unrecognized identifier resolves to
//! [`FieldKind::Flat`] with a warning. [`FieldKind::parse_strict`] rejects it
//! instead.

use crate::error::EngineError;
use crate::field::{
    AttractorField, BrownianField, Field, FlatField, RotationAttractorField, RotationField,
    SphericalBrownianField,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Every force law the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    #[default]
    Rotation,
    RotationAttractor,
    Attractor,
    Brownian,
    SphericalBrownian,
    Flat,
}

impl FieldKind {
    /// All variants, in listing order.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Rotation,
        FieldKind::RotationAttractor,
        FieldKind::Attractor,
        FieldKind::Brownian,
        FieldKind::SphericalBrownian,
        FieldKind::Flat,
    ];

    /// Canonical identifier used in configuration files.
    pub fn identifier(self) -> &'static str {
        match self {
            FieldKind::Rotation => "linear rotation",
            FieldKind::RotationAttractor => "linear rotation with attractor",
            FieldKind::Attractor => "linear attractor",
            FieldKind::Brownian => "brownean",
            FieldKind::SphericalBrownian => "browneanSpherical",
            FieldKind::Flat => "flat",
        }
    }

    /// Kebab-case alias accepted alongside the canonical identifier.
    pub fn alias(self) -> &'static str {
        match self {
            FieldKind::Rotation => "rotation",
            FieldKind::RotationAttractor => "rotation-attractor",
            FieldKind::Attractor => "attractor",
            FieldKind::Brownian => "brownian",
            FieldKind::SphericalBrownian => "spherical-brownian",
            FieldKind::Flat => "flat",
        }
    }

    /// Looks up an identifier or alias, failing on anything unrecognized.
    pub fn parse_strict(identifier: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.identifier() == identifier || kind.alias() == identifier)
            .ok_or_else(|| EngineError::UnknownFieldType(identifier.to_string()))
    }

    /// Looks up an identifier or alias, falling back to [`FieldKind::Flat`].
    pub fn from_identifier(identifier: &str) -> Self {
        Self::parse_strict(identifier).unwrap_or_else(|_| {
            log::warn!("unknown field type {identifier:?}, using the flat field");
            FieldKind::Flat
        })
    }

    /// Builds a fresh field of this kind with its default time step.
    pub fn new_field(self) -> Arc<dyn Field> {
        match self {
            FieldKind::Rotation => Arc::new(RotationField::default()),
            FieldKind::RotationAttractor => Arc::new(RotationAttractorField::default()),
            FieldKind::Attractor => Arc::new(AttractorField::default()),
            FieldKind::Brownian => Arc::new(BrownianField::default()),
            FieldKind::SphericalBrownian => Arc::new(SphericalBrownianField::default()),
            FieldKind::Flat => Arc::new(FlatField),
        }
    }
}

/// Builds the field named by `identifier`, permissively.
pub fn new_field(identifier: &str) -> Arc<dyn Field> {
    FieldKind::from_identifier(identifier).new_field()
}
