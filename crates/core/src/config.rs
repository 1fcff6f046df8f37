//! Declarative configuration of a particle system.
//!
//! A [`SystemConfig`] names field profiles and particle groups. It is the
//! whole input needed to rebuild a simulation: the same config (including
//! `seed`) always produces the same population and the same trajectories.

use crate::color::Srgb;
use crate::error::EngineError;
use crate::field_kind::FieldKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default particle count per group.
pub const DEFAULT_NUMBER_PARTICLES: usize = 100;
/// Default group color.
pub const DEFAULT_COLOR: &str = "blue";
/// Default group timeout. Carried through configuration, not read by the update.
pub const DEFAULT_TIMEOUT: f64 = 1.0;
/// Default number of spatial axes per particle.
pub const DEFAULT_SPATIAL_DIMS: usize = 2;
/// Default PRNG seed.
pub const DEFAULT_SEED: u64 = 42;
/// Upper bound on the total population across all groups.
pub const MAX_PARTICLES: usize = 10_000_000;

fn default_field_type() -> String {
    FieldKind::default().identifier().to_string()
}

fn default_number_particles() -> usize {
    DEFAULT_NUMBER_PARTICLES
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT
}

fn default_spatial_dims() -> usize {
    DEFAULT_SPATIAL_DIMS
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// A named field: which force law to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldProfile {
    #[serde(default = "default_field_type", alias = "forcefield_type")]
    pub field_type: String,
}

impl FieldProfile {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            field_type: kind.identifier().to_string(),
        }
    }
}

impl Default for FieldProfile {
    fn default() -> Self {
        Self {
            field_type: default_field_type(),
        }
    }
}

/// A group of identical particles bound to an ordered list of field profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleGroup {
    /// Field profile names, applied in this order every step.
    #[serde(default, alias = "forcefield_type_list")]
    pub fields: Vec<String>,
    #[serde(default = "default_number_particles")]
    pub number_particles: usize,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    /// 2 for planar particles, 3 to add a `z` axis.
    #[serde(default = "default_spatial_dims")]
    pub spatial_dims: usize,
}

impl ParticleGroup {
    /// A default group bound to `fields`.
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_count(mut self, number_particles: usize) -> Self {
        self.number_particles = number_particles;
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_spatial_dims(mut self, spatial_dims: usize) -> Self {
        self.spatial_dims = spatial_dims;
        self
    }
}

impl Default for ParticleGroup {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            number_particles: DEFAULT_NUMBER_PARTICLES,
            color: default_color(),
            timeout: DEFAULT_TIMEOUT,
            spatial_dims: DEFAULT_SPATIAL_DIMS,
        }
    }
}

/// Complete description of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldProfile>,
    #[serde(default)]
    pub groups: Vec<ParticleGroup>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Reject unknown field-type identifiers instead of using the flat field.
    #[serde(default)]
    pub strict_field_types: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
            groups: Vec::new(),
            seed: DEFAULT_SEED,
            strict_field_types: false,
        }
    }
}

impl SystemConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Adds a field profile named `name`.
    pub fn with_field(mut self, name: &str, profile: FieldProfile) -> Self {
        self.fields.insert(name.to_string(), profile);
        self
    }

    pub fn with_group(mut self, group: ParticleGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Resolves a profile's field type, honoring `strict_field_types`.
    pub fn field_kind(&self, profile: &FieldProfile) -> Result<FieldKind, EngineError> {
        if self.strict_field_types {
            FieldKind::parse_strict(&profile.field_type)
        } else {
            Ok(FieldKind::from_identifier(&profile.field_type))
        }
    }

    /// Checks counts, dimensions, colors, profile references and (in strict
    /// mode) field types.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.strict_field_types {
            for profile in self.fields.values() {
                FieldKind::parse_strict(&profile.field_type)?;
            }
        }
        let mut total: usize = 0;
        for group in &self.groups {
            let count = group.number_particles;
            if count == 0 || count > MAX_PARTICLES {
                return Err(EngineError::InvalidParticleCount(count));
            }
            total = match total.checked_add(count) {
                Some(t) if t <= MAX_PARTICLES => t,
                _ => return Err(EngineError::InvalidParticleCount(total.saturating_add(count))),
            };
            if group.spatial_dims != 2 && group.spatial_dims != 3 {
                return Err(EngineError::InvalidSpatialDims(group.spatial_dims));
            }
            Srgb::parse(&group.color)?;
            if let Some(missing) = group.fields.iter().find(|f| !self.fields.contains_key(*f)) {
                return Err(EngineError::UnknownProfile(missing.clone()));
            }
        }
        Ok(())
    }

    /// Total number of particles the config will spawn, saturating at
    /// `usize::MAX` for configs that fail [`validate`](Self::validate).
    pub fn particle_count(&self) -> usize {
        self.groups
            .iter()
            .fold(0, |total: usize, g| total.saturating_add(g.number_particles))
    }
}
