#![deny(unsafe_code)]
//! Scenario registry and CPU-side frame rendering.
//!
//! Sits between `particle-systems-core` (fields, particles, the system) and
//! the CLI. Scenarios are named [`SystemConfig`] presets; [`pixel`] turns
//! per-frame snapshots into RGBA frames and [`snapshot`] writes them out.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use particle_systems_core::config::{FieldProfile, ParticleGroup, SystemConfig};
use particle_systems_core::error::EngineError;
use particle_systems_core::field_kind::FieldKind;
use serde_json::{json, Value};

/// All available scenario names.
const SCENARIO_NAMES: &[&str] = &["mixed", "brownian", "spherical"];

/// Named simulation presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Three blue groups under rotation, rotation with attractor, and attractor.
    Mixed,
    /// One green group under Brownian motion.
    Brownian,
    /// One purple group of 3D particles under spherical Brownian motion.
    Spherical,
}

impl Scenario {
    /// Looks up a scenario by name.
    ///
    /// Returns `EngineError::UnknownScenario` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "mixed" => Ok(Scenario::Mixed),
            "brownian" => Ok(Scenario::Brownian),
            "spherical" => Ok(Scenario::Spherical),
            _ => Err(EngineError::UnknownScenario(name.to_string())),
        }
    }

    /// Returns a slice of all recognized scenario names.
    pub fn list_scenarios() -> &'static [&'static str] {
        SCENARIO_NAMES
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Mixed => "mixed",
            Scenario::Brownian => "brownian",
            Scenario::Spherical => "spherical",
        }
    }

    /// Builds the scenario's configuration with the given seed.
    pub fn config(self, seed: u64) -> SystemConfig {
        let fields = field_table().with_seed(seed);
        match self {
            Scenario::Mixed => [
                FieldKind::Rotation,
                FieldKind::RotationAttractor,
                FieldKind::Attractor,
            ]
            .into_iter()
            .fold(fields, |cfg, kind| {
                cfg.with_group(ParticleGroup::new(&[kind.identifier()]).with_color("blue"))
            }),
            Scenario::Brownian => fields.with_group(
                ParticleGroup::new(&[FieldKind::Brownian.identifier()]).with_color("green"),
            ),
            Scenario::Spherical => fields.with_group(
                ParticleGroup::new(&[FieldKind::SphericalBrownian.identifier()])
                    .with_color("purple")
                    .with_spatial_dims(3),
            ),
        }
    }

    /// Name, groups and particle count, as JSON.
    pub fn describe(self) -> Value {
        let config = self.config(0);
        let groups: Vec<Value> = config
            .groups
            .iter()
            .map(|g| {
                json!({
                    "fields": g.fields,
                    "number_particles": g.number_particles,
                    "color": g.color,
                    "spatial_dims": g.spatial_dims,
                })
            })
            .collect();
        json!({
            "name": self.name(),
            "particles": config.particle_count(),
            "groups": groups,
        })
    }
}

/// One profile per force law (flat excluded), keyed by canonical identifier.
pub fn field_table() -> SystemConfig {
    FieldKind::ALL
        .into_iter()
        .filter(|&kind| kind != FieldKind::Flat)
        .fold(SystemConfig::default(), |cfg, kind| {
            cfg.with_field(kind.identifier(), FieldProfile::new(kind))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_systems_core::{Engine, ParticleSystem};

    #[test]
    fn from_name_round_trips_every_listed_scenario() {
        for name in Scenario::list_scenarios() {
            let scenario = Scenario::from_name(name).unwrap();
            assert_eq!(scenario.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        assert!(matches!(
            Scenario::from_name("nonexistent"),
            Err(EngineError::UnknownScenario(_))
        ));
    }

    #[test]
    fn field_table_has_five_force_laws() {
        let table = field_table();
        assert_eq!(table.fields.len(), 5);
        assert!(!table.fields.contains_key("flat"));
        assert!(table.groups.is_empty());
    }

    #[test]
    fn every_scenario_builds_and_steps() {
        for name in Scenario::list_scenarios() {
            let config = Scenario::from_name(name).unwrap().config(42);
            let mut sys = ParticleSystem::new(config).unwrap();
            sys.step().unwrap();
            assert_eq!(sys.tick(), 1);
        }
    }

    #[test]
    fn mixed_has_three_blue_groups() {
        let config = Scenario::Mixed.config(1);
        assert_eq!(config.groups.len(), 3);
        assert!(config.groups.iter().all(|g| g.color == "blue"));
        assert_eq!(config.particle_count(), 300);
    }

    #[test]
    fn brownian_is_one_green_group() {
        let config = Scenario::Brownian.config(1);
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.groups[0].color, "green");
        assert_eq!(config.groups[0].fields, vec!["brownean"]);
    }

    #[test]
    fn spherical_particles_are_spatial() {
        let config = Scenario::Spherical.config(1);
        assert_eq!(config.groups[0].spatial_dims, 3);
    }

    #[test]
    fn config_carries_seed() {
        assert_eq!(Scenario::Brownian.config(777).seed, 777);
    }

    #[test]
    fn describe_reports_particle_count() {
        let info = Scenario::Mixed.describe();
        assert_eq!(info["name"], "mixed");
        assert_eq!(info["particles"], 300);
        assert_eq!(info["groups"].as_array().unwrap().len(), 3);
    }
}
