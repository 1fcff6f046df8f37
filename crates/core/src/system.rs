//! The particle system: population, field registry and the tick loop.

use crate::color::Srgb;
use crate::config::{ParticleGroup, SystemConfig};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::particle::{Particle, ParticleFactory, ParticleId, Proposal};
use crate::prng::Xorshift64;
use crate::registry::{FieldHandle, FieldRegistry};
use crate::snapshot::ParticleSnapshot;
use rayon::prelude::*;
use serde_json::{json, Value};

/// A population of particles moved by shared fields.
///
/// Built once from a [`SystemConfig`]; particles are never added or removed
/// afterwards.
#[derive(Debug)]
pub struct ParticleSystem {
    config: SystemConfig,
    registry: FieldRegistry,
    particles: Vec<Particle>,
    tick: u64,
}

impl ParticleSystem {
    /// Builds one field per profile and every group's particles.
    ///
    /// Groups are spawned in order, so particle ids follow group order.
    pub fn new(config: SystemConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let mut registry = FieldRegistry::new();
        for (name, profile) in &config.fields {
            let kind = config.field_kind(profile)?;
            registry.insert(name, kind.new_field());
        }

        let mut rng = Xorshift64::new(config.seed);
        let mut particles = Vec::with_capacity(config.particle_count());
        for group in &config.groups {
            let factory = group_factory(&registry, group)?;
            for _ in 0..group.number_particles {
                let id = ParticleId(particles.len());
                particles.push(factory.new_particle(id, &mut rng, &mut registry));
            }
        }

        log::info!(
            "particle system ready: {} particles, {} fields, seed {}",
            particles.len(),
            registry.len(),
            config.seed
        );

        Ok(Self {
            config,
            registry,
            particles,
            tick: 0,
        })
    }

    /// Advances every particle by one step, then runs each field's deform hook.
    ///
    /// All particles compute their next state first. If any of them fails,
    /// the error of the lowest-id failing particle is returned and the whole
    /// population is left as it was.
    pub fn act(&mut self) -> Result<(), EngineError> {
        // Collect in population order so the lowest failing id wins.
        let outcomes: Vec<Result<Proposal, EngineError>> =
            self.particles.par_iter().map(Particle::propose).collect();
        let proposals = outcomes
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| log::debug!("tick {} aborted: {e}", self.tick))?;

        self.particles
            .par_iter_mut()
            .zip(proposals)
            .for_each(|(particle, proposal)| particle.commit(proposal));

        self.tick += 1;
        for entry in self.registry.iter() {
            entry.field().deform(self.tick);
        }
        log::debug!("tick {} complete", self.tick);
        Ok(())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.0)
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Renderer view of every particle, in population order.
    pub fn snapshot(&self) -> Vec<ParticleSnapshot> {
        self.particles.iter().map(Particle::snapshot).collect()
    }
}

fn group_factory(
    registry: &FieldRegistry,
    group: &ParticleGroup,
) -> Result<ParticleFactory, EngineError> {
    let bindings = group
        .fields
        .iter()
        .map(|name| registry.resolve(name))
        .collect::<Result<Vec<FieldHandle>, _>>()?;
    let color = Srgb::parse(&group.color)?;
    ParticleFactory::new(registry, bindings, color, group.spatial_dims)
}

impl Engine for ParticleSystem {
    fn step(&mut self) -> Result<(), EngineError> {
        self.act()
    }

    fn snapshot(&self) -> Vec<ParticleSnapshot> {
        ParticleSystem::snapshot(self)
    }

    fn tick(&self) -> u64 {
        self.tick
    }

    fn params(&self) -> Value {
        let fields: serde_json::Map<String, Value> = self
            .registry
            .iter()
            .map(|e| {
                let info = json!({
                    "field_type": e.field().kind().identifier(),
                    "particles": e.particles().len(),
                });
                (e.name().to_string(), info)
            })
            .collect();
        json!({
            "seed": self.config.seed,
            "particles": self.particles.len(),
            "tick": self.tick,
            "fields": fields,
        })
    }
}
