//! Particles and the factory that spawns them.
//!
//! A particle owns its state, history and random stream, and borrows its
//! fields through shared `Arc`s. Moving is split into [`Particle::propose`],
//! which computes the next state without touching the particle, and
//! [`Particle::commit`], which archives the old state and installs the new
//! one. A failed proposal leaves the particle exactly as it was.

use crate::color::Srgb;
use crate::error::EngineError;
use crate::field::Field;
use crate::prng::Xorshift64;
use crate::registry::{FieldHandle, FieldRegistry};
use crate::snapshot::ParticleSnapshot;
use crate::state::StateVector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Half-width of the spawn box: positions are uniform in [-50, 50).
pub const SPAWN_HALF_EXTENT: f64 = 50.0;
/// Initial mass / radius / display size.
pub const INITIAL_MASS: f64 = 1.0;

/// Unique id of a particle within its system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticleId(pub usize);

/// Next state and random stream of a particle, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    state: StateVector,
    rng: Xorshift64,
}

impl Proposal {
    pub fn state(&self) -> &StateVector {
        &self.state
    }
}

/// A point mass moved by an ordered list of fields.
#[derive(Debug, Clone)]
pub struct Particle {
    id: ParticleId,
    state: StateVector,
    color: Srgb,
    fields: Vec<Arc<dyn Field>>,
    history: Vec<StateVector>,
    rng: Xorshift64,
}

impl Particle {
    pub fn new(
        id: ParticleId,
        state: StateVector,
        color: Srgb,
        fields: Vec<Arc<dyn Field>>,
        rng: Xorshift64,
    ) -> Self {
        Self {
            id,
            state,
            color,
            fields,
            history: Vec::new(),
            rng,
        }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn color(&self) -> Srgb {
        self.color
    }

    pub fn fields(&self) -> &[Arc<dyn Field>] {
        &self.fields
    }

    /// Every state this particle held before each committed step, oldest first.
    pub fn history(&self) -> &[StateVector] {
        &self.history
    }

    /// Applies the bound fields in order, each perturbing the previous
    /// field's output.
    pub fn propose(&self) -> Result<Proposal, EngineError> {
        let mut rng = self.rng.clone();
        let state = self
            .fields
            .iter()
            .try_fold(self.state, |state, field| field.perturb(&state, &mut rng))?;
        Ok(Proposal { state, rng })
    }

    /// Archives the current state and installs `proposal`.
    pub fn commit(&mut self, proposal: Proposal) {
        self.history.push(self.state);
        self.state = proposal.state;
        self.rng = proposal.rng;
    }

    /// Proposes and commits one step.
    pub fn step(&mut self) -> Result<(), EngineError> {
        let proposal = self.propose()?;
        self.commit(proposal);
        Ok(())
    }

    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot::from_state(&self.state, self.color)
    }
}

/// Spawns particles for one group, all bound to the same fields and color.
#[derive(Debug, Clone)]
pub struct ParticleFactory {
    bindings: Vec<FieldHandle>,
    fields: Vec<Arc<dyn Field>>,
    color: Srgb,
    spatial_dims: usize,
}

impl ParticleFactory {
    /// Resolves `bindings` against `registry` once so every spawned particle
    /// shares the same field instances.
    pub fn new(
        registry: &FieldRegistry,
        bindings: Vec<FieldHandle>,
        color: Srgb,
        spatial_dims: usize,
    ) -> Result<Self, EngineError> {
        if spatial_dims != 2 && spatial_dims != 3 {
            return Err(EngineError::InvalidSpatialDims(spatial_dims));
        }
        let fields = bindings
            .iter()
            .map(|&h| Arc::clone(registry.entry(h).field()))
            .collect();
        Ok(Self {
            bindings,
            fields,
            color,
            spatial_dims,
        })
    }

    /// Spawns a particle at rest at a uniform position in the spawn box and
    /// registers it with each of its fields.
    ///
    /// The particle's own random stream is forked from `rng`.
    pub fn new_particle(
        &self,
        id: ParticleId,
        rng: &mut Xorshift64,
        registry: &mut FieldRegistry,
    ) -> Particle {
        let x = rng.next_range(-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT);
        let y = rng.next_range(-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT);
        let state = if self.spatial_dims == 3 {
            let z = rng.next_range(-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT);
            StateVector::spatial(x, y, z, INITIAL_MASS)
        } else {
            StateVector::planar(x, y, INITIAL_MASS)
        };

        for &handle in &self.bindings {
            registry.register(handle, id);
        }
        Particle::new(id, state, self.color, self.fields.clone(), rng.fork())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FlatField, RotationField};
    use crate::field_kind::FieldKind;
    use crate::state::Dim;
    use glam::DVec3;

    /// Constant push, for order-sensitivity checks.
    #[derive(Debug)]
    struct Push(DVec3);

    impl Field for Push {
        fn kind(&self) -> FieldKind {
            FieldKind::Flat
        }

        fn force_at_location(
            &self,
            _state: &StateVector,
            _rng: &mut Xorshift64,
        ) -> Result<DVec3, EngineError> {
            Ok(self.0)
        }
    }

    fn blue() -> Srgb {
        Srgb::parse("blue").unwrap()
    }

    fn particle_with(state: StateVector, fields: Vec<Arc<dyn Field>>) -> Particle {
        Particle::new(ParticleId(0), state, blue(), fields, Xorshift64::new(1))
    }

    #[test]
    fn zero_force_step_moves_by_velocity() {
        let state = StateVector::planar(2.0, -1.0, 1.0)
            .with(Dim::Vx, 0.75)
            .with(Dim::Vy, 0.25);
        let mut p = particle_with(state, vec![Arc::new(FlatField)]);
        p.step().unwrap();
        assert_eq!(p.state().get(Dim::X), Some(2.75));
        assert_eq!(p.state().get(Dim::Vx), Some(0.75));
        assert_eq!(p.state().get(Dim::Y), Some(-0.75));
        assert_eq!(p.state().get(Dim::Vy), Some(0.25));
    }

    #[test]
    fn history_records_pre_step_states() {
        let mut p = particle_with(
            StateVector::planar(10.0, 0.0, 1.0),
            vec![Arc::new(RotationField::default())],
        );
        let mut expected = Vec::new();
        for _ in 0..5 {
            expected.push(*p.state());
            p.step().unwrap();
        }
        assert_eq!(p.history().len(), 5);
        assert_eq!(p.history(), expected.as_slice());
        assert_ne!(p.history().last(), Some(p.state()));
    }

    #[test]
    fn fields_are_chained_in_order() {
        let rotation: Arc<dyn Field> = Arc::new(RotationField::default());
        let push: Arc<dyn Field> = Arc::new(Push(DVec3::new(5.0, 0.0, 0.0)));
        let start = StateVector::planar(1.0, 0.0, 1.0);

        let mut a_then_b = particle_with(start, vec![rotation.clone(), push.clone()]);
        let mut b_then_a = particle_with(start, vec![push, rotation]);
        a_then_b.step().unwrap();
        b_then_a.step().unwrap();

        // Rotation then push: the push sees the rotated state.
        // x: 1 -> 1 -> 1, vx: 0 -> 0 -> 5, y: 0 -> 0 -> 0.1, vy: 0 -> 0.1 -> 0.1
        let s = a_then_b.state();
        assert_eq!(s.get(Dim::X), Some(1.0));
        assert_eq!(s.get(Dim::Vx), Some(5.0));
        assert!((s.get_or_zero(Dim::Y) - 0.1).abs() < 1e-12);

        // Push then rotation: rotation integrates the pushed velocity.
        let t = b_then_a.state();
        assert_eq!(t.get(Dim::X), Some(6.0));
        assert_ne!(s, t);
    }

    #[test]
    fn failed_step_leaves_particle_untouched() {
        let mut p = particle_with(
            StateVector::planar(0.0, 0.0, 1.0),
            vec![FieldKind::Attractor.new_field()],
        );
        let before = p.clone();
        assert!(matches!(
            p.step(),
            Err(EngineError::Singularity { .. })
        ));
        assert_eq!(p.state(), before.state());
        assert!(p.history().is_empty());
        assert_eq!(p.rng, before.rng);
    }

    #[test]
    fn failure_in_second_field_discards_first_field_output() {
        // Flat carries (-1, 0) to the origin, where the attractor fails.
        let state = StateVector::planar(-1.0, 0.0, 1.0).with(Dim::Vx, 1.0);
        let mut p = particle_with(
            state,
            vec![Arc::new(FlatField), FieldKind::Attractor.new_field()],
        );
        assert!(p.step().is_err());
        assert_eq!(p.state(), &state);
    }

    #[test]
    fn propose_does_not_mutate() {
        let p = particle_with(
            StateVector::planar(3.0, 4.0, 1.0),
            vec![FieldKind::Brownian.new_field()],
        );
        let a = p.propose().unwrap();
        let b = p.propose().unwrap();
        assert_eq!(a, b);
        assert!(p.history().is_empty());
    }

    #[test]
    fn stochastic_steps_advance_the_stream() {
        let mut p = particle_with(
            StateVector::planar(0.0, 0.0, 1.0),
            vec![FieldKind::Brownian.new_field()],
        );
        p.step().unwrap();
        let v1 = p.state().get_or_zero(Dim::Vx);
        p.step().unwrap();
        let v2 = p.state().get_or_zero(Dim::Vx);
        assert_ne!(v2 - v1, v1);
    }

    #[test]
    fn particle_without_fields_only_grows_history() {
        let state = StateVector::planar(1.0, 1.0, 1.0).with(Dim::Vx, 3.0);
        let mut p = particle_with(state, Vec::new());
        p.step().unwrap();
        assert_eq!(p.state(), &state);
        assert_eq!(p.history().len(), 1);
    }

    #[test]
    fn snapshot_exposes_position_color_size() {
        let p = particle_with(StateVector::planar(4.0, 5.0, 1.0), Vec::new());
        let snap = p.snapshot();
        assert_eq!((snap.x, snap.y, snap.z, snap.size), (4.0, 5.0, 0.0, 1.0));
        assert_eq!(snap.color, blue());
    }

    // ---- Factory ----

    fn registry_with(kind: FieldKind) -> (FieldRegistry, FieldHandle) {
        let mut reg = FieldRegistry::new();
        let h = reg.insert(kind.identifier(), kind.new_field());
        (reg, h)
    }

    #[test]
    fn factory_spawns_planar_particles_at_rest_in_box() {
        let (mut reg, h) = registry_with(FieldKind::Rotation);
        let factory = ParticleFactory::new(&reg, vec![h], blue(), 2).unwrap();
        let mut rng = Xorshift64::new(42);
        for i in 0..200 {
            let p = factory.new_particle(ParticleId(i), &mut rng, &mut reg);
            let s = p.state();
            for dim in [Dim::X, Dim::Y] {
                let v = s.get(dim).unwrap();
                assert!((-50.0..50.0).contains(&v), "{} = {v}", dim.key());
            }
            assert_eq!(s.get(Dim::Vx), Some(0.0));
            assert_eq!(s.get(Dim::Vy), Some(0.0));
            assert_eq!(s.get(Dim::M), Some(1.0));
            assert!(!s.contains(Dim::Z));
            assert_eq!(p.color(), blue());
        }
    }

    #[test]
    fn factory_spawns_spatial_particles() {
        let (mut reg, h) = registry_with(FieldKind::SphericalBrownian);
        let factory = ParticleFactory::new(&reg, vec![h], blue(), 3).unwrap();
        let p = factory.new_particle(ParticleId(0), &mut Xorshift64::new(3), &mut reg);
        assert!(p.state().contains(Dim::Z));
        assert_eq!(p.state().get(Dim::Vz), Some(0.0));
    }

    #[test]
    fn factory_rejects_bad_spatial_dims() {
        let (reg, h) = registry_with(FieldKind::Rotation);
        assert!(matches!(
            ParticleFactory::new(&reg, vec![h], blue(), 4),
            Err(EngineError::InvalidSpatialDims(4))
        ));
    }

    #[test]
    fn factory_registers_particles_with_fields() {
        let (mut reg, h) = registry_with(FieldKind::Attractor);
        let factory = ParticleFactory::new(&reg, vec![h], blue(), 2).unwrap();
        let mut rng = Xorshift64::new(9);
        for i in 0..3 {
            factory.new_particle(ParticleId(i), &mut rng, &mut reg);
        }
        assert_eq!(
            reg.entry(h).particles(),
            &[ParticleId(0), ParticleId(1), ParticleId(2)]
        );
    }

    #[test]
    fn factory_binds_shared_field_instances() {
        let (mut reg, h) = registry_with(FieldKind::Rotation);
        let factory = ParticleFactory::new(&reg, vec![h], blue(), 2).unwrap();
        let mut rng = Xorshift64::new(9);
        let a = factory.new_particle(ParticleId(0), &mut rng, &mut reg);
        let b = factory.new_particle(ParticleId(1), &mut rng, &mut reg);
        assert!(Arc::ptr_eq(&a.fields()[0], &b.fields()[0]));
        assert!(Arc::ptr_eq(&a.fields()[0], reg.entry(h).field()));
    }

    #[test]
    fn spawned_particles_get_independent_streams() {
        let (mut reg, h) = registry_with(FieldKind::Brownian);
        let factory = ParticleFactory::new(&reg, vec![h], blue(), 2).unwrap();
        let mut rng = Xorshift64::new(9);
        let a = factory.new_particle(ParticleId(0), &mut rng, &mut reg);
        let b = factory.new_particle(ParticleId(1), &mut rng, &mut reg);
        assert_ne!(a.rng, b.rng);
    }
}
