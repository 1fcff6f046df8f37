//! Named, shared fields owned by a particle system.
//!
//! Each entry keeps the ids of the particles bound to it. Force laws never
//! read that list; it is what a time-varying field would consult in
//! [`Field::deform`](crate::field::Field::deform).

use crate::error::EngineError;
use crate::field::Field;
use crate::particle::ParticleId;
use std::sync::Arc;

/// One field profile: its name, the shared field, and registered particles.
#[derive(Debug)]
pub struct FieldEntry {
    name: String,
    field: Arc<dyn Field>,
    particles: Vec<ParticleId>,
}

impl FieldEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self) -> &Arc<dyn Field> {
        &self.field
    }

    /// Ids of particles bound to this field, in registration order.
    pub fn particles(&self) -> &[ParticleId] {
        &self.particles
    }
}

/// Index of an entry inside a [`FieldRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHandle(usize);

/// Insertion-ordered collection of field profiles.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    entries: Vec<FieldEntry>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile. A repeated name shadows the earlier entry for lookups.
    pub fn insert(&mut self, name: &str, field: Arc<dyn Field>) -> FieldHandle {
        self.entries.push(FieldEntry {
            name: name.to_string(),
            field,
            particles: Vec::new(),
        });
        FieldHandle(self.entries.len() - 1)
    }

    /// Finds the profile called `name`.
    pub fn resolve(&self, name: &str) -> Result<FieldHandle, EngineError> {
        self.entries
            .iter()
            .rposition(|e| e.name == name)
            .map(FieldHandle)
            .ok_or_else(|| EngineError::UnknownProfile(name.to_string()))
    }

    pub fn entry(&self, handle: FieldHandle) -> &FieldEntry {
        &self.entries[handle.0]
    }

    pub fn get(&self, name: &str) -> Option<&FieldEntry> {
        self.resolve(name).ok().map(|h| self.entry(h))
    }

    /// Records that particle `id` is bound to the field behind `handle`.
    pub fn register(&mut self, handle: FieldHandle, id: ParticleId) {
        self.entries[handle.0].particles.push(id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
