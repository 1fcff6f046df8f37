#![deny(unsafe_code)]
//! Core types for the particle-systems simulator.
//!
//! Provides the sparse `StateVector`, the `Field` trait and its force laws,
//! the `FieldKind` factory, `Particle` / `ParticleFactory`, the
//! `ParticleSystem` tick loop, declarative `SystemConfig`, the `Engine`
//! trait, `Srgb` colors, the `Xorshift64` PRNG and per-frame snapshots.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod field_kind;
pub mod particle;
pub mod prng;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod system;

pub use color::Srgb;
pub use config::{FieldProfile, ParticleGroup, SystemConfig};
pub use engine::Engine;
pub use error::EngineError;
pub use field::Field;
pub use field_kind::FieldKind;
pub use particle::{Particle, ParticleFactory, ParticleId};
pub use prng::Xorshift64;
pub use snapshot::ParticleSnapshot;
pub use state::{Dim, StateVector};
pub use system::ParticleSystem;
