//! The `Engine` trait driven by frame loops.
//!
//! Object-safe, so drivers can hold a `Box<dyn Engine>`.

use crate::error::EngineError;
use crate::snapshot::ParticleSnapshot;
use serde_json::Value;

/// A step-based simulation that exposes per-frame particle snapshots.
pub trait Engine {
    /// Advance the simulation by one tick.
    ///
    /// On error the simulation state is unchanged.
    fn step(&mut self) -> Result<(), EngineError>;

    /// Renderer view of the current frame.
    fn snapshot(&self) -> Vec<ParticleSnapshot>;

    /// Number of completed ticks.
    fn tick(&self) -> u64;

    /// Summary of the running configuration as JSON.
    fn params(&self) -> Value;
}
