//! Configuration models for the simulation.

pub mod simulation;

pub use simulation::{DeadlinePolicy, FillRate, SimulationConfig};
