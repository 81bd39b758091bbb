// src/readiness/mod.rs
mod gate;

pub use gate::{GateState, ReadinessGate};
