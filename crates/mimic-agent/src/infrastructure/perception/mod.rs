//! Perception gate adapters.
//!
//! Implementations of [`crate::application::automation::PerceptionGate`].

pub mod mock;
