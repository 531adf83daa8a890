//! Pointer injection adapters.
//!
//! Implementations of [`crate::application::actuate::PointerActuator`].

pub mod mock;
