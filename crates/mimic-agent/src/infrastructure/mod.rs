//! Infrastructure layer for the agent.
//!
//! Contains OS-facing adapters: the pointer event source, the injection
//! primitive, the perception gate, sleeping, file-system storage, and the
//! command surface used by front ends.
//!
//! Only in-memory adapters ship here; platform hooks, screen capture, and
//! template matching are provided by the embedding application through the
//! traits in `application` and `input_capture`.

pub mod clock;
pub mod input_capture;
pub mod input_emulation;
pub mod perception;
pub mod storage;
pub mod ui_bridge;
