//! Domain value types shared between the core and the agent.
//!
//! - **`region`** – Axis-aligned screen rectangles used both as perception
//!   search areas and as located target bounds.

pub mod region;
