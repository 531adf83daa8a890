//! Application layer use cases for the agent.
//!
//! Use cases in this layer orchestrate `mimic_core` types and depend only on
//! traits for the outside world (event sources, pointer injection, the
//! perception gate, sleeping), so every one of them is unit-testable without
//! a desktop session.
//!
//! # Sub-modules
//!
//! - **`pacing`**         – The [`pacing::Sleeper`] trait every blocking wait goes through.
//! - **`actuate`**        – Click policy on top of the pointer injection primitive.
//! - **`automation`**     – The perception-gated automation state machine.
//! - **`controller`**     – Start/stop lifecycle of at most one running script.
//! - **`record_session`** – Drains an event source into an event log.
//! - **`analyze`**        – Summarises a recording and fits its timing model.

pub mod actuate;
pub mod analyze;
pub mod automation;
pub mod controller;
pub mod pacing;
pub mod record_session;
