//! Core graph execution engine for step-based pipelines.
//!
//! This crate provides the orchestration layer used by the prospect
//! workspace: a directed graph of named async *steps* executed against one
//! shared, typed state value. It owns control flow only (sequential edges,
//! parallel fan-out, fan-in, conditional routing, cycles) and performs no
//! I/O of its own.
//!
//! # Building blocks
//!
//! - [`PipelineState`]: the contract between the engine and the state it
//!   threads through a run. Steps return typed partial updates; the state
//!   type decides how each update merges (overwrite, append, …).
//! - [`StepGraph`]: builder for registering steps and wiring edges between
//!   them and the reserved [`START`]/[`END`] markers.
//! - [`CompiledPipeline`]: the validated, executable graph. Runs waves of
//!   steps concurrently and merges their updates deterministically.
//!
//! # Execution model
//!
//! Each wave's steps run concurrently against the same snapshot; their
//! updates merge in registration order; routers run only after the full wave
//! has merged. See the [`compiled`] module docs for the details, and
//! [`GraphError`] for the failure taxonomy.

pub mod compiled;
pub mod error;
pub mod graph;
pub mod state;

pub use compiled::CompiledPipeline;
pub use error::{GraphError, Result};
pub use graph::{BoxError, Edge, RouterFn, StepFn, StepGraph, StepId, END, START};
pub use state::PipelineState;
