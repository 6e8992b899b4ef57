//! Error types for graph construction and execution.

use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while building, compiling, or running a step graph.
///
/// `DuplicateStep`, `Validation`, and `UnknownRoute` are configuration
/// faults: they indicate a wiring mistake and are expected to surface at
/// build time (or, for `UnknownRoute`, on the first run that exercises the
/// bad branch), never during healthy operation.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A step with this name is already registered.
    #[error("duplicate step: {0}")]
    DuplicateStep(String),

    /// The graph structure failed compile-time validation.
    #[error("invalid graph: {0}")]
    Validation(String),

    /// A conditional router returned a label absent from its branch map.
    #[error("step '{step}' routed to unknown label '{label}'")]
    UnknownRoute {
        /// Step whose conditional edge produced the label.
        step: String,
        /// The label that had no mapped target.
        label: String,
    },

    /// The optional step budget was exhausted before all paths reached the
    /// terminal marker.
    #[error("step budget exceeded (limit {limit})")]
    MaxStepsExceeded {
        /// The configured step limit.
        limit: usize,
    },

    /// A step function returned an error.
    #[error("step '{step}' failed: {message}")]
    StepExecution {
        /// The step that failed.
        step: String,
        /// The error it reported.
        message: String,
    },
}
