//! Shared-state contract between a graph and its steps.
//!
//! Every run of a compiled pipeline threads a single state value through all
//! of its steps. Steps never mutate the state directly: each one receives a
//! snapshot and returns a *partial update*, and the state type decides how
//! that update folds in. Keeping the merge rules on the state type means the
//! engine stays agnostic of field semantics: whether a field overwrites or
//! accumulates is declared exactly once, next to the field itself.
//!
//! # Example
//!
//! ```rust
//! use leadgraph_core::PipelineState;
//!
//! #[derive(Clone, Default)]
//! struct Tally {
//!     notes: Vec<String>,
//!     done: bool,
//! }
//!
//! #[derive(Default)]
//! struct TallyUpdate {
//!     notes: Vec<String>,      // append-accumulate
//!     done: Option<bool>,      // overwrite when present
//! }
//!
//! impl PipelineState for Tally {
//!     type Update = TallyUpdate;
//!
//!     fn apply(&mut self, update: TallyUpdate) {
//!         self.notes.extend(update.notes);
//!         if let Some(done) = update.done {
//!             self.done = done;
//!         }
//!     }
//! }
//! ```

/// State threaded through a pipeline run, merged via typed partial updates.
///
/// Implementations must be cheap-ish to clone: each step in a wave receives
/// its own snapshot so that parallel steps never observe each other's
/// in-flight writes.
pub trait PipelineState: Clone + Send + Sync + 'static {
    /// Partial update produced by a single step.
    type Update: Send + 'static;

    /// Fold one step's update into the state.
    ///
    /// When several steps complete in the same wave, the engine calls this
    /// once per update, in step-registration order, before any successor is
    /// scheduled.
    fn apply(&mut self, update: Self::Update);
}
