//! Graph builder: step registration and edge wiring.
//!
//! A [`StepGraph`] collects named step functions and the directed edges
//! between them, then [`compile`](StepGraph::compile)s into an executable
//! [`CompiledPipeline`](crate::CompiledPipeline). Edges come in two kinds:
//!
//! - **Direct**: when the source completes, the target runs in the next wave.
//!   A step (or [`START`]) with several direct edges fans out into parallel
//!   successors; several edges pointing at one step fan back in.
//! - **Conditional**: a router function inspects the merged state after the
//!   source step and returns a label; a branch map resolves the label to the
//!   next step or [`END`]. The branch map is the closed set of legal routes
//!   and is validated when the graph compiles.
//!
//! # Example
//!
//! ```rust,no_run
//! use leadgraph_core::{StepGraph, START, END};
//! use std::collections::HashMap;
//! # use leadgraph_core::PipelineState;
//! # #[derive(Clone, Default)]
//! # struct S;
//! # impl PipelineState for S {
//! #     type Update = ();
//! #     fn apply(&mut self, _: ()) {}
//! # }
//!
//! # fn build() -> leadgraph_core::Result<()> {
//! let mut graph: StepGraph<S> = StepGraph::new();
//! graph.add_step("gather", |_state| Box::pin(async move { Ok(()) }))?;
//! graph.add_step("decide", |_state| Box::pin(async move { Ok(()) }))?;
//!
//! graph.add_edge(START, "gather");
//! graph.add_edge("gather", "decide");
//! graph.add_conditional_edge(
//!     "decide",
//!     |_state: &S| "stop".to_string(),
//!     HashMap::from([("stop".to_string(), END.to_string())]),
//! );
//!
//! let pipeline = graph.compile()?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::compiled::CompiledPipeline;
use crate::error::{GraphError, Result};
use crate::state::PipelineState;

/// Reserved marker for the graph entry point. Not a step; it only sources edges.
pub const START: &str = "__start__";

/// Reserved marker for graph termination. Not a step; it only receives edges.
pub const END: &str = "__end__";

/// Step identifier, unique within one graph.
pub type StepId = String;

/// Error type step functions may return; wrapped into
/// [`GraphError::StepExecution`] by the engine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A registered step: takes a state snapshot, returns a partial update.
pub type StepFn<S> = Arc<
    dyn Fn(S) -> BoxFuture<'static, std::result::Result<<S as PipelineState>::Update, BoxError>>
        + Send
        + Sync,
>;

/// Router for conditional edges: inspects the merged state, returns a label.
pub type RouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// A directed transition out of a step (or out of [`START`]).
pub enum Edge<S: PipelineState> {
    /// Unconditional transition to a step or [`END`].
    Direct(StepId),

    /// Label-routed transition. The router runs strictly after the source
    /// step's own update has been merged; `branches` maps every legal label
    /// to its target.
    Conditional {
        /// Chooses a label based on the current state.
        router: RouterFn<S>,
        /// Closed label → target map, checked at compile time.
        branches: HashMap<String, StepId>,
    },
}

impl<S: PipelineState> std::fmt::Debug for Edge<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edge::Direct(to) => f.debug_tuple("Direct").field(to).finish(),
            Edge::Conditional { branches, .. } => f
                .debug_struct("Conditional")
                .field("router", &"<function>")
                .field("branches", branches)
                .finish(),
        }
    }
}

/// Builder for a step graph. See the [module docs](self) for an overview.
pub struct StepGraph<S: PipelineState> {
    steps: HashMap<StepId, StepFn<S>>,
    /// Registration order; the deterministic tie-break for same-wave merges.
    registration: Vec<StepId>,
    edges: HashMap<StepId, Vec<Edge<S>>>,
}

impl<S: PipelineState> StepGraph<S> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            steps: HashMap::new(),
            registration: Vec::new(),
            edges: HashMap::new(),
        }
    }

    /// Register a step under a unique name.
    ///
    /// The step function receives a snapshot of the state and returns a
    /// partial update future.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateStep`] if the name is already taken.
    pub fn add_step<F>(&mut self, name: impl Into<String>, step: F) -> Result<()>
    where
        F: Fn(S) -> BoxFuture<'static, std::result::Result<S::Update, BoxError>>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if self.steps.contains_key(&name) {
            return Err(GraphError::DuplicateStep(name));
        }
        self.registration.push(name.clone());
        self.steps.insert(name, Arc::new(step));
        Ok(())
    }

    /// Add an unconditional edge. Endpoints are checked at compile time.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges
            .entry(from.into())
            .or_default()
            .push(Edge::Direct(to.into()));
    }

    /// Add a conditional edge routed by `router` over the closed label set
    /// given by `branches`.
    ///
    /// A label returned at run time that is absent from `branches` fails the
    /// run with [`GraphError::UnknownRoute`].
    pub fn add_conditional_edge<R>(
        &mut self,
        from: impl Into<String>,
        router: R,
        branches: HashMap<String, StepId>,
    ) where
        R: Fn(&S) -> String + Send + Sync + 'static,
    {
        self.edges.entry(from.into()).or_default().push(Edge::Conditional {
            router: Arc::new(router),
            branches,
        });
    }

    /// Validate the graph and produce an executable pipeline.
    ///
    /// # Errors
    ///
    /// [`GraphError::Validation`] if any edge endpoint is not a registered
    /// step or reserved marker, if [`START`] has no outgoing edge, or if any
    /// registered step lacks an outgoing edge (every non-terminal step must
    /// lead somewhere).
    pub fn compile(self) -> Result<CompiledPipeline<S>> {
        self.validate()?;
        Ok(CompiledPipeline::new(self.steps, self.registration, self.edges))
    }

    fn validate(&self) -> Result<()> {
        let known = |id: &str| id == END || self.steps.contains_key(id);

        for (from, edges) in &self.edges {
            if from == END {
                return Err(GraphError::Validation(
                    "the terminal marker cannot source edges".to_string(),
                ));
            }
            if from != START && !self.steps.contains_key(from) {
                return Err(GraphError::Validation(format!(
                    "edge source '{from}' is not a registered step"
                )));
            }
            for edge in edges {
                match edge {
                    Edge::Direct(to) => {
                        if !known(to) {
                            return Err(GraphError::Validation(format!(
                                "edge target '{to}' is not a registered step"
                            )));
                        }
                    }
                    Edge::Conditional { branches, .. } => {
                        if branches.is_empty() {
                            return Err(GraphError::Validation(format!(
                                "conditional edge out of '{from}' has no branches"
                            )));
                        }
                        for (label, to) in branches {
                            if !known(to) {
                                return Err(GraphError::Validation(format!(
                                    "branch '{label}' out of '{from}' targets unknown step '{to}'"
                                )));
                            }
                        }
                    }
                }
            }
        }

        if self.edges.get(START).map_or(true, Vec::is_empty) {
            return Err(GraphError::Validation(
                "the entry marker has no outgoing edge".to_string(),
            ));
        }
        for step in &self.registration {
            if self.edges.get(step).map_or(true, Vec::is_empty) {
                return Err(GraphError::Validation(format!(
                    "step '{step}' has no outgoing edge"
                )));
            }
        }

        Ok(())
    }
}

impl<S: PipelineState> Default for StepGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}
