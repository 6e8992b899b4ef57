//! Wave-based execution of a compiled step graph.
//!
//! Execution proceeds in waves. The first wave is every successor of
//! [`START`](crate::START); each subsequent wave is the set of successors of
//! the wave that just finished. All steps in a wave run concurrently against
//! the same state snapshot, their updates are merged in step-registration
//! order (a fixed, documented tie-break, so reruns are reproducible), and
//! only then are successors computed. That ordering lets a conditional
//! router see the source step's own update, and makes a fan-in step see
//! every contribution from the wave that feeds it. A step reached through
//! several in-edges is scheduled once per wave, not once per edge.
//!
//! Cycles are legal: a conditional edge may route back to an earlier step.
//! The engine does not try to detect non-termination; looping steps are
//! expected to bound themselves. An optional
//! [`step limit`](CompiledPipeline::with_step_limit) is available as a
//! deployment safety net.

use std::collections::HashMap;

use crate::error::{GraphError, Result};
use crate::graph::{Edge, StepFn, StepId, END, START};
use crate::state::PipelineState;

/// An executable pipeline produced by
/// [`StepGraph::compile`](crate::StepGraph::compile).
pub struct CompiledPipeline<S: PipelineState> {
    steps: HashMap<StepId, StepFn<S>>,
    registration: Vec<StepId>,
    edges: HashMap<StepId, Vec<Edge<S>>>,
    step_limit: Option<usize>,
}

impl<S: PipelineState> CompiledPipeline<S> {
    pub(crate) fn new(
        steps: HashMap<StepId, StepFn<S>>,
        registration: Vec<StepId>,
        edges: HashMap<StepId, Vec<Edge<S>>>,
    ) -> Self {
        Self {
            steps,
            registration,
            edges,
            step_limit: None,
        }
    }

    /// Cap the total number of step executions per run.
    ///
    /// The engine itself permits cycles of any length; this guard turns a
    /// runaway loop into [`GraphError::MaxStepsExceeded`] instead of an
    /// unbounded run.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Number of registered steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Execute the pipeline from the entry marker until every active path
    /// reaches the terminal marker, returning the final state.
    ///
    /// # Errors
    ///
    /// - [`GraphError::StepExecution`] when a step function fails.
    /// - [`GraphError::UnknownRoute`] when a router emits an unmapped label.
    /// - [`GraphError::MaxStepsExceeded`] when the optional step limit trips.
    pub async fn run(&self, initial: S) -> Result<S> {
        let mut record = initial;
        let mut executed = 0usize;
        let mut frontier = self.wave_from(&[START.to_string()], &record)?;

        while !frontier.is_empty() {
            if let Some(limit) = self.step_limit {
                if executed + frontier.len() > limit {
                    return Err(GraphError::MaxStepsExceeded { limit });
                }
            }
            tracing::debug!(wave = ?frontier, "executing wave");

            let wave = frontier
                .iter()
                .map(|name| {
                    let step = self
                        .steps
                        .get(name)
                        .cloned()
                        .ok_or_else(|| GraphError::Validation(format!("unknown step '{name}'")))?;
                    Ok((name.clone(), step))
                })
                .collect::<Result<Vec<_>>>()?;

            let mut results = futures::future::join_all(wave.into_iter().map(|(name, step)| {
                let snapshot = record.clone();
                async move {
                    let outcome = step(snapshot).await;
                    (name, outcome)
                }
            }))
            .await;
            executed += results.len();

            // Merge in registration order, independent of completion order.
            results.sort_by_key(|(name, _)| self.registration_index(name));
            for (name, outcome) in results {
                let update = outcome.map_err(|e| GraphError::StepExecution {
                    step: name.clone(),
                    message: e.to_string(),
                })?;
                record.apply(update);
                tracing::debug!(step = %name, "update merged");
            }

            // Successors are computed only after the whole wave has merged.
            frontier = self.wave_from(&frontier, &record)?;
        }

        tracing::debug!(steps_executed = executed, "run complete");
        Ok(record)
    }

    /// Compute the wave that follows `sources`: their successors, minus the
    /// terminal marker, each step at most once, ordered by registration.
    fn wave_from(&self, sources: &[StepId], record: &S) -> Result<Vec<StepId>> {
        let mut wave: Vec<StepId> = Vec::new();
        for from in sources {
            for succ in self.successors(from, record)? {
                if !wave.contains(&succ) {
                    wave.push(succ);
                }
            }
        }
        wave.sort_by_key(|name| self.registration_index(name));
        Ok(wave)
    }

    fn registration_index(&self, name: &str) -> usize {
        self.registration
            .iter()
            .position(|s| s == name)
            .unwrap_or(usize::MAX)
    }

    /// Resolve the outgoing edges of `from` against the current state,
    /// dropping transitions into the terminal marker.
    fn successors(&self, from: &str, record: &S) -> Result<Vec<StepId>> {
        let mut out = Vec::new();
        if let Some(edges) = self.edges.get(from) {
            for edge in edges {
                match edge {
                    Edge::Direct(to) => {
                        if to != END {
                            out.push(to.clone());
                        }
                    }
                    Edge::Conditional { router, branches } => {
                        let label = router(record);
                        let target =
                            branches.get(&label).ok_or_else(|| GraphError::UnknownRoute {
                                step: from.to_string(),
                                label: label.clone(),
                            })?;
                        if target != END {
                            out.push(target.clone());
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}
