//! Reviewer step: the bounded critique half of the draft⇄review loop.
//!
//! The reviewer is the only writer of `iteration_count`, and the count only
//! ever goes up. Once it reaches the configured bound the draft is accepted
//! without another generation call; the loop's hard stop lives here, not in
//! the graph engine. A parse or service failure also accepts the draft
//! (fails **open**) rather than looping on a broken judge.

use std::sync::Arc;

use llm::{generate_structured, Generator};
use serde::Deserialize;
use tracing::{info, warn};

use crate::prompts;
use crate::record::{LeadRecord, RecordUpdate};
use crate::steps::StepResult;

/// Structured verdict returned by the review prompt.
#[derive(Debug, Deserialize)]
pub struct ReviewVerdict {
    pub is_perfect: bool,
    #[serde(default)]
    pub feedback: String,
}

/// Judges drafts and feeds critique back to the drafter.
pub struct Reviewer {
    llm: Arc<dyn Generator>,
    max_iterations: u32,
}

impl Reviewer {
    pub fn new(llm: Arc<dyn Generator>, max_iterations: u32) -> Self {
        Self {
            llm,
            max_iterations,
        }
    }

    pub async fn run(&self, record: LeadRecord) -> StepResult {
        let iteration = record.iteration_count;
        let mut update = RecordUpdate {
            iteration_count: Some(iteration + 1),
            ..Default::default()
        };

        if iteration >= self.max_iterations {
            info!(lead = %record.lead_name, iteration, "revision budget spent, accepting draft");
            update.is_perfect = Some(true);
            return Ok(update);
        }

        let prompt = prompts::review(&record);
        match generate_structured::<ReviewVerdict>(self.llm.as_ref(), &prompt).await {
            Ok(verdict) if verdict.is_perfect => {
                info!(lead = %record.lead_name, iteration, "draft accepted");
                update.is_perfect = Some(true);
            }
            Ok(verdict) => {
                info!(lead = %record.lead_name, iteration, "draft sent back for revision");
                update.is_perfect = Some(false);
                update.critique_feedback = Some(verdict.feedback);
            }
            Err(e) => {
                // Fail open: never loop forever on a broken judge.
                warn!(lead = %record.lead_name, error = %e, "review call failed, accepting draft");
                update.is_perfect = Some(true);
            }
        }

        Ok(update)
    }
}
