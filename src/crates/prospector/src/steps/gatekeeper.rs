//! Gatekeeper step: decide whether the lead is worth an email.
//!
//! Decision strategy: one structured JSON verdict from the generation
//! collaborator, parsed into [`QualificationVerdict`]. A parse or service
//! failure fails **closed** (disqualified, with the error as the reason).
//! Research below the minimum length short-circuits to a disqualification
//! without spending a generation call at all.

use std::sync::Arc;

use llm::{generate_structured, Generator};
use serde::Deserialize;
use tracing::{info, warn};

use crate::prompts;
use crate::record::{LeadRecord, RecordUpdate};
use crate::steps::StepResult;

/// Structured verdict returned by the qualification prompt.
#[derive(Debug, Deserialize)]
pub struct QualificationVerdict {
    pub is_qualified: bool,
    pub reason: String,
}

/// Filters leads based on the accumulated research.
pub struct Gatekeeper {
    llm: Arc<dyn Generator>,
    min_research_len: usize,
}

impl Gatekeeper {
    pub fn new(llm: Arc<dyn Generator>, min_research_len: usize) -> Self {
        Self {
            llm,
            min_research_len,
        }
    }

    pub async fn run(&self, record: LeadRecord) -> StepResult {
        let research = record.research_snippets.join("\n\n");
        let mut update = RecordUpdate {
            research_summary: Some(research.clone()),
            ..Default::default()
        };

        // Too little research to judge: automatic fail, no generation spend.
        if research.trim().len() < self.min_research_len {
            info!(lead = %record.lead_name, "not enough research, disqualifying");
            update.is_qualified = Some(false);
            update.qualification_reason =
                Some("Not enough research data found to qualify this lead.".to_string());
            return Ok(update);
        }

        let prompt = prompts::qualification(&record, &research);
        match generate_structured::<QualificationVerdict>(self.llm.as_ref(), &prompt).await {
            Ok(verdict) => {
                info!(
                    lead = %record.lead_name,
                    qualified = verdict.is_qualified,
                    reason = %verdict.reason,
                    "qualification decided"
                );
                update.is_qualified = Some(verdict.is_qualified);
                update.qualification_reason = Some(verdict.reason);
            }
            Err(e) => {
                // Fail closed: an undecidable lead is a disqualified lead.
                warn!(lead = %record.lead_name, error = %e, "qualification call failed");
                update.is_qualified = Some(false);
                update.qualification_reason = Some(format!("Qualification failed: {e}"));
            }
        }

        Ok(update)
    }
}
