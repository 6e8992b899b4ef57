//! Drafter step: write the cold email.
//!
//! Retrieval uses the hypothetical-document trick: ask the model for a
//! plausible success story matching the company, then use that story (not
//! the raw research) as the similarity query against the knowledge store.
//! Every stage degrades rather than fails: no story falls back to the
//! research summary as the query, no knowledge hit falls back to a generic
//! proof point, no completion falls back to a placeholder draft.

use std::sync::Arc;

use llm::Generator;
use tooling::KnowledgeSearch;
use tracing::{debug, warn};

use crate::prompts;
use crate::record::{LeadRecord, RecordUpdate};
use crate::steps::StepResult;

/// Used when the knowledge store has nothing to offer.
const FALLBACK_PROOF_POINT: &str =
    "We have helped similar companies scale their outbound with automation.";

/// Drafts (and redrafts) the outreach email.
pub struct Drafter {
    llm: Arc<dyn Generator>,
    knowledge: Arc<dyn KnowledgeSearch>,
    creative_temperature: f32,
}

impl Drafter {
    pub fn new(
        llm: Arc<dyn Generator>,
        knowledge: Arc<dyn KnowledgeSearch>,
        creative_temperature: f32,
    ) -> Self {
        Self {
            llm,
            knowledge,
            creative_temperature,
        }
    }

    pub async fn run(&self, record: LeadRecord) -> StepResult {
        let proof_point = self.best_proof_point(&record).await;

        let prompt = prompts::draft_email(&record, &proof_point);
        let draft = match self.llm.generate(&prompt, self.creative_temperature).await {
            Ok(draft) => draft,
            Err(e) => {
                warn!(lead = %record.lead_name, error = %e, "draft generation failed");
                format!("[draft unavailable: {e}]")
            }
        };

        Ok(RecordUpdate {
            draft_email: Some(draft),
            ..Default::default()
        })
    }

    /// Retrieve the single best-matching proof point for this company.
    async fn best_proof_point(&self, record: &LeadRecord) -> String {
        let story_prompt = prompts::hypothetical_story(record);
        let query = match self
            .llm
            .generate(&story_prompt, self.creative_temperature)
            .await
        {
            Ok(story) => story,
            Err(e) => {
                warn!(error = %e, "hypothetical story failed, querying with raw research");
                record.research_summary.clone()
            }
        };

        match self.knowledge.search(&query, 1).await {
            Ok(docs) => match docs.into_iter().next() {
                Some(doc) => {
                    debug!(score = doc.score, "proof point retrieved");
                    doc.content
                }
                None => FALLBACK_PROOF_POINT.to_string(),
            },
            Err(e) => {
                warn!(error = %e, "knowledge search failed, using fallback proof point");
                FALLBACK_PROOF_POINT.to_string()
            }
        }
    }
}
