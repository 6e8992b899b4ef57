//! The shared record threaded through one lead's pipeline run.
//!
//! Each lead gets a fresh [`LeadRecord`] at run start; steps contribute
//! [`RecordUpdate`]s that merge into it, and the record is dropped once the
//! terminal report row has been written. Nothing leaks between leads.
//!
//! Merge behavior per field:
//!
//! | Field | Merge | Written by |
//! |---|---|---|
//! | `sender_*`, `lead_name`, `company` | initial only (absent from updates) | run driver |
//! | `research_snippets` | append-accumulate | researcher steps |
//! | `research_summary`, `is_qualified`, `qualification_reason` | overwrite | gatekeeper |
//! | `draft_email` | overwrite | drafter |
//! | `critique_feedback`, `is_perfect`, `iteration_count` | overwrite | reviewer |
//!
//! Unwritten fields read as their defaults (empty text, empty list, `false`,
//! zero); there is no "missing field" state for a step to trip over.

use leadgraph_core::PipelineState;

/// Per-lead shared state.
#[derive(Debug, Clone, Default)]
pub struct LeadRecord {
    /// Sender identity: name used in the sign-off.
    pub sender_name: String,
    /// Sender identity: company making the outreach.
    pub sender_company: String,
    /// Sender identity: the value proposition being pitched.
    pub sender_product: String,

    /// The lead's name.
    pub lead_name: String,
    /// The lead's company.
    pub company: String,

    /// Raw research snippets, accumulated across researcher steps.
    pub research_snippets: Vec<String>,
    /// Research snippets joined into one block by the gatekeeper.
    pub research_summary: String,

    /// Whether the lead passed qualification.
    pub is_qualified: bool,
    /// Why the lead passed or failed.
    pub qualification_reason: String,

    /// Current draft of the outreach email.
    pub draft_email: String,

    /// Reviewer feedback for the next drafting pass, if any.
    pub critique_feedback: Option<String>,
    /// Whether the reviewer accepted the draft.
    pub is_perfect: bool,
    /// Number of completed review passes. Only the reviewer writes this.
    pub iteration_count: u32,
}

/// Partial update produced by one step.
///
/// `research_snippets` accumulates; every other field overwrites when
/// present. Sender and lead identity are deliberately absent: the run driver
/// sets them once and no step can touch them.
#[derive(Debug, Default)]
pub struct RecordUpdate {
    /// Snippets to append to the research collection.
    pub research_snippets: Vec<String>,
    /// New research summary.
    pub research_summary: Option<String>,
    /// New qualification flag.
    pub is_qualified: Option<bool>,
    /// New qualification reason.
    pub qualification_reason: Option<String>,
    /// New email draft.
    pub draft_email: Option<String>,
    /// New critique feedback.
    pub critique_feedback: Option<String>,
    /// New review acceptance flag.
    pub is_perfect: Option<bool>,
    /// New review-pass count.
    pub iteration_count: Option<u32>,
}

impl PipelineState for LeadRecord {
    type Update = RecordUpdate;

    fn apply(&mut self, update: RecordUpdate) {
        self.research_snippets.extend(update.research_snippets);
        if let Some(summary) = update.research_summary {
            self.research_summary = summary;
        }
        if let Some(qualified) = update.is_qualified {
            self.is_qualified = qualified;
        }
        if let Some(reason) = update.qualification_reason {
            self.qualification_reason = reason;
        }
        if let Some(draft) = update.draft_email {
            self.draft_email = draft;
        }
        if let Some(feedback) = update.critique_feedback {
            self.critique_feedback = Some(feedback);
        }
        if let Some(perfect) = update.is_perfect {
            self.is_perfect = perfect;
        }
        if let Some(count) = update.iteration_count {
            self.iteration_count = count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippets_accumulate_across_updates() {
        let mut record = LeadRecord::default();
        record.apply(RecordUpdate {
            research_snippets: vec!["a".to_string()],
            ..Default::default()
        });
        record.apply(RecordUpdate {
            research_snippets: vec!["b".to_string()],
            ..Default::default()
        });
        assert_eq!(record.research_snippets, vec!["a", "b"]);
    }

    #[test]
    fn absent_fields_leave_previous_values() {
        let mut record = LeadRecord::default();
        record.apply(RecordUpdate {
            draft_email: Some("Hi".to_string()),
            ..Default::default()
        });
        record.apply(RecordUpdate {
            is_perfect: Some(true),
            ..Default::default()
        });
        assert_eq!(record.draft_email, "Hi");
        assert!(record.is_perfect);
    }

    #[test]
    fn overwrite_fields_take_latest_value() {
        let mut record = LeadRecord::default();
        record.apply(RecordUpdate {
            draft_email: Some("v1".to_string()),
            ..Default::default()
        });
        record.apply(RecordUpdate {
            draft_email: Some("v2".to_string()),
            critique_feedback: Some("shorter".to_string()),
            ..Default::default()
        });
        assert_eq!(record.draft_email, "v2");
        assert_eq!(record.critique_feedback.as_deref(), Some("shorter"));
    }
}
