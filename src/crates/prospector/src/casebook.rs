//! Built-in proof points used to seed a fresh knowledge store.

use tooling::SqliteKnowledgeBase;
use tracing::info;

/// Success stories available to the drafter as proof points.
pub const CASE_STUDIES: [&str; 3] = [
    "Case study: fintech automation. We helped a neobank called 'PayFast' automate \
     their customer support with AI agents. Result: ticket resolution time down 80%, \
     saving $50k/month.",
    "Case study: SaaS sales outreach. We built an AI SDR for 'CloudScale', a B2B SaaS \
     company. Result: the agent booked 45 meetings in the first week, generating $120k \
     in pipeline.",
    "Case study: healthcare data entry. We implemented an OCR agent for 'MediCare' to \
     read patient PDF forms. Result: manual entry errors eliminated, 500 forms \
     processed per day.",
];

/// Seed the store with the built-in case studies if it is empty.
///
/// Returns the number of documents inserted (zero when already seeded).
pub async fn seed_if_empty(kb: &SqliteKnowledgeBase) -> tooling::Result<usize> {
    if kb.count().await? > 0 {
        return Ok(0);
    }
    for case_study in CASE_STUDIES {
        kb.insert(case_study).await?;
    }
    info!(documents = CASE_STUDIES.len(), "knowledge base seeded");
    Ok(CASE_STUDIES.len())
}
