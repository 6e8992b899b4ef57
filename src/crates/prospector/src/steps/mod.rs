//! The five step units of the pipeline.
//!
//! Each step reads a snapshot of the [`LeadRecord`](crate::record::LeadRecord)
//! and returns a partial update. Collaborator failures are absorbed inside
//! the owning step (placeholder snippets, fail-closed qualification,
//! fallback proof point, fail-open review), so a single lead's run only
//! aborts on a wiring fault, never on a flaky external service.

mod drafter;
mod gatekeeper;
mod research;
mod reviewer;

pub use drafter::Drafter;
pub use gatekeeper::{Gatekeeper, QualificationVerdict};
pub use research::{company_site_url, NewsResearcher, SiteResearcher};
pub use reviewer::{ReviewVerdict, Reviewer};

/// Step outcome handed back to the graph engine.
pub type StepResult = std::result::Result<crate::record::RecordUpdate, leadgraph_core::BoxError>;
