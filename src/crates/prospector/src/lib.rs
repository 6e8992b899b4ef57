//! Lead qualification and outreach drafting pipeline.
//!
//! Given a lead (name + company), the pipeline researches them on the open
//! web, decides whether they are worth contacting, and, for qualified
//! leads, drafts a personalized cold email refined through one bounded
//! draft⇄review pass.
//!
//! The control flow lives in a [`leadgraph_core`] step graph (see
//! [`pipeline`]); the steps themselves ([`steps`]) are thin wrappers around
//! injected collaborators: web search, page fetch, a generation service, and
//! a vector knowledge store. The [`driver`] turns a CSV of leads into a CSV
//! of report rows, isolating per-lead failures.

pub mod casebook;
pub mod config;
pub mod driver;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod record;
pub mod steps;

pub use config::PipelineConfig;
pub use driver::{LeadInput, LeadReport, SenderProfile};
pub use error::{DriverError, Result};
pub use pipeline::{build_pipeline, Collaborators};
pub use record::{LeadRecord, RecordUpdate};
