//! Graph wiring: assemble the five steps into an executable pipeline.
//!
//! ```text
//!            ┌─ research_news ─┐
//!  START ────┤                 ├──▶ qualify ──(qualified)──▶ draft ──▶ review ──(accept)──▶ END
//!            └─ research_site ─┘       │                      ▲           │
//!                                  (rejected)                 └─(revise)──┘
//!                                      ▼
//!                                     END
//! ```
//!
//! Both researchers run in one parallel wave and fan back in at the
//! gatekeeper. The draft⇄review cycle is bounded by the reviewer itself; the
//! step limit is only a backstop against wiring mistakes.

use std::collections::HashMap;
use std::sync::Arc;

use leadgraph_core::{CompiledPipeline, StepGraph, END, START};
use llm::Generator;
use tooling::{KnowledgeSearch, PageFetcher, SearchProvider};

use crate::config::PipelineConfig;
use crate::record::LeadRecord;
use crate::steps::{Drafter, Gatekeeper, NewsResearcher, Reviewer, SiteResearcher};

/// Route labels out of the gatekeeper.
const ROUTE_QUALIFIED: &str = "qualified";
const ROUTE_REJECTED: &str = "rejected";

/// Route labels out of the reviewer.
const ROUTE_ACCEPT: &str = "accept";
const ROUTE_REVISE: &str = "revise";

/// External collaborators injected into the pipeline.
///
/// Constructed once at process start; the pipeline holds shared read-only
/// handles and the same set serves every lead in a batch.
pub struct Collaborators {
    /// Web search provider.
    pub search: Arc<dyn SearchProvider>,
    /// Page fetcher for company sites.
    pub fetcher: Arc<dyn PageFetcher>,
    /// Generation service used by gatekeeper, drafter, and reviewer.
    pub llm: Arc<dyn Generator>,
    /// Vector store of proof points.
    pub knowledge: Arc<dyn KnowledgeSearch>,
}

/// Build and compile the lead pipeline.
pub fn build_pipeline(
    collab: &Collaborators,
    config: &PipelineConfig,
) -> leadgraph_core::Result<CompiledPipeline<LeadRecord>> {
    let mut graph: StepGraph<LeadRecord> = StepGraph::new();

    let news = Arc::new(NewsResearcher::new(
        Arc::clone(&collab.search),
        config.search_results,
    ));
    graph.add_step("research_news", move |record| {
        let step = Arc::clone(&news);
        Box::pin(async move { step.run(record).await })
    })?;

    let site = Arc::new(SiteResearcher::new(
        Arc::clone(&collab.fetcher),
        config.site_char_budget,
    ));
    graph.add_step("research_site", move |record| {
        let step = Arc::clone(&site);
        Box::pin(async move { step.run(record).await })
    })?;

    let gatekeeper = Arc::new(Gatekeeper::new(
        Arc::clone(&collab.llm),
        config.min_research_len,
    ));
    graph.add_step("qualify", move |record| {
        let step = Arc::clone(&gatekeeper);
        Box::pin(async move { step.run(record).await })
    })?;

    let drafter = Arc::new(Drafter::new(
        Arc::clone(&collab.llm),
        Arc::clone(&collab.knowledge),
        config.creative_temperature,
    ));
    graph.add_step("draft", move |record| {
        let step = Arc::clone(&drafter);
        Box::pin(async move { step.run(record).await })
    })?;

    let reviewer = Arc::new(Reviewer::new(
        Arc::clone(&collab.llm),
        config.max_iterations,
    ));
    graph.add_step("review", move |record| {
        let step = Arc::clone(&reviewer);
        Box::pin(async move { step.run(record).await })
    })?;

    // Parallel research fan-out, fan-in at the gatekeeper.
    graph.add_edge(START, "research_news");
    graph.add_edge(START, "research_site");
    graph.add_edge("research_news", "qualify");
    graph.add_edge("research_site", "qualify");

    // Disqualified leads stop here; qualified ones get a draft.
    graph.add_conditional_edge(
        "qualify",
        |record: &LeadRecord| {
            if record.is_qualified {
                ROUTE_QUALIFIED.to_string()
            } else {
                ROUTE_REJECTED.to_string()
            }
        },
        HashMap::from([
            (ROUTE_QUALIFIED.to_string(), "draft".to_string()),
            (ROUTE_REJECTED.to_string(), END.to_string()),
        ]),
    );

    graph.add_edge("draft", "review");

    // The reflection loop: back to the drafter until accepted.
    graph.add_conditional_edge(
        "review",
        |record: &LeadRecord| {
            if record.is_perfect {
                ROUTE_ACCEPT.to_string()
            } else {
                ROUTE_REVISE.to_string()
            }
        },
        HashMap::from([
            (ROUTE_ACCEPT.to_string(), END.to_string()),
            (ROUTE_REVISE.to_string(), "draft".to_string()),
        ]),
    );

    Ok(graph.compile()?.with_step_limit(config.step_limit))
}
