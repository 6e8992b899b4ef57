//! End-to-end pipeline tests against scripted mock collaborators.
//!
//! The scripted generator answers calls in order and panics on any call the
//! test did not budget for, so these tests double as call-count assertions:
//! short-circuits, fail-closed/fail-open recovery, and the bounded
//! draft⇄review loop all show up as exact script lengths.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use llm::{Generator, LlmError};
use prospector::driver::{self, LeadInput, SenderProfile};
use prospector::{build_pipeline, Collaborators, PipelineConfig};
use tooling::{
    KnowledgeDoc, KnowledgeSearch, PageFetcher, SearchHit, SearchProvider, ToolError,
};

struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn new(script: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(String::from).map_err(String::from))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str, _temperature: f32) -> llm::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::InvalidResponse(message)),
            None => panic!("generation call beyond the scripted budget"),
        }
    }
}

struct MockSearch {
    snippets: Vec<&'static str>,
    fail: bool,
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, _query: &str, _max_results: usize) -> tooling::Result<Vec<SearchHit>> {
        if self.fail {
            return Err(ToolError::Search("search API is down".to_string()));
        }
        Ok(self
            .snippets
            .iter()
            .map(|content| SearchHit {
                title: String::new(),
                url: String::new(),
                content: content.to_string(),
            })
            .collect())
    }
}

struct MockFetcher {
    text: &'static str,
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, _url: &str, _max_chars: usize) -> String {
        self.text.to_string()
    }
}

struct MockKnowledge {
    docs: Vec<&'static str>,
    calls: AtomicUsize,
}

impl MockKnowledge {
    fn new(docs: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            docs,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeSearch for MockKnowledge {
    async fn search(&self, _query: &str, k: usize) -> tooling::Result<Vec<KnowledgeDoc>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .docs
            .iter()
            .take(k)
            .map(|content| KnowledgeDoc {
                content: content.to_string(),
                score: 0.9,
            })
            .collect())
    }
}

fn ada() -> LeadInput {
    LeadInput {
        name: "Ada Lovelace".to_string(),
        company: "Acme".to_string(),
    }
}

fn sender() -> SenderProfile {
    SenderProfile {
        name: "John Doe".to_string(),
        company: "Automated Systems".to_string(),
        value_proposition: "AI sales agents".to_string(),
    }
}

fn collaborators(
    generator: Arc<ScriptedGenerator>,
    knowledge: Arc<MockKnowledge>,
) -> Collaborators {
    Collaborators {
        search: Arc::new(MockSearch {
            snippets: vec!["Acme raised $10M Series A"],
            fail: false,
        }),
        fetcher: Arc::new(MockFetcher {
            text: "Acme builds developer tools",
        }),
        llm: generator,
        knowledge,
    }
}

#[tokio::test]
async fn qualified_lead_gets_a_reviewed_draft() {
    let generator = ScriptedGenerator::new(vec![
        Ok(r#"{"is_qualified": true, "reason": "tech funding news"}"#),
        Ok("A developer-tools company automated its outbound and tripled replies."),
        Ok("Hi Ada, congrats on the Series A..."),
        Ok(r#"{"is_perfect": true, "feedback": ""}"#),
    ]);
    let knowledge = MockKnowledge::new(vec!["Case study: CloudScale booked 45 meetings."]);
    let pipeline = build_pipeline(
        &collaborators(generator.clone(), knowledge.clone()),
        &PipelineConfig::default(),
    )
    .unwrap();

    let record = pipeline
        .run(driver::initial_record(&sender(), &ada()))
        .await
        .unwrap();

    assert!(record.is_qualified);
    assert_eq!(record.qualification_reason, "tech funding news");
    assert_eq!(record.draft_email, "Hi Ada, congrats on the Series A...");
    assert!(record.is_perfect);
    assert_eq!(record.iteration_count, 1);
    assert_eq!(generator.calls(), 4);
    assert_eq!(knowledge.calls(), 1);
}

#[tokio::test]
async fn both_researchers_feed_the_record_in_registration_order() {
    let generator = ScriptedGenerator::new(vec![
        Ok(r#"{"is_qualified": false, "reason": "not tech"}"#),
    ]);
    let knowledge = MockKnowledge::new(vec![]);
    let pipeline = build_pipeline(
        &collaborators(generator.clone(), knowledge.clone()),
        &PipelineConfig::default(),
    )
    .unwrap();

    let record = pipeline
        .run(driver::initial_record(&sender(), &ada()))
        .await
        .unwrap();

    assert_eq!(record.research_snippets.len(), 2);
    assert_eq!(record.research_snippets[0], "Acme raised $10M Series A");
    assert!(record.research_snippets[1].starts_with("Company site (https://acme.com):"));
    assert!(record.research_summary.contains("Series A"));
    assert!(record.research_summary.contains("developer tools"));
}

#[tokio::test]
async fn disqualified_lead_skips_drafting_entirely() {
    let generator = ScriptedGenerator::new(vec![
        Ok(r#"{"is_qualified": false, "reason": "not tech"}"#),
    ]);
    let knowledge = MockKnowledge::new(vec!["unused"]);
    let pipeline = build_pipeline(
        &collaborators(generator.clone(), knowledge.clone()),
        &PipelineConfig::default(),
    )
    .unwrap();

    let report = driver::process_lead(&pipeline, &sender(), &ada()).await;

    assert!(!report.is_qualified);
    assert_eq!(report.reason, "not tech");
    assert_eq!(report.draft_email, "");
    // Exactly the qualification call: no story, no draft, no review.
    assert_eq!(generator.calls(), 1);
    assert_eq!(knowledge.calls(), 0);
}

#[tokio::test]
async fn thin_research_short_circuits_without_generation_calls() {
    let generator = ScriptedGenerator::new(vec![]);
    let knowledge = MockKnowledge::new(vec![]);
    let config = PipelineConfig {
        // Far above what the mocks produce, forcing the cheap path.
        min_research_len: 10_000,
        ..Default::default()
    };
    let pipeline =
        build_pipeline(&collaborators(generator.clone(), knowledge.clone()), &config).unwrap();

    let report = driver::process_lead(&pipeline, &sender(), &ada()).await;

    assert!(!report.is_qualified);
    assert!(!report.reason.is_empty());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn malformed_qualification_response_fails_closed() {
    let generator = ScriptedGenerator::new(vec![Ok("I refuse to answer in JSON.")]);
    let knowledge = MockKnowledge::new(vec![]);
    let pipeline = build_pipeline(
        &collaborators(generator.clone(), knowledge.clone()),
        &PipelineConfig::default(),
    )
    .unwrap();

    let report = driver::process_lead(&pipeline, &sender(), &ada()).await;

    assert!(!report.is_qualified);
    assert!(report.reason.contains("Qualification failed"));
    assert_eq!(knowledge.calls(), 0);
}

#[tokio::test]
async fn failed_review_call_fails_open_and_terminates() {
    let generator = ScriptedGenerator::new(vec![
        Ok(r#"{"is_qualified": true, "reason": "tech funding news"}"#),
        Ok("A plausible success story."),
        Ok("Hi Ada, ..."),
        Err("review service down"),
    ]);
    let knowledge = MockKnowledge::new(vec!["Case study: CloudScale."]);
    let pipeline = build_pipeline(
        &collaborators(generator.clone(), knowledge.clone()),
        &PipelineConfig::default(),
    )
    .unwrap();

    let record = pipeline
        .run(driver::initial_record(&sender(), &ada()))
        .await
        .unwrap();

    assert!(record.is_perfect);
    assert_eq!(record.iteration_count, 1);
    assert_eq!(record.draft_email, "Hi Ada, ...");
    // One drafting pass only: the failed review never sent it back.
    assert_eq!(knowledge.calls(), 1);
}

#[tokio::test]
async fn relentless_critic_is_cut_off_at_the_iteration_bound() {
    let generator = ScriptedGenerator::new(vec![
        Ok(r#"{"is_qualified": true, "reason": "tech funding news"}"#),
        Ok("Story for draft one."),
        Ok("Hi Ada, draft one."),
        Ok(r#"{"is_perfect": false, "feedback": "Too vague, cite the funding round."}"#),
        Ok("Story for draft two."),
        Ok("Hi Ada, draft two."),
        // No script entry for a second review: the bound forces acceptance
        // without another generation call.
    ]);
    let knowledge = MockKnowledge::new(vec!["Case study: CloudScale."]);
    let pipeline = build_pipeline(
        &collaborators(generator.clone(), knowledge.clone()),
        &PipelineConfig::default(),
    )
    .unwrap();

    let record = pipeline
        .run(driver::initial_record(&sender(), &ada()))
        .await
        .unwrap();

    assert!(record.is_perfect);
    assert_eq!(record.iteration_count, 2);
    assert_eq!(record.draft_email, "Hi Ada, draft two.");
    assert_eq!(
        record.critique_feedback.as_deref(),
        Some("Too vague, cite the funding round.")
    );
    // Drafter ran exactly max_iterations + 1 times.
    assert_eq!(knowledge.calls(), 2);
    assert_eq!(generator.calls(), 6);
}

#[tokio::test]
async fn research_failures_degrade_to_placeholders_not_aborts() {
    let generator = ScriptedGenerator::new(vec![
        Ok(r#"{"is_qualified": false, "reason": "nothing solid found"}"#),
    ]);
    let knowledge = MockKnowledge::new(vec![]);
    let collab = Collaborators {
        search: Arc::new(MockSearch {
            snippets: vec![],
            fail: true,
        }),
        fetcher: Arc::new(MockFetcher {
            text: "Could not fetch https://acme.com: connection refused",
        }),
        llm: generator.clone(),
        knowledge: knowledge.clone(),
    };
    let pipeline = build_pipeline(&collab, &PipelineConfig::default()).unwrap();

    let record = pipeline
        .run(driver::initial_record(&sender(), &ada()))
        .await
        .unwrap();

    // Both branches still contributed, as placeholders.
    assert_eq!(record.research_snippets.len(), 2);
    assert!(record.research_snippets[0].contains("Web search unavailable"));
    assert!(record.research_snippets[1].contains("Could not fetch"));
    assert!(!record.is_qualified);
}

#[tokio::test]
async fn batch_isolates_a_failing_lead_and_continues() {
    use leadgraph_core::{StepGraph, END, START};
    use prospector::LeadRecord;

    // A pipeline whose only step fails, standing in for an uncaught fault.
    let mut graph: StepGraph<LeadRecord> = StepGraph::new();
    graph
        .add_step("explode", |_record| {
            Box::pin(async move { Err("collaborator meltdown".into()) })
        })
        .unwrap();
    graph.add_edge(START, "explode");
    graph.add_edge("explode", END);
    let pipeline = graph.compile().unwrap();

    let leads = vec![ada(), LeadInput {
        name: "Grace Hopper".to_string(),
        company: "Navy".to_string(),
    }];
    let reports = driver::run_batch(&pipeline, &sender(), &leads).await;

    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert!(!report.is_qualified);
        assert!(report.reason.contains("Pipeline failed"));
        assert_eq!(report.draft_email, "");
    }
}
