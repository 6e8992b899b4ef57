//! Researcher steps: news search and company-site fetch.
//!
//! Both run in the same fan-out wave and append into the record's research
//! collection. Neither aborts the run: a failed search or fetch degrades to
//! one explanatory placeholder snippet, and the gatekeeper judges whatever
//! text ends up in the record.

use std::sync::Arc;

use tooling::{PageFetcher, SearchProvider};
use tracing::warn;

use crate::record::{LeadRecord, RecordUpdate};
use crate::steps::StepResult;

/// Searches the open web for recent news about the lead and their company.
pub struct NewsResearcher {
    search: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl NewsResearcher {
    pub fn new(search: Arc<dyn SearchProvider>, max_results: usize) -> Self {
        Self {
            search,
            max_results,
        }
    }

    pub async fn run(&self, record: LeadRecord) -> StepResult {
        let query = format!(
            "{} {} recent news funding product launches",
            record.lead_name, record.company
        );

        let snippets = match self.search.search(&query, self.max_results).await {
            Ok(hits) => {
                let found: Vec<String> = hits
                    .into_iter()
                    .map(|hit| hit.content)
                    .filter(|content| !content.trim().is_empty())
                    .collect();
                if found.is_empty() {
                    vec![format!("No recent news found for {}.", record.company)]
                } else {
                    found
                }
            }
            Err(e) => {
                warn!(company = %record.company, error = %e, "news search failed");
                vec![format!("Web search unavailable: {e}")]
            }
        };

        Ok(RecordUpdate {
            research_snippets: snippets,
            ..Default::default()
        })
    }
}

/// Fetches the company's likely website and appends its cleaned text.
pub struct SiteResearcher {
    fetcher: Arc<dyn PageFetcher>,
    char_budget: usize,
}

impl SiteResearcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, char_budget: usize) -> Self {
        Self {
            fetcher,
            char_budget,
        }
    }

    pub async fn run(&self, record: LeadRecord) -> StepResult {
        let url = company_site_url(&record.company);
        // The fetcher reports failures in-band, so this snippet is always text.
        let text = self.fetcher.fetch(&url, self.char_budget).await;

        Ok(RecordUpdate {
            research_snippets: vec![format!("Company site ({url}): {text}")],
            ..Default::default()
        })
    }
}

/// Guess the company website from its name: `"Acme Corp"` → `https://acmecorp.com`.
pub fn company_site_url(company: &str) -> String {
    let slug: String = company
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if slug.is_empty() {
        // Nonsense name; let the fetcher report the failure in-band.
        "https://example.invalid".to_string()
    } else {
        format!("https://{slug}.com")
    }
}
