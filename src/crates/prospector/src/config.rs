//! Pipeline tuning knobs.

/// Tunable parameters for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Web search results requested per query. Kept low to bound token cost.
    pub search_results: usize,
    /// Character budget for fetched company-site text.
    pub site_char_budget: usize,
    /// Below this many characters of joined research, the gatekeeper
    /// disqualifies without a generation call.
    pub min_research_len: usize,
    /// Review passes before the reviewer force-accepts the draft.
    pub max_iterations: u32,
    /// Sampling temperature for writing (stories, email drafts). Decision
    /// calls always run at temperature 0.
    pub creative_temperature: f32,
    /// Safety cap on total step executions per lead.
    pub step_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_results: 2,
            site_char_budget: 2_000,
            min_research_len: 50,
            max_iterations: 1,
            creative_temperature: 0.7,
            step_limit: 32,
        }
    }
}
