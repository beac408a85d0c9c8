use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How many sources the agent returns when the caller does not say otherwise.
pub const DEFAULT_TOP_K: u32 = 15;

/// The only output format the front end asks for.
pub const OUTPUT_FORMAT_DETAILED: &str = "detailed";

/// Known keys inside `performance_metrics`. The maps stay untyped; these are
/// just the names the agent is known to emit, for display purposes.
pub mod metrics {
    pub const TOTAL_RESULTS_FOUND: &str = "total_results_found";
    pub const AVERAGE_RELEVANCE_SCORE: &str = "average_relevance_score";
    pub const UNIQUE_SOURCES: &str = "unique_sources";
    pub const DATA_PIPELINE: &str = "data_pipeline";
    pub const SEARCH_METHOD: &str = "search_method";
}

/// Body of `POST /search`. Built fresh per submission, dropped after the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: u32,
    pub output_format: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            output_format: OUTPUT_FORMAT_DETAILED.to_string(),
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> SearchRequest {
        self.top_k = top_k;
        self
    }
}

/// One ranked source document. Rank order is array order in the response,
/// index 0 on top. Read-only on this side of the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub source: String,
    pub published_at: String,
    pub url: String,
    pub content: String,
    pub cohere_score: f64,
    pub relevance_category: String,
    pub days_ago: i64,
}

impl SearchResult {
    pub fn relevance(&self) -> RelevanceCategory {
        RelevanceCategory::parse(&self.relevance_category)
    }
}

/// The agent buckets `cohere_score` into high (>= 0.8), medium (>= 0.5) and
/// low. The string on the wire is authoritative; this enum only drives
/// terminal markers and CSS classes, with a fallback for anything new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceCategory {
    High,
    Medium,
    Low,
    Other,
}

impl RelevanceCategory {
    pub fn parse(raw: &str) -> RelevanceCategory {
        match raw.to_ascii_lowercase().as_str() {
            "high" => RelevanceCategory::High,
            "medium" => RelevanceCategory::Medium,
            "low" => RelevanceCategory::Low,
            _ => RelevanceCategory::Other,
        }
    }

    /// Terminal marker for the one-shot CLI output.
    pub fn marker(&self) -> &'static str {
        match self {
            RelevanceCategory::High => "●●●",
            RelevanceCategory::Medium => "●●○",
            RelevanceCategory::Low => "●○○",
            RelevanceCategory::Other => "○○○",
        }
    }
}

/// Body of a successful `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub timestamp: f64,
    pub execution_time: f64,
    pub total_results: i64,
    pub results: Vec<SearchResult>,
    pub ai_analysis: String,
    #[serde(default)]
    pub performance_metrics: HashMap<String, serde_json::Value>,
}

/// Body of `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub agent_ready: bool,
    pub vector_store_connected: bool,
    #[serde(default)]
    pub total_documents: Option<i64>,
    #[serde(default)]
    pub performance_metrics: HashMap<String, serde_json::Value>,
}

impl StatusResponse {
    /// The agent reports "operational" when both the agent and the vector
    /// store check out, "degraded" otherwise.
    pub fn is_operational(&self) -> bool {
        self.status == "operational"
    }
}
