use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::formatter;
use crate::lifecycle::{SearchLifecycle, SearchPhase};
use crate::models::{SearchResponse, SearchResult};
use crate::poller::BackendHealth;
use crate::suggest::NavKey;

#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    pub key: NavKey,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub query: String,
}

/// Read-only view of the session, rendered fresh on every request.
#[derive(Debug, Serialize)]
pub struct SnapshotView {
    pub phase: &'static str,
    pub query: String,
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchView>,
    pub suggestions: SuggestionView,
}

#[derive(Debug, Serialize)]
pub struct SuggestionView {
    pub visible: bool,
    pub highlighted: isize,
    pub entries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub query: String,
    pub execution_time: f64,
    pub total_results: i64,
    pub analysis_html: String,
    pub results: Vec<ResultView>,
    pub performance_metrics: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ResultView {
    pub id: String,
    pub title: String,
    pub source: String,
    pub published_at: String,
    pub url: String,
    pub cohere_score: f64,
    pub relevance_category: String,
    pub days_ago: i64,
    pub content_html: String,
}

impl SnapshotView {
    pub fn capture(lifecycle: &SearchLifecycle) -> SnapshotView {
        let (phase, error, search) = match lifecycle.phase() {
            SearchPhase::Idle => ("idle", None, None),
            SearchPhase::Loading { .. } => ("loading", None, None),
            SearchPhase::Success { response } => {
                ("success", None, Some(SearchView::render(response)))
            }
            SearchPhase::Failed { message } => ("failed", Some(message.clone()), None),
        };
        let cursor = lifecycle.suggestions();
        SnapshotView {
            phase,
            query: lifecycle.query().to_string(),
            generation: lifecycle.generation(),
            elapsed_seconds: lifecycle.elapsed_seconds(),
            error,
            search,
            suggestions: SuggestionView {
                visible: cursor.visible(),
                highlighted: cursor.highlighted(),
                entries: cursor.matches().iter().map(|s| s.to_string()).collect(),
            },
        }
    }
}

impl SearchView {
    /// Formatting happens here, at snapshot time. The page drops the
    /// markup into the panels verbatim.
    fn render(response: &SearchResponse) -> SearchView {
        SearchView {
            query: response.query.clone(),
            execution_time: response.execution_time,
            total_results: response.total_results,
            analysis_html: formatter::format_analysis(&response.ai_analysis),
            results: response.results.iter().map(ResultView::render).collect(),
            performance_metrics: response.performance_metrics.clone(),
        }
    }
}

impl ResultView {
    fn render(result: &SearchResult) -> ResultView {
        ResultView {
            id: result.id.clone(),
            title: result.title.clone(),
            source: result.source.clone(),
            published_at: result.published_at.clone(),
            url: result.url.clone(),
            cohere_score: result.cohere_score,
            relevance_category: result.relevance_category.clone(),
            days_ago: result.days_ago,
            content_html: formatter::format_snippet(&result.content),
        }
    }
}

/// Footer view of the latest health poll.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_ready: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_store_connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_documents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<String>,
}

impl StatusView {
    pub fn from_health(health: &BackendHealth) -> StatusView {
        match health {
            BackendHealth::Unknown => StatusView {
                state: "unknown",
                agent_ready: None,
                vector_store_connected: None,
                total_documents: None,
                message: None,
                checked_at: None,
            },
            BackendHealth::Online { status, checked_at } => StatusView {
                state: if status.is_operational() {
                    "online"
                } else {
                    "degraded"
                },
                agent_ready: Some(status.agent_ready),
                vector_store_connected: Some(status.vector_store_connected),
                total_documents: status.total_documents,
                message: None,
                checked_at: Some(checked_at.to_rfc3339()),
            },
            BackendHealth::Offline {
                message,
                checked_at,
            } => StatusView {
                state: "offline",
                agent_ready: None,
                vector_store_connected: None,
                total_documents: None,
                message: Some(message.clone()),
                checked_at: Some(checked_at.to_rfc3339()),
            },
        }
    }
}
