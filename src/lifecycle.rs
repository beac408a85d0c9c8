//! The search session state machine.
//!
//! One controller owns the whole session: the typed query, the suggestion
//! dropdown, and the phase of the in-flight search. The presentation layer
//! never mutates any of this directly. It feeds events in (`input`,
//! `submit`, `handle_key`) and renders read-only snapshots back out.
//!
//! The controller does no I/O itself. `submit` hands back a
//! [`SubmitTicket`] naming the query and a generation number; whoever runs
//! the actual HTTP call reports back through [`complete`] with that
//! generation, and anything stale is dropped. That makes overlapping
//! submissions deterministic: the last submission wins, regardless of the
//! order responses arrive in.
//!
//! [`complete`]: SearchLifecycle::complete

use std::time::Instant;

use crate::error::ClientError;
use crate::models::SearchResponse;
use crate::suggest::{CursorAction, NavKey, SuggestionCursor};

/// Where the current search stands.
#[derive(Debug, Clone)]
pub enum SearchPhase {
    Idle,
    Loading { started: Instant, generation: u64 },
    Success { response: SearchResponse },
    Failed { message: String },
}

/// A submission accepted by [`SearchLifecycle::submit`]. The caller runs
/// the search for `query` and reports back with the same `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub query: String,
    pub generation: u64,
}

/// What a navigation key press amounted to at the session level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    None,
    Submit(SubmitTicket),
}

pub struct SearchLifecycle {
    query: String,
    phase: SearchPhase,
    generation: u64,
    suggestions: SuggestionCursor,
}

impl Default for SearchLifecycle {
    fn default() -> SearchLifecycle {
        SearchLifecycle {
            query: String::new(),
            phase: SearchPhase::Idle,
            generation: 0,
            suggestions: SuggestionCursor::default(),
        }
    }
}

impl SearchLifecycle {
    pub fn new() -> SearchLifecycle {
        SearchLifecycle::default()
    }

    /// The user typed. Updates the query and recomputes the dropdown,
    /// except while a search is loading, when the dropdown stays hidden.
    pub fn input(&mut self, text: &str) {
        self.query = text.to_string();
        if self.is_loading() {
            self.suggestions.hide();
        } else {
            self.suggestions.refresh(text);
        }
    }

    /// Submits the current query. Whitespace-only queries are a no-op.
    ///
    /// Entry actions of Loading: previous results or error are discarded,
    /// the dropdown hides, the start instant is recorded, and the
    /// generation counter bumps so responses to older submissions can be
    /// told apart from this one.
    pub fn submit(&mut self) -> Option<SubmitTicket> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            return None;
        }
        let query = trimmed.to_string();
        self.generation += 1;
        self.suggestions.hide();
        self.phase = SearchPhase::Loading {
            started: Instant::now(),
            generation: self.generation,
        };
        Some(SubmitTicket {
            query,
            generation: self.generation,
        })
    }

    /// Sets the query and submits in one step (chip clicks, suggestion
    /// clicks). A blank text leaves the session untouched.
    pub fn submit_query(&mut self, text: &str) -> Option<SubmitTicket> {
        if text.trim().is_empty() {
            return None;
        }
        self.query = text.to_string();
        self.submit()
    }

    /// A finished search reports back. Returns false when the outcome was
    /// dropped: either its generation is not the one in flight (a newer
    /// submission superseded it) or no search is loading at all.
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<SearchResponse, ClientError>,
    ) -> bool {
        match &self.phase {
            SearchPhase::Loading {
                generation: active, ..
            } if *active == generation => {}
            _ => return false,
        }
        self.phase = match outcome {
            Ok(response) => SearchPhase::Success { response },
            Err(err) => SearchPhase::Failed {
                message: err.to_string(),
            },
        };
        true
    }

    /// Routes a navigation key through the dropdown. Enter comes back as a
    /// submission: of the highlighted suggestion when one is active,
    /// otherwise of whatever is typed.
    pub fn handle_key(&mut self, key: NavKey) -> KeyOutcome {
        match self.suggestions.handle_key(key) {
            CursorAction::None => KeyOutcome::None,
            CursorAction::Submit(chosen) => {
                if let Some(choice) = chosen {
                    self.query = choice.to_string();
                }
                match self.submit() {
                    Some(ticket) => KeyOutcome::Submit(ticket),
                    None => KeyOutcome::None,
                }
            }
        }
    }

    /// Seconds since the in-flight search started, to one decimal.
    /// `None` outside of Loading.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        match &self.phase {
            SearchPhase::Loading { started, .. } => {
                let secs = started.elapsed().as_secs_f64();
                Some((secs * 10.0).round() / 10.0)
            }
            _ => None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn suggestions(&self) -> &SuggestionCursor {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading { .. })
    }

    pub fn response(&self) -> Option<&SearchResponse> {
        match &self.phase {
            SearchPhase::Success { response } => Some(response),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            SearchPhase::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_response(query: &str) -> SearchResponse {
        SearchResponse {
            query: query.to_string(),
            timestamp: 1_700_000_000.0,
            execution_time: 0.42,
            total_results: 0,
            results: vec![],
            ai_analysis: String::new(),
            performance_metrics: Default::default(),
        }
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let mut lc = SearchLifecycle::new();
        lc.input("   ");
        assert!(lc.submit().is_none());
        assert!(matches!(lc.phase(), SearchPhase::Idle));
        assert_eq!(lc.generation(), 0);
    }

    #[test]
    fn test_submit_enters_loading_with_ticket() {
        let mut lc = SearchLifecycle::new();
        lc.input("HYPE sentiment");
        let ticket = lc.submit().unwrap();
        assert_eq!(ticket.query, "HYPE sentiment");
        assert_eq!(ticket.generation, 1);
        assert!(lc.is_loading());
        assert!(!lc.suggestions().visible());
        assert!(lc.elapsed_seconds().is_some());
    }

    #[test]
    fn test_submit_trims_query_for_ticket() {
        let mut lc = SearchLifecycle::new();
        lc.input("  vaults  ");
        let ticket = lc.submit().unwrap();
        assert_eq!(ticket.query, "vaults");
        assert_eq!(lc.query(), "  vaults  ");
    }

    #[test]
    fn test_complete_success() {
        let mut lc = SearchLifecycle::new();
        let ticket = lc.submit_query("vaults").unwrap();
        assert!(lc.complete(ticket.generation, Ok(mk_response("vaults"))));
        assert_eq!(lc.response().unwrap().query, "vaults");
        assert!(lc.elapsed_seconds().is_none());
    }

    #[test]
    fn test_complete_failure_stores_message() {
        let mut lc = SearchLifecycle::new();
        let ticket = lc.submit_query("vaults").unwrap();
        let err = ClientError::RequestFailed {
            message: "HTTP 500 Internal Server Error: boom".to_string(),
        };
        assert!(lc.complete(ticket.generation, Err(err)));
        assert_eq!(
            lc.error_message(),
            Some("HTTP 500 Internal Server Error: boom")
        );
        assert!(lc.response().is_none());
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut lc = SearchLifecycle::new();
        let first = lc.submit_query("vaults").unwrap();
        let second = lc.submit_query("airdrop").unwrap();
        assert!(!lc.complete(first.generation, Ok(mk_response("vaults"))));
        assert!(lc.is_loading());
        assert!(lc.complete(second.generation, Ok(mk_response("airdrop"))));
        assert_eq!(lc.response().unwrap().query, "airdrop");
    }

    #[test]
    fn test_double_complete_is_dropped() {
        let mut lc = SearchLifecycle::new();
        let ticket = lc.submit_query("vaults").unwrap();
        assert!(lc.complete(ticket.generation, Ok(mk_response("vaults"))));
        assert!(!lc.complete(ticket.generation, Ok(mk_response("vaults"))));
    }

    #[test]
    fn test_input_while_loading_keeps_dropdown_hidden() {
        let mut lc = SearchLifecycle::new();
        lc.submit_query("vaults").unwrap();
        lc.input("vaults and more");
        assert!(!lc.suggestions().visible());
    }
}
