use lookout::error::ClientError;
use lookout::lifecycle::{KeyOutcome, SearchLifecycle, SearchPhase};
use lookout::models::{SearchResponse, SearchResult};
use lookout::suggest::{MAX_VISIBLE, NavKey};

mod test_helpers {
    use super::*;

    pub fn mk_result(id: &str, content: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: format!("Post {}", id),
            source: "twitter".to_string(),
            published_at: "2025-11-02T10:30:00Z".to_string(),
            url: format!("https://x.com/i/status/{}", id),
            content: content.to_string(),
            cohere_score: 0.91,
            relevance_category: "high".to_string(),
            days_ago: 3,
        }
    }

    pub fn mk_response(query: &str) -> SearchResponse {
        SearchResponse {
            query: query.to_string(),
            timestamp: 1_700_000_000.0,
            execution_time: 2.4,
            total_results: 1,
            results: vec![mk_result("1", "vault inflows keep climbing")],
            ai_analysis: "### Overview\n**Bullish** tone".to_string(),
            performance_metrics: Default::default(),
        }
    }

    pub fn failed(message: &str) -> ClientError {
        ClientError::RequestFailed {
            message: message.to_string(),
        }
    }
}

use test_helpers::*;

#[test]
fn test_fresh_session_is_idle() {
    let lc = SearchLifecycle::new();
    assert!(matches!(lc.phase(), SearchPhase::Idle));
    assert_eq!(lc.query(), "");
    assert_eq!(lc.generation(), 0);
    assert!(lc.elapsed_seconds().is_none());
    assert!(!lc.suggestions().visible());
}

#[test]
fn test_typing_shows_matching_suggestions() {
    let mut lc = SearchLifecycle::new();
    lc.input("vaults");
    assert!(lc.suggestions().visible());
    assert!(!lc.suggestions().matches().is_empty());
    assert_eq!(lc.suggestions().highlighted(), -1);
}

#[test]
fn test_dropdown_caps_at_max_visible() {
    let mut lc = SearchLifecycle::new();
    // "hype" is a substring of "HyperLiquid" too, so it matches almost
    // the whole list and has to be cut off
    lc.input("hype");
    assert_eq!(lc.suggestions().matches().len(), MAX_VISIBLE);
}

#[test]
fn test_no_matches_keeps_dropdown_hidden() {
    let mut lc = SearchLifecycle::new();
    lc.input("zzz nothing matches this");
    assert!(!lc.suggestions().visible());
}

#[test]
fn test_submit_hides_dropdown_and_discards_previous_outcome() {
    let mut lc = SearchLifecycle::new();
    let first = lc.submit_query("vault chatter").unwrap();
    assert!(lc.complete(first.generation, Ok(mk_response("vault chatter"))));
    assert!(lc.response().is_some());

    lc.input("airdrop");
    assert!(lc.suggestions().visible());
    let second = lc.submit().unwrap();
    assert!(lc.is_loading(), "resubmission must re-enter loading");
    assert!(
        lc.response().is_none(),
        "previous results must be cleared on resubmit"
    );
    assert!(!lc.suggestions().visible());
    assert_eq!(second.generation, first.generation + 1);
}

#[test]
fn test_resubmit_after_failure() {
    let mut lc = SearchLifecycle::new();
    let first = lc.submit_query("vaults").unwrap();
    assert!(lc.complete(first.generation, Err(failed("HTTP 503 Service Unavailable: down"))));
    assert!(lc.error_message().is_some());

    let second = lc.submit_query("vaults again").unwrap();
    assert!(lc.is_loading());
    assert!(lc.error_message().is_none(), "old error must be cleared");
    assert!(lc.complete(second.generation, Ok(mk_response("vaults again"))));
    assert_eq!(lc.response().unwrap().query, "vaults again");
}

#[test]
fn test_stale_outcome_is_dropped_in_both_arrival_orders() {
    // order 1: stale arrives first
    let mut lc = SearchLifecycle::new();
    let a = lc.submit_query("query a").unwrap();
    let b = lc.submit_query("query b").unwrap();
    assert!(!lc.complete(a.generation, Ok(mk_response("query a"))));
    assert!(lc.is_loading(), "stale outcome must not leave loading");
    assert!(lc.complete(b.generation, Ok(mk_response("query b"))));
    assert_eq!(lc.response().unwrap().query, "query b");

    // order 2: current arrives first, stale after
    let mut lc = SearchLifecycle::new();
    let a = lc.submit_query("query a").unwrap();
    let b = lc.submit_query("query b").unwrap();
    assert!(lc.complete(b.generation, Ok(mk_response("query b"))));
    assert!(!lc.complete(a.generation, Err(failed("too late"))));
    assert_eq!(
        lc.response().unwrap().query,
        "query b",
        "late stale failure must not overwrite the landed response"
    );
}

#[test]
fn test_complete_without_submission_is_ignored() {
    let mut lc = SearchLifecycle::new();
    assert!(!lc.complete(1, Ok(mk_response("phantom"))));
    assert!(matches!(lc.phase(), SearchPhase::Idle));
}

#[test]
fn test_elapsed_is_one_decimal_while_loading() {
    let mut lc = SearchLifecycle::new();
    lc.submit_query("vaults").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(250));
    let elapsed = lc.elapsed_seconds().unwrap();
    assert!(elapsed >= 0.2, "expected at least 0.2s, got {}", elapsed);
    let rounded = (elapsed * 10.0).round() / 10.0;
    assert_eq!(elapsed, rounded, "elapsed must carry one decimal only");
}

#[test]
fn test_enter_on_highlighted_suggestion_submits_it() {
    let mut lc = SearchLifecycle::new();
    lc.input("HyperLiquid");
    let second = lc.suggestions().matches()[1];
    lc.handle_key(NavKey::Down);
    lc.handle_key(NavKey::Down);
    match lc.handle_key(NavKey::Enter) {
        KeyOutcome::Submit(ticket) => {
            assert_eq!(ticket.query, second);
            assert_eq!(lc.query(), second, "accepted suggestion must replace the query");
        }
        KeyOutcome::None => panic!("enter on a highlighted suggestion must submit"),
    }
    assert!(lc.is_loading());
    assert!(!lc.suggestions().visible());
}

#[test]
fn test_enter_without_highlight_submits_typed_query() {
    let mut lc = SearchLifecycle::new();
    lc.input("HyperLiquid");
    assert!(lc.suggestions().visible());
    match lc.handle_key(NavKey::Enter) {
        KeyOutcome::Submit(ticket) => assert_eq!(ticket.query, "HyperLiquid"),
        KeyOutcome::None => panic!("enter must submit the typed query"),
    }
}

#[test]
fn test_enter_with_blank_query_is_noop() {
    let mut lc = SearchLifecycle::new();
    lc.input("   ");
    assert_eq!(lc.handle_key(NavKey::Enter), KeyOutcome::None);
    assert!(matches!(lc.phase(), SearchPhase::Idle));
    assert_eq!(lc.generation(), 0);
}

#[test]
fn test_escape_hides_dropdown_without_submitting() {
    let mut lc = SearchLifecycle::new();
    lc.input("vaults");
    lc.handle_key(NavKey::Down);
    assert_eq!(lc.handle_key(NavKey::Escape), KeyOutcome::None);
    assert!(!lc.suggestions().visible());
    assert!(matches!(lc.phase(), SearchPhase::Idle));
}

#[test]
fn test_arrow_keys_clamp_at_both_ends() {
    let mut lc = SearchLifecycle::new();
    lc.input("hype");
    let last = lc.suggestions().matches().len() as isize - 1;
    for _ in 0..30 {
        lc.handle_key(NavKey::Down);
    }
    assert_eq!(lc.suggestions().highlighted(), last);
    for _ in 0..30 {
        lc.handle_key(NavKey::Up);
    }
    assert_eq!(lc.suggestions().highlighted(), -1);
}

#[test]
fn test_typing_while_loading_keeps_dropdown_hidden() {
    let mut lc = SearchLifecycle::new();
    let ticket = lc.submit_query("vaults").unwrap();
    lc.input("vault strategies");
    assert!(!lc.suggestions().visible());
    assert_eq!(lc.query(), "vault strategies");

    // once the search lands, typing brings suggestions back
    assert!(lc.complete(ticket.generation, Ok(mk_response("vaults"))));
    lc.input("vault");
    assert!(lc.suggestions().visible());
}
