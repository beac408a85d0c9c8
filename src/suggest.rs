//! Example-query suggestions for the search bar.
//!
//! The list is static and lives here; filtering and keyboard navigation
//! over the filtered list are pure state transitions so the whole dropdown
//! behavior is testable without a browser.

use serde::Deserialize;

/// Canned queries shown as suggestions and quick-search chips.
pub const SUGGESTED_QUERIES: &[&str] = &[
    "What are people saying about HyperLiquid's vaults?",
    "HYPE token price sentiment analysis",
    "Any influencer tweets about HyperLiquid recently?",
    "Did anyone mention HYPE token and risk in the same sentence?",
    "Any recent news about HyperLiquid?",
    "How is HyperLiquid's perp volume trending?",
    "What are traders saying about HLP returns?",
    "Airdrop speculation around HYPE",
    "HyperLiquid listing and exchange coverage",
    "Concerns about HyperLiquid validator decentralization",
];

/// The dropdown never shows more than this many matches at once.
pub const MAX_VISIBLE: usize = 8;

/// Case-insensitive substring filter over the candidate list. A candidate
/// equal to the query (ignoring case) is dropped, suggesting what was
/// already typed is useless. Source order is preserved. Empty or
/// whitespace-only queries match nothing.
pub fn filter_suggestions<'a>(candidates: &[&'a str], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    candidates
        .iter()
        .filter(|candidate| {
            let lower = candidate.to_lowercase();
            lower.contains(&needle) && lower != needle
        })
        .copied()
        .collect()
}

/// Navigation keys the dropdown reacts to, as sent by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// What a key press asks the owner to do. `Submit(None)` means submit
/// whatever is typed in the bar, `Submit(Some(s))` means the highlighted
/// suggestion was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAction {
    None,
    Submit(Option<&'static str>),
}

/// Dropdown sub-state: the visible matches and which one is highlighted.
/// `highlighted` is `-1` when no entry is active, so the first Down lands
/// on index 0 and Up from 0 deselects without wrapping.
#[derive(Debug, Clone, Default)]
pub struct SuggestionCursor {
    matches: Vec<&'static str>,
    visible: bool,
    highlighted: isize,
}

impl SuggestionCursor {
    /// Recomputes matches for the current input. Resets the highlight,
    /// a shifted list under a stale index would highlight the wrong entry.
    pub fn refresh(&mut self, query: &str) {
        let mut matches = filter_suggestions(SUGGESTED_QUERIES, query);
        matches.truncate(MAX_VISIBLE);
        self.visible = !matches.is_empty();
        self.highlighted = -1;
        self.matches = matches;
    }

    pub fn hide(&mut self) {
        self.matches.clear();
        self.visible = false;
        self.highlighted = -1;
    }

    pub fn handle_key(&mut self, key: NavKey) -> CursorAction {
        match key {
            NavKey::Down => {
                if self.visible && !self.matches.is_empty() {
                    let last = self.matches.len() as isize - 1;
                    self.highlighted = (self.highlighted + 1).min(last);
                }
                CursorAction::None
            }
            NavKey::Up => {
                if self.visible {
                    self.highlighted = (self.highlighted - 1).max(-1);
                }
                CursorAction::None
            }
            NavKey::Enter => {
                let chosen = self.selected();
                self.hide();
                CursorAction::Submit(chosen)
            }
            NavKey::Escape => {
                self.hide();
                CursorAction::None
            }
        }
    }

    /// The highlighted suggestion, if one is active.
    pub fn selected(&self) -> Option<&'static str> {
        if !self.visible || self.highlighted < 0 {
            return None;
        }
        self.matches.get(self.highlighted as usize).copied()
    }

    pub fn matches(&self) -> &[&'static str] {
        &self.matches
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn highlighted(&self) -> isize {
        self.highlighted
    }
}
