//! Renders the agent's markdown-flavored analysis text into the HTML the
//! page displays.
//!
//! The agent does not emit real markdown. It emits a narrow dialect: `###`
//! to `#####` headings, `- ` bullets, `N. ` ordered items, `---` rules,
//! `**bold**` spans (some of which are semantic labels like `**Bullish**`
//! or `**High Confidence**`), markdown links, backtick code, `Result #N`
//! references, percent and dollar figures, and two literal section labels
//! (`**Executive Summary:**`, `**Overall Assessment:**`) that open callout
//! boxes. Everything else is plain text.
//!
//! Formatting runs in two passes. A line pass classifies each line into a
//! block (heading, list item, divider, callout opener, paragraph text) and
//! assembles the block structure with balanced tags. An inline pass then
//! rewrites spans inside each block's text through an ordered rule chain.
//! Source text is entity-escaped before either pass, so the only markup in
//! the output is markup generated here.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
static RESULT_REF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Result #(\d+)").unwrap());
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+(?:\.\d+)?%").unwrap());
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\d[\d,]*(?:\.\d+)?[KMB]?").unwrap());
static ORDERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").unwrap());

/// An inline rule rewrites one kind of span inside a single block of
/// already-escaped text. Rules run over a block in a fixed order, each one
/// seeing the previous rule's output, so a span consumed early (a bold
/// label, a link) is never re-matched by a later rule.
pub trait InlineRule: Send + Sync {
    fn apply(&self, text: &str) -> String;
}

/// `**…**` spans. With `badges` on, known labels become semantic badges;
/// anything unrecognized falls back to `<strong>`. The label sets are
/// checked before the fallback, so `**Bullish**` is always a sentiment
/// badge and never a plain bold or a trend marker.
pub struct BoldRule {
    badges: bool,
}

fn badge_for(label: &str) -> Option<String> {
    let markup = match label {
        "High Confidence" | "Medium Confidence" | "Low Confidence" => {
            let level = label.split(' ').next().unwrap_or("").to_ascii_lowercase();
            format!(r#"<span class="badge confidence {}">{}</span>"#, level, label)
        }
        "Bullish" | "Bearish" | "Neutral" => {
            format!(
                r#"<span class="badge sentiment {}">{}</span>"#,
                label.to_ascii_lowercase(),
                label
            )
        }
        "Risk" | "Warning" | "Concern" => {
            format!(r#"<span class="badge risk">⚠ {}</span>"#, label)
        }
        "Opportunity" | "Positive" => {
            format!(r#"<span class="badge trend">▲ {}</span>"#, label)
        }
        _ => return None,
    };
    Some(markup)
}

impl InlineRule for BoldRule {
    fn apply(&self, text: &str) -> String {
        BOLD_RE
            .replace_all(text, |caps: &Captures| {
                let inner = &caps[1];
                if self.badges {
                    if let Some(badge) = badge_for(inner.trim()) {
                        return badge;
                    }
                }
                format!("<strong>{}</strong>", inner)
            })
            .into_owned()
    }
}

/// `[text](url)` links, opened in a new tab with an external-link glyph.
pub struct LinkRule;

impl InlineRule for LinkRule {
    fn apply(&self, text: &str) -> String {
        LINK_RE
            .replace_all(text, |caps: &Captures| {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">{} <span class="ext">↗</span></a>"#,
                    &caps[2], &caps[1]
                )
            })
            .into_owned()
    }
}

/// `Result #N` citations back into the ranked source list.
pub struct ResultRefRule;

impl InlineRule for ResultRefRule {
    fn apply(&self, text: &str) -> String {
        RESULT_REF_RE
            .replace_all(text, r#"<span class="result-ref">Result #$1</span>"#)
            .into_owned()
    }
}

/// Backtick code spans.
pub struct CodeRule;

impl InlineRule for CodeRule {
    fn apply(&self, text: &str) -> String {
        CODE_RE.replace_all(text, "<code>$1</code>").into_owned()
    }
}

/// Percent figures like `12.5%`.
pub struct PercentRule;

impl InlineRule for PercentRule {
    fn apply(&self, text: &str) -> String {
        PERCENT_RE
            .replace_all(text, r#"<span class="num">$0</span>"#)
            .into_owned()
    }
}

/// Dollar figures like `$50,000` or `$1.2M`.
pub struct CurrencyRule;

impl InlineRule for CurrencyRule {
    fn apply(&self, text: &str) -> String {
        CURRENCY_RE
            .replace_all(text, r#"<span class="num">$0</span>"#)
            .into_owned()
    }
}

/// Ordered chain of inline rules applied to each block's text.
pub struct InlinePipeline {
    rules: Vec<Box<dyn InlineRule>>,
}

impl InlinePipeline {
    /// The full chain used for analysis text.
    pub fn analysis() -> InlinePipeline {
        InlinePipeline {
            rules: vec![
                Box::new(BoldRule { badges: true }),
                Box::new(LinkRule),
                Box::new(ResultRefRule),
                Box::new(CodeRule),
                Box::new(PercentRule),
                Box::new(CurrencyRule),
            ],
        }
    }

    /// Result snippets only get plain bold, no badges and no figures.
    pub fn snippet() -> InlinePipeline {
        InlinePipeline {
            rules: vec![Box::new(BoldRule { badges: false })],
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in self.rules.iter() {
            out = rule.apply(&out);
        }
        out
    }
}

static ANALYSIS_INLINE: Lazy<InlinePipeline> = Lazy::new(InlinePipeline::analysis);
static SNIPPET_INLINE: Lazy<InlinePipeline> = Lazy::new(InlinePipeline::snippet);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Callout {
    ExecutiveSummary,
    OverallAssessment,
}

impl Callout {
    fn class(&self) -> &'static str {
        match self {
            Callout::ExecutiveSummary => "exec",
            Callout::OverallAssessment => "assess",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Callout::ExecutiveSummary => "Executive Summary",
            Callout::OverallAssessment => "Overall Assessment",
        }
    }
}

/// What a single source line is, decided before any inline rewriting.
/// Markers only count at the start of the line, mid-line `###` or `- ` is
/// plain text.
enum Line<'a> {
    Heading3(&'a str),
    Heading4(&'a str),
    Heading5(&'a str),
    Ordered(&'a str, &'a str),
    Bullet(&'a str),
    Divider,
    Section(Callout, &'a str),
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed == "---" {
        return Line::Divider;
    }
    // longest heading marker first, "##### x" must not read as "### # x"
    if let Some(rest) = line.strip_prefix("##### ") {
        return Line::Heading5(rest);
    }
    if let Some(rest) = line.strip_prefix("#### ") {
        return Line::Heading4(rest);
    }
    if let Some(rest) = line.strip_prefix("### ") {
        return Line::Heading3(rest);
    }
    if let Some(rest) = line.strip_prefix("**Executive Summary:**") {
        return Line::Section(Callout::ExecutiveSummary, rest.trim_start());
    }
    if let Some(rest) = line.strip_prefix("**Overall Assessment:**") {
        return Line::Section(Callout::OverallAssessment, rest.trim_start());
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return Line::Bullet(rest);
    }
    if let Some(caps) = ORDERED_RE.captures(line) {
        if let (Some(num), Some(text)) = (caps.get(1), caps.get(2)) {
            return Line::Ordered(num.as_str(), text.as_str());
        }
    }
    Line::Text(line)
}

fn flush_paragraph(blocks: &mut String, paragraph: &mut Vec<String>) {
    if paragraph.is_empty() {
        return;
    }
    blocks.push_str("<p>");
    blocks.push_str(&paragraph.join("<br>"));
    blocks.push_str("</p>");
    paragraph.clear();
}

fn close_callout(blocks: &mut String, open: &mut bool) {
    if *open {
        blocks.push_str("</div>");
        *open = false;
    }
}

/// Renders a full analysis document. Empty input renders to the empty
/// string; anything else comes back wrapped in `<div class="analysis">`.
///
/// A callout opened by a section label swallows everything up to the next
/// `###` heading, the next section label, or the end of input, and is
/// always closed. Sub-headings and lists inside that span stay inside the
/// callout.
pub fn format_analysis(text: &str) -> String {
    let escaped = escape_html(text);
    let mut blocks = String::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut open_callout = false;

    for line in escaped.lines() {
        match classify(line) {
            Line::Blank => flush_paragraph(&mut blocks, &mut paragraph),
            Line::Text(text) => paragraph.push(ANALYSIS_INLINE.apply(text)),
            Line::Heading3(text) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                close_callout(&mut blocks, &mut open_callout);
                blocks.push_str(&format!(
                    r#"<h3><span class="h-icon">◆</span> {}</h3>"#,
                    ANALYSIS_INLINE.apply(text)
                ));
            }
            Line::Heading4(text) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push_str(&format!("<h4>{}</h4>", ANALYSIS_INLINE.apply(text)));
            }
            Line::Heading5(text) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push_str(&format!("<h5>{}</h5>", ANALYSIS_INLINE.apply(text)));
            }
            Line::Ordered(num, text) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push_str(&format!(
                    r#"<div class="list-item"><span class="list-num">{}</span><span>{}</span></div>"#,
                    num,
                    ANALYSIS_INLINE.apply(text)
                ));
            }
            Line::Bullet(text) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push_str(&format!(
                    r#"<div class="list-item"><span class="list-dot">•</span><span>{}</span></div>"#,
                    ANALYSIS_INLINE.apply(text)
                ));
            }
            Line::Divider => {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push_str("<hr>");
            }
            Line::Section(callout, rest) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                close_callout(&mut blocks, &mut open_callout);
                blocks.push_str(&format!(
                    r#"<div class="callout {}"><div class="callout-title">{}</div>"#,
                    callout.class(),
                    callout.title()
                ));
                open_callout = true;
                if !rest.is_empty() {
                    paragraph.push(ANALYSIS_INLINE.apply(rest));
                }
            }
        }
    }
    flush_paragraph(&mut blocks, &mut paragraph);
    close_callout(&mut blocks, &mut open_callout);

    if blocks.is_empty() {
        return String::new();
    }
    format!(r#"<div class="analysis">{}</div>"#, blocks)
}

/// Renders a result-card content preview. Much narrower dialect than the
/// analysis: bold spans without badge dispatch, `- ` bullet lines, and
/// newlines as `<br>`. No outer wrapper.
pub fn format_snippet(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let escaped = escape_html(text);
    let rendered: Vec<String> = escaped
        .lines()
        .map(|line| match line.strip_prefix("- ") {
            Some(rest) => format!(
                r#"<div class="list-item"><span class="list-dot">•</span><span>{}</span></div>"#,
                SNIPPET_INLINE.apply(rest)
            ),
            None => SNIPPET_INLINE.apply(line),
        })
        .collect();
    rendered.join("<br>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(format_analysis(""), "");
        assert_eq!(format_snippet(""), "");
    }

    #[test]
    fn test_blank_lines_only_stay_empty() {
        assert_eq!(format_analysis("\n\n   \n"), "");
    }

    #[test]
    fn test_plain_paragraph() {
        assert_eq!(
            format_analysis("hello world"),
            r#"<div class="analysis"><p>hello world</p></div>"#
        );
    }

    #[test]
    fn test_badge_for_labels() {
        assert_eq!(
            badge_for("High Confidence").as_deref(),
            Some(r#"<span class="badge confidence high">High Confidence</span>"#)
        );
        assert_eq!(
            badge_for("Bearish").as_deref(),
            Some(r#"<span class="badge sentiment bearish">Bearish</span>"#)
        );
        assert_eq!(
            badge_for("Warning").as_deref(),
            Some(r#"<span class="badge risk">⚠ Warning</span>"#)
        );
        assert_eq!(
            badge_for("Positive").as_deref(),
            Some(r#"<span class="badge trend">▲ Positive</span>"#)
        );
        assert_eq!(badge_for("Something Else"), None);
    }

    #[test]
    fn test_snippet_bold_never_badges() {
        let html = format_snippet("**Bullish** momentum");
        assert_eq!(html, "<strong>Bullish</strong> momentum");
    }

    #[test]
    fn test_snippet_bullets_and_breaks() {
        let html = format_snippet("intro\n- first\n- second");
        assert!(html.starts_with("intro<br>"));
        assert!(html.contains(r#"<span class="list-dot">•</span><span>first</span>"#));
        assert!(html.contains(r#"<span>second</span>"#));
    }

    #[test]
    fn test_inline_number_tokens() {
        let html = format_analysis("up 12.5% to $1.2M on $50,000 volume");
        assert!(html.contains(r#"<span class="num">12.5%</span>"#));
        assert!(html.contains(r#"<span class="num">$1.2M</span>"#));
        assert!(html.contains(r#"<span class="num">$50,000</span>"#));
    }

    #[test]
    fn test_result_reference_and_code() {
        let html = format_analysis("see Result #7 and `HYPE/USDC`");
        assert!(html.contains(r#"<span class="result-ref">Result #7</span>"#));
        assert!(html.contains("<code>HYPE/USDC</code>"));
    }

    #[test]
    fn test_mid_line_marker_is_plain_text() {
        let html = format_analysis("not a ### heading here");
        assert!(html.contains("<p>not a ### heading here</p>"));
        assert!(!html.contains("<h3>"));
    }

    #[test]
    fn test_heading_marker_order() {
        let html = format_analysis("##### deep\n#### mid\n### top");
        assert!(html.contains("<h5>deep</h5>"));
        assert!(html.contains("<h4>mid</h4>"));
        assert!(html.contains(r#"<h3><span class="h-icon">◆</span> top</h3>"#));
    }
}
