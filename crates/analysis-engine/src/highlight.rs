//! Risk highlighting of the analyzed document
//!
//! Produces an HTML view of the source text in which each Medium or High
//! clause quote is wrapped in a styled span carrying the model's explanation
//! as hover text. Matching is exact and literal: a paraphrased quote simply
//! produces no highlight.
//!
//! Spans are located in the plain source text, never in generated markup.
//! Clauses claim spans in input order and a span overlapping one already
//! claimed is dropped, so the first clause wins on overlapping text.

use sentinel_types::{Clause, RiskLevel};

/// Quotes shorter than this are too ambiguous to highlight
pub const MIN_QUOTE_CHARS: usize = 10;

const LINE_BREAK: &str = "<br>";

const CONTAINER_STYLE: &str = "font-family: 'Arial', sans-serif; font-size: 14px; \
    line-height: 1.6; background-color: #f9f9f9; padding: 20px; border-radius: 10px; \
    border: 1px solid #ddd; height: 600px; overflow-y: scroll;";

/// Background and underline colors for a flagged level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyle {
    pub class: &'static str,
    pub background: &'static str,
    pub border: &'static str,
}

pub const HIGH_STYLE: HighlightStyle = HighlightStyle {
    class: "risk-high",
    background: "#ffcdd2",
    border: "2px solid #e53935",
};

pub const MEDIUM_STYLE: HighlightStyle = HighlightStyle {
    class: "risk-medium",
    background: "#ffe0b2",
    border: "2px solid #fb8c00",
};

impl HighlightStyle {
    /// `None` for levels that are not highlighted
    pub fn for_level(level: RiskLevel) -> Option<Self> {
        match level {
            RiskLevel::High => Some(HIGH_STYLE),
            RiskLevel::Medium => Some(MEDIUM_STYLE),
            RiskLevel::Low => None,
        }
    }
}

/// A claimed byte range of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    /// Index into the clause list
    pub clause: usize,
}

impl HighlightSpan {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Locate every highlightable quote occurrence, sorted by position
pub fn find_highlight_spans(full_text: &str, clauses: &[Clause]) -> Vec<HighlightSpan> {
    let mut spans: Vec<HighlightSpan> = Vec::new();

    for (index, clause) in clauses.iter().enumerate() {
        if !clause.risk_level.is_flagged() {
            continue;
        }
        let quote = clause.original_text.trim();
        if quote.chars().count() < MIN_QUOTE_CHARS {
            continue;
        }

        let mut matched = 0usize;
        for (start, found) in full_text.match_indices(quote) {
            let end = start + found.len();
            if spans.iter().any(|s| s.overlaps(start, end)) {
                continue;
            }
            spans.push(HighlightSpan {
                start,
                end,
                clause: index,
            });
            matched += 1;
        }

        if matched == 0 {
            tracing::debug!(clause = %clause.title, "Clause quote not found in source text");
        }
    }

    spans.sort_by_key(|s| s.start);
    spans
}

/// Render the source text as HTML with risky clauses highlighted
pub fn highlight(full_text: &str, clauses: &[Clause]) -> String {
    let spans = find_highlight_spans(full_text, clauses);

    let mut body = String::with_capacity(full_text.len() + spans.len() * 160);
    let mut cursor = 0;
    for span in &spans {
        push_text(&mut body, &full_text[cursor..span.start]);

        let clause = &clauses[span.clause];
        if let Some(style) = HighlightStyle::for_level(clause.risk_level) {
            body.push_str(&format!(
                "<span class=\"{}\" style=\"background-color: {}; border-bottom: {}; cursor: help;\" title=\"{}\">",
                style.class,
                style.background,
                style.border,
                escape_html(&clause.explanation)
            ));
            push_text(&mut body, &full_text[span.start..span.end]);
            body.push_str("</span>");
        } else {
            push_text(&mut body, &full_text[span.start..span.end]);
        }
        cursor = span.end;
    }
    push_text(&mut body, &full_text[cursor..]);

    format!("<div style=\"{}\">{}</div>", CONTAINER_STYLE, body)
}

/// Escape a text segment and turn line breaks into explicit markers
fn push_text(out: &mut String, segment: &str) {
    for (i, line) in segment.split('\n').enumerate() {
        if i > 0 {
            out.push_str(LINE_BREAK);
        }
        out.push_str(&escape_html(line.trim_end_matches('\r')));
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
