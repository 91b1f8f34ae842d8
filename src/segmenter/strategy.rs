use once_cell::sync::Lazy;
use regex::Regex;

use super::patterns::{Convention, MatchReport};
use crate::config::SegmenterConfig;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph break pattern"));
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\n\s*").expect("valid line break pattern"));

/// One way of cutting recipe text into steps.
///
/// A segmenter holds an ordered chain of strategies and uses the first one
/// that accepts the scanned text.
pub trait SplitStrategy: Send + Sync {
    /// Short name used in logs and tests (e.g. "dot", "paragraphs")
    fn name(&self) -> &str;

    /// Whether this strategy should handle text with the given markers
    fn accepts(&self, report: &MatchReport) -> bool;

    /// Split already-trimmed `text` into trimmed, non-blank instructions
    fn split(&self, text: &str, report: &MatchReport) -> Vec<String>;
}

/// Split on the markers of one convention once enough of them are present.
#[derive(Debug, Clone)]
pub struct PatternStrategy {
    convention: Convention,
    min_matches: usize,
    preamble_min_tokens: usize,
}

impl PatternStrategy {
    pub fn new(convention: Convention, min_matches: usize, preamble_min_tokens: usize) -> Self {
        Self {
            convention,
            min_matches,
            preamble_min_tokens,
        }
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn min_matches(&self) -> usize {
        self.min_matches
    }
}

impl SplitStrategy for PatternStrategy {
    fn name(&self) -> &str {
        self.convention.as_str()
    }

    fn accepts(&self, report: &MatchReport) -> bool {
        report.count(self.convention) >= self.min_matches
    }

    fn split(&self, text: &str, report: &MatchReport) -> Vec<String> {
        let spans = report.spans(self.convention);
        let Some(first) = spans.first() else {
            let whole = text.trim();
            return if whole.is_empty() {
                Vec::new()
            } else {
                vec![whole.to_string()]
            };
        };

        let mut steps = Vec::with_capacity(spans.len() + 1);

        // Short text before the first marker is usually a title or header
        let preamble = text[..first.start].trim();
        if !preamble.is_empty() && preamble.split_whitespace().count() > self.preamble_min_tokens {
            steps.push(preamble.to_string());
        }

        for (i, span) in spans.iter().enumerate() {
            let next_start = spans.get(i + 1).map_or(text.len(), |next| next.start);
            let content = text[span.end..next_start].trim();
            if !content.is_empty() {
                steps.push(content.to_string());
            }
        }

        steps
    }
}

/// Fallback: one step per blank-line separated paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphStrategy;

impl SplitStrategy for ParagraphStrategy {
    fn name(&self) -> &str {
        "paragraphs"
    }

    fn accepts(&self, _report: &MatchReport) -> bool {
        true
    }

    fn split(&self, text: &str, _report: &MatchReport) -> Vec<String> {
        PARAGRAPH_BREAK
            .split(text)
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(|paragraph| LINE_BREAK.replace_all(paragraph, " ").trim().to_string())
            .collect()
    }
}

/// The strategy chain in tie-break order.
///
/// Repeated markers win over a lone marker, and among repeated markers
/// dot beats paren beats step-colon beats step-dash. A single dot or
/// step-colon marker is still used before giving up on numbering.
pub fn default_chain(config: &SegmenterConfig) -> Vec<Box<dyn SplitStrategy>> {
    let confident = config.confident_matches;
    let tentative = config.tentative_matches;
    let preamble = config.preamble_min_tokens;

    vec![
        Box::new(PatternStrategy::new(Convention::Dot, confident, preamble)),
        Box::new(PatternStrategy::new(Convention::Paren, confident, preamble)),
        Box::new(PatternStrategy::new(Convention::StepColon, confident, preamble)),
        Box::new(PatternStrategy::new(Convention::StepDash, confident, preamble)),
        Box::new(PatternStrategy::new(Convention::Dot, tentative, preamble)),
        Box::new(PatternStrategy::new(Convention::StepColon, tentative, preamble)),
        Box::new(ParagraphStrategy),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_with(strategy: &dyn SplitStrategy, text: &str) -> Vec<String> {
        let report = MatchReport::scan(text);
        strategy.split(text, &report)
    }

    fn dot() -> PatternStrategy {
        PatternStrategy::new(Convention::Dot, 2, 3)
    }

    #[test]
    fn test_pattern_split_strips_markers() {
        let steps = split_with(&dot(), "1. Preheat oven\n2. Mix flour\n3. Bake");
        assert_eq!(steps, vec!["Preheat oven", "Mix flour", "Bake"]);
    }

    #[test]
    fn test_short_preamble_is_dropped() {
        let steps = split_with(&dot(), "Easy Banana Bread\n1. Mash\n2. Bake");
        assert_eq!(steps, vec!["Mash", "Bake"]);
    }

    #[test]
    fn test_preamble_one_token_over_threshold_is_kept() {
        let steps = split_with(&dot(), "My easy banana bread\n1. Mash\n2. Bake");
        assert_eq!(steps, vec!["My easy banana bread", "Mash", "Bake"]);
    }

    #[test]
    fn test_long_preamble_is_kept() {
        let text = "Before anything else, wash your hands\n1. Mash\n2. Bake";
        let steps = split_with(&dot(), text);
        assert_eq!(
            steps,
            vec!["Before anything else, wash your hands", "Mash", "Bake"]
        );
    }

    #[test]
    fn test_preamble_threshold_is_configurable() {
        let strict = PatternStrategy::new(Convention::Dot, 2, 0);
        let steps = split_with(&strict, "Banana\n1. Mash\n2. Bake");
        assert_eq!(steps, vec!["Banana", "Mash", "Bake"]);
    }

    #[test]
    fn test_blank_step_content_is_skipped() {
        let steps = split_with(&dot(), "1. Mash\n2. Bake\n3.");
        assert_eq!(steps, vec!["Mash", "Bake"]);
    }

    #[test]
    fn test_pattern_split_without_markers_returns_whole_text() {
        let strategy = PatternStrategy::new(Convention::Paren, 2, 3);
        let steps = split_with(&strategy, "  just one thing  ");
        assert_eq!(steps, vec!["just one thing"]);

        assert!(split_with(&strategy, "   ").is_empty());
    }

    #[test]
    fn test_accepts_respects_threshold() {
        let report = MatchReport::scan("1. only one");
        assert!(!dot().accepts(&report));
        assert!(PatternStrategy::new(Convention::Dot, 1, 3).accepts(&report));
    }

    #[test]
    fn test_paragraph_split_collapses_single_newlines() {
        let text = "Mix the flour\nand sugar together.\n\nAdd the eggs\n   and milk.";
        let steps = split_with(&ParagraphStrategy, text);
        assert_eq!(
            steps,
            vec!["Mix the flour and sugar together.", "Add the eggs and milk."]
        );
    }

    #[test]
    fn test_paragraph_split_ignores_whitespace_only_paragraphs() {
        let text = "First\n\n   \n\n\nSecond\n \t \nThird";
        let steps = split_with(&ParagraphStrategy, text);
        assert_eq!(steps, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_default_chain_order() {
        let chain = default_chain(&SegmenterConfig::default());
        let names: Vec<&str> = chain.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "dot",
                "paren",
                "step_colon",
                "step_dash",
                "dot",
                "step_colon",
                "paragraphs"
            ]
        );
    }
}
