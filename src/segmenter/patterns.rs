use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Every marker is anchored at the start of the text or right after a newline.
// Trailing whitespace is part of the marker so step content starts clean.
static DOT: Lazy<Regex> = Lazy::new(|| build(r"(?:^|\n)\s*([0-9]+)\.\s*"));
static PAREN: Lazy<Regex> = Lazy::new(|| build(r"(?:^|\n)\s*([0-9]+)\)\s*"));
static STEP_COLON: Lazy<Regex> = Lazy::new(|| build(r"(?i)(?:^|\n)\s*step\s+[0-9]+\s*[:：]\s*"));
static STEP_DASH: Lazy<Regex> = Lazy::new(|| build(r"(?i)(?:^|\n)\s*step\s+[0-9]+\s*[-–—]\s*"));

fn build(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid step marker pattern")
}

/// A step-introducer convention recognised in pasted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// `1.`, `12.`
    Dot,
    /// `1)`
    Paren,
    /// `Step 1:` (ASCII or fullwidth colon)
    StepColon,
    /// `Step 1 -` (hyphen, en dash or em dash)
    StepDash,
}

impl Convention {
    pub const ALL: [Convention; 4] = [
        Convention::Dot,
        Convention::Paren,
        Convention::StepColon,
        Convention::StepDash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Convention::Dot => "dot",
            Convention::Paren => "paren",
            Convention::StepColon => "step_colon",
            Convention::StepDash => "step_dash",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            Convention::Dot => &*DOT,
            Convention::Paren => &*PAREN,
            Convention::StepColon => &*STEP_COLON,
            Convention::StepDash => &*STEP_DASH,
        }
    }

    /// Find every marker of this convention, left to right, without overlaps.
    pub fn find_all(&self, text: &str) -> Vec<MatchSpan> {
        self.regex()
            .find_iter(text)
            .map(|m| MatchSpan {
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }
}

/// Byte offsets of one marker in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// Markers found for each convention in a single piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub dot: Vec<MatchSpan>,
    pub paren: Vec<MatchSpan>,
    pub step_colon: Vec<MatchSpan>,
    pub step_dash: Vec<MatchSpan>,
}

impl MatchReport {
    /// Scan `text` for all four conventions.
    pub fn scan(text: &str) -> Self {
        MatchReport {
            dot: Convention::Dot.find_all(text),
            paren: Convention::Paren.find_all(text),
            step_colon: Convention::StepColon.find_all(text),
            step_dash: Convention::StepDash.find_all(text),
        }
    }

    pub fn spans(&self, convention: Convention) -> &[MatchSpan] {
        match convention {
            Convention::Dot => &self.dot,
            Convention::Paren => &self.paren,
            Convention::StepColon => &self.step_colon,
            Convention::StepDash => &self.step_dash,
        }
    }

    pub fn count(&self, convention: Convention) -> usize {
        self.spans(convention).len()
    }
}
