//! Turning pasted recipe text into an ordered list of instructions.
//!
//! The text is scanned once for step markers ([`MatchReport`]), then handed
//! to the first strategy in the chain that accepts those markers.

pub mod patterns;
pub mod strategy;

use std::fmt;

use log::debug;

pub use patterns::{Convention, MatchReport, MatchSpan};
pub use strategy::{default_chain, ParagraphStrategy, PatternStrategy, SplitStrategy};

use crate::config::SegmenterConfig;

pub struct Segmenter {
    strategies: Vec<Box<dyn SplitStrategy>>,
}

impl Segmenter {
    pub fn new(config: &SegmenterConfig) -> Self {
        Self {
            strategies: default_chain(config),
        }
    }

    /// Build a segmenter from a custom strategy chain, tried in order.
    ///
    /// Text no strategy accepts yields no steps, so chains normally end
    /// with a [`ParagraphStrategy`].
    pub fn with_strategies(strategies: Vec<Box<dyn SplitStrategy>>) -> Self {
        Self { strategies }
    }

    /// The strategy that would handle text with these markers.
    pub fn select(&self, report: &MatchReport) -> Option<&dyn SplitStrategy> {
        self.strategies
            .iter()
            .find(|strategy| strategy.accepts(report))
            .map(|strategy| &**strategy)
    }

    /// Split `text` into trimmed, non-blank instructions in source order.
    ///
    /// Blank input produces an empty list.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let report = MatchReport::scan(text);
        let Some(strategy) = self.select(&report) else {
            debug!("No split strategy accepted the text");
            return Vec::new();
        };

        let steps = strategy.split(text, &report);
        debug!(
            "Segmented {} bytes into {} steps using '{}'",
            text.len(),
            steps.len(),
            strategy.name()
        );
        steps
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(&SegmenterConfig::default())
    }
}

impl fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}
