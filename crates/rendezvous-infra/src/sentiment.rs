//! Lexicon-based polarity scoring.
//!
//! Implements `PolarityScorer` from `rendezvous-core` with the VADER model
//! from the `vader_sentiment` crate. The `compound` score is already
//! normalized to `[-1, 1]`.

use rendezvous_core::chat::sentiment::PolarityScorer;
use vader_sentiment::SentimentIntensityAnalyzer;

/// VADER compound-score implementation of `PolarityScorer`.
pub struct VaderPolarityScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderPolarityScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderPolarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderPolarityScorer {
    fn polarity(&self, text: &str) -> f64 {
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}
