//! Sentiment classification of inbound chat text.
//!
//! The polarity model is a black box behind [`PolarityScorer`]; this module
//! only owns the thresholds that turn a score into a label.

use rendezvous_types::chat::Sentiment;

/// Scores above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;

/// Scores below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// A polarity model mapping text to a score in `[-1, 1]`.
///
/// The lexicon-backed implementation lives in rendezvous-infra.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Maps text to positive / neutral / negative.
pub struct SentimentClassifier {
    scorer: Box<dyn PolarityScorer>,
}

impl SentimentClassifier {
    pub fn new<S: PolarityScorer + 'static>(scorer: S) -> Self {
        Self {
            scorer: Box::new(scorer),
        }
    }

    /// Classify `text`. Never returns [`Sentiment::Empty`].
    ///
    /// Empty or whitespace-only text is neutral without consulting the scorer.
    pub fn classify(&self, text: &str) -> Sentiment {
        if text.trim().is_empty() {
            return Sentiment::Neutral;
        }
        label_for(self.scorer.polarity(text))
    }
}

/// Threshold a polarity score. Out-of-range scores are clamped; NaN is neutral.
pub fn label_for(score: f64) -> Sentiment {
    if score.is_nan() {
        return Sentiment::Neutral;
    }
    let score = score.clamp(-1.0, 1.0);
    if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed(f64);

    impl PolarityScorer for Fixed {
        fn polarity(&self, _text: &str) -> f64 {
            self.0
        }
    }

    struct Counting(Arc<AtomicUsize>);

    impl PolarityScorer for Counting {
        fn polarity(&self, _text: &str) -> f64 {
            self.0.fetch_add(1, Ordering::SeqCst);
            0.9
        }
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(label_for(0.1), Sentiment::Neutral);
        assert_eq!(label_for(-0.1), Sentiment::Neutral);
        assert_eq!(label_for(0.1001), Sentiment::Positive);
        assert_eq!(label_for(-0.1001), Sentiment::Negative);
        assert_eq!(label_for(0.0), Sentiment::Neutral);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(label_for(5.0), Sentiment::Positive);
        assert_eq!(label_for(-5.0), Sentiment::Negative);
        assert_eq!(label_for(f64::NAN), Sentiment::Neutral);
    }

    #[test]
    fn test_empty_text_skips_scorer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = SentimentClassifier::new(Counting(calls.clone()));

        assert_eq!(classifier.classify(""), Sentiment::Neutral);
        assert_eq!(classifier.classify("   \n"), Sentiment::Neutral);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(classifier.classify("great"), Sentiment::Positive);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_classify_never_returns_empty() {
        for score in [-1.0, -0.5, -0.1, 0.0, 0.05, 0.1, 0.5, 1.0] {
            let classifier = SentimentClassifier::new(Fixed(score));
            let label = classifier.classify("some text");
            assert_ne!(label, Sentiment::Empty);
        }
    }
}
