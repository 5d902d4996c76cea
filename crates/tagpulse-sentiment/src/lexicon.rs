//! Lexicon scorer tuned for short social-post text and image descriptions.

use async_trait::async_trait;
use tagpulse_core::SentimentScore;

use crate::error::SentimentError;
use crate::oracle::SentimentOracle;

/// Word weights as `(word, polarity, subjectivity)`.
///
/// Polarity is in `[-1.0, 1.0]`, subjectivity in `[0.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64, f64)] = &[
    // Positive
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("celebrate", 0.5, 0.6),
    ("cute", 0.5, 1.0),
    ("delicious", 1.0, 1.0),
    ("enjoy", 0.4, 0.5),
    ("enjoying", 0.4, 0.5),
    ("excited", 0.4, 0.75),
    ("fun", 0.3, 0.2),
    ("good", 0.7, 0.6),
    ("gorgeous", 0.7, 0.75),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("joy", 0.8, 0.9),
    ("laughing", 0.5, 0.6),
    ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75),
    ("nice", 0.6, 1.0),
    ("peaceful", 0.5, 0.7),
    ("perfect", 1.0, 1.0),
    ("smiling", 0.5, 0.6),
    ("stunning", 0.5, 0.9),
    ("sunny", 0.3, 0.4),
    ("wonderful", 1.0, 1.0),
    // Negative
    ("angry", -0.5, 1.0),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("boring", -1.0, 1.0),
    ("broken", -0.4, 0.4),
    ("crying", -0.5, 0.7),
    ("disappointed", -0.75, 0.75),
    ("hate", -0.8, 0.9),
    ("lonely", -0.5, 0.8),
    ("pain", -0.6, 0.8),
    ("sad", -0.5, 1.0),
    ("scary", -0.5, 1.0),
    ("sick", -0.7, 0.9),
    ("terrible", -1.0, 1.0),
    ("tired", -0.4, 0.7),
    ("ugly", -0.7, 1.0),
    ("worst", -1.0, 1.0),
];

/// Words that flip and dampen the polarity of the following lexicon hit.
const NEGATIONS: &[&str] = &["not", "no", "never", "isn't", "don't", "didn't", "wasn't"];

/// Words that amplify the following lexicon hit.
const INTENSIFIERS: &[&str] = &["very", "really", "so", "super", "extremely"];

const NEGATION_FACTOR: f64 = -0.5;
const INTENSIFIER_FACTOR: f64 = 1.3;

/// Score a text string using the lexicon.
///
/// Averages polarity and subjectivity over matched words. A negation word
/// directly before a match multiplies its polarity by `-0.5`; an intensifier
/// multiplies it by `1.3`. Text with no matches scores neutral.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn lexicon_score(text: &str) -> SentimentScore {
    let mut polarity_sum = 0.0_f64;
    let mut subjectivity_sum = 0.0_f64;
    let mut hits = 0usize;
    let mut modifier = 1.0_f64;

    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic() && c != '\'')
            .trim_matches('\'')
            .to_lowercase();

        if NEGATIONS.contains(&w.as_str()) {
            modifier *= NEGATION_FACTOR;
            continue;
        }
        if INTENSIFIERS.contains(&w.as_str()) {
            modifier *= INTENSIFIER_FACTOR;
            continue;
        }

        if let Some(&(_, polarity, subjectivity)) =
            LEXICON.iter().find(|(lex_word, _, _)| *lex_word == w)
        {
            polarity_sum += (polarity * modifier).clamp(-1.0, 1.0);
            subjectivity_sum += subjectivity;
            hits += 1;
        }
        modifier = 1.0;
    }

    if hits == 0 {
        return SentimentScore::NEUTRAL;
    }
    let n = hits as f64;
    SentimentScore::new(polarity_sum / n, subjectivity_sum / n)
}

/// [`SentimentOracle`] backed by [`lexicon_score`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconOracle;

#[async_trait]
impl SentimentOracle for LexiconOracle {
    async fn score(&self, text: &str) -> Result<SentimentScore, SentimentError> {
        Ok(lexicon_score(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_neutral() {
        assert_eq!(lexicon_score(""), SentimentScore::NEUTRAL);
    }

    #[test]
    fn unknown_text_is_neutral() {
        assert_eq!(lexicon_score("the quick brown fox"), SentimentScore::NEUTRAL);
    }

    #[test]
    fn positive_keyword_scores_positive() {
        let score = lexicon_score("May be an image of 2 people, smiling and beach");
        assert!(score.polarity > 0.0, "expected positive, got {score:?}");
        assert!(score.subjectivity > 0.0);
    }

    #[test]
    fn negative_keyword_scores_negative() {
        let score = lexicon_score("worst day ever");
        assert!(score.polarity < 0.0, "expected negative, got {score:?}");
    }

    #[test]
    fn negation_flips_and_dampens() {
        let plain = lexicon_score("good");
        let negated = lexicon_score("not good");
        assert!(negated.polarity < 0.0);
        assert!((negated.polarity - plain.polarity * NEGATION_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn negation_only_applies_to_next_word() {
        let score = lexicon_score("not today, happy");
        assert!(score.polarity > 0.0, "got {score:?}");
    }

    #[test]
    fn intensifier_amplifies_within_bounds() {
        let plain = lexicon_score("nice");
        let boosted = lexicon_score("very nice");
        assert!(boosted.polarity > plain.polarity);
        assert!(boosted.polarity <= 1.0);
        assert!(lexicon_score("really perfect").polarity <= 1.0);
    }

    #[test]
    fn hashtags_and_punctuation_are_stripped() {
        let score = lexicon_score("#beautiful sunset!!");
        assert!(score.polarity > 0.0, "got {score:?}");
    }

    #[test]
    fn mixed_text_averages_matches() {
        let score = lexicon_score("great food, terrible service");
        // (0.8 + -1.0) / 2
        assert!((score.polarity - (-0.1)).abs() < 1e-9, "got {score:?}");
    }

    #[tokio::test]
    async fn lexicon_oracle_never_fails() {
        let score = LexiconOracle.score("happy").await.unwrap();
        assert!(score.polarity > 0.0);
    }
}
