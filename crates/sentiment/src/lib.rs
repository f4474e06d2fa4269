//! Keyword-count sentiment classification for speech utterances.
//!
//! Deterministic and stateless: an utterance is tokenized into lowercase word
//! tokens, each token is matched against two fixed lexicons, and the majority
//! side wins. Ties resolve to [`Sentiment::Mixed`] when any keyword matched
//! and [`Sentiment::Neutral`] otherwise. Utterances shorter than three
//! characters are always neutral.
//!
//! # Example
//!
//! ```
//! use audiolens_sentiment::{classify, Sentiment};
//!
//! assert_eq!(classify("I love this, it's great"), Sentiment::Positive);
//! assert_eq!(classify("I hate this, terrible"), Sentiment::Negative);
//! assert_eq!(classify("love hate"), Sentiment::Mixed);
//! assert_eq!(classify("ok"), Sentiment::Neutral);
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Utterances shorter than this (after trimming) are classified as neutral.
const MIN_TEXT_LEN: usize = 3;

/// Keywords counted as positive signal.
const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "awesome",
    "wonderful",
    "amazing",
    "fantastic",
    "perfect",
    "love",
    "like",
    "happy",
];

/// Keywords counted as negative signal.
const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "hate",
    "dislike",
    "sad",
    "angry",
    "frustrated",
    "disappointed",
];

/// Sentiment label for a single utterance.
///
/// Serializes and displays as the uppercase label (`POSITIVE`, `NEGATIVE`,
/// `MIXED`, `NEUTRAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Mixed,
    Neutral,
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[a-z0-9']+").unwrap())
}

/// Split text into lowercase word tokens.
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Classify one utterance by lexicon majority vote.
pub fn classify(text: &str) -> Sentiment {
    if text.trim().len() < MIN_TEXT_LEN {
        return Sentiment::Neutral;
    }

    let mut pos_count = 0usize;
    let mut neg_count = 0usize;

    for token in tokenize(text) {
        if POSITIVE_WORDS.contains(&token.as_str()) {
            pos_count += 1;
        } else if NEGATIVE_WORDS.contains(&token.as_str()) {
            neg_count += 1;
        }
    }

    if pos_count > neg_count {
        Sentiment::Positive
    } else if neg_count > pos_count {
        Sentiment::Negative
    } else if pos_count > 0 {
        Sentiment::Mixed
    } else {
        Sentiment::Neutral
    }
}
