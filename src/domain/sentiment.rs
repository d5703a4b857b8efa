//! Lexicon-based text sentiment, scored in [-1, 1].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

const POSITIVE_WORDS: &[&str] = &[
    "bullish", "rally", "rallies", "surge", "surges", "soar", "soars", "gain", "gains", "profit",
    "profits", "growth", "beat", "beats", "upgrade", "upgraded", "outperform", "strong",
    "positive", "rise", "rises", "increase", "record", "breakthrough", "success", "exceed",
    "exceeds", "momentum", "optimistic", "rebound", "recovery", "robust", "expansion", "upside",
    "buyback", "dividend", "raised", "tailwind", "good", "great", "excellent", "win", "wins",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bearish", "decline", "declines", "loss", "losses", "fall", "falls", "plunge", "plunges",
    "crash", "miss", "misses", "downgrade", "downgraded", "underperform", "weak", "negative",
    "drop", "drops", "decrease", "concern", "concerns", "risk", "fail", "fails", "disappoint",
    "disappointing", "slump", "warning", "pessimistic", "fear", "fears", "lawsuit",
    "investigation", "probe", "bankruptcy", "layoff", "layoffs", "downside", "headwind",
    "lowered", "suspended", "bad", "poor", "recall",
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't",
    "won't", "wouldn't", "couldn't", "shouldn't", "hardly", "barely", "without",
];

/// Words after a negation whose polarity is flipped.
const NEGATION_WINDOW: usize = 3;

static POSITIVE: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| POSITIVE_WORDS.iter().copied().collect());
static NEGATIVE: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NEGATIVE_WORDS.iter().copied().collect());
static NEGATION: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NEGATION_WORDS.iter().copied().collect());

/// Sentiment polarity clamped to [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentimentScore(f64);

impl SentimentScore {
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return SentimentScore(0.0);
        }
        SentimentScore(value.clamp(-1.0, 1.0))
    }

    pub fn neutral() -> Self {
        SentimentScore(0.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: SentimentScore) -> Self {
        if score.value() >= 0.05 {
            SentimentLabel::Positive
        } else if score.value() <= -0.05 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// (positive hits - negative hits) / total hits, with negation flipping polarity.
pub fn score_text(text: &str) -> SentimentScore {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || ",;.!?:()\"".contains(c))
        .filter(|w| !w.is_empty())
        .collect();

    let mut positive = 0u32;
    let mut negative = 0u32;
    let mut last_negation: Option<usize> = None;

    for (i, word) in words.iter().enumerate() {
        if NEGATION.contains(word) {
            last_negation = Some(i);
            continue;
        }
        let polarity = if POSITIVE.contains(word) {
            1
        } else if NEGATIVE.contains(word) {
            -1
        } else {
            continue;
        };
        let negated = last_negation.is_some_and(|n| i - n <= NEGATION_WINDOW);
        if (polarity > 0) != negated {
            positive += 1;
        } else {
            negative += 1;
        }
    }

    let total = positive + negative;
    if total == 0 {
        return SentimentScore::neutral();
    }
    SentimentScore::new((positive as f64 - negative as f64) / total as f64)
}
