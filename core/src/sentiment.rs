//! Rule-based polarity scoring in the VADER manner.
//!
//! The whole document is scored as one unit: every word contributes a valence,
//! adjusted for intensifiers, capitalisation, negation and contrast, and the
//! summed valence is squashed into a compound score in [-1, 1].

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::lexicon::{booster, is_negation, Lexicon};
use crate::record::{round4, Polarity, SentimentResult, SentimentScores};

/// Added to a valence written in ALL CAPS amid mixed-case text.
const CAPS_INCREMENT: f64 = 0.733;
/// Multiplier applied to a negated valence.
const NEGATION_SCALAR: f64 = -0.74;
/// Normalisation constant, approximates the max expected sum.
const NORMALIZE_ALPHA: f64 = 15.0;

pub struct SentimentAnalyzer {
    lexicon: Lexicon,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let lexicon = Lexicon::resolve(config.lexicon_path.as_deref())?;
        tracing::info!(
            lexicon = %lexicon.strategy,
            entries = lexicon.value.len(),
            "sentiment lexicon ready"
        );
        Ok(Self::new(lexicon.value))
    }

    /// Rounded scores plus the thresholded label.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        let raw = self.polarity_scores(text);
        let scores = SentimentScores {
            positive: round4(raw.positive),
            negative: round4(raw.negative),
            neutral: round4(raw.neutral),
            compound: round4(raw.compound),
        };
        SentimentResult { overall: Polarity::from_compound(scores.compound), scores }
    }

    /// Unrounded proportions and compound score.
    pub fn polarity_scores(&self, text: &str) -> SentimentScores {
        let words = words_of(text);
        if words.is_empty() {
            return SentimentScores { positive: 0.0, negative: 0.0, neutral: 1.0, compound: 0.0 };
        }
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let cap_diff = mixed_case(&words);

        let mut sentiments = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let w = lower[i].as_str();
            let is_kind_of = w == "kind" && lower.get(i + 1).map(String::as_str) == Some("of");
            if booster(w).is_some() || is_kind_of {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence_at(&words, &lower, i, cap_diff));
        }

        apply_but_shift(&lower, &mut sentiments);
        score(&sentiments, text)
    }

    fn valence_at(&self, words: &[&str], lower: &[String], i: usize, cap_diff: bool) -> f64 {
        let item = lower[i].as_str();
        let base = match self.lexicon.valence(item) {
            Some(v) => v,
            None => return 0.0,
        };
        let mut valence = base;

        // "no" directly before another scored word is a negator, not a sentiment
        if item == "no" && lower.get(i + 1).map_or(false, |n| self.lexicon.contains(n)) {
            valence = 0.0;
        }
        let preceded_by_no = (i > 0 && lower[i - 1] == "no")
            || (i > 1 && lower[i - 2] == "no")
            || (i > 2 && lower[i - 3] == "no" && matches!(lower[i - 1].as_str(), "or" | "nor"));
        if preceded_by_no {
            valence = base * NEGATION_SCALAR;
        }

        if cap_diff && is_upper(words[i]) {
            valence += if valence > 0.0 { CAPS_INCREMENT } else { -CAPS_INCREMENT };
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let prev = i - (start + 1);
            if self.lexicon.contains(&lower[prev]) {
                continue;
            }
            let mut s = scalar_inc_dec(words[prev], &lower[prev], valence, cap_diff);
            if start == 1 {
                s *= 0.95;
            } else if start == 2 {
                s *= 0.9;
            }
            valence += s;
            valence = negation_check(valence, lower, start, i);
        }

        least_check(valence, lower, i, &self.lexicon)
    }
}

/// Whitespace split; edge punctuation is stripped unless that leaves two
/// characters or fewer (keeps emoticons such as `:)`).
fn words_of(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| !c.is_alphanumeric());
            if stripped.chars().count() <= 2 {
                token
            } else {
                stripped
            }
        })
        .collect()
}

fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// True when some, but not all, words are ALL CAPS.
fn mixed_case(words: &[&str]) -> bool {
    let caps = words.iter().filter(|w| is_upper(w)).count();
    caps > 0 && caps < words.len()
}

fn scalar_inc_dec(word: &str, lower: &str, valence: f64, cap_diff: bool) -> f64 {
    let mut scalar = match booster(lower) {
        Some(b) => b,
        None => return 0.0,
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_upper(word) {
        scalar += if valence > 0.0 { CAPS_INCREMENT } else { -CAPS_INCREMENT };
    }
    scalar
}

fn negation_check(valence: f64, lower: &[String], start: usize, i: usize) -> f64 {
    let back = |n: usize| lower[i - n].as_str();
    match start {
        0 => {
            if is_negation(back(1)) {
                return valence * NEGATION_SCALAR;
            }
        }
        1 => {
            if back(2) == "never" && matches!(back(1), "so" | "this") {
                return valence * 1.25;
            }
            if back(2) == "without" && back(1) == "doubt" {
                return valence;
            }
            if is_negation(back(2)) {
                return valence * NEGATION_SCALAR;
            }
        }
        _ => {
            if back(3) == "never" && (matches!(back(2), "so" | "this") || matches!(back(1), "so" | "this")) {
                return valence * 1.25;
            }
            if back(3) == "without" && (back(2) == "doubt" || back(1) == "doubt") {
                return valence;
            }
            if is_negation(back(3)) {
                return valence * NEGATION_SCALAR;
            }
        }
    }
    valence
}

/// "least" flips polarity unless it reads "at least" or "very least".
fn least_check(valence: f64, lower: &[String], i: usize, lexicon: &Lexicon) -> f64 {
    if i == 0 || lower[i - 1] != "least" || lexicon.contains("least") {
        return valence;
    }
    if i > 1 && matches!(lower[i - 2].as_str(), "at" | "very") {
        return valence;
    }
    valence * NEGATION_SCALAR
}

/// Halve valences before the first "but", amplify those after it.
fn apply_but_shift(lower: &[String], sentiments: &mut [f64]) {
    let Some(bi) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (si, s) in sentiments.iter_mut().enumerate() {
        if si < bi {
            *s *= 0.5;
        } else if si > bi {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = match text.matches('?').count() {
        0 | 1 => 0.0,
        n @ 2..=3 => n as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + questions
}

pub fn normalize_compound(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn score(sentiments: &[f64], text: &str) -> SentimentScores {
    let emphasis = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize_compound(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    if total == 0.0 {
        return SentimentScores { positive: 0.0, negative: 0.0, neutral: 1.0, compound };
    }
    SentimentScores {
        positive: (pos_sum / total).abs(),
        negative: (neg_sum / total).abs(),
        neutral: (neu_count / total).abs(),
        compound,
    }
}
