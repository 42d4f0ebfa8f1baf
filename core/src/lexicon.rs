//! Sentiment valence lexicon.
//!
//! Valences follow the VADER scale: -4 (most negative) to +4 (most positive).
//! The built-in table is `data/vader_lexicon.txt`, embedded at compile time
//! and read with the same parser as a configured lexicon file.

use crate::error::Result;
use crate::fallback::{FallbackChain, Resolved};
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Tab-separated `token<TAB>mean` lines compiled into the binary.
const BUILTIN_LEXICON: &str = include_str!("../data/vader_lexicon.txt");

lazy_static! {
    static ref NEGATIONS: HashSet<&'static str> = [
        "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
        "ain't", "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't",
        "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither",
        "don't", "hadn't", "hasn't", "haven't", "isn't", "mightn't", "mustn't",
        "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing", "nowhere",
        "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
        "oughtn't", "shan't", "shouldn't", "uh-uh", "wasn't", "weren't",
        "without", "wont", "wouldnt", "won't", "wouldn't", "rarely", "seldom", "despite",
    ]
    .into_iter()
    .collect();

    static ref BOOSTERS: HashMap<&'static str, f64> = {
        let incr = [
            "absolutely", "amazingly", "awfully", "completely", "considerable", "considerably",
            "decidedly", "deeply", "enormous", "enormously", "entirely", "especially",
            "exceptional", "exceptionally", "extreme", "extremely", "fabulously", "fully",
            "greatly", "highly", "hugely", "incredible", "incredibly", "intensely", "major",
            "majorly", "more", "most", "particularly", "purely", "quite", "really", "remarkably",
            "so", "substantially", "thoroughly", "total", "totally", "tremendous", "tremendously",
            "unbelievably", "unusually", "utter", "utterly", "very",
        ];
        let decr = [
            "almost", "barely", "hardly", "kinda", "kindof", "kind-of", "less", "little",
            "marginal", "marginally", "occasional", "occasionally", "partly", "scarce",
            "scarcely", "slight", "slightly", "somewhat", "sorta", "sortof", "sort-of",
        ];
        incr.into_iter()
            .map(|w| (w, BOOST_INCREMENT))
            .chain(decr.into_iter().map(|w| (w, -BOOST_INCREMENT)))
            .collect()
    };
}

/// Scalar added to a valence by a preceding intensifier.
pub const BOOST_INCREMENT: f64 = 0.293;

pub fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(word) || word.contains("n't")
}

pub fn booster(word: &str) -> Option<f64> {
    BOOSTERS.get(word).copied()
}

/// Word valences, shared read-only across texts.
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    pub fn builtin() -> std::result::Result<Self, String> {
        Self::parse(BUILTIN_LEXICON).map_err(|e| format!("embedded lexicon: {e}"))
    }

    /// Parse `token<TAB>mean[<TAB>...]` lines, as in `vader_lexicon.txt`.
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let mut valences = HashMap::new();
        for (lineno, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let word = fields.next().unwrap_or_default().trim();
            let mean = fields
                .next()
                .ok_or_else(|| format!("line {}: missing valence", lineno + 1))?;
            let mean: f64 = mean
                .trim()
                .parse()
                .map_err(|e| format!("line {}: {e}", lineno + 1))?;
            valences.insert(word.to_lowercase(), mean);
        }
        if valences.is_empty() {
            return Err("no entries".into());
        }
        Ok(Self { valences })
    }

    /// Configured file first, built-in table otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Resolved<Self>> {
        FallbackChain::new("sentiment lexicon")
            .then_if(path.is_some(), "lexicon-file", move || {
                let path = path.unwrap_or(Path::new(""));
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| format!("{}: {e}", path.display()))?;
                Self::parse(&raw).map_err(|e| format!("{}: {e}", path.display()))
            })
            .then("builtin-lexicon", Self::builtin)
            .resolve()
    }

    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.valences.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}
