use crate::error::{AnalysisError, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Round to the four decimals every stored ratio carries.
pub fn round4(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    let r = (x * 10_000.0).round() / 10_000.0;
    // fold -0.0
    r + 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    pub const THRESHOLD: f64 = 0.05;

    pub fn from_compound(compound: f64) -> Self {
        if compound >= Self::THRESHOLD {
            Polarity::Positive
        } else if compound <= -Self::THRESHOLD {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
            Polarity::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub compound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub scores: SentimentScores,
    pub overall: Polarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalDiversity {
    pub total_words: usize,
    pub unique_words: usize,
    pub content_words: usize,
    pub unique_content_words: usize,
    pub type_token_ratio: f64,
    pub content_ttr: f64,
    pub root_ttr: f64,
    pub lexical_density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicWord {
    pub word: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: usize,
    /// Descending by weight.
    pub words: Vec<TopicWord>,
}

/// Top word counts in rank order; serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencies(pub Vec<(String, u64)>);

impl WordFrequencies {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.0.iter().find(|(w, _)| w == word).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

impl Serialize for WordFrequencies {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, count) in &self.0 {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WordFrequencies {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = WordFrequencies;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of word to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((word, count)) = access.next_entry::<String, u64>()? {
                    entries.push((word, count));
                }
                Ok(WordFrequencies(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Everything computed for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub title: String,
    pub sentiment: SentimentResult,
    pub lexical_diversity: LexicalDiversity,
    pub topics: Vec<Topic>,
    pub word_frequencies: WordFrequencies,
}

/// Title-keyed records; the single persisted output of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisArtifact {
    records: BTreeMap<String, AnalysisRecord>,
}

impl AnalysisArtifact {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses to replace an existing title.
    pub fn insert(&mut self, record: AnalysisRecord) -> Result<()> {
        if self.records.contains_key(&record.title) {
            return Err(AnalysisError::Config(format!(
                "duplicate title \"{}\" in analysis results",
                record.title
            )));
        }
        self.records.insert(record.title.clone(), record);
        Ok(())
    }

    pub fn get(&self, title: &str) -> Option<&AnalysisRecord> {
        self.records.get(title)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_thresholds_are_inclusive() {
        assert_eq!(Polarity::from_compound(0.05), Polarity::Positive);
        assert_eq!(Polarity::from_compound(-0.05), Polarity::Negative);
        assert_eq!(Polarity::from_compound(0.0), Polarity::Neutral);
        assert_eq!(Polarity::from_compound(0.0499), Polarity::Neutral);
        assert_eq!(Polarity::from_compound(-0.0499), Polarity::Neutral);
    }

    #[test]
    fn round4_behaviour() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(35.0 / 50.0), 0.7);
        assert_eq!(round4(f64::NAN), 0.0);
        assert!(round4(-0.00001).is_sign_positive());
    }

    #[test]
    fn word_frequencies_keep_rank_order() {
        let wf = WordFrequencies(vec![("raven".into(), 5), ("abbey".into(), 3), ("moor".into(), 3)]);
        let json = serde_json::to_string(&wf).unwrap();
        assert_eq!(json, r#"{"raven":5,"abbey":3,"moor":3}"#);
        let back: WordFrequencies = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wf);
    }

    #[test]
    fn polarity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Polarity::Negative).unwrap(), "\"negative\"");
    }
}
