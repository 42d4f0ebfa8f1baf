use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options that shape the topic modeler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    pub num_topics: usize,
    pub words_per_topic: usize,
    pub passes: usize,
    /// Gibbs sweeps per pass.
    pub iterations: usize,
    pub random_seed: u64,
    /// Content tokens per pseudo-document.
    pub chunk_size: usize,
    /// Chunks shorter than this are dropped.
    pub min_chunk_len: usize,
    /// Keep terms that occur in at least this many chunks.
    pub no_below: usize,
    /// Keep terms that occur in at most this fraction of chunks.
    pub no_above: f64,
    /// Document-topic prior, `1/K` when unset.
    pub alpha: Option<f64>,
    /// Topic-word prior, `1/K` when unset.
    pub eta: Option<f64>,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            num_topics: 5,
            words_per_topic: 10,
            passes: 10,
            iterations: 50,
            random_seed: 42,
            chunk_size: 500,
            min_chunk_len: 10,
            no_below: 2,
            no_above: 0.5,
            alpha: None,
            eta: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    #[serde(flatten)]
    pub topics: TopicConfig,
    pub top_n_words: usize,
    pub min_token_length: usize,
    pub stem_content: bool,
    pub token_pattern: Option<String>,
    pub stopwords_path: Option<PathBuf>,
    pub lexicon_path: Option<PathBuf>,
    pub jobs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            topics: TopicConfig::default(),
            top_n_words: 100,
            min_token_length: 2,
            stem_content: false,
            token_pattern: None,
            stopwords_path: None,
            lexicon_path: None,
            jobs: 1,
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON config file; absent fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AnalysisError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| AnalysisError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.topics;
        let positive = [
            ("num_topics", t.num_topics),
            ("words_per_topic", t.words_per_topic),
            ("passes", t.passes),
            ("iterations", t.iterations),
            ("chunk_size", t.chunk_size),
            ("top_n_words", self.top_n_words),
            ("min_token_length", self.min_token_length),
            ("jobs", self.jobs),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(AnalysisError::Config(format!("{name} must be greater than zero")));
            }
        }

        if t.passes.checked_mul(t.iterations).is_none() {
            return Err(AnalysisError::Config(format!(
                "passes ({}) times iterations ({}) overflows",
                t.passes, t.iterations
            )));
        }

        if !(t.no_above > 0.0 && t.no_above <= 1.0) {
            return Err(AnalysisError::Config(format!(
                "no_above must be in (0, 1], got {}",
                t.no_above
            )));
        }

        for (name, prior) in [("alpha", t.alpha), ("eta", t.eta)] {
            if let Some(v) = prior {
                if !(v.is_finite() && v > 0.0) {
                    return Err(AnalysisError::Config(format!("{name} must be positive, got {v}")));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.topics.num_topics, 5);
        assert_eq!(config.topics.words_per_topic, 10);
        assert_eq!(config.top_n_words, 100);
        assert_eq!(config.min_token_length, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_topics() {
        let mut config = AnalysisConfig::default();
        config.topics.num_topics = 0;
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn rejects_overflowing_sweep_count() {
        let mut config = AnalysisConfig::default();
        config.topics.passes = usize::MAX;
        config.topics.iterations = 2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn rejects_out_of_range_no_above() {
        let mut config = AnalysisConfig::default();
        config.topics.no_above = 1.5;
        assert!(config.validate().is_err());
        config.topics.no_above = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"num_topics": 3, "top_n_words": 20}"#).unwrap();
        assert_eq!(config.topics.num_topics, 3);
        assert_eq!(config.top_n_words, 20);
        assert_eq!(config.topics.words_per_topic, 10);
        assert_eq!(config.topics.random_seed, 42);
    }
}
