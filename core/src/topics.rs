//! Topic extraction for a single text.
//!
//! One text is one document, so the content tokens are cut into fixed-size
//! chunks that serve as pseudo-documents for LDA. Terms are filtered by how
//! many chunks they appear in; when filtering leaves too little vocabulary the
//! unfiltered vocabulary is used, and the topic count shrinks to what the
//! chunks and vocabulary can support.

use crate::config::TopicConfig;
use crate::fallback::FallbackChain;
use crate::lda::{LdaModel, LdaParams};
use crate::record::{round4, Topic, TopicWord};
use std::collections::HashMap;

/// Non-overlapping chunks of `size` tokens; chunks shorter than `min_len` are dropped.
pub fn chunk_tokens(tokens: &[String], size: usize, min_len: usize) -> Vec<&[String]> {
    tokens
        .chunks(size.max(1))
        .filter(|c| c.len() >= min_len)
        .collect()
}

/// Term ids assigned in first-occurrence order, with per-chunk document frequency.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    ids: HashMap<String, usize>,
    terms: Vec<String>,
    doc_freq: Vec<usize>,
    num_docs: usize,
}

impl Dictionary {
    pub fn from_chunks(chunks: &[&[String]]) -> Self {
        let mut dict = Dictionary::default();
        for chunk in chunks {
            let mut seen: Vec<usize> = Vec::new();
            for token in chunk.iter() {
                let next = dict.terms.len();
                let id = *dict.ids.entry(token.clone()).or_insert(next);
                if id == next {
                    dict.terms.push(token.clone());
                    dict.doc_freq.push(0);
                }
                seen.push(id);
            }
            seen.sort_unstable();
            seen.dedup();
            for id in seen {
                dict.doc_freq[id] += 1;
            }
            dict.num_docs += 1;
        }
        dict
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term(&self, id: usize) -> &str {
        &self.terms[id]
    }

    pub fn doc_freq(&self, term: &str) -> Option<usize> {
        self.ids.get(term).map(|&id| self.doc_freq[id])
    }

    /// Ids of terms in at least `no_below` chunks and at most `no_above` of all chunks.
    pub fn filter_extremes(&self, no_below: usize, no_above: f64) -> Vec<usize> {
        let max_df = (no_above * self.num_docs as f64) as usize;
        (0..self.terms.len())
            .filter(|&id| self.doc_freq[id] >= no_below && self.doc_freq[id] <= max_df)
            .collect()
    }
}

/// Topics for one text, plus how many were asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicOutcome {
    pub topics: Vec<Topic>,
    pub requested: usize,
    pub vocabulary: String,
}

impl TopicOutcome {
    pub fn reduced(&self) -> bool {
        self.topics.len() < self.requested
    }
}

pub fn extract_topics(content_tokens: &[String], config: &TopicConfig) -> TopicOutcome {
    let requested = config.num_topics;
    let empty = |vocabulary: &str| TopicOutcome {
        topics: Vec::new(),
        requested,
        vocabulary: vocabulary.to_string(),
    };

    if content_tokens.is_empty() {
        tracing::warn!("no content tokens; skipping topic model");
        return empty("none");
    }

    let mut chunks = chunk_tokens(content_tokens, config.chunk_size, config.min_chunk_len);
    if chunks.is_empty() {
        tracing::warn!(
            tokens = content_tokens.len(),
            min_chunk_len = config.min_chunk_len,
            "text shorter than one chunk; modeling it as a single chunk"
        );
        chunks.push(content_tokens);
    }

    let dict = Dictionary::from_chunks(&chunks);
    let vocab = FallbackChain::new("topic vocabulary")
        .then("filtered-vocabulary", || {
            let kept = dict.filter_extremes(config.no_below, config.no_above);
            if kept.len() < requested {
                Err(format!(
                    "{} terms survive frequency filtering, {} topics requested",
                    kept.len(),
                    requested
                ))
            } else {
                Ok(kept)
            }
        })
        .then("full-vocabulary", || Ok((0..dict.len()).collect()))
        .resolve();
    let vocab = match vocab {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "no vocabulary for topic model");
            return empty("none");
        }
    };
    if vocab.value.is_empty() {
        return empty(&vocab.strategy);
    }

    let num_topics = requested.min(chunks.len()).min(vocab.value.len()).max(1);
    if num_topics < requested {
        tracing::warn!(
            requested,
            num_topics,
            chunks = chunks.len(),
            vocabulary = vocab.value.len(),
            "reducing topic count"
        );
    }

    // remap kept dictionary ids to a dense 0..V range
    let dense: HashMap<usize, usize> = vocab.value.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let docs: Vec<Vec<usize>> = chunks
        .iter()
        .map(|chunk| {
            chunk
                .iter()
                .filter_map(|t| dict.ids.get(t).and_then(|id| dense.get(id)).copied())
                .collect()
        })
        .collect();

    let prior = 1.0 / num_topics as f64;
    let params = LdaParams {
        num_topics,
        alpha: config.alpha.unwrap_or(prior),
        eta: config.eta.unwrap_or(prior),
        sweeps: config.passes.saturating_mul(config.iterations),
        seed: config.random_seed,
    };
    tracing::debug!(
        chunks = docs.len(),
        vocabulary = vocab.value.len(),
        num_topics,
        sweeps = params.sweeps,
        "fitting topic model"
    );
    let model = LdaModel::fit(&docs, vocab.value.len(), &params);

    // weights are non-increasing; equal weights keep first-occurrence order
    let topics = (0..num_topics)
        .map(|t| Topic {
            topic_id: t,
            words: model
                .top_words(t, config.words_per_topic)
                .into_iter()
                .map(|(w, p)| TopicWord {
                    word: dict.term(vocab.value[w]).to_string(),
                    weight: round4(p),
                })
                .collect(),
        })
        .collect();

    TopicOutcome { topics, requested, vocabulary: vocab.strategy }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights_non_increasing(topic: &Topic) -> bool {
        topic.words.windows(2).all(|w| w[0].weight >= w[1].weight)
    }

    fn tokens(words: &[&str], repeat: usize) -> Vec<String> {
        let mut out = Vec::new();
        for _ in 0..repeat {
            out.extend(words.iter().map(|w| w.to_string()));
        }
        out
    }

    #[test]
    fn chunking_drops_short_tail() {
        let t = tokens(&["a"], 25);
        let chunks = chunk_tokens(&t, 10, 6);
        assert_eq!(chunks.len(), 2);
        let chunks = chunk_tokens(&t, 10, 5);
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn dictionary_counts_chunks_not_tokens() {
        let a = tokens(&["moor", "moor", "ghost"], 1);
        let b = tokens(&["moor", "castle"], 1);
        let dict = Dictionary::from_chunks(&[&a[..], &b[..]]);
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.term(0), "moor");
        assert_eq!(dict.doc_freq("moor"), Some(2));
        assert_eq!(dict.doc_freq("ghost"), Some(1));
    }

    #[test]
    fn filter_extremes_bounds() {
        let chunks: Vec<Vec<String>> = vec![
            tokens(&["common", "pair"], 1),
            tokens(&["common", "pair"], 1),
            tokens(&["common", "single"], 1),
            tokens(&["common"], 1),
        ];
        let refs: Vec<&[String]> = chunks.iter().map(|c| &c[..]).collect();
        let dict = Dictionary::from_chunks(&refs);
        let kept: Vec<&str> = dict.filter_extremes(2, 0.5).into_iter().map(|id| dict.term(id)).collect();
        assert_eq!(kept, vec!["pair"]);
    }

    #[test]
    fn empty_input_yields_no_topics() {
        let out = extract_topics(&[], &TopicConfig::default());
        assert!(out.topics.is_empty());
    }

    #[test]
    fn tiny_vocabulary_reduces_topic_count() {
        let t = tokens(&["raven", "midnight"], 20);
        let out = extract_topics(&t, &TopicConfig::default());
        assert!(!out.topics.is_empty());
        assert!(out.topics.len() <= 2);
        assert!(out.reduced());
        assert_eq!(out.vocabulary, "full-vocabulary");
        for topic in &out.topics {
            assert!(topic.words.len() <= 2);
            assert!(topic.words.iter().all(|w| w.weight > 0.0 && w.weight <= 1.0));
        }
    }

    #[test]
    fn full_sized_text_gets_requested_topics() {
        let themes = [
            ["castle", "tower", "dungeon", "gate", "wall", "stone"],
            ["storm", "thunder", "rain", "lightning", "wind", "cloud"],
            ["letter", "ink", "paper", "pen", "seal", "envelope"],
            ["ship", "sail", "harbor", "captain", "deck", "anchor"],
            ["grave", "coffin", "tomb", "crypt", "corpse", "shroud"],
        ];
        let mut t = Vec::new();
        for round in 0..4 {
            for (i, theme) in themes.iter().enumerate() {
                for j in 0..50 {
                    t.push(theme[(j + i + round) % theme.len()].to_string());
                }
            }
        }
        let config = TopicConfig { chunk_size: 50, passes: 5, iterations: 20, ..TopicConfig::default() };
        let out = extract_topics(&t, &config);
        assert_eq!(out.topics.len(), 5);
        assert_eq!(out.vocabulary, "filtered-vocabulary");
        for (i, topic) in out.topics.iter().enumerate() {
            assert_eq!(topic.topic_id, i);
            assert!(topic.words.len() <= config.words_per_topic);
            assert!(weights_non_increasing(topic));
        }
    }

    #[test]
    fn tied_weights_keep_first_occurrence_order() {
        // one chunk, one topic: every weight is (count + eta) / (total + V * eta)
        let mut t = tokens(&["candle", "mirror", "portrait", "veil"], 3);
        t.extend(["ash", "bell", "moth"].iter().map(|w| w.to_string()));
        let config = TopicConfig { num_topics: 1, words_per_topic: 7, ..TopicConfig::default() };
        let out = extract_topics(&t, &config);
        let words: Vec<&str> = out.topics[0].words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["candle", "mirror", "portrait", "veil", "ash", "bell", "moth"]);
        let weights: Vec<f64> = out.topics[0].words.iter().map(|w| w.weight).collect();
        assert_eq!(weights[..4], [weights[0]; 4]);
        assert_eq!(weights[4..], [weights[4]; 3]);
        assert!(weights[0] > weights[4]);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let t = tokens(&["wind", "moor", "heath", "ghost", "lantern", "abbey"], 30);
        let config = TopicConfig { chunk_size: 20, ..TopicConfig::default() };
        let a = extract_topics(&t, &config);
        let b = extract_topics(&t, &config);
        assert_eq!(a, b);
    }
}
