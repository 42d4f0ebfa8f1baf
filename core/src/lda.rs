//! Latent Dirichlet Allocation fitted with collapsed Gibbs sampling.
//!
//! Documents are sequences of vocabulary ids. The sampler is driven by a
//! seeded [`StdRng`], so a fixed seed and fixed input give identical counts.

use ndarray::{Array1, Array2};
use rand::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct LdaParams {
    pub num_topics: usize,
    /// Document-topic prior.
    pub alpha: f64,
    /// Topic-word prior.
    pub eta: f64,
    /// Full sweeps over every token.
    pub sweeps: usize,
    pub seed: u64,
}

/// Fitted topic-word counts.
#[derive(Debug, Clone)]
pub struct LdaModel {
    topic_word: Array2<u32>,
    topic_totals: Array1<u32>,
    eta: f64,
}

impl LdaModel {
    /// Fit `params.num_topics` topics over `docs`, whose ids are `< vocab_size`.
    pub fn fit(docs: &[Vec<usize>], vocab_size: usize, params: &LdaParams) -> Self {
        let k = params.num_topics.max(1);
        let mut rng = StdRng::seed_from_u64(params.seed);

        let mut topic_word = Array2::<u32>::zeros((k, vocab_size));
        let mut doc_topic = Array2::<u32>::zeros((docs.len(), k));
        let mut topic_totals = Array1::<u32>::zeros(k);

        // random initial assignment
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(docs.len());
        for (d, doc) in docs.iter().enumerate() {
            let mut z = Vec::with_capacity(doc.len());
            for &w in doc {
                let t = rng.gen_range(0..k);
                topic_word[[t, w]] += 1;
                doc_topic[[d, t]] += 1;
                topic_totals[t] += 1;
                z.push(t);
            }
            assignments.push(z);
        }

        let eta_sum = params.eta * vocab_size as f64;
        let mut weights = vec![0.0f64; k];
        for _ in 0..params.sweeps {
            for (d, doc) in docs.iter().enumerate() {
                for (pos, &w) in doc.iter().enumerate() {
                    let old = assignments[d][pos];
                    topic_word[[old, w]] -= 1;
                    doc_topic[[d, old]] -= 1;
                    topic_totals[old] -= 1;

                    // P(t | rest) ~ (n_dt + alpha) * (n_tw + eta) / (n_t + V*eta)
                    let mut total = 0.0;
                    for (t, slot) in weights.iter_mut().enumerate() {
                        let p = (doc_topic[[d, t]] as f64 + params.alpha)
                            * (topic_word[[t, w]] as f64 + params.eta)
                            / (topic_totals[t] as f64 + eta_sum);
                        total += p;
                        *slot = p;
                    }
                    let new = sample(&weights, total, &mut rng);

                    topic_word[[new, w]] += 1;
                    doc_topic[[d, new]] += 1;
                    topic_totals[new] += 1;
                    assignments[d][pos] = new;
                }
            }
        }

        Self { topic_word, topic_totals, eta: params.eta }
    }

    pub fn num_topics(&self) -> usize {
        self.topic_word.nrows()
    }

    pub fn vocab_size(&self) -> usize {
        self.topic_word.ncols()
    }

    /// Smoothed P(word | topic); sums to 1 over the vocabulary.
    pub fn word_probability(&self, topic: usize, word: usize) -> f64 {
        let eta_sum = self.eta * self.vocab_size() as f64;
        (self.topic_word[[topic, word]] as f64 + self.eta)
            / (self.topic_totals[topic] as f64 + eta_sum)
    }

    /// The `n` most probable word ids of `topic`, ties in ascending id order.
    pub fn top_words(&self, topic: usize, n: usize) -> Vec<(usize, f64)> {
        let mut probs: Vec<(usize, f64)> = (0..self.vocab_size())
            .map(|w| (w, self.word_probability(topic, w)))
            .collect();
        probs.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        probs.truncate(n);
        probs
    }

    /// Tokens currently assigned to each topic.
    pub fn topic_sizes(&self) -> Vec<u32> {
        self.topic_totals.to_vec()
    }
}

fn sample(weights: &[f64], total: f64, rng: &mut StdRng) -> usize {
    let threshold = rng.gen::<f64>() * total;
    let mut cumsum = 0.0;
    for (t, &p) in weights.iter().enumerate() {
        cumsum += p;
        if cumsum >= threshold {
            return t;
        }
    }
    weights.len() - 1
}
