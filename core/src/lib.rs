//! Per-text literary metrics: sentiment, lexical diversity, topics and word
//! frequencies, merged into one title-keyed JSON artifact.

pub mod config;
pub mod corpus;
pub mod error;
pub mod fallback;
pub mod frequency;
pub mod lda;
pub mod lexical;
pub mod lexicon;
pub mod persist;
pub mod pipeline;
pub mod record;
pub mod sentiment;
pub mod stopwords;
pub mod tokenizer;
pub mod topics;

pub use config::{AnalysisConfig, TopicConfig};
pub use corpus::{Corpus, CorpusEntry, TextSource};
pub use error::{AnalysisError, Result};
pub use pipeline::{analyze_corpus, analyze_text, run, Resources};
pub use record::{
    AnalysisArtifact, AnalysisRecord, LexicalDiversity, Polarity, SentimentResult, SentimentScores, Topic,
    TopicWord, WordFrequencies,
};
