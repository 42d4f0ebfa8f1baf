use crate::config::AnalysisConfig;
use crate::corpus::{Corpus, CorpusEntry};
use crate::error::{AnalysisError, Result};
use crate::frequency::word_frequencies;
use crate::lexical::lexical_diversity;
use crate::persist::{meta_path, save_artifact, save_meta, MetaFile};
use crate::record::{AnalysisArtifact, AnalysisRecord};
use crate::sentiment::SentimentAnalyzer;
use crate::tokenizer::Preprocessor;
use crate::topics::extract_topics;
use rayon::prelude::*;
use std::path::Path;

/// Read-only state built once per run and shared by every text.
pub struct Resources {
    pub preprocessor: Preprocessor,
    pub sentiment: SentimentAnalyzer,
}

impl Resources {
    pub fn load(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            preprocessor: Preprocessor::from_config(config)?,
            sentiment: SentimentAnalyzer::from_config(config)?,
        })
    }
}

/// Run every analyzer over one text.
pub fn analyze_text(title: &str, text: &str, resources: &Resources, config: &AnalysisConfig) -> AnalysisRecord {
    let span = tracing::info_span!("text", title = %title);
    let _enter = span.enter();

    let stream = resources.preprocessor.process(text);
    let sentiment = resources.sentiment.analyze(text);
    let lexical = lexical_diversity(&stream);
    let topics = extract_topics(&stream.content_tokens, &config.topics);
    let frequencies = word_frequencies(&stream.content_tokens, config.top_n_words);

    tracing::info!(
        words = lexical.total_words,
        unique = lexical.unique_words,
        ttr = lexical.type_token_ratio,
        sentiment = %sentiment.overall,
        compound = sentiment.scores.compound,
        topics = topics.topics.len(),
        "analysis complete"
    );

    AnalysisRecord {
        title: title.to_string(),
        sentiment,
        lexical_diversity: lexical,
        topics: topics.topics,
        word_frequencies: frequencies,
    }
}

/// Analyze every text and merge the records; `config.jobs > 1` spreads texts over a thread pool.
pub fn analyze_corpus(corpus: &Corpus, resources: &Resources, config: &AnalysisConfig) -> Result<AnalysisArtifact> {
    let entries = corpus.entries();
    let records = if config.jobs <= 1 || entries.len() <= 1 {
        entries
            .iter()
            .map(|e| analyze_text(&e.title, &e.text, resources, config))
            .collect()
    } else {
        analyze_parallel(entries, resources, config)?
    };

    let mut artifact = AnalysisArtifact::new();
    for record in records {
        artifact.insert(record)?;
    }
    Ok(artifact)
}

/// Records come back in corpus order.
fn analyze_parallel(
    entries: &[CorpusEntry],
    resources: &Resources,
    config: &AnalysisConfig,
) -> Result<Vec<AnalysisRecord>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| AnalysisError::Config(format!("cannot start {} worker threads: {e}", config.jobs)))?;
    Ok(pool.install(|| {
        entries
            .par_iter()
            .map(|e| analyze_text(&e.title, &e.text, resources, config))
            .collect()
    }))
}

/// Analyze the corpus and write the artifact plus its metadata sidecar.
pub fn run(corpus: &Corpus, config: &AnalysisConfig, output: &Path) -> Result<AnalysisArtifact> {
    config.validate()?;
    let resources = Resources::load(config)?;
    tracing::info!(texts = corpus.len(), jobs = config.jobs, "starting analysis");

    let artifact = analyze_corpus(corpus, &resources, config)?;
    save_artifact(output, &artifact)?;
    save_meta(&meta_path(output), &MetaFile::new(artifact.len(), config))?;

    tracing::info!(output = %output.display(), texts = artifact.len(), "results saved");
    Ok(artifact)
}
