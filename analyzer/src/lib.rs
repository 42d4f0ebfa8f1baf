use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use litmetrics::corpus::{load_document, TextSource, CLEAN_SUFFIX};
use litmetrics::persist::load_artifact;
use litmetrics::{analyze_text, AnalysisArtifact, AnalysisConfig, AnalysisRecord, Corpus, Resources};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "analyzer")]
#[command(about = "Sentiment, lexical diversity, topics and word frequencies for a corpus of texts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze every cleaned text and write the JSON artifact
    Run(RunArgs),
    /// Analyze a single file and print its record as JSON
    Text {
        file: PathBuf,
        /// Title for the record (defaults to the file stem without `_clean`)
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        settings: Settings,
    },
    /// Print a per-title summary of an existing artifact
    Summary {
        #[arg(long, default_value = "data/analysis_results.json")]
        artifact: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory searched recursively for `*_clean.txt`
    #[arg(long, default_value = "data/processed")]
    pub input: PathBuf,
    /// JSON list of {"title", "path"} used instead of directory discovery
    #[arg(long, conflicts_with = "input")]
    pub manifest: Option<PathBuf>,
    #[arg(long, default_value = "data/analysis_results.json")]
    pub output: PathBuf,
    #[command(flatten)]
    pub settings: Settings,
}

/// Config file plus command-line overrides; flags win over the file.
#[derive(Args, Debug, Clone, Default)]
pub struct Settings {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub num_topics: Option<usize>,
    #[arg(long)]
    pub words_per_topic: Option<usize>,
    #[arg(long)]
    pub top_n_words: Option<usize>,
    /// Seed of the topic sampler
    #[arg(long, alias = "seed")]
    pub random_seed: Option<u64>,
    #[arg(long)]
    pub min_token_length: Option<usize>,
    #[arg(long)]
    pub chunk_size: Option<usize>,
    #[arg(long)]
    pub passes: Option<usize>,
    /// Worker threads for the corpus
    #[arg(long)]
    pub jobs: Option<usize>,
    /// Snowball-stem content tokens
    #[arg(long)]
    pub stem: bool,
}

impl Settings {
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };
        let t = &mut config.topics;
        if let Some(v) = self.num_topics {
            t.num_topics = v;
        }
        if let Some(v) = self.words_per_topic {
            t.words_per_topic = v;
        }
        if let Some(v) = self.random_seed {
            t.random_seed = v;
        }
        if let Some(v) = self.chunk_size {
            t.chunk_size = v;
        }
        if let Some(v) = self.passes {
            t.passes = v;
        }
        if let Some(v) = self.top_n_words {
            config.top_n_words = v;
        }
        if let Some(v) = self.min_token_length {
            config.min_token_length = v;
        }
        if let Some(v) = self.jobs {
            config.jobs = v;
        }
        if self.stem {
            config.stem_content = true;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => {
            let artifact = run_corpus(&args)?;
            println!("Analyzed {} texts; results saved to {}", artifact.len(), args.output.display());
            print!("{}", summarize(&artifact));
            Ok(())
        }
        Commands::Text { file, title, settings } => {
            let record = analyze_file(&file, title, &settings)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Summary { artifact } => {
            let artifact = load_artifact(&artifact)?;
            print!("{}", summarize(&artifact));
            Ok(())
        }
    }
}

/// Load the corpus, analyze it and write the artifact; nothing is written on failure.
pub fn run_corpus(args: &RunArgs) -> Result<AnalysisArtifact> {
    let config = args.settings.resolve()?;
    tracing::debug!(?config, "resolved configuration");
    let corpus = match &args.manifest {
        Some(manifest) => Corpus::from_manifest(manifest)?,
        None => Corpus::from_dir(&args.input)?,
    };
    let artifact = litmetrics::run(&corpus, &config, &args.output)
        .with_context(|| format!("analysis of {} texts failed", corpus.len()))?;
    Ok(artifact)
}

pub fn analyze_file(file: &Path, title: Option<String>, settings: &Settings) -> Result<AnalysisRecord> {
    let config = settings.resolve()?;
    let title = match title {
        Some(t) => t,
        None => title_from_path(file)?,
    };
    let text = load_document(&TextSource { title: title.clone(), path: file.to_path_buf() })?;
    let resources = Resources::load(&config)?;
    Ok(analyze_text(&title, &text, &resources, &config))
}

fn title_from_path(file: &Path) -> Result<String> {
    let Some(name) = file.file_name().and_then(|s| s.to_str()) else {
        bail!("cannot derive a title from {}", file.display());
    };
    let title = name
        .strip_suffix(CLEAN_SUFFIX)
        .or_else(|| file.file_stem().and_then(|s| s.to_str()))
        .unwrap_or(name);
    Ok(title.to_string())
}

/// Human-readable digest, one block per title.
pub fn summarize(artifact: &AnalysisArtifact) -> String {
    let mut out = String::from("\nSummary:\n");
    out.push_str(&"-".repeat(60));
    out.push('\n');
    for record in artifact.records() {
        let lex = &record.lexical_diversity;
        let sentiment = &record.sentiment;
        let top: Vec<&str> = record.word_frequencies.iter().take(5).map(|(w, _)| w).collect();
        let _ = writeln!(out, "\n{}:", record.title);
        let _ = writeln!(
            out,
            "  Words: {} | Unique: {} | TTR: {:.4}",
            lex.total_words, lex.unique_words, lex.type_token_ratio
        );
        let _ = writeln!(
            out,
            "  Sentiment: {} (compound: {:.4})",
            sentiment.overall, sentiment.scores.compound
        );
        let _ = writeln!(out, "  Topics: {} | Top words: {}", record.topics.len(), top.join(", "));
    }
    out
}
