use crate::error::{AnalysisError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix that marks a cleaned text ready for analysis.
pub const CLEAN_SUFFIX: &str = "_clean.txt";

/// Where one text lives, before it is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextSource {
    pub title: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub title: String,
    pub path: PathBuf,
    pub text: String,
}

/// Loaded texts in a stable order; immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

/// Recursively collect `*_clean.txt` files under `dir`, sorted by file name.
pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<TextSource>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(AnalysisError::Read {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "input directory not found"),
        });
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if !p.is_file() {
            continue;
        }
        let Some(name) = p.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(title) = name.strip_suffix(CLEAN_SUFFIX) {
            if title.is_empty() {
                continue;
            }
            sources.push(TextSource { title: title.to_string(), path: p.to_path_buf() });
        }
    }
    tracing::debug!(dir = %dir.display(), found = sources.len(), "discovered texts");
    Ok(sources)
}

/// Read a JSON array of `{ "title", "path" }`; relative paths resolve against the manifest.
pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<TextSource>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| AnalysisError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut sources: Vec<TextSource> = serde_json::from_str(&raw).map_err(|source| AnalysisError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or(Path::new(""));
    for s in sources.iter_mut() {
        if s.path.is_relative() {
            s.path = base.join(&s.path);
        }
    }
    Ok(sources)
}

/// Fail on the first title that appears twice.
pub fn check_unique_titles(sources: &[TextSource]) -> Result<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for s in sources {
        if let Some(first) = seen.insert(s.title.as_str(), s.path.as_path()) {
            return Err(AnalysisError::DuplicateTitle {
                title: s.title.clone(),
                first: first.to_path_buf(),
                second: s.path.clone(),
            });
        }
    }
    Ok(())
}

/// Read one cleaned text as UTF-8, dropping a leading byte-order mark.
pub fn load_document(source: &TextSource) -> Result<String> {
    let text = std::fs::read_to_string(&source.path).map_err(|e| AnalysisError::Load {
        title: source.title.clone(),
        path: source.path.clone(),
        source: e,
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

impl Corpus {
    /// Validate titles, then read every source; any failure aborts the whole load.
    pub fn load(sources: Vec<TextSource>) -> Result<Self> {
        check_unique_titles(&sources)?;
        let mut entries = Vec::with_capacity(sources.len());
        for source in sources {
            let text = load_document(&source)?;
            tracing::info!(title = %source.title, bytes = text.len(), "loaded text");
            entries.push(CorpusEntry { title: source.title, path: source.path, text });
        }
        Ok(Self { entries })
    }

    /// Discover and load every cleaned text under `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let sources = discover(dir)?;
        if sources.is_empty() {
            return Err(AnalysisError::EmptyCorpus(dir.to_path_buf()));
        }
        Self::load(sources)
    }

    pub fn from_manifest<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let sources = read_manifest(path)?;
        if sources.is_empty() {
            return Err(AnalysisError::EmptyCorpus(path.to_path_buf()));
        }
        Self::load(sources)
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
