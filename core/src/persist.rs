use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::record::AnalysisArtifact;
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::fs::{create_dir_all, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const ARTIFACT_VERSION: u32 = 1;

/// Run metadata written beside the artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_texts: usize,
    pub created_at: String,
    pub version: u32,
    pub config: AnalysisConfig,
}

impl MetaFile {
    pub fn new(num_texts: usize, config: &AnalysisConfig) -> Self {
        let created_at = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        Self { num_texts, created_at, version: ARTIFACT_VERSION, config: config.clone() }
    }
}

/// `<artifact>.meta.json` next to the artifact.
pub fn meta_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("meta.json")
}

/// Pretty JSON with every float written to four fixed decimals.
struct FixedPrecision<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> FixedPrecision<'a> {
    fn new() -> Self {
        Self { inner: PrettyFormatter::with_indent(b"  ") }
    }
}

impl Formatter for FixedPrecision<'_> {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        let value = if value.is_finite() { value + 0.0 } else { 0.0 };
        write!(writer, "{value:.4}")
    }

    fn write_f32<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        self.write_f64(writer, f64::from(value))
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// Canonical bytes of an artifact; identical input gives identical bytes.
pub fn to_json_bytes(artifact: &AnalysisArtifact) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, FixedPrecision::new());
    artifact.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Replace whatever is at `path` with the artifact.
pub fn save_artifact(path: &Path, artifact: &AnalysisArtifact) -> Result<()> {
    let bytes = to_json_bytes(artifact)?;
    write_file(path, &bytes)
}

pub fn load_artifact(path: &Path) -> Result<AnalysisArtifact> {
    let raw = std::fs::read_to_string(path).map_err(|source| AnalysisError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| AnalysisError::Json { path: path.to_path_buf(), source })
}

pub fn save_meta(path: &Path, meta: &MetaFile) -> Result<()> {
    let json = serde_json::to_string_pretty(meta)?;
    write_file(path, json.as_bytes())
}

pub fn load_meta(path: &Path) -> Result<MetaFile> {
    let raw = std::fs::read_to_string(path).map_err(|source| AnalysisError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| AnalysisError::Json { path: path.to_path_buf(), source })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let wrap = |source: io::Error| AnalysisError::Write { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(wrap)?;
    }
    let mut f = File::create(path).map_err(wrap)?;
    f.write_all(bytes).map_err(wrap)?;
    Ok(())
}
