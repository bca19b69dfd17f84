// src/core/results.rs — Flat-file result sink and export rendering
//
// Files are rewritten in full on each run, never appended. Writes are not
// atomic.

use std::path::{Path, PathBuf};

use crate::infra::errors::OptiscopeError;

pub const SUMMARY_FILE: &str = "summary.txt";
pub const ANALYSIS_FILE: &str = "analysis.txt";

/// Persist generated text at `path`, creating parent folders as needed.
pub fn write_result(path: &Path, text: &str) -> Result<PathBuf, OptiscopeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    tracing::info!("Result saved to {}", path.display());
    Ok(path.to_path_buf())
}

pub fn read_result(path: &Path) -> Result<String, OptiscopeError> {
    Ok(std::fs::read_to_string(path)?)
}

/// A folder of result files.
#[derive(Debug, Clone)]
pub struct ResultSink {
    dir: PathBuf,
}

impl ResultSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn write(&self, file_name: &str, text: &str) -> Result<PathBuf, OptiscopeError> {
        write_result(&self.path_of(file_name), text)
    }

    pub fn read(&self, file_name: &str) -> Result<String, OptiscopeError> {
        read_result(&self.path_of(file_name))
    }
}

/// Download formats offered to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(ExportFormat::Text),
            "markdown" | "md" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn render(&self, analysis: &str) -> String {
        match self {
            ExportFormat::Text => analysis.to_string(),
            ExportFormat::Markdown => format!("### Diagnostic Analysis\n\n{analysis}"),
        }
    }
}
