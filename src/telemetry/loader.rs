// src/telemetry/loader.rs — Locates and reads one XML export per category

use std::path::{Path, PathBuf};

use super::{Category, TelemetryDocument};
use crate::infra::config::PathsConfig;
use crate::infra::errors::OptiscopeError;

/// Reads raw telemetry from per-category folders. Content is passed through
/// verbatim; well-formedness is never checked.
#[derive(Debug, Clone)]
pub struct TelemetryLoader {
    paths: PathsConfig,
}

impl TelemetryLoader {
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }

    /// Loader rooted at `data_dir` with the default folder names.
    pub fn rooted_at(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(PathsConfig {
            data_dir: data_dir.into(),
            ..Default::default()
        })
    }

    pub fn folder(&self, category: Category) -> PathBuf {
        self.paths.category_dir(category)
    }

    /// Path of the first `*.xml` file (sorted by path) in the category folder.
    pub fn locate(&self, category: Category) -> Result<PathBuf, OptiscopeError> {
        let folder = self.folder(category);
        first_xml_file(&folder).ok_or_else(|| OptiscopeError::NotFound {
            category,
            folder: folder.display().to_string(),
        })
    }

    /// Load the file picked by [`locate`](Self::locate).
    pub fn load(&self, category: Category) -> Result<TelemetryDocument, OptiscopeError> {
        let path = self.locate(category)?;
        read_document(category, path)
    }

    /// Load an explicitly named file from the category folder.
    pub fn load_file(
        &self,
        category: Category,
        file_name: &str,
    ) -> Result<TelemetryDocument, OptiscopeError> {
        let folder = self.folder(category);
        let path = folder.join(file_name);
        if !path.is_file() {
            return Err(OptiscopeError::NotFound {
                category,
                folder: folder.display().to_string(),
            });
        }
        read_document(category, path)
    }

    /// Like [`load`](Self::load), but a missing file yields empty text.
    /// Other IO failures still propagate.
    pub fn load_or_empty(&self, category: Category) -> Result<String, OptiscopeError> {
        match self.load(category) {
            Ok(doc) => Ok(doc.into_content()),
            Err(e) if e.is_not_found() => {
                tracing::warn!("{e}; continuing with an empty {category} block");
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }
}

fn first_xml_file(folder: &Path) -> Option<PathBuf> {
    // The folder itself may contain glob metacharacters such as `site[1]`.
    let pattern = format!("{}/*.xml", glob::Pattern::escape(&folder.to_string_lossy()));
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    matches.sort();
    matches.into_iter().next()
}

fn read_document(category: Category, path: PathBuf) -> Result<TelemetryDocument, OptiscopeError> {
    let content = std::fs::read_to_string(&path)?;
    tracing::debug!(
        "Loaded {} telemetry from {} ({} bytes)",
        category,
        path.display(),
        content.len()
    );
    Ok(TelemetryDocument::new(category, path, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_first_match_sorted() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "pm/b_roadm.xml", "<pm>b</pm>");
        write(tmp.path(), "pm/a_roadm.xml", "<pm>a</pm>");
        write(tmp.path(), "pm/summary.txt", "not xml");

        let loader = TelemetryLoader::rooted_at(tmp.path());
        let doc = loader.load(Category::Pm).unwrap();
        assert_eq!(doc.content(), "<pm>a</pm>");
        assert!(doc.source().ends_with("a_roadm.xml"));
    }

    #[test]
    fn test_load_missing_folder_not_found() {
        let tmp = TempDir::new().unwrap();
        let loader = TelemetryLoader::rooted_at(tmp.path());
        let err = loader.load(Category::Alarm).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_folder_without_xml_not_found() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "topology/readme.txt", "nothing here");
        let loader = TelemetryLoader::rooted_at(tmp.path());
        assert!(loader.load(Category::Topology).unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_passes_malformed_text_through() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "alarm/broken.xml", "<alarm><unclosed>");
        let loader = TelemetryLoader::rooted_at(tmp.path());
        let doc = loader.load(Category::Alarm).unwrap();
        assert_eq!(doc.content(), "<alarm><unclosed>");
    }

    #[test]
    fn test_load_file_explicit() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "pm/a.xml", "first");
        write(tmp.path(), "pm/Ciena_ROADMA.xml", "chosen");
        let loader = TelemetryLoader::rooted_at(tmp.path());
        let doc = loader.load_file(Category::Pm, "Ciena_ROADMA.xml").unwrap();
        assert_eq!(doc.content(), "chosen");
        assert!(loader
            .load_file(Category::Pm, "missing.xml")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_load_or_empty() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "pm/a.xml", "<pm/>");
        let loader = TelemetryLoader::rooted_at(tmp.path());
        assert_eq!(loader.load_or_empty(Category::Pm).unwrap(), "<pm/>");
        assert_eq!(loader.load_or_empty(Category::Alarm).unwrap(), "");
    }

    #[test]
    fn test_load_under_folder_with_glob_metacharacters() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("site[1]");
        write(&root, "alarm/a.xml", "<alarm>LOS</alarm>");
        write(&root, "pm/p.xml", "<pm/>");

        let loader = TelemetryLoader::rooted_at(&root);
        assert_eq!(loader.load(Category::Alarm).unwrap().content(), "<alarm>LOS</alarm>");
        assert_eq!(loader.load_or_empty(Category::Pm).unwrap(), "<pm/>");
    }
}
