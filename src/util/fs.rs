//! Filesystem collaborators.
//!
//! The transformation engine never opens file handles itself; all model
//! and artifact I/O goes through these traits so tests can substitute
//! in-memory implementations.

use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::model::artifact::NativeArtifact;
use crate::model::canonical::CanonicalModel;
use crate::util::errors::PipelineError;

/// Storage for canonical model files, one per locale.
pub trait ModelStore {
    /// Read the model for a locale. Missing file -> `ModelNotFound`.
    fn read_model(&self, locale: &str) -> Result<CanonicalModel, PipelineError>;

    /// Write (create or overwrite) the model for a locale.
    fn write_model(&self, locale: &str, model: &CanonicalModel) -> Result<(), PipelineError>;

    /// Copy the model aside with a same-day date suffix; returns the backup
    /// path.
    fn backup_model(&self, locale: &str) -> Result<PathBuf, PipelineError>;

    /// Locales with a model file, sorted.
    fn list_locales(&self) -> Result<Vec<String>, PipelineError>;

    /// Whether a model file exists for the locale.
    fn model_exists(&self, locale: &str) -> bool;
}

/// Model store over a project's models directory (`models/<locale>.json`).
#[derive(Debug, Clone)]
pub struct DirModelStore {
    dir: PathBuf,
}

impl DirModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirModelStore { dir: dir.into() }
    }

    pub fn model_path(&self, locale: &str) -> PathBuf {
        self.dir.join(format!("{locale}.json"))
    }
}

impl ModelStore for DirModelStore {
    fn read_model(&self, locale: &str) -> Result<CanonicalModel, PipelineError> {
        let path = self.model_path(locale);
        let contents = std::fs::read_to_string(&path).map_err(|_| PipelineError::ModelNotFound {
            locale: locale.to_string(),
            path: path.clone(),
        })?;
        serde_json::from_str(&contents).map_err(|e| PipelineError::InvalidModel {
            locale: locale.to_string(),
            reason: e.to_string(),
        })
    }

    fn write_model(&self, locale: &str, model: &CanonicalModel) -> Result<(), PipelineError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| PipelineError::io("failed to create models directory", &self.dir, e))?;
        let path = self.model_path(locale);
        let contents = serde_json::to_string_pretty(model)
            .map_err(|e| PipelineError::json("failed to serialize model", e))?;
        std::fs::write(&path, contents)
            .map_err(|e| PipelineError::io("failed to write model", &path, e))
    }

    fn backup_model(&self, locale: &str) -> Result<PathBuf, PipelineError> {
        let source = self.model_path(locale);
        let date = chrono::Local::now().format("%Y-%m-%d");
        let backup = self.dir.join(format!("{locale}.{date}.json"));
        std::fs::copy(&source, &backup)
            .map_err(|e| PipelineError::io("failed to back up model", &source, e))?;
        Ok(backup)
    }

    fn list_locales(&self) -> Result<Vec<String>, PipelineError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| PipelineError::io("failed to read models directory", &self.dir, e))?;

        let mut locales = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| PipelineError::io("failed to read models directory", &self.dir, e))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    // Backup files carry a `.YYYY-MM-DD` infix; skip them.
                    if !stem.contains('.') {
                        locales.push(stem.to_string());
                    }
                }
            }
        }
        locales.sort();
        Ok(locales)
    }

    fn model_exists(&self, locale: &str) -> bool {
        self.model_path(locale).is_file()
    }
}

/// Storage for native artifacts under one platform's build directory.
pub trait ArtifactStore {
    /// Read the artifact content at a path, if present.
    fn read(&self, path: &[String]) -> Result<Option<Value>, PipelineError>;

    /// Write an artifact, creating parent directories as needed.
    fn write(&self, artifact: &NativeArtifact) -> Result<(), PipelineError>;

    /// Read every JSON artifact under the build directory.
    fn read_all(&self) -> Result<Vec<NativeArtifact>, PipelineError>;
}

/// Artifact store over a platform build directory.
#[derive(Debug, Clone)]
pub struct DirArtifactStore {
    root: PathBuf,
}

impl DirArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirArtifactStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &[String]) -> PathBuf {
        let mut full = self.root.clone();
        full.extend(path);
        full
    }
}

impl ArtifactStore for DirArtifactStore {
    fn read(&self, path: &[String]) -> Result<Option<Value>, PipelineError> {
        let full = self.full_path(path);
        if !full.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&full)
            .map_err(|e| PipelineError::io("failed to read artifact", &full, e))?;
        let value = serde_json::from_str(&contents).map_err(|e| {
            PipelineError::json(format!("artifact {} is not valid JSON", full.display()), e)
        })?;
        Ok(Some(value))
    }

    fn write(&self, artifact: &NativeArtifact) -> Result<(), PipelineError> {
        let full = self.full_path(&artifact.path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PipelineError::io("failed to create artifact directory", parent, e))?;
        }
        let contents = serde_json::to_string_pretty(&artifact.content)
            .map_err(|e| PipelineError::json("failed to serialize artifact", e))?;
        std::fs::write(&full, contents)
            .map_err(|e| PipelineError::io("failed to write artifact", &full, e))
    }

    fn read_all(&self) -> Result<Vec<NativeArtifact>, PipelineError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| PipelineError::ConfigLoad {
                path: self.root.clone(),
                reason: format!("failed to walk build directory: {e}"),
            })?;
            if !entry.file_type().is_file()
                || entry.path().extension().is_none_or(|ext| ext != "json")
            {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .expect("walkdir yields paths under its root");
            let segments: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();

            // The file can disappear between the walk and the read.
            let Some(content) = self.read(&segments)? else {
                continue;
            };
            artifacts.push(NativeArtifact { path: segments, content });
        }
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::canonical::Intent;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_model() -> CanonicalModel {
        CanonicalModel {
            invocation: "test app".to_string(),
            intents: vec![Intent {
                name: "HelloIntent".to_string(),
                phrases: vec!["hello".to_string()],
                inputs: vec![],
            }],
            input_types: vec![],
        }
    }

    #[test]
    fn test_model_write_read_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = DirModelStore::new(tmp.path().join("models"));

        store.write_model("en", &sample_model()).unwrap();
        assert!(store.model_exists("en"));
        assert_eq!(store.read_model("en").unwrap(), sample_model());
    }

    #[test]
    fn test_missing_model_is_model_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = DirModelStore::new(tmp.path());
        let err = store.read_model("de").unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotFound { .. }));
    }

    #[test]
    fn test_backup_gets_date_suffix_and_is_not_listed() {
        let tmp = TempDir::new().unwrap();
        let store = DirModelStore::new(tmp.path());
        store.write_model("en", &sample_model()).unwrap();

        let backup = store.backup_model("en").unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("en."));
        assert!(name.ends_with(".json"));
        assert!(backup.is_file());

        // The backup is not a locale.
        assert_eq!(store.list_locales().unwrap(), vec!["en"]);
    }

    #[test]
    fn test_list_locales_sorted() {
        let tmp = TempDir::new().unwrap();
        let store = DirModelStore::new(tmp.path());
        store.write_model("de", &sample_model()).unwrap();
        store.write_model("en", &sample_model()).unwrap();

        assert_eq!(store.list_locales().unwrap(), vec!["de", "en"]);
    }

    #[test]
    fn test_artifact_round_trip_and_read_all() {
        let tmp = TempDir::new().unwrap();
        let store = DirArtifactStore::new(tmp.path());

        let artifact = NativeArtifact::new(["models", "en-US.json"], json!({"a": 1}));
        store.write(&artifact).unwrap();

        assert_eq!(store.read(&artifact.path).unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.read(&["missing.json".to_string()]).unwrap(), None);

        let all = store.read_all().unwrap();
        assert_eq!(all, vec![artifact]);
    }

    #[test]
    fn test_read_all_on_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = DirArtifactStore::new(tmp.path().join("never-built"));
        assert!(store.read_all().unwrap().is_empty());
    }
}
