//! Levels stored as JSON documents in a directory, one file per level.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use grid_strike_core::LevelData;
use grid_strike_world::level::{LevelStore, LevelStoreError};

/// Directory-backed level store; level `name` maps to `<root>/<name>.json`.
#[derive(Debug)]
pub(crate) struct JsonLevelStore {
    root: PathBuf,
}

impl JsonLevelStore {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

fn backend_error(error: io::Error) -> LevelStoreError {
    LevelStoreError::Backend(error.to_string())
}

impl LevelStore for JsonLevelStore {
    fn load(&self, name: &str) -> Result<LevelData, LevelStoreError> {
        let path = self.path_for(name);
        let contents = fs::read_to_string(&path).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                LevelStoreError::NotFound {
                    name: name.to_owned(),
                }
            } else {
                backend_error(error)
            }
        })?;
        serde_json::from_str(&contents).map_err(|error| LevelStoreError::Malformed {
            name: name.to_owned(),
            reason: error.to_string(),
        })
    }

    fn save(&mut self, name: &str, level: &LevelData) -> Result<(), LevelStoreError> {
        fs::create_dir_all(&self.root).map_err(backend_error)?;
        let json = serde_json::to_string_pretty(level)
            .map_err(|error| LevelStoreError::Backend(error.to_string()))?;
        fs::write(self.path_for(name), json).map_err(backend_error)
    }

    fn list(&self) -> Result<Vec<String>, LevelStoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(backend_error(error)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(backend_error)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&mut self, name: &str) -> Result<(), LevelStoreError> {
        let path = self.path_for(name);
        fs::remove_file(&path).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                LevelStoreError::NotFound {
                    name: name.to_owned(),
                }
            } else {
                backend_error(error)
            }
        })
    }
}

/// Reads a level document from an arbitrary path outside the store.
pub(crate) fn read_level_file(path: &Path) -> anyhow::Result<LevelData> {
    let contents = fs::read_to_string(path)
        .map_err(|error| anyhow::anyhow!("cannot read {}: {error}", path.display()))?;
    let level = serde_json::from_str(&contents)
        .map_err(|error| anyhow::anyhow!("{} is not a valid level: {error}", path.display()))?;
    Ok(level)
}
