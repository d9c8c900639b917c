use std::collections::HashMap;
use std::path;
use std::sync::Mutex;

use super::*;

/// Fetches the raw export of a configuration source.
///
/// Implementations may cache; callers evict a path with [`ModuleLoader::invalidate`] right
/// before loading it when they need a fresh read.
#[async_trait::async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self, path: &path::Path) -> Result<RawConfigExport>;

    fn invalidate(&self, _path: &path::Path) {}
}

/// Loads configuration files from disk, picking the format from the extension.
///
/// `.json` and `.toml` are supported alongside YAML, which is also the fallback.
#[derive(Debug, Default)]
pub struct FileLoader {
    cache: Mutex<HashMap<path::PathBuf, Value>>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(path: &path::Path) -> Result<Value> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Status::new("Failed to read config")
                .with_source(e)
                .context_with(|c| c.insert("Path", path.display().to_string()))
        })?;
        if content.trim().is_empty() {
            return Ok(Value::Mapping(Mapping::new()));
        }

        let format = SourceFormat::from_path(path);
        log::trace!("Parsing {} as {:?}", path.display(), format);
        format.parse(&content).map_err(|e| {
            e.context_with(|c| c.insert("Path", path.display().to_string()))
        })
    }
}

#[async_trait::async_trait]
impl ModuleLoader for FileLoader {
    async fn load(&self, path: &path::Path) -> Result<RawConfigExport> {
        if let Some(value) = self.cache_lock().get(path) {
            log::trace!("Using cached config for {}", path.display());
            return Ok(RawConfigExport::Value(value.clone()));
        }

        let value = Self::read(path)?;
        self.cache_lock().insert(path.to_owned(), value.clone());
        Ok(RawConfigExport::Value(value))
    }

    fn invalidate(&self, path: &path::Path) {
        if self.cache_lock().remove(path).is_some() {
            log::trace!("Invalidated cached config for {}", path.display());
        }
    }
}

impl FileLoader {
    fn cache_lock(&self) -> std::sync::MutexGuard<'_, HashMap<path::PathBuf, Value>> {
        // Entries are inserted whole, poisoning can't leave one half-written.
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SourceFormat {
    Yaml,
    Json,
    Toml,
}

impl SourceFormat {
    fn from_path(path: &path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    fn parse(self, content: &str) -> Result<Value> {
        match self {
            Self::Yaml => serde_yaml::from_str(content)
                .map_err(|e| Status::new("Failed to parse config").with_source(e)),
            Self::Json => {
                let value: serde_json::Value = serde_json::from_str(content)
                    .map_err(|e| Status::new("Failed to parse config").with_source(e))?;
                serde_yaml::to_value(value)
                    .map_err(|e| Status::new("Failed to convert config").with_source(e))
            }
            Self::Toml => {
                let value: toml::Table = toml::from_str(content)
                    .map_err(|e| Status::new("Failed to parse config").with_source(e))?;
                serde_yaml::to_value(value)
                    .map_err(|e| Status::new("Failed to convert config").with_source(e))
            }
        }
    }
}
