use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::AgentError;
use crate::model::fixture::normalize_team_name;
use crate::model::location::LocationCacheEntry;

/// Key/value store of geocoded teams and places. Entries never expire.
pub trait LocationCache {
    fn get(&self, team_name: &str) -> Option<LocationCacheEntry>;
    fn put(&mut self, entry: LocationCacheEntry) -> Result<(), AgentError>;
}

fn cache_key(team_name: &str) -> String {
    normalize_team_name(team_name)
}

/// JSON file cache: loaded when opened, rewritten on every put.
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    entries: HashMap<String, LocationCacheEntry>,
}

impl JsonFileCache {
    /// Open the cache at `path`. A missing file is an empty cache; a corrupt
    /// one is logged and treated as empty so it gets rewritten on the next put.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let path = path.as_ref().to_path_buf();
        let entries: HashMap<String, LocationCacheEntry> = match fs::read_to_string(&path) {
            Ok(body) => serde_json::from_str(&body).unwrap_or_else(|e| {
                warn!(error = %e, path = %path.display(), "Ignoring unreadable location cache");
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), entries = entries.len(), "Opened location cache");
        Ok(Self { path, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&self) -> Result<(), AgentError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}

impl LocationCache for JsonFileCache {
    fn get(&self, team_name: &str) -> Option<LocationCacheEntry> {
        self.entries.get(&cache_key(team_name)).cloned()
    }

    fn put(&mut self, entry: LocationCacheEntry) -> Result<(), AgentError> {
        self.entries.insert(cache_key(&entry.team_name), entry);
        self.flush()
    }
}

/// In-process cache with no persistence.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, LocationCacheEntry>,
}

impl LocationCache for MemoryCache {
    fn get(&self, team_name: &str) -> Option<LocationCacheEntry> {
        self.entries.get(&cache_key(team_name)).cloned()
    }

    fn put(&mut self, entry: LocationCacheEntry) -> Result<(), AgentError> {
        self.entries.insert(cache_key(&entry.team_name), entry);
        Ok(())
    }
}
