use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// State that survives between sessions.
///
/// Example JSON:
/// {"lastCity":"Paris","recentSearches":["Paris","Oslo"]}
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub last_city: Option<String>,
    #[serde(default)]
    pub recent_searches: Vec<String>,
}

pub trait StateStore {
    fn load(&self) -> Result<PersistedState>;
    fn save(&mut self, state: &PersistedState) -> Result<()>;
}

/// JSON file in the platform data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-user location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("state.json"))
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<PersistedState> {
        if !self.path.exists() {
            return Ok(PersistedState::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(state).context("Failed to serialize state to JSON")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }
}

/// Keeps state in memory only; nothing outlives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: PersistedState,
    saves: usize,
}

impl MemoryStore {
    pub fn new(state: PersistedState) -> Self {
        Self { state, saves: 0 }
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    /// Number of times `save` has been called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<PersistedState> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        self.state = state.clone();
        self.saves += 1;
        Ok(())
    }
}
