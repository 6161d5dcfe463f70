//! Best score persistence
//!
//! A single best score, stored as a small JSON record: a file on native
//! targets, LocalStorage on the web. Storage is best-effort. A failed read
//! counts as zero and a failed write is logged and dropped, so neither ever
//! reaches the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a best-score store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored best score is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(&'static str),
}

/// Persisted best-score record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    #[serde(default)]
    pub timestamp: f64,
}

impl BestScore {
    pub fn new(score: u64) -> Self {
        Self {
            score,
            timestamp: now_ms(),
        }
    }
}

/// Somewhere the best score lives
pub trait ScoreStore {
    /// Stored best, or 0 if nothing has been stored yet
    fn load(&self) -> Result<u64, StoreError>;
    fn save(&mut self, best: u64) -> Result<(), StoreError>;
}

/// Result of reporting a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    pub best_score: u64,
    pub new_best: bool,
}

/// Read the best score, treating any failure as zero
pub fn load_or_zero(store: &dyn ScoreStore) -> u64 {
    match store.load() {
        Ok(best) => best,
        Err(e) => {
            log::warn!("Could not read best score, using 0: {}", e);
            0
        }
    }
}

/// Compare a final score to the stored best and persist it if it improves
pub fn record_if_improved(store: &mut dyn ScoreStore, final_score: u64) -> ReportOutcome {
    let stored = load_or_zero(store);
    if final_score <= stored {
        return ReportOutcome {
            best_score: stored,
            new_best: false,
        };
    }

    match store.save(final_score) {
        Ok(()) => log::info!("New best score {} (was {})", final_score, stored),
        Err(e) => log::warn!("Could not save best score {}: {}", final_score, e),
    }
    ReportOutcome {
        best_score: final_score,
        new_best: true,
    }
}

/// In-memory store for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<BestScore>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(score: u64) -> Self {
        Self {
            best: Some(BestScore::new(score)),
        }
    }

    pub fn record(&self) -> Option<BestScore> {
        self.best
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.best.map(|b| b.score).unwrap_or(0))
    }

    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        self.best = Some(BestScore::new(best));
        Ok(())
    }
}

/// JSON file store (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn load(&self) -> Result<u64, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: BestScore = serde_json::from_str(&json)?;
        Ok(record.score)
    }

    /// Write to a temp file, then rename over the old record
    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&BestScore::new(best))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "aries_runner_best_score";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable("LocalStorage"))
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn load(&self) -> Result<u64, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(serde_json::from_str::<BestScore>(&json)?.score),
            Ok(None) => Ok(0),
            Err(_) => Err(StoreError::Unavailable("LocalStorage read")),
        }
    }

    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&BestScore::new(best))?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable("LocalStorage write"))
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
