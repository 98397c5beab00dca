//! Persisted run state, one small record per dataset.

use crate::state::error::StateError;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// What the previous completed run of a dataset recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Period key of the last completed run, see [`crate::RefreshCadence`].
    pub last_update: Option<String>,
    pub records_processed: u64,
}

impl RunState {
    pub fn new(last_update: impl Into<String>, records_processed: u64) -> Self {
        Self {
            last_update: Some(last_update.into()),
            records_processed,
        }
    }

    /// State after a completed run in `period_key`. The stored key never
    /// moves backwards, even if the clock does.
    pub fn advanced(&self, period_key: String, records_processed: u64) -> Self {
        let last_update = match &self.last_update {
            Some(previous) if previous.as_str() > period_key.as_str() => previous.clone(),
            _ => period_key,
        };
        Self {
            last_update: Some(last_update),
            records_processed,
        }
    }
}

/// Durable key-value storage of [`RunState`], scoped per dataset name.
#[allow(async_fn_in_trait)]
pub trait StateStore {
    /// Returns the default state when nothing was saved under `key` yet.
    async fn load(&self, key: &str) -> Result<RunState, StateError>;
    async fn save(&self, key: &str, state: &RunState) -> Result<(), StateError>;
}

/// Stores each dataset's state as a bincode file `{dir}/{key}.bin`.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", key))
    }

    /// Writes through a temporary file in `dir` that replaces `path` once
    /// complete, so an interrupted save leaves the previous state intact.
    fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), StateError> {
        let mut temp_file = NamedTempFile::new_in(dir)
            .map_err(|e| StateError::StateWrite(path.to_path_buf(), e))?;
        temp_file
            .write_all(bytes)
            .and_then(|_| temp_file.as_file().sync_all())
            .map_err(|e| StateError::StateWrite(path.to_path_buf(), e))?;
        temp_file
            .persist(path)
            .map_err(|e| StateError::StateWrite(path.to_path_buf(), e.error))?;
        Ok(())
    }

    fn decode(path: &Path, bytes: &[u8]) -> Result<RunState, StateError> {
        let (state, _) = bincode::serde::decode_from_slice::<RunState, _>(bytes, BINCODE_CONFIG)
            .map_err(|e| StateError::StateDecode(path.to_path_buf(), Box::new(e)))?;
        Ok(state)
    }
}

impl StateStore for FileStateStore {
    async fn load(&self, key: &str) -> Result<RunState, StateError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No saved state for '{}', starting fresh", key);
                return Ok(RunState::default());
            }
            Err(e) => return Err(StateError::StateRead(path, e)),
        };
        tokio::task::spawn_blocking(move || Self::decode(&path, &bytes)).await?
    }

    async fn save(&self, key: &str, state: &RunState) -> Result<(), StateError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StateError::StateDirCreation(self.dir.clone(), e))?;
        let owned = state.clone();
        let key_owned = key.to_string();
        let dir = self.dir.clone();
        let path = self.path_for(key);
        tokio::task::spawn_blocking(move || {
            let bytes = bincode::serde::encode_to_vec(owned, BINCODE_CONFIG)
                .map_err(|e| StateError::StateEncode(key_owned, Box::new(e)))?;
            Self::write_atomically(&dir, &path, &bytes)
        })
        .await?
    }
}

/// Non-durable store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: Mutex<HashMap<String, RunState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<RunState> {
        self.states
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

impl StateStore for MemoryStateStore {
    async fn load(&self, key: &str) -> Result<RunState, StateError> {
        Ok(self.get(key).unwrap_or_default())
    }

    async fn save(&self, key: &str, state: &RunState) -> Result<(), StateError> {
        self.states
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), state.clone());
        Ok(())
    }
}
