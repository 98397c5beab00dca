//! Where finished tables go. [`ParquetSink`] writes one Snappy-compressed
//! parquet file per dataset and run; [`MemorySink`] keeps frames in memory.

use crate::sink::error::SinkError;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tokio::task;

#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Stores `df` under `destination`. Called only with non-empty tables.
    async fn upload(&self, df: DataFrame, destination: &str) -> Result<(), SinkError>;
}

/// Writes `{dir}/{destination}/{run_id}.parquet`.
///
/// The file is written to a temporary file in the destination directory
/// first and moved into place once complete, so readers never observe a
/// partial file.
#[derive(Debug, Clone)]
pub struct ParquetSink {
    dir: PathBuf,
    run_id: String,
}

impl ParquetSink {
    pub fn new(dir: impl Into<PathBuf>, run_id: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            run_id: run_id.into(),
        }
    }

    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.dir
            .join(destination)
            .join(format!("{}.parquet", self.run_id))
    }

    fn write_atomically(mut df: DataFrame, target: &Path) -> Result<(), SinkError> {
        let parent = target.parent().unwrap_or(Path::new("."));
        let mut temp_file = NamedTempFile::new_in(parent)
            .map_err(|e| SinkError::ParquetWriteIo(target.to_path_buf(), e))?;
        ParquetWriter::new(temp_file.as_file_mut())
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)
            .map_err(|e| SinkError::ParquetWritePolars(target.to_path_buf(), e))?;
        temp_file
            .persist(target)
            .map_err(|e| SinkError::Persist(target.to_path_buf(), e.error))?;
        Ok(())
    }
}

impl Sink for ParquetSink {
    async fn upload(&self, df: DataFrame, destination: &str) -> Result<(), SinkError> {
        let target = self.path_for(destination);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SinkError::OutputDirCreation(parent.to_path_buf(), e))?;
        }

        let rows = df.height();
        let path = target.clone();
        task::spawn_blocking(move || Self::write_atomically(df, &path)).await??;
        info!("Wrote {} rows to {:?}", rows, target);
        Ok(())
    }
}

/// Collects uploaded frames, in upload order.
#[derive(Debug, Default)]
pub struct MemorySink {
    uploads: Mutex<Vec<(String, DataFrame)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<(String, DataFrame)> {
        self.uploads
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Sink for MemorySink {
    async fn upload(&self, df: DataFrame, destination: &str) -> Result<(), SinkError> {
        let mut uploads = self
            .uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        uploads.push((destination.to_string(), df));
        Ok(())
    }
}
