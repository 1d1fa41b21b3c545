use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::key_stats::KeyStatRecord;
use crate::store::schema::{KeyStatsData, SCHEMA_VERSION};

const KEY_STATS_FILE: &str = "key_stats.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed store data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported schema version {found} (expected {expected})")]
    UnsupportedSchema { found: u32, expected: u32 },
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fasttype");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn key_stats_path(&self) -> PathBuf {
        self.file_path(KEY_STATS_FILE)
    }

    /// Strict read: `Ok(None)` when nothing was saved yet.
    pub fn read_key_stats(&self) -> Result<Option<KeyStatsData>> {
        let path = self.key_stats_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let data: KeyStatsData = serde_json::from_str(&content)?;
        if data.needs_reset() {
            return Err(StoreError::UnsupportedSchema {
                found: data.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(Some(data))
    }

    /// Load the saved record, backfilled with every scheme key. Anything
    /// unreadable is logged and replaced by a fresh record.
    pub fn load_key_stats(&self) -> KeyStatRecord {
        let mut record = match self.read_key_stats() {
            Ok(Some(data)) => {
                debug!(saved_at = %data.saved_at, keys = data.stats.len(), "loaded key stats");
                data.stats
            }
            Ok(None) => KeyStatRecord::default(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable key stats");
                KeyStatRecord::default()
            }
        };
        record.backfill_scheme_keys();
        record
    }

    pub fn save_key_stats(&self, record: &KeyStatRecord) -> Result<()> {
        let data = KeyStatsData::new(record.clone());
        let path = self.key_stats_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        debug!(keys = record.len(), samples = record.total_count(), "saved key stats");
        Ok(())
    }

    pub fn reset_key_stats(&self) -> Result<()> {
        let path = self.key_stats_path();
        if path.exists() {
            fs::remove_file(&path)?;
            info!("key stats reset");
        }
        Ok(())
    }
}
