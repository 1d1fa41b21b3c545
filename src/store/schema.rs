use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::key_stats::KeyStatRecord;

pub const SCHEMA_VERSION: u32 = 1;

/// On-disk form of the per-key statistics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyStatsData {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub stats: KeyStatRecord,
}

impl KeyStatsData {
    pub fn new(stats: KeyStatRecord) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            stats,
        }
    }

    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

impl Default for KeyStatsData {
    fn default() -> Self {
        Self::new(KeyStatRecord::for_all_schemes())
    }
}
