use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::speed::{self, SpeedFormula, SpeedLabel};
use crate::keyboard::scheme;

/// Accumulated samples for one key. `total_time` is in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyStat {
    pub count: u64,
    pub total_time: f64,
}

impl KeyStat {
    pub fn speed(&self, formula: &dyn SpeedFormula) -> u32 {
        speed::key_speed(self.count, self.total_time, formula)
    }

    pub fn label(&self, formula: &dyn SpeedFormula) -> SpeedLabel {
        SpeedLabel::from_speed(self.speed(formula))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyStatRecord {
    stats: BTreeMap<String, KeyStat>,
}

impl KeyStatRecord {
    /// A record holding a zero entry for every key of every known scheme, so
    /// any scheme can be rendered from it.
    pub fn for_all_schemes() -> Self {
        let mut record = Self::default();
        record.backfill_scheme_keys();
        record
    }

    /// Insert zero entries for scheme keys the record does not know yet.
    /// Returns how many were added.
    pub fn backfill_scheme_keys(&mut self) -> usize {
        let mut added = 0;
        for key in scheme::all_scheme_keys() {
            if !self.contains(key) {
                self.stats.insert(key.to_string(), KeyStat::default());
                added += 1;
            }
        }
        added
    }

    pub fn record(&mut self, key: &str, elapsed_ms: f64) {
        let stat = self.stats.entry(key.to_string()).or_default();
        stat.count += 1;
        stat.total_time += elapsed_ms.max(0.0);
    }

    pub fn get(&self, key: &str) -> Option<&KeyStat> {
        self.stats.get(key)
    }

    /// Stats for `key`, or zero stats when the record has no entry.
    pub fn get_or_zero(&self, key: &str) -> KeyStat {
        self.stats.get(key).copied().unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.stats.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.stats.values().map(|s| s.count).sum()
    }
}
