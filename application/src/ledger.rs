//! Performance ledger
//!
//! Process-wide rolling statistics per model identity. The ledger is owned
//! by whoever builds the [`OrchestrateUseCase`](crate::use_cases::orchestrate::OrchestrateUseCase)
//! and injected as an `Arc`, so tests can use isolated instances.

use chrono::Utc;
use ensemble_domain::{Contribution, PerformanceRecord};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Lock-protected map of [`PerformanceRecord`]s keyed by model id.
///
/// All updates for one run happen under a single lock acquisition, so
/// concurrent runs touching the same model are serialized.
#[derive(Debug, Default)]
pub struct PerformanceLedger {
    records: Mutex<HashMap<String, PerformanceRecord>>,
}

impl PerformanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PerformanceRecord>> {
        // Records only hold plain fields, so a poisoned map is still consistent.
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fold one completed run's contributions into the ledger.
    pub fn record(&self, contributions: &[Contribution]) {
        let now = Utc::now();
        let mut records = self.lock();

        for contribution in contributions {
            match records.get_mut(&contribution.model_id) {
                Some(record) => record.update(contribution, now),
                None => {
                    records.insert(
                        contribution.model_id.clone(),
                        PerformanceRecord::seed(contribution, now),
                    );
                }
            }
        }

        debug!(
            "Performance ledger updated with {} contributions ({} models tracked)",
            contributions.len(),
            records.len()
        );
    }

    /// Point-in-time snapshot of every record. Order is unspecified.
    pub fn stats(&self) -> Vec<PerformanceRecord> {
        self.lock().values().cloned().collect()
    }

    /// Snapshot of one model's record.
    pub fn get(&self, model_id: &str) -> Option<PerformanceRecord> {
        self.lock().get(model_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
