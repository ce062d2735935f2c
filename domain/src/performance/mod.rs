//! Per-model performance statistics
//!
//! A [`PerformanceRecord`] is created the first time a model contributes and
//! is folded forward after every run. The container that serializes
//! concurrent updates lives in the application layer.

use crate::orchestration::value_objects::Contribution;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rolling statistics for one model identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub model_id: String,
    /// Two-point moving average: `(previous + latest) / 2`
    pub average_latency_ms: f64,
    /// `1.0` after any success; failures leave it untouched once seeded
    pub success_rate: f64,
    pub last_used: DateTime<Utc>,
    pub total_calls: u64,
    pub failed_calls: u64,
}

impl PerformanceRecord {
    /// Seed a record from a model's first contribution.
    pub fn seed(contribution: &Contribution, now: DateTime<Utc>) -> Self {
        let success = contribution.is_success();
        Self {
            model_id: contribution.model_id.clone(),
            average_latency_ms: contribution.latency_ms as f64,
            success_rate: if success { 1.0 } else { 0.0 },
            last_used: now,
            total_calls: 1,
            failed_calls: u64::from(!success),
        }
    }

    /// Fold a later contribution into the record.
    pub fn update(&mut self, contribution: &Contribution, now: DateTime<Utc>) {
        self.average_latency_ms = (self.average_latency_ms + contribution.latency_ms as f64) / 2.0;
        if contribution.is_success() {
            self.success_rate = 1.0;
        } else {
            self.failed_calls += 1;
        }
        self.total_calls += 1;
        self.last_used = now;
    }
}
