//! Per-call observability for cost estimates.
//!
//! The estimator hands one [`EstimateRecord`] to its sink per successful call.
//! [`TracingSink`] turns it into a structured `tracing` event; other sinks can
//! forward to metrics or collect records for inspection.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use ledger_core::{ActionCostEstimate, CostPath};
use rust_decimal::Decimal;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRecord {
    pub agent_id: String,
    pub value: Decimal,
    pub path: CostPath,
    pub record_count: u64,
    pub elapsed: Duration,
}

impl EstimateRecord {
    pub fn new(estimate: &ActionCostEstimate, elapsed: Duration) -> Self {
        Self {
            agent_id: estimate.agent_id.clone(),
            value: estimate.value,
            path: estimate.path,
            record_count: estimate.record_count,
            elapsed,
        }
    }
}

pub trait EstimateSink: Send + Sync {
    fn record(&self, record: &EstimateRecord);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EstimateSink for TracingSink {
    fn record(&self, record: &EstimateRecord) {
        info!(
            agent_id = %record.agent_id,
            result = %record.value,
            path = record.path.as_str(),
            fallback = record.path.is_fallback(),
            record_count = record.record_count,
            elapsed_ms = record.elapsed.as_secs_f64() * 1000.0,
            "agent average action cost"
        );
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<EstimateRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EstimateRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EstimateSink for RecordingSink {
    fn record(&self, record: &EstimateRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}
