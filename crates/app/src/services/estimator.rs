use std::sync::Arc;
use std::time::Instant;

use ledger_core::{
    ActionCostEstimate, CostPath, CostWindow, FALLBACK_ACTION_COST, MIN_ACTION_SAMPLES,
    quantize_action_cost,
};
use ledger_db::{ActionCostQuery, Db};
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::Result;
use crate::services::{SharedConfig, open_db, require_agent_id};
use crate::telemetry::{EstimateRecord, EstimateSink};
use crate::util::clock::Clock;

/// Estimates what one agent action costs from the trailing window of billing
/// events. Stateless: every call samples the clock once and queries fresh.
#[derive(Clone)]
pub struct EstimatorService {
    config: SharedConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EstimateSink>,
}

impl EstimatorService {
    pub(super) fn new(
        config: SharedConfig,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn EstimateSink>,
    ) -> Self {
        Self {
            config,
            clock,
            sink,
        }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn average_action_cost(&self, agent_id: &str) -> Result<Decimal> {
        Ok(self.estimate(agent_id)?.value)
    }

    pub fn estimate(&self, agent_id: &str) -> Result<ActionCostEstimate> {
        require_agent_id(agent_id)?;
        let started = Instant::now();
        let window = CostWindow::trailing(self.clock.now());
        let result = self
            .db()
            .and_then(|db| estimate_with_db(&db, agent_id, window));
        match result {
            Ok(estimate) => {
                self.sink
                    .record(&EstimateRecord::new(&estimate, started.elapsed()));
                Ok(estimate)
            }
            Err(err) => {
                warn!(
                    agent_id,
                    error = %err,
                    elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                    "agent average action cost failed"
                );
                Err(err)
            }
        }
    }
}

fn estimate_with_db(db: &Db, agent_id: &str, window: CostWindow) -> Result<ActionCostEstimate> {
    let query = ActionCostQuery::new(agent_id, window);
    let record_count = db.count_distinct_actions(&query)?;
    let mean = if record_count < MIN_ACTION_SAMPLES {
        None
    } else {
        db.average_action_cost_raw(&query)?
    };
    let (value, path) = resolve(record_count, mean);
    Ok(ActionCostEstimate {
        agent_id: agent_id.to_string(),
        value,
        path,
        record_count,
        window_start: window.start,
        window_end: window.end,
    })
}

/// Picks the reported value from the distinct-action count and the raw mean.
fn resolve(record_count: u64, mean: Option<Decimal>) -> (Decimal, CostPath) {
    if record_count < MIN_ACTION_SAMPLES {
        return (FALLBACK_ACTION_COST, CostPath::SparseFallback);
    }
    match mean {
        Some(mean) => (quantize_action_cost(mean), CostPath::Computed),
        None => (FALLBACK_ACTION_COST, CostPath::EmptyFallback),
    }
}
