mod agents;
mod estimator;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::{AppError, Result};
use crate::telemetry::{EstimateSink, TracingSink};
use crate::util::clock::{Clock, SystemClock};
use ledger_db::Db;

pub use agents::{AgentStore, AgentsService, SqliteAgentStore};
pub use estimator::EstimatorService;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub estimator: EstimatorService,
    pub agents: AgentsService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_hooks(config, Arc::new(SystemClock), Arc::new(TracingSink))
    }

    pub fn with_hooks(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn EstimateSink>,
    ) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            estimator: EstimatorService::new(shared.clone(), clock, sink),
            agents: AgentsService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}

fn require_agent_id(agent_id: &str) -> Result<()> {
    if agent_id.trim().is_empty() {
        return Err(AppError::InvalidInput("agent_id is required".to_string()));
    }
    Ok(())
}

fn missing_record(kind: &str, agent_id: &str) -> AppError {
    AppError::NotFound(format!("{kind} not found for agent {agent_id}"))
}
