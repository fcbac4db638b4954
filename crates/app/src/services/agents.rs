use ledger_core::{Agent, AgentData, AgentDataPatch, AgentQuota};
use ledger_db::Db;

use crate::error::Result;
use crate::services::{SharedConfig, missing_record, open_db, require_agent_id};

/// Per-agent record access. Implementations are bound to one agent id.
pub trait AgentStore {
    fn agent_id(&self) -> &str;

    fn get_config(&self) -> Result<Option<Agent>>;

    fn get_data(&self) -> Result<Option<AgentData>>;

    /// Partial update: only fields set on `patch` change.
    fn set_data(&self, patch: &AgentDataPatch) -> Result<()>;

    fn get_quota(&self) -> Result<Option<AgentQuota>>;
}

#[derive(Clone)]
pub struct SqliteAgentStore {
    agent_id: String,
    config: SharedConfig,
}

impl SqliteAgentStore {
    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }
}

impl AgentStore for SqliteAgentStore {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn get_config(&self) -> Result<Option<Agent>> {
        Ok(self.db()?.get_agent(&self.agent_id)?)
    }

    fn get_data(&self) -> Result<Option<AgentData>> {
        Ok(self.db()?.get_agent_data(&self.agent_id)?)
    }

    fn set_data(&self, patch: &AgentDataPatch) -> Result<()> {
        Ok(self.db()?.patch_agent_data(&self.agent_id, patch)?)
    }

    fn get_quota(&self) -> Result<Option<AgentQuota>> {
        Ok(self.db()?.get_agent_quota(&self.agent_id)?)
    }
}

#[derive(Clone)]
pub struct AgentsService {
    config: SharedConfig,
}

impl AgentsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn store(&self, agent_id: &str) -> Result<SqliteAgentStore> {
        require_agent_id(agent_id)?;
        Ok(SqliteAgentStore {
            agent_id: agent_id.to_string(),
            config: self.config.clone(),
        })
    }

    pub fn config(&self, agent_id: &str) -> Result<Agent> {
        self.store(agent_id)?
            .get_config()?
            .ok_or_else(|| missing_record("config", agent_id))
    }

    pub fn data(&self, agent_id: &str) -> Result<AgentData> {
        self.store(agent_id)?
            .get_data()?
            .ok_or_else(|| missing_record("data", agent_id))
    }

    pub fn set_data(&self, agent_id: &str, patch: &AgentDataPatch) -> Result<()> {
        self.store(agent_id)?.set_data(patch)
    }

    pub fn quota(&self, agent_id: &str) -> Result<AgentQuota> {
        self.store(agent_id)?
            .get_quota()?
            .ok_or_else(|| missing_record("quota", agent_id))
    }
}
