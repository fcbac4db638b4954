use ledger_core::AgentDataPatch;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AgentRequest {
    pub agent_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AgentDataSetRequest {
    pub agent_id: String,
    #[serde(default)]
    pub fields: AgentDataPatch,
}
