use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Trailing lookback used when estimating an agent's action cost.
pub const ACTION_COST_WINDOW_DAYS: i64 = 3;

/// Fewer distinct actions than this in the window is treated as too sparse to average.
pub const MIN_ACTION_SAMPLES: u64 = 10;

/// Returned whenever the window holds too little data to produce an average.
pub const FALLBACK_ACTION_COST: Decimal = dec!(1.0);

/// Fractional digits kept on a computed average.
pub const ACTION_COST_SCALE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Message,
    SkillCall,
    Memory,
    Recharge,
    Refund,
    Adjustment,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Message => "MESSAGE",
            EventType::SkillCall => "SKILL_CALL",
            EventType::Memory => "MEMORY",
            EventType::Recharge => "RECHARGE",
            EventType::Refund => "REFUND",
            EventType::Adjustment => "ADJUSTMENT",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "MESSAGE" => Ok(EventType::Message),
            "SKILL_CALL" => Ok(EventType::SkillCall),
            "MEMORY" => Ok(EventType::Memory),
            "RECHARGE" => Ok(EventType::Recharge),
            "REFUND" => Ok(EventType::Refund),
            "ADJUSTMENT" => Ok(EventType::Adjustment),
            other => Err(ParseEnumError {
                kind: "event type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpstreamType {
    Executor,
    Initializer,
    Api,
    Scheduler,
}

impl UpstreamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamType::Executor => "EXECUTOR",
            UpstreamType::Initializer => "INITIALIZER",
            UpstreamType::Api => "API",
            UpstreamType::Scheduler => "SCHEDULER",
        }
    }
}

impl fmt::Display for UpstreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpstreamType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "EXECUTOR" => Ok(UpstreamType::Executor),
            "INITIALIZER" => Ok(UpstreamType::Initializer),
            "API" => Ok(UpstreamType::Api),
            "SCHEDULER" => Ok(UpstreamType::Scheduler),
            other => Err(ParseEnumError {
                kind: "upstream type",
                value: other.to_string(),
            }),
        }
    }
}

/// One row of the credit ledger. Events sharing a `start_message_id` belong to
/// the same logical action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingEvent {
    pub id: String,
    pub agent_id: String,
    pub event_type: EventType,
    pub upstream_type: UpstreamType,
    pub start_message_id: Option<String>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Half-open `[start, end)` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CostWindow {
    pub fn trailing(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(ACTION_COST_WINDOW_DAYS),
            end: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostPath {
    SparseFallback,
    EmptyFallback,
    Computed,
}

impl CostPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostPath::SparseFallback => "sparse_fallback",
            CostPath::EmptyFallback => "empty_fallback",
            CostPath::Computed => "computed",
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, CostPath::Computed)
    }
}

impl fmt::Display for CostPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCostEstimate {
    pub agent_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    pub path: CostPath,
    pub record_count: u64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

/// Rounds half-to-even at the fourth fractional digit and pads to exactly
/// four digits, so `2` renders as `2.0000`.
pub fn quantize_action_cost(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(ACTION_COST_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(ACTION_COST_SCALE);
    rounded
}

/// Storage format for timestamps: RFC 3339, UTC, fixed nine fractional
/// digits. Stored text compares in the same order as the instants it encodes.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: Option<String>,
    pub owner: Option<String>,
    pub model: String,
    pub purpose: Option<String>,
    pub prompt: Option<String>,
    pub temperature: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentData {
    pub id: String,
    pub evm_wallet_address: Option<String>,
    pub solana_wallet_address: Option<String>,
    pub twitter_id: Option<String>,
    pub twitter_username: Option<String>,
    pub api_key: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for [`AgentData`]; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentDataPatch {
    pub evm_wallet_address: Option<String>,
    pub solana_wallet_address: Option<String>,
    pub twitter_id: Option<String>,
    pub twitter_username: Option<String>,
    pub api_key: Option<String>,
    pub error_message: Option<String>,
}

impl AgentDataPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentQuota {
    pub id: String,
    pub plan: String,
    pub message_count_total: u64,
    pub message_limit_total: u64,
    pub message_count_monthly: u64,
    pub message_limit_monthly: u64,
    pub message_count_daily: u64,
    pub message_limit_daily: u64,
    pub last_message_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
