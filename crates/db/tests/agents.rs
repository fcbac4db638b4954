mod support;

use chrono::Duration;
use ledger_core::{Agent, AgentDataPatch, AgentQuota};
use ledger_db::DbError;
use support::{fixed_now, setup_db};

fn make_agent(id: &str) -> Agent {
    let now = fixed_now();
    Agent {
        id: id.to_string(),
        name: Some("Budget bot".to_string()),
        owner: Some("owner-1".to_string()),
        model: "gpt-4o-mini".to_string(),
        purpose: None,
        prompt: Some("be frugal".to_string()),
        temperature: 0.2,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn agent_config_round_trips() {
    let test_db = setup_db();
    let db = &test_db.db;
    assert!(db.get_agent("agent-a").expect("get").is_none());

    let agent = make_agent("agent-a");
    db.upsert_agent(&agent).expect("upsert");
    assert_eq!(db.get_agent("agent-a").expect("get"), Some(agent.clone()));

    let mut renamed = agent.clone();
    renamed.name = Some("Renamed".to_string());
    renamed.updated_at = agent.updated_at + Duration::hours(1);
    db.upsert_agent(&renamed).expect("upsert again");
    let stored = db.get_agent("agent-a").expect("get").expect("agent");
    assert_eq!(stored.name.as_deref(), Some("Renamed"));
    assert_eq!(stored.created_at, agent.created_at);
}

#[test]
fn patch_agent_data_creates_missing_row() {
    let test_db = setup_db();
    let db = &test_db.db;
    let patch = AgentDataPatch {
        twitter_username: Some("ledger_bot".to_string()),
        ..AgentDataPatch::default()
    };
    db.patch_agent_data("agent-a", &patch).expect("patch");

    let data = db.get_agent_data("agent-a").expect("get").expect("data");
    assert_eq!(data.id, "agent-a");
    assert_eq!(data.twitter_username.as_deref(), Some("ledger_bot"));
    assert!(data.api_key.is_none());
}

#[test]
fn patch_agent_data_only_touches_provided_fields() {
    let test_db = setup_db();
    let db = &test_db.db;
    db.patch_agent_data(
        "agent-a",
        &AgentDataPatch {
            twitter_username: Some("ledger_bot".to_string()),
            api_key: Some("key-1".to_string()),
            ..AgentDataPatch::default()
        },
    )
    .expect("first patch");
    db.patch_agent_data(
        "agent-a",
        &AgentDataPatch {
            error_message: Some("rate limited".to_string()),
            api_key: Some("key-2".to_string()),
            ..AgentDataPatch::default()
        },
    )
    .expect("second patch");

    let data = db.get_agent_data("agent-a").expect("get").expect("data");
    assert_eq!(data.twitter_username.as_deref(), Some("ledger_bot"));
    assert_eq!(data.api_key.as_deref(), Some("key-2"));
    assert_eq!(data.error_message.as_deref(), Some("rate limited"));
    assert!(data.updated_at >= data.created_at);
}

#[test]
fn agent_quota_round_trips() {
    let test_db = setup_db();
    let db = &test_db.db;
    assert!(db.get_agent_quota("agent-a").expect("get").is_none());

    let now = fixed_now();
    let quota = AgentQuota {
        id: "agent-a".to_string(),
        plan: "pro".to_string(),
        message_count_total: 12,
        message_limit_total: 1_000,
        message_count_monthly: 12,
        message_limit_monthly: 500,
        message_count_daily: 3,
        message_limit_daily: 50,
        last_message_time: Some(now - Duration::minutes(5)),
        created_at: now,
        updated_at: now,
    };
    db.upsert_agent_quota(&quota).expect("upsert");
    assert_eq!(db.get_agent_quota("agent-a").expect("get"), Some(quota));
}

#[test]
fn agent_quota_rejects_counters_beyond_sqlite_range() {
    let test_db = setup_db();
    let db = &test_db.db;
    let now = fixed_now();
    let quota = AgentQuota {
        id: "agent-a".to_string(),
        plan: "unlimited".to_string(),
        message_count_total: 1,
        message_limit_total: u64::MAX,
        message_count_monthly: 1,
        message_limit_monthly: 500,
        message_count_daily: 1,
        message_limit_daily: 50,
        last_message_time: None,
        created_at: now,
        updated_at: now,
    };

    let err = db.upsert_agent_quota(&quota).expect_err("overflow");
    assert!(matches!(
        err,
        DbError::CounterOverflow {
            field: "message_limit_total",
            value: u64::MAX
        }
    ));
    assert!(db.get_agent_quota("agent-a").expect("get").is_none());

    let max_quota = AgentQuota {
        message_limit_total: i64::MAX as u64,
        ..quota
    };
    db.upsert_agent_quota(&max_quota).expect("upsert at limit");
    assert_eq!(db.get_agent_quota("agent-a").expect("get"), Some(max_quota));
}
