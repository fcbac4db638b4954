use chrono::{TimeZone, Utc};
use tempfile::tempdir;
use ledger_app::{AgentStore, AppError, AppState};
use ledger_core::{Agent, AgentDataPatch, AgentQuota};

fn setup() -> (tempfile::TempDir, AppState) {
    let dir = tempdir().expect("temp dir");
    let app_state = AppState::new(dir.path().join("app.sqlite"));
    app_state.setup_db().expect("setup db");
    (dir, app_state)
}

#[test]
fn store_reads_config_and_quota() {
    let (_dir, app_state) = setup();
    let ts = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let db = app_state.open_db().expect("open db");
    db.upsert_agent(&Agent {
        id: "agent-a".to_string(),
        name: Some("Scout".to_string()),
        owner: None,
        model: "gpt-4o".to_string(),
        purpose: Some("research".to_string()),
        prompt: None,
        temperature: 0.7,
        created_at: ts,
        updated_at: ts,
    })
    .expect("upsert agent");
    db.upsert_agent_quota(&AgentQuota {
        id: "agent-a".to_string(),
        plan: "free".to_string(),
        message_count_total: 1,
        message_limit_total: 100,
        message_count_monthly: 1,
        message_limit_monthly: 50,
        message_count_daily: 1,
        message_limit_daily: 10,
        last_message_time: None,
        created_at: ts,
        updated_at: ts,
    })
    .expect("upsert quota");

    let store = app_state.services.agents.store("agent-a").expect("store");
    assert_eq!(store.agent_id(), "agent-a");
    let config = store.get_config().expect("config").expect("agent");
    assert_eq!(config.name.as_deref(), Some("Scout"));
    let quota = store.get_quota().expect("quota").expect("quota row");
    assert_eq!(quota.plan, "free");
    assert!(store.get_data().expect("data").is_none());
}

#[test]
fn store_set_data_is_partial() {
    let (_dir, app_state) = setup();
    let store = app_state.services.agents.store("agent-a").expect("store");
    store
        .set_data(&AgentDataPatch {
            evm_wallet_address: Some("0xabc".to_string()),
            ..AgentDataPatch::default()
        })
        .expect("first set");
    store
        .set_data(&AgentDataPatch {
            twitter_id: Some("42".to_string()),
            ..AgentDataPatch::default()
        })
        .expect("second set");

    let data = store.get_data().expect("data").expect("row");
    assert_eq!(data.evm_wallet_address.as_deref(), Some("0xabc"));
    assert_eq!(data.twitter_id.as_deref(), Some("42"));
}

#[test]
fn agents_service_reports_missing_records() {
    let (_dir, app_state) = setup();
    let agents = &app_state.services.agents;
    assert!(matches!(agents.config("ghost"), Err(AppError::NotFound(_))));
    assert!(matches!(agents.data("ghost"), Err(AppError::NotFound(_))));
    assert!(matches!(agents.quota("ghost"), Err(AppError::NotFound(_))));
    assert!(matches!(agents.store(""), Err(AppError::InvalidInput(_))));
}

#[test]
fn stores_share_the_agent_namespace_with_the_estimator() {
    let (_dir, app_state) = setup();
    app_state
        .services
        .agents
        .set_data(
            "agent-a",
            &AgentDataPatch {
                error_message: Some("none".to_string()),
                ..AgentDataPatch::default()
            },
        )
        .expect("set data");
    let value = app_state
        .services
        .estimator
        .average_action_cost("agent-a")
        .expect("estimate");
    assert_eq!(value.to_string(), "1.0");
    assert_eq!(
        app_state.services.agents.data("agent-a").expect("data").error_message.as_deref(),
        Some("none")
    );
}
