#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use ledger_core::{BillingEvent, EventType, UpstreamType};
use ledger_db::Db;
use rust_decimal::Decimal;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn insert_events(db: &mut Db, events: Vec<BillingEvent>) {
    db.insert_billing_events(&events).expect("insert events");
}

pub fn make_event(
    id: &str,
    agent_id: &str,
    action: Option<&str>,
    amount: Decimal,
    created_at: DateTime<Utc>,
) -> BillingEvent {
    BillingEvent {
        id: id.to_string(),
        agent_id: agent_id.to_string(),
        event_type: EventType::Message,
        upstream_type: UpstreamType::Executor,
        start_message_id: action.map(str::to_string),
        total_amount: amount,
        created_at,
    }
}

/// One executor message event per action, spaced a minute apart before `now`.
pub fn action_events(agent_id: &str, amounts: &[Decimal], now: DateTime<Utc>) -> Vec<BillingEvent> {
    amounts
        .iter()
        .enumerate()
        .map(|(idx, amount)| {
            make_event(
                &format!("{agent_id}-e{idx}"),
                agent_id,
                Some(&format!("{agent_id}-action-{idx}")),
                *amount,
                now - Duration::minutes(idx as i64 + 1),
            )
        })
        .collect()
}
