use ledger_db::{Db, MIGRATIONS};
use rusqlite::Connection;

#[test]
fn migrate_creates_tables_and_records_names() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("fresh.sqlite");
    let mut db = Db::open(&db_path).expect("open db");
    db.migrate().expect("migrate db");

    let applied = db.applied_migrations().expect("applied");
    let expected: Vec<String> = MIGRATIONS.iter().map(|(name, _)| name.to_string()).collect();
    assert_eq!(applied, expected);

    let conn = Connection::open(&db_path).expect("open conn");
    for table in ["credit_event", "agent", "agent_data", "agent_quota"] {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .expect("table lookup");
        assert_eq!(count, 1, "missing table {table}");
    }
}

#[test]
fn migrate_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("twice.sqlite");
    {
        let mut db = Db::open(&db_path).expect("open db");
        db.migrate().expect("first migrate");
    }
    let mut db = Db::open(&db_path).expect("reopen db");
    db.migrate().expect("second migrate");
    assert_eq!(db.applied_migrations().expect("applied").len(), MIGRATIONS.len());
}

#[test]
fn migrate_adopts_tables_created_outside_the_runner() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("legacy.sqlite");
    {
        let conn = Connection::open(&db_path).expect("open conn");
        conn.execute_batch(include_str!("../migrations/0001_init.sql"))
            .expect("migrate 0001");
        conn.execute(
            r#"
            INSERT INTO credit_event (
              id, agent_id, event_type, upstream_type, start_message_id, total_amount, created_at
            ) VALUES ('e1', 'agent-a', 'MESSAGE', 'EXECUTOR', 'm1', '0.25', '2025-06-15T11:00:00.000000000Z')
            "#,
            [],
        )
        .expect("insert event");
    }

    let mut db = Db::open(&db_path).expect("open db");
    db.migrate().expect("migrate db");
    assert_eq!(db.count_billing_events("agent-a").expect("count"), 1);
}
