use ledger_core::{BillingEvent, CostWindow, EventType, UpstreamType, format_timestamp};
use rust_decimal::Decimal;
use rusqlite::params;

use crate::Db;
use crate::aggregates::parse_decimal;
use crate::error::Result;
use crate::helpers::count_column;

/// Bound parameters selecting an agent's cost-bearing events: executor
/// originated `MESSAGE`/`SKILL_CALL` events inside `window` that belong to an
/// action (`start_message_id` set).
#[derive(Debug, Clone, Copy)]
pub struct ActionCostQuery<'a> {
    pub agent_id: &'a str,
    pub window: CostWindow,
}

impl<'a> ActionCostQuery<'a> {
    pub fn new(agent_id: &'a str, window: CostWindow) -> Self {
        Self { agent_id, window }
    }

    fn window_bounds(&self) -> (String, String) {
        (
            format_timestamp(self.window.start),
            format_timestamp(self.window.end),
        )
    }
}

impl Db {
    pub fn insert_billing_events(&mut self, events: &[BillingEvent]) -> Result<usize> {
        if events.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR IGNORE INTO credit_event (
                  id, agent_id, event_type, upstream_type, start_message_id,
                  total_amount, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for event in events {
                let rows = stmt.execute(params![
                    event.id,
                    event.agent_id,
                    event.event_type.as_str(),
                    event.upstream_type.as_str(),
                    event.start_message_id,
                    event.total_amount.to_string(),
                    format_timestamp(event.created_at),
                ])?;
                if rows > 0 {
                    inserted += 1;
                }
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn count_billing_events(&self, agent_id: &str) -> Result<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM credit_event WHERE agent_id = ?1",
            params![agent_id],
            |row| count_column(row, 0),
        )?;
        Ok(count)
    }

    /// Number of distinct actions with eligible events. Cheap enough to run
    /// before the grouped aggregate.
    pub fn count_distinct_actions(&self, query: &ActionCostQuery<'_>) -> Result<u64> {
        let (start, end) = query.window_bounds();
        let count = self.conn.query_row(
            r#"
            SELECT COUNT(DISTINCT start_message_id)
            FROM credit_event
            WHERE agent_id = ?1
              AND created_at >= ?2
              AND created_at < ?3
              AND upstream_type = ?4
              AND event_type IN (?5, ?6)
              AND start_message_id IS NOT NULL
            "#,
            params![
                query.agent_id,
                start,
                end,
                UpstreamType::Executor.as_str(),
                EventType::Message.as_str(),
                EventType::SkillCall.as_str(),
            ],
            |row| count_column(row, 0),
        )?;
        Ok(count)
    }

    /// Mean of per-action cost sums, unrounded. `None` when no action has a
    /// non-null sum.
    pub fn average_action_cost_raw(&self, query: &ActionCostQuery<'_>) -> Result<Option<Decimal>> {
        let (start, end) = query.window_bounds();
        let avg: Option<String> = self.conn.query_row(
            r#"
            WITH action_sums AS (
              SELECT start_message_id, decimal_sum(total_amount) AS action_cost
              FROM credit_event
              WHERE agent_id = ?1
                AND created_at >= ?2
                AND created_at < ?3
                AND upstream_type = ?4
                AND event_type IN (?5, ?6)
                AND start_message_id IS NOT NULL
              GROUP BY start_message_id
            )
            SELECT decimal_avg(action_cost) AS avg_cost
            FROM action_sums
            "#,
            params![
                query.agent_id,
                start,
                end,
                UpstreamType::Executor.as_str(),
                EventType::Message.as_str(),
                EventType::SkillCall.as_str(),
            ],
            |row| row.get(0),
        )?;
        Ok(avg.map(|value| parse_decimal(&value)).transpose()?)
    }
}
