use chrono::Utc;
use ledger_core::{Agent, AgentData, AgentDataPatch, AgentQuota, format_timestamp};
use rusqlite::{OptionalExtension, Row, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{count_column, optional_ts_column, ts_column};

impl Db {
    pub fn get_agent(&self, agent_id: &str) -> Result<Option<Agent>> {
        let agent = self
            .conn
            .query_row(
                r#"
                SELECT id, name, owner, model, purpose, prompt, temperature,
                       created_at, updated_at
                FROM agent
                WHERE id = ?1
                "#,
                params![agent_id],
                row_to_agent,
            )
            .optional()?;
        Ok(agent)
    }

    pub fn upsert_agent(&self, agent: &Agent) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO agent (
              id, name, owner, model, purpose, prompt, temperature, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
              name = excluded.name,
              owner = excluded.owner,
              model = excluded.model,
              purpose = excluded.purpose,
              prompt = excluded.prompt,
              temperature = excluded.temperature,
              updated_at = excluded.updated_at
            "#,
            params![
                agent.id,
                agent.name,
                agent.owner,
                agent.model,
                agent.purpose,
                agent.prompt,
                agent.temperature,
                format_timestamp(agent.created_at),
                format_timestamp(agent.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_agent_data(&self, agent_id: &str) -> Result<Option<AgentData>> {
        let data = self
            .conn
            .query_row(
                r#"
                SELECT id, evm_wallet_address, solana_wallet_address, twitter_id,
                       twitter_username, api_key, error_message, created_at, updated_at
                FROM agent_data
                WHERE id = ?1
                "#,
                params![agent_id],
                row_to_agent_data,
            )
            .optional()?;
        Ok(data)
    }

    /// Writes only the fields set on `patch`, creating the row if needed.
    pub fn patch_agent_data(&self, agent_id: &str, patch: &AgentDataPatch) -> Result<()> {
        let now = format_timestamp(Utc::now());
        self.conn.execute(
            r#"
            INSERT INTO agent_data (
              id, evm_wallet_address, solana_wallet_address, twitter_id,
              twitter_username, api_key, error_message, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT(id) DO UPDATE SET
              evm_wallet_address = COALESCE(excluded.evm_wallet_address, agent_data.evm_wallet_address),
              solana_wallet_address = COALESCE(excluded.solana_wallet_address, agent_data.solana_wallet_address),
              twitter_id = COALESCE(excluded.twitter_id, agent_data.twitter_id),
              twitter_username = COALESCE(excluded.twitter_username, agent_data.twitter_username),
              api_key = COALESCE(excluded.api_key, agent_data.api_key),
              error_message = COALESCE(excluded.error_message, agent_data.error_message),
              updated_at = excluded.updated_at
            "#,
            params![
                agent_id,
                patch.evm_wallet_address,
                patch.solana_wallet_address,
                patch.twitter_id,
                patch.twitter_username,
                patch.api_key,
                patch.error_message,
                now,
            ],
        )?;
        Ok(())
    }

    pub fn get_agent_quota(&self, agent_id: &str) -> Result<Option<AgentQuota>> {
        let quota = self
            .conn
            .query_row(
                r#"
                SELECT id, plan, message_count_total, message_limit_total,
                       message_count_monthly, message_limit_monthly,
                       message_count_daily, message_limit_daily,
                       last_message_time, created_at, updated_at
                FROM agent_quota
                WHERE id = ?1
                "#,
                params![agent_id],
                row_to_agent_quota,
            )
            .optional()?;
        Ok(quota)
    }

    pub fn upsert_agent_quota(&self, quota: &AgentQuota) -> Result<()> {
        let counters = [
            counter("message_count_total", quota.message_count_total)?,
            counter("message_limit_total", quota.message_limit_total)?,
            counter("message_count_monthly", quota.message_count_monthly)?,
            counter("message_limit_monthly", quota.message_limit_monthly)?,
            counter("message_count_daily", quota.message_count_daily)?,
            counter("message_limit_daily", quota.message_limit_daily)?,
        ];
        self.conn.execute(
            r#"
            INSERT INTO agent_quota (
              id, plan, message_count_total, message_limit_total,
              message_count_monthly, message_limit_monthly,
              message_count_daily, message_limit_daily,
              last_message_time, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
              plan = excluded.plan,
              message_count_total = excluded.message_count_total,
              message_limit_total = excluded.message_limit_total,
              message_count_monthly = excluded.message_count_monthly,
              message_limit_monthly = excluded.message_limit_monthly,
              message_count_daily = excluded.message_count_daily,
              message_limit_daily = excluded.message_limit_daily,
              last_message_time = excluded.last_message_time,
              updated_at = excluded.updated_at
            "#,
            params![
                quota.id,
                quota.plan,
                counters[0],
                counters[1],
                counters[2],
                counters[3],
                counters[4],
                counters[5],
                quota.last_message_time.map(format_timestamp),
                format_timestamp(quota.created_at),
                format_timestamp(quota.updated_at),
            ],
        )?;
        Ok(())
    }
}

fn counter(field: &'static str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| DbError::CounterOverflow { field, value })
}

fn row_to_agent(row: &Row<'_>) -> rusqlite::Result<Agent> {
    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        owner: row.get(2)?,
        model: row.get(3)?,
        purpose: row.get(4)?,
        prompt: row.get(5)?,
        temperature: row.get(6)?,
        created_at: ts_column(row, 7)?,
        updated_at: ts_column(row, 8)?,
    })
}

fn row_to_agent_data(row: &Row<'_>) -> rusqlite::Result<AgentData> {
    Ok(AgentData {
        id: row.get(0)?,
        evm_wallet_address: row.get(1)?,
        solana_wallet_address: row.get(2)?,
        twitter_id: row.get(3)?,
        twitter_username: row.get(4)?,
        api_key: row.get(5)?,
        error_message: row.get(6)?,
        created_at: ts_column(row, 7)?,
        updated_at: ts_column(row, 8)?,
    })
}

fn row_to_agent_quota(row: &Row<'_>) -> rusqlite::Result<AgentQuota> {
    Ok(AgentQuota {
        id: row.get(0)?,
        plan: row.get(1)?,
        message_count_total: count_column(row, 2)?,
        message_limit_total: count_column(row, 3)?,
        message_count_monthly: count_column(row, 4)?,
        message_limit_monthly: count_column(row, 5)?,
        message_count_daily: count_column(row, 6)?,
        message_limit_daily: count_column(row, 7)?,
        last_message_time: optional_ts_column(row, 8)?,
        created_at: ts_column(row, 9)?,
        updated_at: ts_column(row, 10)?,
    })
}
