mod agents;
mod aggregates;
mod billing;
mod error;
mod helpers;
mod migrations;

use std::path::Path;

use rusqlite::Connection;

pub use billing::ActionCostQuery;
pub use error::{DbError, Result};
pub use migrations::MIGRATIONS;

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "cache_size", -20_000)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        aggregates::register(&conn)?;
        Ok(Self { conn })
    }
}
