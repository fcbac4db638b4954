use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::services::AppServices;
use crate::telemetry::EstimateSink;
use crate::util::clock::Clock;
use ledger_db::Db;

/// Paths and files needed to run the ledger.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
}

/// Application state shared by frontends (HTTP, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        let config = AppConfig { db_path };
        let services = AppServices::new(&config);
        Self { config, services }
    }

    /// Rebuilds the services with an explicit clock and estimate sink.
    pub fn with_estimator_hooks(self, clock: Arc<dyn Clock>, sink: Arc<dyn EstimateSink>) -> Self {
        let services = AppServices::with_hooks(&self.config, clock, sink);
        Self {
            config: self.config,
            services,
        }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
