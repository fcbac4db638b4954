pub mod app;
pub mod error;
pub mod services;
pub mod startup;
pub mod telemetry;
pub mod util;

pub use app::{AppConfig, AppState};
pub use error::{ApiError, AppError, Result};
pub use services::{AgentStore, AgentsService, AppServices, EstimatorService, SqliteAgentStore};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use telemetry::{EstimateRecord, EstimateSink, RecordingSink, TracingSink};
pub use util::clock::{Clock, FixedClock, SystemClock};
