mod args;
mod config;
mod dirs;

use std::io;
use std::net::SocketAddr;

use args::Command;
use http_api::{HttpState, TOKEN_HEADER, generate_token};
use ledger_app::{AppPaths, AppState, ensure_app_data_dir};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args(std::env::args().skip(1)).map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;
    if args.command == Command::Help {
        args::print_help();
        return Ok(());
    }

    let config = config::load_or_create().map_err(io::Error::other)?;
    init_tracing(&config.config.log_filter);
    if config.created {
        info!(file = %config.file.display(), "created default config");
    }

    let db_path = match args.db_path {
        Some(path) => path,
        None => {
            let data_dir =
                dirs::resolve_data_dir(config.config.data_dir.as_ref()).map_err(io::Error::other)?;
            let paths = AppPaths::new(data_dir);
            ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;
            paths.db_path
        }
    };
    info!(db = %db_path.display(), "using database");

    let app_state = AppState::new(db_path);
    if let Err(err) = app_state.setup_db() {
        error!(error = %err, "failed to initialize database");
        return Err(io::Error::other(format!("failed to initialize database: {}", err)).into());
    }

    match args.command {
        Command::Estimate { agent_id } => {
            let estimate = tokio::task::spawn_blocking(move || {
                app_state.services.estimator.estimate(&agent_id)
            })
            .await?
            .map_err(|err| io::Error::other(err.to_string()))?;
            println!("{}", estimate.value);
        }
        Command::Serve { port } => {
            serve(app_state, port.unwrap_or(config.config.port)).await?;
        }
        Command::Help => {}
    }

    Ok(())
}

fn init_tracing(configured_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

async fn serve(app_state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let token = generate_token();
    let state = HttpState::new(app_state, token.clone());
    let router = http_api::router(state);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port))).await?;
    let addr = listener.local_addr()?;

    info!(%addr, "agent ledger listening");
    println!("Agent Ledger is running at http://{addr}");
    println!("Send requests with header {TOKEN_HEADER}: {token}");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("agent ledger stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
