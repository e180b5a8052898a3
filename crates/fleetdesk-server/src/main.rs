// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! FleetDesk server binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use fleetdesk_server::{create_app_state, create_router, version};
use fleetdesk_server_db::SessionRepository;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use fleetdesk_server_config::{ConfigError, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// FleetDesk server - access-gated web app and tenant-scoped API.
#[derive(Parser, Debug)]
#[command(name = "fleetdesk-server", about = "FleetDesk delivery logistics server", version)]
struct Args {
	/// Config file to load instead of /etc/fleetdesk/server.toml
	#[arg(long, env = "FLEETDESK_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn spawn_session_cleanup(sessions: Arc<SessionRepository>) {
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
		loop {
			interval.tick().await;
			match sessions.delete_expired_sessions().await {
				Ok(0) => {}
				Ok(removed) => tracing::info!(removed, "expired sessions removed"),
				Err(e) => tracing::warn!(error = %e, "session cleanup failed"),
			}
		}
	});
}

/// Run `f` with a temporary stderr subscriber.
///
/// The configured log level is only known once configuration has loaded, so
/// the loader's own summary and warnings go through this one.
fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let bootstrap = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::with_default(bootstrap, f)
}

fn load_config(path: Option<PathBuf>) -> Result<ServerConfig, ConfigError> {
	with_bootstrap_logging(|| match path {
		Some(path) => fleetdesk_server_config::load_config_with_file(path),
		None => fleetdesk_server_config::load_config(),
	})
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = load_config(args.config)?;

	tracing_subscriber::registry()
		.with(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting fleetdesk-server"
	);

	let pool = fleetdesk_server_db::create_pool(&config.database.url).await?;
	fleetdesk_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config);
	spawn_session_cleanup(Arc::clone(&state.session_repo));

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn config_loading_is_logged() {
		assert!(!tracing::enabled!(tracing::Level::WARN));
		assert!(with_bootstrap_logging(|| tracing::enabled!(tracing::Level::WARN)));
	}
}
