//! emtc-daemon: the eMTC submission backend.
//!
//! Single OS process running a Tokio async runtime. Field devices talk to
//! it over HTTP (axum) to obtain OTP challenges and submit survey records;
//! a separate sync agent pulls unsynced records and marks them synced.

mod config;
mod handlers;
mod http;

use std::sync::Arc;

use rusqlite::Connection;
use tracing::{error, info};

use emtc_otp::{ChallengeStore, Clock, CodeDelivery, LogDelivery, OtpManager, SystemClock};

use crate::config::DaemonConfig;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Database connection.
    pub db: Arc<tokio::sync::Mutex<Connection>>,
    /// Configuration.
    pub config: DaemonConfig,
    /// OTP challenge issuer and verifier.
    pub otp: OtpManager,
    /// Out-of-band channel for issued codes.
    pub delivery: Arc<dyn CodeDelivery>,
    /// Time source for challenges and record timestamps.
    pub clock: Arc<dyn Clock>,
}

impl DaemonState {
    pub fn new(
        conn: Connection,
        config: DaemonConfig,
        clock: Arc<dyn Clock>,
        delivery: Arc<dyn CodeDelivery>,
    ) -> Self {
        let otp = OtpManager::new(Arc::new(ChallengeStore::new()), clock.clone())
            .with_ttl(config.challenge_ttl());
        Self {
            db: Arc::new(tokio::sync::Mutex::new(conn)),
            config,
            otp,
            delivery,
            clock,
        }
    }

    /// Current Unix time in seconds.
    pub fn now_secs(&self) -> u64 {
        self.clock.now().as_secs()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = DaemonConfig::load()?;

    // 2. Initialize tracing
    let directive = format!("emtc={}", config.logging.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    info!("eMTC daemon starting");

    // Ensure data directory exists
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // 3. Open database
    let db_path = config.database_path();
    let conn = emtc_db::open(&db_path)?;
    info!("Database ready at {:?}", db_path);

    // 4. Build daemon state
    let addr = config.listen_addr()?;
    let state = Arc::new(DaemonState::new(
        conn,
        config,
        Arc::new(SystemClock),
        Arc::new(LogDelivery),
    ));

    // 5. Serve HTTP until Ctrl-C
    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving HTTP on http://{addr}");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
            }
        })
        .await;
    if let Err(e) = result {
        error!("HTTP server error: {}", e);
    }

    info!("Daemon stopped");
    Ok(())
}
