use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use timeclock_engine::api::{AppState, create_router};
use timeclock_engine::clock::SystemClock;
use timeclock_engine::config::ConfigLoader;
use timeclock_engine::service::AttendanceService;
use timeclock_engine::store::{
    EventLog, InMemoryEventLog, InMemoryPayrollLedger, JsonLinesEventLog, JsonLinesPayrollLedger,
    PayrollLedger,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timeclock_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir = env::var("TIMECLOCK_CONFIG_DIR").unwrap_or_else(|_| "./config/default".into());
    let config = ConfigLoader::load(&config_dir)?.into_config();
    tracing::info!(
        config_dir = %config_dir,
        site = %config.site().name,
        employees = config.directory().len(),
        "Configuration loaded"
    );

    let log: Arc<dyn EventLog> = match env::var("TIMECLOCK_EVENT_LOG") {
        Ok(path) => Arc::new(JsonLinesEventLog::open(path)?),
        Err(_) => {
            tracing::warn!("TIMECLOCK_EVENT_LOG not set, events are kept in memory only");
            Arc::new(InMemoryEventLog::new())
        }
    };
    let ledger: Arc<dyn PayrollLedger> = match env::var("TIMECLOCK_PAYROLL_LEDGER") {
        Ok(path) => Arc::new(JsonLinesPayrollLedger::new(path)),
        Err(_) => Arc::new(InMemoryPayrollLedger::new()),
    };

    let service = AttendanceService::new(config, log, ledger, Arc::new(SystemClock));
    let app = create_router(AppState::new(service));

    let addr: SocketAddr = env::var("TIMECLOCK_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
