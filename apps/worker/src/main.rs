//! idlereap inactive account worker runtime.

#![forbid(unsafe_code)]

mod schedule;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use idlereap_application::{
    InactiveAccountCleanupTask, InactivityReaperService, RunProgress, TaskTrigger, UserDirectory,
};
use idlereap_core::{AppError, AppResult};
use idlereap_infrastructure::{FilePolicySettingsRepository, PostgresUserDirectory};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct WorkerConfig {
    database_url: String,
    policy_path: PathBuf,
    run_on_start: bool,
    max_connections: u32,
}

/// Forwards task progress to the log.
struct TracingRunProgress;

impl RunProgress for TracingRunProgress {
    fn report(&self, percent: f64) {
        debug!(
            task = InactiveAccountCleanupTask::KEY,
            percent, "cleanup progress"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let pool = connect_pool(config.database_url.as_str(), config.max_connections).await?;
    let task = build_cleanup_task(
        Arc::new(PostgresUserDirectory::new(pool)),
        config.policy_path.clone(),
    );
    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    info!(
        task = InactiveAccountCleanupTask::KEY,
        name = InactiveAccountCleanupTask::NAME,
        category = InactiveAccountCleanupTask::CATEGORY,
        policy_path = %config.policy_path.display(),
        run_on_start = config.run_on_start,
        "idlereap-worker started"
    );

    if config.run_on_start {
        run_cleanup(&task, &shutdown).await;
    }

    while !shutdown.is_cancelled() {
        let TaskTrigger::Daily { hour } = task.default_trigger().await;
        let now = Utc::now();
        let next_run = schedule::next_daily_run(now, hour);

        info!(
            check_hour = hour.hour(),
            next_run = %next_run,
            "next inactive account cleanup scheduled"
        );

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(schedule::delay_until(now, next_run)) => {}
        }

        run_cleanup(&task, &shutdown).await;
    }

    info!("idlereap-worker stopped");
    Ok(())
}

fn build_cleanup_task(
    directory: Arc<dyn UserDirectory>,
    policy_path: PathBuf,
) -> InactiveAccountCleanupTask {
    let reaper = InactivityReaperService::new(directory);
    let settings_repository = Arc::new(FilePolicySettingsRepository::new(policy_path));

    InactiveAccountCleanupTask::new(reaper, settings_repository)
}

async fn run_cleanup(task: &InactiveAccountCleanupTask, shutdown: &CancellationToken) {
    if let Err(error) = task.execute(&TracingRunProgress, shutdown).await {
        warn!(
            task = InactiveAccountCleanupTask::KEY,
            error = %error,
            "scheduled cleanup run failed, retrying at next trigger"
        );
    }
}

fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), shutdown));
}

async fn cancel_on_signal<F>(signal: F, shutdown: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("shutdown signal received");
            shutdown.cancel();
        }
        Err(error) => warn!(
            error = %error,
            "failed to listen for shutdown signal, worker keeps running"
        ),
    }
}

async fn connect_pool(database_url: &str, max_connections: u32) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to connect to database: {error}")))
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let policy_path = env::var("IDLEREAP_POLICY_PATH")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from("policy.json"), PathBuf::from);
        let run_on_start = parse_env_bool("IDLEREAP_RUN_ON_START", false)?;
        let max_connections = parse_env_u32("IDLEREAP_DATABASE_MAX_CONNECTIONS", 2)?;

        if max_connections == 0 {
            return Err(AppError::Validation(
                "IDLEREAP_DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            policy_path,
            run_on_start,
            max_connections,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> AppResult<bool> {
    match env::var(name) {
        Ok(value) => parse_bool(value.as_str()).ok_or_else(|| {
            AppError::Validation(format!("invalid {name} value '{value}': expected a boolean"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
