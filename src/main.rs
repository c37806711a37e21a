use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use driverbook::config::AppConfig;
use driverbook::db;
use driverbook::models::CityDirectory;
use driverbook::services::messaging::mora::MoraSmsProvider;
use driverbook::services::reminders;
use driverbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let cities = match &config.city_config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let dir = CityDirectory::from_json(&raw)?;
            tracing::info!(path = %path, "loaded city configuration");
            dir
        }
        None => CityDirectory::builtin(),
    };

    let conn = db::init_db(&config.database_url)?;

    let messaging = MoraSmsProvider::new(
        config.mora_api_key.clone(),
        config.mora_username.clone(),
        config.mora_sender.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        cities,
        messaging: Box::new(messaging),
    });

    if let Some(minutes) = config.reminder_interval_minutes {
        let state = state.clone();
        tracing::info!(minutes, "starting in-process reminder scheduler");
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(minutes * 60));
            loop {
                interval.tick().await;
                let now = state.config.local_now();
                match reminders::run(
                    &state.db,
                    &state.cities,
                    state.messaging.as_ref(),
                    &state.config,
                    now,
                )
                .await
                {
                    Ok(summary) if summary.candidates > 0 => {
                        tracing::info!(
                            sent = summary.sent,
                            failed = summary.failed,
                            "scheduled reminder pass finished"
                        );
                    }
                    Ok(_) => {}
                    // Fatal for this invocation only; the next tick retries.
                    Err(e) => tracing::error!(error = %e, "scheduled reminder pass failed"),
                }
            }
        });
    }

    let app = driverbook::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
