use tokio::sync::watch;

mod app;
mod auth;
mod config;
mod errors;
mod reporter;
mod state;
mod users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "userhub=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = config::AppConfig::from_env()?;
    let state = state::AppState::init(&config).await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let usage_reporter = reporter::UsageReporter::new(state.users.repository(), shutdown_rx);
    let reporter_handle = tokio::spawn(usage_reporter.run());

    let app = app::build_app(state);
    app::serve(app).await?;

    // Server loop is done; stop the reporter before exiting.
    let _ = shutdown_tx.send(true);
    let _ = reporter_handle.await;

    Ok(())
}
