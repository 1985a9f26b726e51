// Main entry point for the outfit bot

use std::sync::Arc;

use anyhow::{Context, Result};
use outfit_finder::Catalog;
use server_core::kernel::{build_finder, BotDeps, TelegramAdapter};
use server_core::server::{build_app, drain_tasks, run_polling, SHUTDOWN_GRACE};
use server_core::{masked_env_value, BotMode, Config, ENV_VARS};
use telegram::{TelegramOptions, TelegramService};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,outfit_finder=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting outfit bot");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Log masked env vars for troubleshooting deployments
    fn mask_env(name: &str) {
        match std::env::var(name) {
            Ok(val) => tracing::info!("  {}: {}", name, masked_env_value(&val)),
            Err(_) => tracing::warn!("  {}: NOT SET", name),
        }
    }
    tracing::info!("Environment variables:");
    for name in ENV_VARS {
        mask_env(name);
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        bot_mode = ?config.bot_mode,
        catalog_mode = ?config.catalog_mode,
        model = %config.xai_model,
        "Configuration loaded"
    );

    // Catalog: file when configured, built-in otherwise
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin(),
    };
    let catalog = Arc::new(catalog);

    // Telegram client
    let telegram = Arc::new(TelegramService::new(TelegramOptions::new(
        config.telegram_bot_token.expose(),
    )));
    match telegram.get_me().await {
        Ok(me) => tracing::info!(
            username = me.username.as_deref().unwrap_or(""),
            "Connected to Telegram"
        ),
        Err(e) => tracing::warn!(error = %e, "getMe failed, continuing"),
    }

    let finder = build_finder(&config, catalog.clone())?;
    let deps = BotDeps::new(
        Arc::new(TelegramAdapter::new(telegram.clone())),
        Arc::new(finder),
        catalog,
        config.catalog_mode,
    );

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            tracing::info!("Shutdown requested");
            cancel.cancel();
        }
    });

    match config.bot_mode {
        BotMode::Polling => run_polling(telegram, deps, cancel).await?,
        BotMode::Webhook => {
            let webhook_url = config
                .webhook_url()
                .context("WEBHOOK_BASE_URL must be set in webhook mode")?;
            let port = config.port.context("PORT must be set in webhook mode")?;

            telegram
                .set_webhook(&webhook_url)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))
                .context("Failed to register webhook")?;
            tracing::info!(
                base = config.webhook_base_url.as_deref().unwrap_or(""),
                "Webhook registered"
            );

            let tasks = TaskTracker::new();
            let app = build_app(deps, config.telegram_bot_token.clone(), tasks.clone());

            let addr = format!("0.0.0.0:{}", port);
            tracing::info!("Starting server on {}", addr);
            tracing::info!("Health check: http://localhost:{}/health", port);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .context("Failed to bind to address")?;

            axum::serve(listener, app)
                .with_graceful_shutdown(async move { cancel.cancelled().await })
                .await
                .context("Server error")?;

            drain_tasks(&tasks, SHUTDOWN_GRACE).await;
        }
    }

    tracing::info!("Stopped");
    Ok(())
}
