//! Magic link sign-in server.
//!
//! Passwordless sign-in and sign-up backed by a hosted identity directory:
//! - `POST /request-sign-in`, `POST /sign-up`, `GET /verify-sign-in`
//! - `GET /` landing page, `GET /health`, `GET /metrics`

mod config;

use anyhow::Context;
use axum::routing::get;
use config::{Config, MailConfig};
use magic_link_auth::providers::{
    ConsoleEmailProvider, HttpDirectoryClient, MailTransport, SmtpEmailProvider,
};
use magic_link_auth::AuthService;
use magic_link_web::app_router;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "magic_link=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting magic link server");

    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        directory_url = %config.directory.api_url,
        link_base_url = %config.magic_link.base_url,
        "Configuration loaded"
    );

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let mailer = match &config.mail {
        MailConfig::Smtp(smtp) => MailTransport::Smtp(SmtpEmailProvider::new(smtp)?),
        MailConfig::Console => MailTransport::Console(ConsoleEmailProvider::new()),
    };
    info!(transport = mailer.name(), "Mail transport ready");

    let service = Arc::new(AuthService::new(
        HttpDirectoryClient::new(&config.directory),
        mailer,
        &config.signing_secret,
        config.magic_link.clone(),
    ));

    let app = app_router(service).route(
        "/metrics",
        get(move || {
            let prometheus = prometheus.clone();
            async move { prometheus.render() }
        }),
    );

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let mut server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("Server task failed")??;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    let _ = shutdown_tx.send(true);
    match tokio::time::timeout(config.server.shutdown_timeout, server).await {
        Ok(result) => result.context("Server task failed")??,
        Err(_) => warn!(
            timeout_secs = config.server.shutdown_timeout.as_secs(),
            "In-flight requests did not drain before the shutdown timeout"
        ),
    }

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
