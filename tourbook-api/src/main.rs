use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tourbook_api::{app, AppState, PaymentSettings};
use tourbook_core::identity::AdminPolicy;
use tourbook_store::{verifier_from_config, Config, DbClient, Repositories, StripeGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tourbook_api=debug,tourbook_store=debug,tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Tourbook API on port {}", config.server.port);

    let db = DbClient::connect(&config.database)
        .await
        .context("Failed to connect to MongoDB")?;
    db.ping().await.context("MongoDB ping failed")?;
    tracing::info!(database = %config.database.name, "Connected to MongoDB");

    let gateway = StripeGateway::new(&config.payments).context("Failed to build payment client")?;

    let app_state = AppState {
        repos: Repositories::mongo(&db),
        verifier: verifier_from_config(&config.auth),
        admin_policy: Arc::new(AdminPolicy::new(
            config.auth.admin_emails.clone(),
            config.auth.admin_role.clone(),
        )),
        gateway: Arc::new(gateway),
        payments: PaymentSettings {
            currency: config.payments.currency.clone(),
        },
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
