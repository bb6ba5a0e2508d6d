//! acl-admission - Shoot admission webhook for the Gardener ACL extension.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Loads configuration from the environment
//! - Starts the health server and the TLS webhook server
//! - Shuts down gracefully on SIGTERM/SIGINT

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info};

use acl_admission::health::{HealthState, run_health_server};
use acl_admission::webhooks::WebhookState;
use acl_admission::{Config, Error, ShootValidator, run_webhook_server};

/// Grace period for in-flight admission requests to complete during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("acl_admission=info".parse()?),
        )
        .json()
        .init();

    info!("Starting acl-admission");

    let config = Config::from_env()?;
    info!(
        max_allowed_cidrs = config.max_allowed_cidrs,
        webhook_port = config.webhook_port,
        health_port = config.health_port,
        "Loaded configuration"
    );

    if !config.cert_path.exists() || !config.key_path.exists() {
        return Err(Error::TlsConfig(format!(
            "webhook certificates not found at {} and {}",
            config.cert_path.display(),
            config.key_path.display()
        ))
        .into());
    }

    // One limit handle shared by the validator and the metrics
    let cidr_limit = config.cidr_limit();

    // Create shared health state
    let health_state = Arc::new(HealthState::with_cidr_limit(cidr_limit.clone()));

    // Start health server immediately (liveness should work before TLS is up)
    let health_handle = {
        let health_state = health_state.clone();
        let port = config.health_port;
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state, port).await {
                error!("Health server error: {}", e);
            }
        })
    };

    let webhook_state = Arc::new(WebhookState::new(
        ShootValidator::new(cidr_limit),
        Some(health_state.clone()),
    ));

    // Readiness is flipped by the webhook server once TLS is loaded
    let webhook_handle = {
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = run_webhook_server(
                webhook_state,
                config.webhook_port,
                &config.cert_path,
                &config.key_path,
            )
            .await
            {
                error!("Webhook server error: {}", e);
            }
        })
    };

    // Wait for any task to complete (or fail), or shutdown signal
    tokio::select! {
        result = webhook_handle => {
            if let Err(e) = result {
                error!("Webhook server task panicked: {}", e);
            }
        }
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Mark as not ready so the endpoint is removed from the Service
            health_state.set_ready(false).await;
            info!("Marked webhook as not ready");

            info!(
                "Waiting {}s for in-flight admission requests to complete...",
                SHUTDOWN_GRACE_PERIOD_SECS
            );
            tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)).await;

            info!("Grace period complete, shutting down");
        }
    }

    info!("Webhook stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the webhook cannot shut down
/// gracefully without them.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
