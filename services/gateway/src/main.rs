use anyhow::Context;
use clap::Parser;
use gateway::{create_router, AppState, Dispatcher, GatewayConfig, HttpTransport};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = GatewayConfig::parse();
    let markets = config.markets()?;

    tracing::info!("Starting Gateway API service");

    let transport = HttpTransport::new(config.callback_timeout()).context("building callback HTTP client")?;
    let dispatcher = Dispatcher::spawn(config.dispatcher(), Arc::new(transport));
    let state = AppState::new(dispatcher.clone());

    for market in markets {
        state
            .engine
            .create_book(market.asset.clone(), market.min_price, market.max_price)
            .with_context(|| format!("creating book for `{}`", market.asset))?;
    }

    let app = create_router(state.clone());

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await?;

    // In-flight requests are done; deliver whatever callbacks are still queued
    dispatcher.shutdown().await;
    tracing::info!("Gateway stopped");
    Ok(())
}

/// Resolves on `POST /shutdown` or Ctrl+C
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = state.shutdown.notified() => {}
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            state.begin_shutdown();
        }
    }
}
