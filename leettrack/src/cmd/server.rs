use crate::{
    cmd::{catalog_source, hint::hint_config},
    modules::handlers::{
        catalog::{get_companies, get_company_files, get_problems},
        hint::get_hint,
        liveness,
    },
};
use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing, Router, Server,
};
use clap::Args;
use leettrack_libs::{catalog::source::ContentSource, hint::GeminiHintGenerator, hint::HintGenerator};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

pub type SharedSource = Arc<dyn ContentSource + Send + Sync>;
pub type SharedHintGenerator = Arc<dyn HintGenerator + Send + Sync>;

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let source = catalog_source()?;
    let config = hint_config(None);
    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set. hint endpoint will be unavailable.");
    }
    let generator = GeminiHintGenerator::new(config).with_context(|| {
        let message = "couldn't create hint generator";
        tracing::error!(message);
        message
    })?;

    let app = create_router(Arc::new(source), Arc::new(generator));
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::try_bind(&addr)
        .with_context(|| {
            let message = format!("Failed to bind server to port {}", port);
            tracing::error!(message);
            message
        })?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server stopped unexpectedly")?;

    Ok(())
}

pub fn create_router(source: SharedSource, generator: SharedHintGenerator) -> Router {
    Router::new()
        .route("/api/companies", routing::get(get_companies))
        .route("/api/companies/:company/files", routing::get(get_company_files))
        .route("/api/problems", routing::get(get_problems))
        .route("/api/hint", routing::get(get_hint))
        .route("/api/liveness", routing::get(liveness))
        .layer(Extension(source))
        .layer(Extension(generator))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers([CONTENT_TYPE]),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown.");
}
