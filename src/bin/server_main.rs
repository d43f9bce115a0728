// src/bin/server_main.rs
//! met-server: the inference HTTP server.
//!
//! Serves `GET /ping` and `POST /predict`. Configuration comes from the TOML
//! file named by `MET_CONFIG` (defaults apply when unset); the classifier
//! backend is the deterministic cutpoint model unless an ONNX model is
//! configured through `MET_MODEL`/`MET_CLASSES` (feature `onnx`).

use met_core::classify::CutpointClassifier;
use met_core::classify::MetClassifier;
use met_core::config::{load_from_path, MetConfig};
use met_core::server::{router, AppState};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "met_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config();
    if let Err(reason) = config.validate() {
        tracing::error!(%reason, "invalid configuration");
        std::process::exit(1);
    }

    let win = config.pipeline.win_samples();
    tracing::info!(
        win,
        step = config.pipeline.step_samples(),
        "met-core inference server starting"
    );

    let state = AppState::new(win, build_classifier());
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind_addr, config.server.port)
        .parse()
        .expect("invalid bind address");
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}

fn load_config() -> MetConfig {
    match std::env::var("MET_CONFIG") {
        Ok(path) => match load_from_path(Path::new(&path)) {
            Ok(config) => {
                tracing::info!(%path, "configuration loaded");
                config
            }
            Err(err) => {
                tracing::error!(%path, %err, "failed to load configuration");
                std::process::exit(1);
            }
        },
        Err(_) => MetConfig::default(),
    }
}

#[cfg(feature = "onnx")]
fn build_classifier() -> Arc<dyn MetClassifier> {
    use met_core::classify::OnnxClassifier;

    if let (Ok(model), Ok(classes)) = (std::env::var("MET_MODEL"), std::env::var("MET_CLASSES")) {
        match OnnxClassifier::new(&model, &classes) {
            Ok(classifier) => return Arc::new(classifier),
            Err(err) => {
                tracing::error!(%err, "failed to load ONNX model, falling back to cutpoints");
            }
        }
    }
    Arc::new(CutpointClassifier::default())
}

#[cfg(not(feature = "onnx"))]
fn build_classifier() -> Arc<dyn MetClassifier> {
    Arc::new(CutpointClassifier::default())
}
