// Copyright (C) 2025 Matías Salinas (support@fenden.com)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use hyper::Server;
use metrics_exporter_prometheus::PrometheusBuilder;
use sidecache::backend::memory::InMemoryBackend;
use sidecache::backend::redis::RedisBackend;
use sidecache::backend::CacheBackend;
use sidecache::config::AppConfig;
use sidecache::lock::memory::InMemoryLockManager;
use sidecache::lock::redis::RedisLockManager;
use sidecache::lock::LockManager;
use sidecache::metrics as app_metrics;
use sidecache::proxy;
use sidecache::state::AppState;
use std::net::SocketAddr;
use std::process::exit;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initializes structured logging using the `LOG_LEVEL` environment
/// variable, falling back to "info" if unset.
fn init_logging() {
    let filter = EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Connects the Redis-backed cache store and lock service. A connection
/// failure here degrades to the in-memory adapters rather than aborting
/// startup: the sidecar keeps serving traffic, just without cross-replica
/// cache sharing or single-flight coordination until Redis is reachable.
async fn connect_backends(config: &AppConfig) -> (Arc<dyn CacheBackend>, Arc<dyn LockManager>) {
    let redis_url = config.redis_url();

    let backend: Arc<dyn CacheBackend> = match RedisBackend::connect(&redis_url).await {
        Ok(backend) => {
            info!("connected cache backend to redis at '{}'", config.redis_address);
            Arc::new(backend)
        }
        Err(e) => {
            warn!("failed to connect cache backend to redis ({e}), degrading to in-memory cache");
            Arc::new(InMemoryBackend::new())
        }
    };

    let lock_manager: Arc<dyn LockManager> = match RedisLockManager::connect(&redis_url).await {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            warn!("failed to connect lock service to redis ({e}), degrading to in-memory locking");
            Arc::new(InMemoryLockManager::new())
        }
    };

    (backend, lock_manager)
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            exit(1);
        }
    };

    init_logging();

    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder().expect("failed to install prometheus recorder");
    app_metrics::record_build_info();

    let (backend, lock_manager) = connect_backends(&config).await;
    let (state, _writer_handle) = AppState::new(config.clone(), backend, lock_manager);

    let router = axum::Router::new()
        .route("/metrics", axum::routing::get(move || async move { handle.render() }))
        .fallback(proxy::dispatch)
        .layer(CatchPanicLayer::new())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.side_cache_port));
    info!("sidecache listening at http://{addr}, proxying to {}", config.upstream_base_url());

    let server = Server::bind(&addr).serve(router.into_make_service());
    let graceful = server.with_graceful_shutdown(shutdown_signal());

    if let Err(e) = graceful.await {
        error!("server exited with error: {e}");
        exit(1);
    }
}

/// Waits for Ctrl+C or SIGTERM so the process can drain in-flight requests
/// before exiting, matching the teacher's habit of not abandoning
/// connections on deploy.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install ctrl+c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received, draining in-flight requests");
}
