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

//! The explicit process context threaded through every handler via
//! `axum::State`, replacing the teacher's module-level `OnceCell`/`Lazy`
//! globals (`CONFIG`, `HTTP_CLIENT`, `SEMAPHORE`, `CACHE_WRITER`) with one
//! value built once in `main` — per the "avoid hidden singletons" design
//! note.

use crate::backend::CacheBackend;
use crate::capture::StoreJob;
use crate::config::AppConfig;
use crate::lock::LockManager;
use hyper::client::HttpConnector;
use hyper::{Body, Client};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Bound on the asynchronous store queue: large enough to absorb a burst
/// of misses, small enough that a stalled backend can't grow memory
/// without limit.
const STORE_QUEUE_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn CacheBackend>,
    pub lock_manager: Arc<dyn LockManager>,
    pub http_client: Client<HttpConnector, Body>,
    pub store_tx: mpsc::Sender<StoreJob>,
}

impl AppState {
    /// Builds the process context and spawns the detached writer task that
    /// drains `store_tx` into the backend — the generalised shape of the
    /// teacher's `CACHE_WRITER` channel, now backend-agnostic behind the
    /// `CacheBackend` trait instead of one channel per cloud provider enum
    /// variant.
    pub fn new(
        config: AppConfig,
        backend: Arc<dyn CacheBackend>,
        lock_manager: Arc<dyn LockManager>,
    ) -> (Self, JoinHandle<()>) {
        let (store_tx, mut store_rx) = mpsc::channel::<StoreJob>(STORE_QUEUE_CAPACITY);

        let writer_backend = backend.clone();
        let writer_handle = tokio::spawn(async move {
            while let Some((key, value, ttl)) = store_rx.recv().await {
                writer_backend.set_key(&key, value, ttl).await;
            }
        });

        let state = AppState {
            config: Arc::new(config),
            backend,
            lock_manager,
            http_client: Client::new(),
            store_tx,
        };

        (state, writer_handle)
    }
}
