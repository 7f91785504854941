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

use super::CacheBackend;
use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

/// Redis-backed cache store, grounded on `original_source/pkg/cache/redis.go`
/// (`SET key value EX ttl` / `GET key`, `redis.Nil` treated as a miss) and
/// generalised to an async `ConnectionManager` the way
/// `examples/harborgrid-justin-caddy` wires up its own distributed Redis
/// clients (tokio-comp + connection-manager, auto-reconnecting).
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl RedisBackend {
    /// Connects to Redis. A connection failure here is surfaced to the
    /// caller (startup-time concern); reconnection afterwards is handled
    /// transparently by `ConnectionManager`.
    pub async fn connect(redis_url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = client.get_connection_manager().await?;
        Ok(RedisBackend { manager })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Option<Bytes> {
        let mut conn = self.manager.clone();
        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(Some(bytes)) => Some(Bytes::from(bytes)),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("cache backend GET failed for key '{key}': {e}");
                None
            }
        }
    }

    async fn set_key(&self, key: &str, value: Bytes, ttl: Duration) {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        let result: redis::RedisResult<()> = conn.set_ex(key, value.to_vec(), seconds).await;
        if let Err(e) = result {
            tracing::error!("cache backend SET failed for key '{key}': {e}");
        }
    }
}
