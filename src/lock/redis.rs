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

use super::LockManager;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

/// Redis-backed distributed lease, implemented with the classic `SET key
/// value NX PX ttl` acquire / `DEL key` release pair — the same primitive
/// `examples/harborgrid-justin-caddy`'s `DistributedLock::acquire` sketches
/// against a simulated connection, wired here to a real `redis` client.
pub struct RedisLockManager {
    manager: ConnectionManager,
}

impl RedisLockManager {
    pub async fn connect(redis_url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = client.get_connection_manager().await?;
        Ok(RedisLockManager { manager })
    }
}

#[async_trait]
impl LockManager for RedisLockManager {
    async fn lock(&self, key: &str, ttl: Duration) -> bool {
        let mut conn = self.manager.clone();
        let millis = ttl.as_millis().max(1) as usize;

        let result: redis::RedisResult<Option<String>> = redis::cmd("SET")
            .arg(key)
            .arg(1)
            .arg("NX")
            .arg("PX")
            .arg(millis)
            .query_async(&mut conn)
            .await;

        match result {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                tracing::error!("lock service LOCK failed for key '{key}': {e}");
                false
            }
        }
    }

    async fn unlock(&self, key: &str) {
        let mut conn = self.manager.clone();
        let result: redis::RedisResult<()> = conn.del(key).await;
        if let Err(e) = result {
            tracing::error!("lock service UNLOCK failed for key '{key}': {e}");
        }
    }
}
