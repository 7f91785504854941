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
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// In-process lease map used by the test suite in place of a real
/// distributed lock service. Expired leases are reclaimed lazily, same as
/// `backend::memory::InMemoryBackend`.
#[derive(Default)]
pub struct InMemoryLockManager {
    leases: DashMap<String, Instant>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager { leases: DashMap::new() }
    }
}

#[async_trait]
impl LockManager for InMemoryLockManager {
    async fn lock(&self, key: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        if let Some(expiry) = self.leases.get(key) {
            if *expiry > now {
                return false;
            }
        }
        self.leases.insert(key.to_string(), now + ttl);
        true
    }

    async fn unlock(&self, key: &str) {
        self.leases.remove(key);
    }
}
