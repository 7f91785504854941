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
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// In-process stand-in for the external cache store, backed by `DashMap`
/// (a dependency the teacher already carries, previously unused). Used by
/// the test suite and as the degrade-to-pass-through reference when no
/// backend is configured — entries expire lazily on read, never proactively.
#[derive(Default)]
pub struct InMemoryBackend {
    entries: DashMap<String, (Bytes, Instant)>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        InMemoryBackend { entries: DashMap::new() }
    }
}

#[async_trait]
impl CacheBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Option<Bytes> {
        match self.entries.get(key) {
            Some(entry) if entry.1 > Instant::now() => Some(entry.0.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set_key(&self, key: &str, value: Bytes, ttl: Duration) {
        self.entries.insert(key.to_string(), (value, Instant::now() + ttl));
    }
}
