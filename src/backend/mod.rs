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

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// The opaque key/bytes/TTL store the core depends on. Concrete adapters
/// (Redis-backed, in-memory) are interchangeable behind this trait, the
/// same polymorphism the teacher applies to its own `storage::{gcs,s3,
/// azure,local}` modules — just with one trait instead of four bespoke
/// function sets.
///
/// Implementations MUST swallow "not found" quietly and treat every other
/// failure as a miss after logging; a backend that is down or not yet
/// connected behaves as pure pass-through, never a fault.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Option<Bytes>;
    async fn set_key(&self, key: &str, value: Bytes, ttl: Duration);
}
