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
use std::time::Duration;

/// The distributed per-key lease the single-flight coordinator acquires
/// before forwarding a cache miss upstream. `lock` returns `true` only when
/// the caller now owns the lease; `unlock` is best-effort and its failures
/// are never fatal to the request.
#[async_trait]
pub trait LockManager: Send + Sync {
    async fn lock(&self, key: &str, ttl: Duration) -> bool;
    async fn unlock(&self, key: &str);
}
