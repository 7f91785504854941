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

//! Distributed single-flight coordination: at most one concurrent miss per
//! fingerprint should reach upstream. This is deliberately a *distributed*
//! coordinator, not an in-process mutex — the sidecar is replicated per
//! pod, so the thundering herd spans processes, not just tasks.

use crate::lock::LockManager;
use std::time::Duration;

/// Safety-net TTL for the lease: if the acquirer crashes mid-flight, other
/// waiters succeed once this elapses.
pub const LEASE_TTL: Duration = Duration::from_secs(15);

/// The irregular back-off schedule reproduced literally from the spec
/// rather than re-derived from its `pow(10, floor(i/2)+1) * (1|5)`
/// formula — see DESIGN.md for why the literal schedule is kept even
/// though it doesn't factor into a clean closed form.
const BACKOFF_SCHEDULE: [Duration; 7] = [
    Duration::from_millis(10),
    Duration::from_millis(50),
    Duration::from_millis(100),
    Duration::from_millis(500),
    Duration::from_secs(1),
    Duration::from_secs(5),
    Duration::from_secs(10),
];

/// Outcome of attempting to enter the single-flight section for a key.
pub enum Lease {
    /// The lease was acquired (first attempt or after a successful retry);
    /// release it via `release` once the request has been served.
    Acquired,
    /// All retries were exhausted; the caller proceeds anyway, degraded —
    /// the request must still complete even without single-flight rights.
    Exhausted,
}

/// Attempts to acquire the lease for `key`, retrying on contention per the
/// schedule above. Never blocks indefinitely: after 7 failed attempts it
/// gives up and tells the caller to proceed unprotected.
pub async fn acquire(lock_manager: &dyn LockManager, key: &str) -> Lease {
    if lock_manager.lock(key, LEASE_TTL).await {
        return Lease::Acquired;
    }

    for (attempt, delay) in BACKOFF_SCHEDULE.iter().enumerate() {
        tokio::time::sleep(*delay).await;
        if lock_manager.lock(key, LEASE_TTL).await {
            return Lease::Acquired;
        }
        tracing::debug!("single-flight lock contended for '{key}', attempt {}", attempt + 1);
    }

    tracing::warn!("single-flight lock exhausted for '{key}' after {} attempts, proceeding degraded", BACKOFF_SCHEDULE.len());
    Lease::Exhausted
}

/// Releases the lease, logging but never failing the request on error.
pub async fn release(lock_manager: &dyn LockManager, key: &str) {
    lock_manager.unlock(key).await;
}
