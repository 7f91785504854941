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

#[cfg(test)]
mod tests {
    use super::*;
    use sidecache::lock::memory::InMemoryLockManager;
    use sidecache::lock::LockManager;
    use sidecache::singleflight::{acquire, release, Lease};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn first_acquirer_gets_the_lease_immediately() {
        let manager = InMemoryLockManager::new();
        assert!(matches!(acquire(&manager, "k").await, Lease::Acquired));
    }

    #[tokio::test(start_paused = true)]
    async fn contended_lock_retries_then_succeeds_once_released() {
        let manager = Arc::new(InMemoryLockManager::new());
        assert!(matches!(acquire(manager.as_ref(), "k").await, Lease::Acquired));

        let releaser = manager.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            release(releaser.as_ref(), "k").await;
        });

        assert!(matches!(acquire(manager.as_ref(), "k").await, Lease::Acquired));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_the_full_schedule_and_proceeds_degraded() {
        let manager = InMemoryLockManager::new();
        assert!(manager.lock("k", Duration::from_secs(3600)).await);

        assert!(matches!(acquire(&manager, "k").await, Lease::Exhausted));
    }

    #[test]
    fn release_never_panics_on_an_absent_lease() {
        let manager = InMemoryLockManager::new();
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async { release(&manager, "never-locked").await });
    }
}
