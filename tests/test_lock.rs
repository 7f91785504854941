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
    use std::time::Duration;

    #[tokio::test]
    async fn second_lock_on_same_key_is_contended() {
        let manager = InMemoryLockManager::new();
        assert!(manager.lock("k", Duration::from_secs(10)).await);
        assert!(!manager.lock("k", Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn unlock_frees_the_key_for_reacquisition() {
        let manager = InMemoryLockManager::new();
        assert!(manager.lock("k", Duration::from_secs(10)).await);
        manager.unlock("k").await;
        assert!(manager.lock("k", Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn lease_expires_after_its_ttl() {
        let manager = InMemoryLockManager::new();
        assert!(manager.lock("k", Duration::from_millis(1)).await);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(manager.lock("k", Duration::from_secs(10)).await);
    }
}
