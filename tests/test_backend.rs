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
    use bytes::Bytes;
    use sidecache::backend::memory::InMemoryBackend;
    use sidecache::backend::CacheBackend;
    use std::time::Duration;

    #[tokio::test]
    async fn misses_on_unknown_key() {
        let backend = InMemoryBackend::new();
        assert!(backend.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn round_trips_a_stored_value() {
        let backend = InMemoryBackend::new();
        backend.set_key("k", Bytes::from_static(b"v"), Duration::from_secs(60)).await;
        assert_eq!(backend.get("k").await.unwrap(), Bytes::from_static(b"v"));
    }

    #[tokio::test]
    async fn expires_entries_past_their_ttl() {
        let backend = InMemoryBackend::new();
        backend.set_key("k", Bytes::from_static(b"v"), Duration::from_millis(1)).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(backend.get("k").await.is_none());
    }
}
