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
    use serial_test::serial;
    use sidecache::config::{AppConfig, DEFAULT_CACHE_TTL};
    use std::time::Duration;

    #[test]
    #[serial]
    fn parses_required_and_defaulted_fields() {
        std::env::set_var("MAIN_CONTAINER_PORT", "8080");
        std::env::remove_var("SIDE_CACHE_PORT");
        std::env::remove_var("CACHE_KEY_PREFIX");
        std::env::remove_var("CACHE_TTL");

        let cfg = AppConfig::from_env().expect("should parse");
        assert_eq!(cfg.main_container_port, 8080);
        assert_eq!(cfg.side_cache_port, 9191);
        assert_eq!(cfg.cache_key_prefix, "");
        assert_eq!(cfg.cache_ttl, DEFAULT_CACHE_TTL);
    }

    #[test]
    #[serial]
    fn parses_duration_literal_ttl() {
        std::env::set_var("MAIN_CONTAINER_PORT", "8080");
        std::env::set_var("CACHE_TTL", "5m");

        let cfg = AppConfig::from_env().expect("should parse");
        assert_eq!(cfg.cache_ttl, Duration::from_secs(300));
        std::env::remove_var("CACHE_TTL");
    }

    #[test]
    #[serial]
    fn rejects_missing_main_container_port() {
        std::env::remove_var("MAIN_CONTAINER_PORT");
        assert!(AppConfig::from_env().is_err());
    }
}
