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

use std::error::Error;
use std::time::Duration;

/// Default listen port for the sidecar, used when `SIDE_CACHE_PORT` is unset.
fn default_side_cache_port() -> u16 {
    9191
}

/// Fallback default TTL applied when neither `CACHE_TTL` nor a per-response
/// cacheability header is present. The spec leaves the exact value open;
/// see DESIGN.md for the reasoning behind this default.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Process-wide, explicitly constructed configuration. Built once in `main`
/// from the environment and threaded through `AppState` rather than stashed
/// in a global `OnceCell`, per the "avoid hidden singletons" design note.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Loopback port of the upstream application process.
    pub main_container_port: u16,

    /// Port this sidecar listens on.
    pub side_cache_port: u16,

    /// Prefix folded into every fingerprint computation. May be empty.
    pub cache_key_prefix: String,

    /// Default TTL applied when the upstream does not specify one via the
    /// cacheability header.
    pub cache_ttl: Duration,

    /// Redis connection string for both the cache backend and the lock
    /// manager (`redis://[:password@]host:port`).
    pub redis_address: String,

    /// Redis `AUTH` password, if required.
    pub redis_password: Option<String>,
}

impl AppConfig {
    /// Parses configuration from the process environment. `.env` is loaded
    /// first (if present) so local development mirrors the teacher's own
    /// `dotenv` bootstrap.
    pub fn from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        dotenv::dotenv().ok();

        let main_container_port: u16 = std::env::var("MAIN_CONTAINER_PORT")
            .map_err(|_| "MAIN_CONTAINER_PORT is required")?
            .parse()
            .map_err(|e| format!("MAIN_CONTAINER_PORT must be a valid port: {e}"))?;

        let side_cache_port = match std::env::var("SIDE_CACHE_PORT") {
            Ok(v) => v
                .parse()
                .map_err(|e| format!("SIDE_CACHE_PORT must be a valid port: {e}"))?,
            Err(_) => default_side_cache_port(),
        };

        let cache_key_prefix = std::env::var("CACHE_KEY_PREFIX").unwrap_or_default();

        let cache_ttl = match std::env::var("CACHE_TTL") {
            Ok(v) => humantime::parse_duration(&v)
                .map_err(|e| format!("CACHE_TTL is not a valid duration literal: {e}"))?,
            Err(_) => DEFAULT_CACHE_TTL,
        };

        let redis_address = std::env::var("REDIS_ADDRESS")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let redis_password = std::env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty());

        Ok(AppConfig {
            main_container_port,
            side_cache_port,
            cache_key_prefix,
            cache_ttl,
            redis_address,
            redis_password,
        })
    }

    /// The upstream base URL this sidecar proxies to.
    pub fn upstream_base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.main_container_port)
    }

    /// Redis URL with the configured password folded in, when set.
    pub fn redis_url(&self) -> String {
        match &self.redis_password {
            Some(password) if !password.is_empty() => {
                if let Some(rest) = self.redis_address.strip_prefix("redis://") {
                    format!("redis://:{password}@{rest}")
                } else {
                    self.redis_address.clone()
                }
            }
            _ => self.redis_address.clone(),
        }
    }
}
