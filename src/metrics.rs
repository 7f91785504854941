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

//! The two monotonic counters and the build-info gauge the sidecar
//! exposes on `/metrics`. Counters are process-global by nature (they are
//! the one piece of cross-request mutable state the spec allows), recorded
//! through the `metrics` facade exactly as the teacher installs its own
//! `PrometheusBuilder` recorder in `main`.

pub const ALL_REQUEST_COUNTER: &str = "sidecache_all_request_hit_counter";
pub const CACHE_HIT_COUNTER: &str = "sidecache_cache_hit_counter";
pub const BUILD_INFO_GAUGE: &str = "sidecache_admission_build_info";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Records that a request reached the dispatcher.
pub fn record_request() {
    metrics::counter!(ALL_REQUEST_COUNTER).increment(1);
}

/// Records that a request was served from the cache.
pub fn record_cache_hit() {
    metrics::counter!(CACHE_HIT_COUNTER).increment(1);
}

/// Publishes the build-info gauge once at startup, labelled with the
/// crate version, matching the teacher's habit of stamping observability
/// output with a version label.
pub fn record_build_info() {
    metrics::gauge!(BUILD_INFO_GAUGE, "version" => VERSION).set(1.0);
}
