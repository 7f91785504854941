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

//! Intercepts an upstream response on its way back to the client: decides
//! whether it is cacheable, normalises its body (decompress-then-recompress
//! to gzip), schedules an asynchronous store, and hands a valid body back
//! to the caller without ever blocking the response on the store.

use crate::envelope::Envelope;
use crate::error::ProxyError;
use bytes::Bytes;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use hyper::{Body, Response};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::time::Duration;
use tokio::sync::mpsc;

/// Upstream response header carrying a per-response TTL override, as
/// `max-age=<seconds>` (spec §4.3 step 2 / §8 scenario 2).
pub const CACHEABILITY_HEADER: &str = "tysidecarcachable";

/// Upstream opt-in flag: when present and `true`, all upstream response
/// headers are snapshotted into the stored envelope (spec §4.3 step 6).
pub const HEADERS_ENABLED_FLAG: &str = "sidecache-headers-enabled";

/// A pending store, handed to the background writer task. Bounded so a
/// stalled backend cannot grow the queue without limit (spec §9 design
/// note).
pub type StoreJob = (String, Bytes, Duration);

/// Parses `max-age=<seconds>` out of the cacheability header value.
fn parse_max_age(value: &str) -> Option<Duration> {
    value
        .split(',')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("max-age="))
        .and_then(|secs| secs.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Runs the capture algorithm against an upstream response, returning the
/// response to hand back to the client. `store_tx` is used fire-and-forget:
/// a full queue or a dead receiver are both logged and otherwise ignored,
/// never propagated to the caller.
pub async fn capture(
    response: Response<Body>,
    fingerprint: &str,
    default_ttl: Duration,
    store_tx: &mpsc::Sender<StoreJob>,
) -> Result<Response<Body>, ProxyError> {
    let status = response.status();

    // Status gate: never cache server errors, pass through untouched.
    if status.as_u16() >= 500 {
        return Ok(response);
    }

    let (mut parts, body) = response.into_parts();

    let ttl = parts
        .headers
        .get(CACHEABILITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_max_age)
        .unwrap_or(default_ttl);

    let headers_enabled = parts
        .headers
        .get(HEADERS_ENABLED_FLAG)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let was_gzip = parts
        .headers
        .get(hyper::header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("gzip"))
        .unwrap_or(false);

    // Body size changes under recompression; the old Content-Length would lie.
    parts.headers.remove(hyper::header::CONTENT_LENGTH);

    let raw = hyper::body::to_bytes(body)
        .await
        .map_err(|e| ProxyError::UpstreamBodyIo(e.to_string()))?;

    let plain = if was_gzip {
        let mut decoder = GzDecoder::new(&raw[..]);
        let mut buf = Vec::new();
        decoder
            .read_to_end(&mut buf)
            .map_err(|e| ProxyError::UpstreamBodyIo(e.to_string()))?;
        buf
    } else {
        raw.to_vec()
    };

    // The cached body is always gzip-framed regardless of what the
    // upstream sent: gzip-accepting clients (the common case) replay it
    // zero-copy, others pay a one-time decompression cost at replay.
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&plain)
        .map_err(|e| ProxyError::UpstreamBodyIo(e.to_string()))?;
    let storage_buffer = encoder
        .finish()
        .map_err(|e| ProxyError::UpstreamBodyIo(e.to_string()))?;

    if ttl > Duration::ZERO {
        let headers = if headers_enabled {
            Some(flatten_headers(&parts.headers))
        } else {
            None
        };
        let envelope = Envelope::new(Bytes::from(storage_buffer.clone()), headers, Some(status.as_u16()));
        let job = (fingerprint.to_string(), Bytes::from(envelope.encode()), ttl);
        if store_tx.try_send(job).is_err() {
            tracing::warn!("store queue full or closed, dropping cache write for '{fingerprint}'");
        }
    }

    // Re-present the body so the client is none the wiser; the wire
    // Content-Encoding contract is unchanged either way.
    let out_body = if was_gzip {
        Body::from(storage_buffer)
    } else {
        Body::from(plain)
    };

    Ok(Response::from_parts(parts, out_body))
}

/// Flattens hyper's multi-valued header map into a single string map,
/// joining repeated values with `;` (spec §3).
fn flatten_headers(headers: &hyper::HeaderMap) -> HashMap<String, String> {
    let mut flattened: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(value) = value.to_str() {
            flattened
                .entry(name.as_str().to_string())
                .or_default()
                .push(value.to_string());
        }
    }
    flattened
        .into_iter()
        .map(|(k, v)| (k, v.join(";")))
        .collect()
}
