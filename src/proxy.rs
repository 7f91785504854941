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

//! The public HTTP handler bound to every path: canonicalise the request,
//! single-flight around a miss, replay from cache on a hit, or forward to
//! upstream and let `capture` populate the cache on the way back.

use crate::capture;
use crate::envelope::Envelope;
use crate::error::ProxyError;
use crate::fingerprint;
use crate::metrics;
use crate::singleflight::{self, Lease};
use crate::state::AppState;
use axum::extract::State;
use bytes::Bytes;
use flate2::read::GzDecoder;
use hyper::header::{ACCEPT_ENCODING, CONTENT_ENCODING};
use hyper::{Body, Request, Response};
use std::io::Read;

/// Main proxy handler: every inbound request lands here first.
pub async fn dispatch(State(state): State<AppState>, req: Request<Body>) -> Result<Response<Body>, ProxyError> {
    metrics::record_request();

    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();
    let request_url = req.uri().to_string();
    let accepts_gzip = accepts_gzip(&req);

    let fp = fingerprint::fingerprint(&state.config.cache_key_prefix, &path, &query);
    let lease_key = fingerprint::lease_key(&fp);

    let lease = singleflight::acquire(state.lock_manager.as_ref(), &lease_key).await;

    let response = serve(&state, req, &fp, &request_url, accepts_gzip).await;

    if matches!(lease, Lease::Acquired) {
        singleflight::release(state.lock_manager.as_ref(), &lease_key).await;
    }

    response
}

/// Probes the backend and either replays a hit or falls through to
/// `forward`, shared by both the acquired and exhausted-degraded
/// single-flight branches.
pub async fn serve(
    state: &AppState,
    req: Request<Body>,
    fp: &str,
    request_url: &str,
    accepts_gzip: bool,
) -> Result<Response<Body>, ProxyError> {
    if let Some(raw) = state.backend.get(fp).await {
        metrics::record_cache_hit();
        let envelope = Envelope::decode(raw);
        return Ok(replay(&envelope, request_url, accepts_gzip));
    }

    forward(state, req, fp).await
}

/// Forwards the request upstream and runs the response through `capture`
/// on the way back.
pub async fn forward(state: &AppState, req: Request<Body>, fp: &str) -> Result<Response<Body>, ProxyError> {
    let (parts, body) = req.into_parts();
    let mut upstream_uri = format!("{}{}", state.config.upstream_base_url(), parts.uri.path());
    if let Some(query) = parts.uri.query() {
        upstream_uri.push('?');
        upstream_uri.push_str(query);
    }

    let mut builder = Request::builder().method(parts.method.clone()).uri(upstream_uri);
    for (name, value) in parts.headers.iter() {
        builder = builder.header(name, value);
    }
    let upstream_req = builder
        .body(body)
        .map_err(|e| ProxyError::Fault(format!("failed to build upstream request: {e}")))?;

    let upstream_resp = state
        .http_client
        .request(upstream_req)
        .await
        .map_err(|e| ProxyError::BackendUnavailable(e.to_string()))?;

    capture::capture(upstream_resp, fp, state.config.cache_ttl, &state.store_tx).await
}

/// Reconstructs an HTTP response from a stored envelope, indexed by
/// (client accepts gzip?, headers present?). The envelope body is always
/// gzip-framed — `capture` always recompresses to gzip before storing, and
/// legacy writers stored bare gzip bytes — so the only question is whether
/// to hand it over verbatim or gunzip it first.
pub fn replay(envelope: &Envelope, request_url: &str, accepts_gzip: bool) -> Response<Body> {
    let status = envelope.status_code.unwrap_or(200);
    let mut builder = Response::builder().status(status);

    match (&envelope.headers, accepts_gzip) {
        (None, true) => {
            for (name, value) in Envelope::synthesize_headers(request_url, true) {
                builder = builder.header(name, value);
            }
            builder.body(Body::from(envelope.body.clone())).expect("valid response")
        }
        (None, false) => {
            for (name, value) in Envelope::synthesize_headers(request_url, false) {
                builder = builder.header(name, value);
            }
            builder.body(Body::from(gunzip(&envelope.body))).expect("valid response")
        }
        (Some(headers), true) => {
            let mut has_content_encoding = false;
            for (name, value) in headers {
                if name.eq_ignore_ascii_case(CONTENT_ENCODING.as_str()) {
                    has_content_encoding = true;
                }
                builder = builder.header(name, value);
            }
            if !has_content_encoding {
                builder = builder.header(CONTENT_ENCODING, "gzip");
            }
            builder.body(Body::from(envelope.body.clone())).expect("valid response")
        }
        (Some(headers), false) => {
            for (name, value) in headers {
                if name.eq_ignore_ascii_case(CONTENT_ENCODING.as_str()) {
                    continue;
                }
                builder = builder.header(name, value);
            }
            builder.body(Body::from(gunzip(&envelope.body))).expect("valid response")
        }
    }
}

pub fn gunzip(body: &Bytes) -> Vec<u8> {
    let mut decoder = GzDecoder::new(&body[..]);
    let mut buf = Vec::new();
    if let Err(e) = decoder.read_to_end(&mut buf) {
        tracing::error!("failed to gunzip cached body during replay: {e}");
        return Vec::new();
    }
    buf
}

pub fn accepts_gzip(req: &Request<Body>) -> bool {
    req.headers()
        .get(ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("gzip"))
        .unwrap_or(false)
}
