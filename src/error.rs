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

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// The error taxonomy for the request path. Every variant maps to exactly
/// one policy from the error-handling design: cache/lock failures degrade
/// silently, body I/O failures surface to the client, everything else
/// becomes a 500 carrying the fault message.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// `Get`/`SetKey`/`Lock`/`Unlock` failed against the backend or lock
    /// service. Never returned from a handler directly — callers log it
    /// and continue as if the operation had missed.
    #[error("cache backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Reading or closing the upstream response body failed during
    /// capture. The client sees this as an error response.
    #[error("upstream body i/o error: {0}")]
    UpstreamBodyIo(String),

    /// Any unexpected fault in the handler. Translated to HTTP 500 with
    /// the fault's message, the Rust analogue of the original's
    /// recover()-wrapped handler.
    #[error("{0}")]
    Fault(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::BackendUnavailable(msg) => {
                tracing::error!("{}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            ProxyError::UpstreamBodyIo(msg) | ProxyError::Fault(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()).into_response()
            }
        }
    }
}
