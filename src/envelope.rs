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

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// The replayable artifact stored in the cache backend, keyed by
/// fingerprint. Self-describing enough to reconstruct a full HTTP
/// response: if `headers` is absent the replayer synthesises a minimal
/// set, if `status_code` is absent it defaults to 200.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    #[serde(rename = "Body", with = "base64_body")]
    pub body: Bytes,

    #[serde(rename = "Headers", default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    #[serde(rename = "StatusCode", default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl Envelope {
    pub fn new(body: Bytes, headers: Option<HashMap<String, String>>, status_code: Option<u16>) -> Self {
        Envelope { body, headers, status_code }
    }

    /// Serialises the envelope as a JSON object (spec §4.2 `encode`).
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("Envelope serialisation is infallible")
    }

    /// Parses a stored value back into an envelope. If JSON parsing fails,
    /// the raw bytes are treated as a legacy, bare-gzip body — historical
    /// writers stored envelopes that way, and replay of those artifacts
    /// must keep working across a rolling upgrade.
    pub fn decode(raw: Bytes) -> Envelope {
        match serde_json::from_slice::<Envelope>(&raw) {
            Ok(envelope) => envelope,
            Err(_) => Envelope {
                body: raw,
                headers: None,
                status_code: None,
            },
        }
    }

    /// Builds the minimal header set the dispatcher falls back to when the
    /// envelope carries no captured headers (spec §3 invariants / §4.5).
    pub fn synthesize_headers(original_url: &str, emit_gzip_encoding: bool) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
        headers.insert("X-Cache-Response-For".to_string(), original_url.to_string());
        if emit_gzip_encoding {
            headers.insert("Content-Encoding".to_string(), "gzip".to_string());
        }
        headers
    }
}

mod base64_body {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
