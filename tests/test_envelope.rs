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
    use sidecache::envelope::Envelope;
    use std::collections::HashMap;

    #[test]
    fn round_trips_body_headers_and_status() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        let envelope = Envelope::new(Bytes::from_static(b"hello world"), Some(headers), Some(201));
        let encoded = envelope.encode();
        let decoded = Envelope::decode(Bytes::from(encoded));

        assert_eq!(decoded, envelope);
    }

    #[test]
    fn round_trips_minimal_body_only_envelope() {
        let envelope = Envelope::new(Bytes::from_static(b"\x1f\x8bpretend-gzip"), None, None);
        let decoded = Envelope::decode(Bytes::from(envelope.encode()));
        assert_eq!(decoded.body, envelope.body);
        assert!(decoded.headers.is_none());
        assert!(decoded.status_code.is_none());
    }

    #[test]
    fn falls_back_to_legacy_envelope_on_non_json_bytes() {
        let raw = Bytes::from_static(b"\x1f\x8b\x08\x00not-actually-json");
        let decoded = Envelope::decode(raw.clone());

        assert_eq!(decoded.body, raw);
        assert!(decoded.headers.is_none());
        assert!(decoded.status_code.is_none());
    }

    #[test]
    fn synthesized_headers_include_gzip_only_when_requested() {
        let with_gzip = Envelope::synthesize_headers("http://example.com/x", true);
        assert_eq!(with_gzip.get("Content-Encoding").unwrap(), "gzip");

        let without_gzip = Envelope::synthesize_headers("http://example.com/x", false);
        assert!(without_gzip.get("Content-Encoding").is_none());
        assert_eq!(without_gzip.get("X-Cache-Response-For").unwrap(), "http://example.com/x");
    }
}
