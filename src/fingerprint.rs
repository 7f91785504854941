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

use md5::{Digest, Md5};

/// Suffix appended to a fingerprint to form its single-flight lease key.
pub const LOCK_SUFFIX: &str = "-lock";

/// Canonicalises a request path + query into the deterministic form the
/// fingerprint is hashed from: `<path>?<sorted, percent-encoded query>`.
/// Query keys are sorted lexicographically so parameter reordering never
/// changes the result; an empty query still keeps the trailing `?` so the
/// canonical form is unambiguous.
pub fn canonical_path_and_query(path: &str, query: &str) -> String {
    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();

    format!("{path}?{encoded}")
}

/// Computes the 32-char lowercase MD5 hex fingerprint for a request,
/// folding in the configured key prefix. MD5 is chosen for speed and key
/// compactness, not for security — a collision would cause a cross-URL
/// cache hit, an accepted risk at the usage scale.
pub fn fingerprint(prefix: &str, path: &str, query: &str) -> String {
    let canonical = canonical_path_and_query(path, query);
    let source = format!("{prefix}/{canonical}");

    let mut hasher = Md5::new();
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}

/// The lease key used by the single-flight coordinator for a fingerprint.
pub fn lease_key(fp: &str) -> String {
    format!("{fp}{LOCK_SUFFIX}")
}
