/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

//! Prefix stripping, dash to camel case key normalization and field filtering.

use figment::value::Value;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, warn};

/// Rewrite a dash-delimited key into its camel case field name.
///
/// The first segment is kept verbatim; every following segment has its first
/// character upper-cased. Empty segments contribute nothing.
///
/// ```
/// use nacos_config_binder::normalize_key;
///
/// assert_eq!(normalize_key("server-addr"), "serverAddr");
/// assert_eq!(normalize_key("a-b-c"), "aBC");
/// assert_eq!(normalize_key("namespace"), "namespace");
/// ```
pub fn normalize_key(key: &str) -> String {
    if !key.contains('-') {
        return key.to_owned();
    }

    let mut segments = key.split('-');
    let mut normalized = String::with_capacity(key.len());
    if let Some(first) = segments.next() {
        normalized.push_str(first);
    }
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            normalized.extend(first.to_uppercase());
            normalized.push_str(chars.as_str());
        }
    }
    normalized
}

/// Reduce the raw extracted properties to the ones that name a declared field.
///
/// 1. `sentinels` are removed (ASCII case-insensitive).
/// 2. Only keys starting with `prefix.` are kept, with that prefix stripped.
/// 3. Keys are normalized with [`normalize_key`].
/// 4. Only keys exactly equal to one of `declared` survive.
///
/// When two raw keys normalize to the same field, the first one in key order wins,
/// which makes the dashed spelling take precedence over the camel case one.
pub fn filter_and_normalize(
    raw: BTreeMap<String, Value>,
    prefix: &str,
    sentinels: &[&str],
    declared: &[&str],
) -> BTreeMap<String, Value> {
    let prefix = format!("{prefix}.");
    let mut filtered = BTreeMap::new();

    for (key, value) in raw {
        if sentinels.iter().any(|s| s.eq_ignore_ascii_case(&key)) {
            debug!("Skipping bootstrap property '{}'.", key);
            continue;
        }

        let Some(stripped) = key.strip_prefix(&prefix) else {
            continue;
        };

        let field = normalize_key(stripped);
        if !declared.contains(&field.as_str()) {
            debug!("Property '{}' does not match any declared field, skipping.", key);
            continue;
        }

        match filtered.entry(field) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(entry) => {
                warn!(
                    "Property '{}' resolves to already set field '{}' and will be ignored.",
                    key,
                    entry.key()
                );
            }
        }
    }

    filtered
}
