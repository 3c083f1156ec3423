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

//! Flattening of the merged environment into dotted property keys.

use crate::environment::Environment;
use crate::error::BindError;
use figment::value::{Dict, Tag, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Highest list index accepted from a property key; larger indexes are dropped.
pub const MAX_LIST_INDEX: usize = 1023;

/// Collect every property under `prefix` from all sources of `environment`.
///
/// Keys are dotted paths (e.g., `nacos.config.server-addr`). When several sources
/// define the same key, the highest priority source wins. Tables whose keys are all
/// indexes become arrays and, like every array, are returned as a single value.
pub fn extract_properties(
    environment: &Environment,
    prefix: &str,
) -> Result<BTreeMap<String, Value>, BindError> {
    let root = environment.merged()?;
    let root = match convert_numeric_dicts_to_arrays(Value::Dict(Tag::Default, root)) {
        Value::Dict(_, dict) => dict,
        _ => Dict::new(),
    };

    let mut properties = BTreeMap::new();
    flatten_into(&mut properties, "", &root);

    let scope = format!("{prefix}.");
    properties.retain(|key, _| key == prefix || key.starts_with(&scope));
    debug!(
        "Extracted {} properties under '{}' from {} sources.",
        properties.len(),
        prefix,
        environment.sources().len()
    );
    Ok(properties)
}

/// Flatten nested tables into `flat`, joining keys with `.` under `parent`.
pub(crate) fn flatten_into(flat: &mut BTreeMap<String, Value>, parent: &str, dict: &Dict) {
    for (key, value) in dict {
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}.{key}")
        };
        match value {
            Value::Dict(_, inner) if !inner.is_empty() => flatten_into(flat, &path, inner),
            _ => {
                flat.insert(path, value.clone());
            }
        }
    }
}

/// Recursively convert dicts with all numeric string keys to arrays.
fn convert_numeric_dicts_to_arrays(value: Value) -> Value {
    match value {
        Value::Dict(tag, dict) => {
            let processed: Dict = dict
                .into_iter()
                .map(|(k, v)| (k, convert_numeric_dicts_to_arrays(v)))
                .collect();

            if is_array_dict(&processed) {
                dict_to_array(processed)
            } else {
                Value::Dict(tag, processed)
            }
        }
        Value::Array(tag, arr) => {
            let processed: Vec<Value> = arr
                .into_iter()
                .map(convert_numeric_dicts_to_arrays)
                .collect();
            Value::Array(tag, processed)
        }
        other => other,
    }
}

fn is_array_dict(dict: &Dict) -> bool {
    if dict.is_empty() {
        return false;
    }
    dict.keys().all(|k| k.parse::<usize>().is_ok())
}

/// Gaps between indexes are filled with empty tables. Indexes above
/// [`MAX_LIST_INDEX`] are dropped.
fn dict_to_array(dict: Dict) -> Value {
    let mut indexed: Vec<(usize, Value)> = dict
        .into_iter()
        .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
        .filter(|(i, _)| {
            if *i > MAX_LIST_INDEX {
                warn!(
                    "List index {} exceeds the maximum of {} and will be ignored.",
                    i, MAX_LIST_INDEX
                );
                return false;
            }
            true
        })
        .collect();

    indexed.sort_by_key(|(i, _)| *i);

    let len = match indexed.last() {
        Some((i, _)) => i.checked_add(1).unwrap_or(MAX_LIST_INDEX + 1),
        None => 0,
    };
    let mut array = vec![Value::Dict(Tag::Default, Dict::new()); len];

    for (i, v) in indexed {
        array[i] = v;
    }

    Value::Array(Tag::Default, array)
}
