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

use super::insert_at_path;
use crate::binder::{BindableProperties, SECRET_MASK};
use crate::constants::{BOOTSTRAP_KEYS, CONFIG_PATH_ENV, ENV_PREFIX, PREFIX};
use crate::normalize::normalize_key;
use figment::{
    Metadata, Profile, Provider,
    value::{Dict, Map as FigmentMap, Value},
};
use std::{collections::HashSet, env, marker::PhantomData};
use tracing::{info, warn};

type ProfileMap = FigmentMap<Profile, Dict>;

/// Environment variables under the prefix that are NOT config values.
const IGNORED_ENV_VARS: &[&str] = &[CONFIG_PATH_ENV];

/// Process environment variables exposed as dotted properties.
///
/// A variable under `prefix` is renamed by lowercasing the remainder, turning `__`
/// into `.` and `_` into `-`, and prepending `target`:
///
/// ```text
/// NACOS_CONFIG_SERVER_ADDR            -> nacos.config.server-addr
/// NACOS_CONFIG_BOOTSTRAP__LOG_ENABLE  -> nacos.config.bootstrap.log-enable
/// NACOS_CONFIG_EXT_CONFIG__0__DATA_ID -> nacos.config.ext-config.0.data-id
/// ```
///
/// Variables whose first property segment does not name a field of `T` are ignored
/// with a warning suggesting similar variable names.
#[derive(Debug, Clone)]
pub struct SystemEnvironmentPropertySource<T: BindableProperties> {
    prefix: String,
    target: String,
    _phantom: PhantomData<T>,
}

impl<T: BindableProperties> SystemEnvironmentPropertySource<T> {
    /// Create a new system environment source.
    ///
    /// # Arguments
    /// * `prefix` - Environment variable prefix (e.g., "NACOS_CONFIG_")
    /// * `target` - Property prefix the variables are mapped under (e.g., "nacos.config")
    pub fn new(prefix: &str, target: &str) -> Self {
        Self {
            prefix: prefix.to_ascii_uppercase(),
            target: target.to_string(),
            _phantom: PhantomData,
        }
    }

    /// Create a source reading `NACOS_CONFIG_*` into `nacos.config.*`.
    pub fn with_default_prefix() -> Self {
        Self::new(ENV_PREFIX, PREFIX)
    }

    /// Map an environment variable name to its property name.
    pub fn property_name(&self, env_name: &str) -> Option<String> {
        let upper = env_name.to_ascii_uppercase();
        let rest = upper.strip_prefix(&self.prefix)?;
        if rest.is_empty() {
            return None;
        }
        let path = rest.to_ascii_lowercase().replace("__", ".").replace('_', "-");
        Some(format!("{}.{}", self.target, path))
    }

    /// Map a field name of `T` back to its environment variable name.
    pub fn env_name(&self, field: &str) -> String {
        let mut name = self.prefix.clone();
        for c in field.chars() {
            if c.is_ascii_uppercase() {
                name.push('_');
            }
            name.push(c.to_ascii_uppercase());
        }
        name
    }

    /// Returns all environment variable names that map onto a field of `T`.
    pub fn all_env_var_names(&self) -> Vec<String> {
        T::field_names()
            .into_iter()
            .map(|field| self.env_name(field))
            .collect()
    }

    /// The normalized field the property binds to, or `None` for bootstrap flags.
    fn field_of(&self, property: &str) -> Option<String> {
        if BOOTSTRAP_KEYS.contains(&property) {
            return None;
        }
        let relative = property.strip_prefix(&self.target)?.strip_prefix('.')?;
        let first = relative.split('.').next().unwrap_or(relative);
        Some(normalize_key(first))
    }

    fn is_secret(field: &str) -> bool {
        T::secret_field_names().contains(&field)
    }

    /// Collect the environment variables under the prefix into a nested table.
    pub fn deserialize(&self) -> Dict {
        self.deserialize_from(env::vars())
    }

    fn deserialize_from(&self, vars: impl IntoIterator<Item = (String, String)>) -> Dict {
        let known = self.all_env_var_names();
        let known_refs: HashSet<&str> = known.iter().map(String::as_str).collect();
        let mut root = Dict::new();

        for (key, value) in vars {
            if value.is_empty() || IGNORED_ENV_VARS.contains(&key.as_str()) {
                continue;
            }
            let Some(property) = self.property_name(&key) else {
                continue;
            };

            let field = self.field_of(&property);
            if let Some(field) = &field
                && T::find_binding(field).is_none()
            {
                let suggestions = find_similar_vars(&key, &known_refs);
                warn_unknown_var(&key, &suggestions);
                continue;
            }

            let display_value = match &field {
                Some(field) if Self::is_secret(field) => SECRET_MASK,
                _ => value.as_str(),
            };
            info!(
                "{} value changed to: {} from environment variable",
                property, display_value
            );

            insert_at_path(&mut root, &property, Value::from(value.as_str()));
        }

        root
    }
}

impl<T: BindableProperties> Provider for SystemEnvironmentPropertySource<T> {
    fn metadata(&self) -> Metadata {
        Metadata::named("system environment variables")
    }

    fn data(&self) -> Result<ProfileMap, figment::Error> {
        let mut data = ProfileMap::new();
        data.insert(Profile::default(), self.deserialize());
        Ok(data)
    }
}

fn warn_unknown_var(unknown_var: &str, suggestions: &[String]) {
    if suggestions.is_empty() {
        warn!(
            "Unknown environment variable '{}' will be ignored.",
            unknown_var
        );
    } else {
        warn!(
            "Unknown environment variable '{}' will be ignored. Similar variables: {}?",
            unknown_var,
            suggestions.join(", ")
        );
    }
}

/// Find similar variable names using Levenshtein edit distance.
/// Returns up to 3 suggestions sorted by similarity.
pub fn find_similar_vars(unknown: &str, known: &HashSet<&str>) -> Vec<String> {
    let unknown_lower = unknown.to_lowercase();
    let mut suggestions: Vec<(String, usize)> = known
        .iter()
        .filter_map(|&known_var| {
            let known_lower = known_var.to_lowercase();
            let distance = levenshtein_distance(&unknown_lower, &known_lower);
            let threshold = (unknown.len().max(known_var.len()) * 3) / 10;
            if distance <= threshold.max(3) {
                Some((known_var.to_string(), distance))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));
    suggestions.truncate(3);
    suggestions.into_iter().map(|(s, _)| s).collect()
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row = vec![0; b_len + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
