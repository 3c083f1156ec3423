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

//! Layered property sources.
//!
//! An [`Environment`] is an ordered stack of figment providers, highest priority
//! first. When two sources define the same key the earlier source wins.

mod file;
mod map;
mod system_env;

pub use file::{config_file_path, toml_file_source};
pub use map::MapPropertySource;
pub use system_env::SystemEnvironmentPropertySource;

use crate::properties::NacosConfigProperties;
use figment::{
    Figment, Provider,
    value::{Dict, Tag, Value},
};
use tracing::{debug, warn};

/// Sources are joined whole-value: when one source holds a table and another an
/// array (or a scalar) under the same key, the two do not merge by index and the
/// higher-priority value replaces the other. A single `NACOS_CONFIG_EXT_CONFIG__0__*`
/// variable therefore hides an `ext-config` array defined in the TOML file.
#[derive(Debug, Clone)]
pub struct Environment {
    figment: Figment,
    sources: Vec<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            sources: Vec::new(),
        }
    }

    /// The environment of a running process: `NACOS_CONFIG_*` environment variables,
    /// then the TOML file at [`config_file_path`] when it exists.
    pub fn standard() -> Self {
        let environment = Self::new()
            .with_source(SystemEnvironmentPropertySource::<NacosConfigProperties>::with_default_prefix());
        match toml_file_source(&config_file_path()) {
            Some(file) => environment.with_source(file),
            None => environment,
        }
    }

    /// Append a source with lower priority than every source added before it.
    pub fn with_source<P: Provider>(mut self, source: P) -> Self {
        let name = source.metadata().name.to_string();
        debug!("Adding property source '{}' to the environment.", name);
        self.sources.push(name);
        self.figment = self.figment.join(source);
        self
    }

    /// Names of the sources, highest priority first.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn figment(&self) -> &Figment {
        &self.figment
    }

    /// Resolve every source into a single nested table.
    pub(crate) fn merged(&self) -> Result<Dict, figment::Error> {
        if self.sources.is_empty() {
            return Ok(Dict::new());
        }
        self.figment.extract()
    }
}

/// Insert `value` under the dotted `path`, creating intermediate tables as needed.
///
/// A table always wins over a scalar at the same key, whichever is inserted
/// first, so `nacos.config=x` never hides `nacos.config.server-addr`.
pub(crate) fn insert_at_path(dict: &mut Dict, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    insert_at_path_segments(dict, &segments, value);
}

fn insert_at_path_segments(dict: &mut Dict, segments: &[&str], value: Value) {
    if segments.is_empty() {
        return;
    }

    if segments.len() == 1 {
        let key = segments[0];
        if let Some(Value::Dict(_, existing)) = dict.get(key)
            && !existing.is_empty()
            && !matches!(value, Value::Dict(..))
        {
            warn!(
                "Property '{}' is also a table of nested properties, its scalar value will be ignored.",
                key
            );
            return;
        }
        dict.insert(key.to_string(), value);
        return;
    }

    let key = segments[0].to_string();
    let entry = dict
        .entry(key.clone())
        .or_insert_with(|| Value::Dict(Tag::Default, Dict::new()));
    if !matches!(entry, Value::Dict(..)) {
        warn!(
            "Property '{}' is also a table of nested properties, its scalar value will be ignored.",
            key
        );
        *entry = Value::Dict(Tag::Default, Dict::new());
    }

    if let Some(Value::Dict(_, inner_dict)) = dict.get_mut(&key) {
        insert_at_path_segments(inner_dict, &segments[1..], value);
    }
}
