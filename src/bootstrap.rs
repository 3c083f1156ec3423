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

//! Entry points building the properties from an environment at application startup.

use crate::binder::{BindableProperties, bind};
use crate::constants::{BOOTSTRAP_KEYS, NACOS_BOOTSTRAP, NACOS_LOG_BOOTSTRAP, PREFIX, PROPERTIES_PREFIX};
use crate::editors;
use crate::environment::Environment;
use crate::error::BindError;
use crate::extract::extract_properties;
use crate::normalize::filter_and_normalize;
use crate::properties::NacosConfigProperties;
use figment::value::Value;
use std::collections::BTreeMap;
use tracing::{error, info};

/// The two flags controlling the bootstrap itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapSettings {
    /// `nacos.config.bootstrap.enable`
    pub enable: bool,
    /// `nacos.config.bootstrap.log-enable`
    pub log_enable: bool,
}

impl BootstrapSettings {
    pub fn from_environment(environment: &Environment) -> Result<Self, BindError> {
        let properties = extract_properties(environment, PREFIX)?;
        Ok(Self {
            enable: flag(&properties, NACOS_BOOTSTRAP)?,
            log_enable: flag(&properties, NACOS_LOG_BOOTSTRAP)?,
        })
    }
}

fn flag(properties: &BTreeMap<String, Value>, key: &str) -> Result<bool, BindError> {
    properties
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map_or(Ok(false), |(_, value)| {
            editors::to_bool(value).map_err(|e| BindError::conversion(key, e))
        })
}

/// Bind the properties under `prefix` onto a fresh `T`.
///
/// Properties are read from the `scope` of `environment`; the bootstrap flags are
/// never bound.
pub fn bind_properties<T: BindableProperties>(
    environment: &Environment,
    scope: &str,
    prefix: &str,
) -> Result<T, BindError> {
    let raw = extract_properties(environment, scope)?;
    let properties = filter_and_normalize(raw, prefix, &BOOTSTRAP_KEYS, &T::field_names());
    bind(&properties)
}

/// Build the Nacos config properties from `nacos.config.*` in `environment`.
pub fn build_nacos_config_properties(
    environment: &Environment,
) -> Result<NacosConfigProperties, BindError> {
    let properties = bind_nacos_config_properties(environment)?;
    info!("Nacos config properties: {properties}");
    Ok(properties)
}

/// Build the properties only when `nacos.config.bootstrap.enable` is set.
///
/// The bound properties are logged when `nacos.config.bootstrap.log-enable` is set.
pub fn load_for_bootstrap(
    environment: &Environment,
) -> Result<Option<NacosConfigProperties>, BindError> {
    let settings = BootstrapSettings::from_environment(environment)?;
    if !settings.enable {
        info!("Nacos config bootstrap is disabled.");
        return Ok(None);
    }

    let properties = bind_nacos_config_properties(environment)?;
    if settings.log_enable {
        info!("Nacos config properties: {properties}");
    }
    Ok(Some(properties))
}

fn bind_nacos_config_properties(
    environment: &Environment,
) -> Result<NacosConfigProperties, BindError> {
    bind_properties(environment, PROPERTIES_PREFIX, PREFIX).inspect_err(|e| match e.key() {
        Some(key) => error!("Failed to bind Nacos config property '{key}': {e:?}"),
        None => error!("Failed to extract Nacos config properties: {e}"),
    })
}
