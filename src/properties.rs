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

//! The bindable Nacos config client properties.

use crate::binder::{BindableProperties, PropertyBinding, SECRET_MASK, bind_list};
use crate::bind_with;
use crate::editors;
use std::fmt::{Display, Formatter, Result as FmtResult};
use strum::{Display as StrumDisplay, EnumString, VariantNames};

pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";

/// Format of a configuration item stored in Nacos.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, StrumDisplay, EnumString, VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConfigType {
    #[default]
    Properties,
    Xml,
    Json,
    Text,
    Html,
    Yaml,
    Toml,
    Unset,
}

/// Properties of the Nacos config client, bound from `nacos.config.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NacosConfigProperties {
    pub server_addr: String,
    pub context_path: String,
    pub encode: String,
    pub endpoint: String,
    pub namespace: String,
    pub access_key: String,
    pub secret_key: String,
    pub ram_role_name: String,
    pub username: String,
    pub password: String,
    pub data_id: String,
    pub data_ids: Vec<String>,
    pub group: String,
    pub r#type: ConfigType,
    pub max_retry: Option<u32>,
    /// Milliseconds
    pub config_retry_time: Option<u64>,
    /// Milliseconds
    pub config_long_poll_timeout: Option<u64>,
    pub enable_remote_sync_config: bool,
    pub auto_refresh: bool,
    pub remote_first: bool,
    pub ext_config: Vec<ExtConfig>,
}

impl Default for NacosConfigProperties {
    fn default() -> Self {
        Self {
            server_addr: String::new(),
            context_path: String::new(),
            encode: String::new(),
            endpoint: String::new(),
            namespace: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            ram_role_name: String::new(),
            username: String::new(),
            password: String::new(),
            data_id: String::new(),
            data_ids: Vec::new(),
            group: DEFAULT_GROUP.to_string(),
            r#type: ConfigType::default(),
            max_retry: None,
            config_retry_time: None,
            config_long_poll_timeout: None,
            enable_remote_sync_config: false,
            auto_refresh: false,
            remote_first: false,
            ext_config: Vec::new(),
        }
    }
}

static NACOS_CONFIG_BINDINGS: &[PropertyBinding<NacosConfigProperties>] = &[
    PropertyBinding::new(
        "serverAddr",
        bind_with!(NacosConfigProperties, server_addr, editors::to_string),
    ),
    PropertyBinding::new(
        "contextPath",
        bind_with!(NacosConfigProperties, context_path, editors::to_string),
    ),
    PropertyBinding::new(
        "encode",
        bind_with!(NacosConfigProperties, encode, editors::to_string),
    ),
    PropertyBinding::new(
        "endpoint",
        bind_with!(NacosConfigProperties, endpoint, editors::to_string),
    ),
    PropertyBinding::new(
        "namespace",
        bind_with!(NacosConfigProperties, namespace, editors::to_string),
    ),
    PropertyBinding::secret(
        "accessKey",
        bind_with!(NacosConfigProperties, access_key, editors::to_string),
    ),
    PropertyBinding::secret(
        "secretKey",
        bind_with!(NacosConfigProperties, secret_key, editors::to_string),
    ),
    PropertyBinding::new(
        "ramRoleName",
        bind_with!(NacosConfigProperties, ram_role_name, editors::to_string),
    ),
    PropertyBinding::new(
        "username",
        bind_with!(NacosConfigProperties, username, editors::to_string),
    ),
    PropertyBinding::secret(
        "password",
        bind_with!(NacosConfigProperties, password, editors::to_string),
    ),
    PropertyBinding::new(
        "dataId",
        bind_with!(NacosConfigProperties, data_id, editors::to_string),
    ),
    PropertyBinding::new(
        "dataIds",
        bind_with!(NacosConfigProperties, data_ids, editors::to_list),
    ),
    PropertyBinding::new(
        "group",
        bind_with!(NacosConfigProperties, group, editors::to_string),
    ),
    PropertyBinding::new(
        "type",
        bind_with!(NacosConfigProperties, r#type, editors::to_enum),
    ),
    PropertyBinding::new(
        "maxRetry",
        bind_with!(NacosConfigProperties, max_retry, |v| editors::to_unsigned(v).map(Some)),
    ),
    PropertyBinding::new(
        "configRetryTime",
        bind_with!(NacosConfigProperties, config_retry_time, |v| {
            editors::to_unsigned(v).map(Some)
        }),
    ),
    PropertyBinding::new(
        "configLongPollTimeout",
        bind_with!(NacosConfigProperties, config_long_poll_timeout, |v| {
            editors::to_unsigned(v).map(Some)
        }),
    ),
    PropertyBinding::new(
        "enableRemoteSyncConfig",
        bind_with!(NacosConfigProperties, enable_remote_sync_config, editors::to_bool),
    ),
    PropertyBinding::new(
        "autoRefresh",
        bind_with!(NacosConfigProperties, auto_refresh, editors::to_bool),
    ),
    PropertyBinding::new(
        "remoteFirst",
        bind_with!(NacosConfigProperties, remote_first, editors::to_bool),
    ),
    PropertyBinding::new(
        "extConfig",
        bind_with!(NacosConfigProperties, ext_config, bind_list),
    ),
];

impl BindableProperties for NacosConfigProperties {
    fn bindings() -> &'static [PropertyBinding<Self>] {
        NACOS_CONFIG_BINDINGS
    }
}

impl Display for NacosConfigProperties {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{{ server_addr: {}, context_path: {}, encode: {}, endpoint: {}, namespace: {}, \
             access_key: {}, secret_key: {}, ram_role_name: {}, username: {}, password: {}, \
             data_id: {}, data_ids: [{}], group: {}, type: {}, max_retry: {}, \
             config_retry_time: {}, config_long_poll_timeout: {}, \
             enable_remote_sync_config: {}, auto_refresh: {}, remote_first: {}, ext_config: [",
            self.server_addr,
            self.context_path,
            self.encode,
            self.endpoint,
            self.namespace,
            mask(&self.access_key),
            mask(&self.secret_key),
            self.ram_role_name,
            self.username,
            mask(&self.password),
            self.data_id,
            self.data_ids.join(", "),
            self.group,
            self.r#type,
            display_option(self.max_retry),
            display_option(self.config_retry_time),
            display_option(self.config_long_poll_timeout),
            self.enable_remote_sync_config,
            self.auto_refresh,
            self.remote_first,
        )?;
        for (index, ext) in self.ext_config.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ext}")?;
        }
        write!(f, "] }}")
    }
}

/// An additional configuration item loaded next to the main `data_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtConfig {
    pub data_id: String,
    pub data_ids: Vec<String>,
    pub group: String,
    pub r#type: ConfigType,
    pub auto_refresh: bool,
}

impl Default for ExtConfig {
    fn default() -> Self {
        Self {
            data_id: String::new(),
            data_ids: Vec::new(),
            group: DEFAULT_GROUP.to_string(),
            r#type: ConfigType::default(),
            auto_refresh: false,
        }
    }
}

static EXT_CONFIG_BINDINGS: &[PropertyBinding<ExtConfig>] = &[
    PropertyBinding::new("dataId", bind_with!(ExtConfig, data_id, editors::to_string)),
    PropertyBinding::new("dataIds", bind_with!(ExtConfig, data_ids, editors::to_list)),
    PropertyBinding::new("group", bind_with!(ExtConfig, group, editors::to_string)),
    PropertyBinding::new("type", bind_with!(ExtConfig, r#type, editors::to_enum)),
    PropertyBinding::new(
        "autoRefresh",
        bind_with!(ExtConfig, auto_refresh, editors::to_bool),
    ),
];

impl BindableProperties for ExtConfig {
    fn bindings() -> &'static [PropertyBinding<Self>] {
        EXT_CONFIG_BINDINGS
    }
}

impl Display for ExtConfig {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{{ data_id: {}, data_ids: [{}], group: {}, type: {}, auto_refresh: {} }}",
            self.data_id,
            self.data_ids.join(", "),
            self.group,
            self.r#type,
            self.auto_refresh
        )
    }
}

fn mask(secret: &str) -> &str {
    if secret.is_empty() { "" } else { SECRET_MASK }
}

fn display_option<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}
