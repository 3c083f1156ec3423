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

/// Scope of the properties read from the environment.
pub const PROPERTIES_PREFIX: &str = "nacos";

/// Prefix of the properties bound onto [`crate::NacosConfigProperties`].
pub const PREFIX: &str = "nacos.config";

/// Enables loading the Nacos config properties at bootstrap.
pub const NACOS_BOOTSTRAP: &str = "nacos.config.bootstrap.enable";

/// Enables logging of the Nacos config properties at bootstrap.
pub const NACOS_LOG_BOOTSTRAP: &str = "nacos.config.bootstrap.log-enable";

/// Properties that configure the bootstrap itself and are never bound.
pub const BOOTSTRAP_KEYS: [&str; 2] = [NACOS_BOOTSTRAP, NACOS_LOG_BOOTSTRAP];

/// Prefix of the environment variables read by the system environment source.
pub const ENV_PREFIX: &str = "NACOS_CONFIG_";

/// Environment variable overriding the TOML file location.
pub const CONFIG_PATH_ENV: &str = "NACOS_CONFIG_PATH";

/// TOML file read when `NACOS_CONFIG_PATH` is unset; a relative path is searched
/// for upward from the current directory.
pub const DEFAULT_CONFIG_PATH: &str = "nacos.toml";
