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

//! Binding of `nacos.config.*` properties onto the Nacos config client properties.
//!
//! This crate provides:
//! - Layered property sources (in-memory maps, environment variables, TOML files)
//! - Extraction of the `nacos` scoped properties with source priority
//! - Dash to camel case key normalization and filtering against declared fields
//! - Typed field binding with per-type editors and keyed conversion errors
//!
//! ```
//! use nacos_config_binder::{Environment, MapPropertySource, build_nacos_config_properties};
//!
//! let environment = Environment::new().with_source(
//!     MapPropertySource::new("application")
//!         .with_property("nacos.config.server-addr", "127.0.0.1:8848")
//!         .with_property("nacos.config.data-ids", "app.yaml, db.yaml"),
//! );
//! let properties = build_nacos_config_properties(&environment).unwrap();
//! assert_eq!(properties.server_addr, "127.0.0.1:8848");
//! assert_eq!(properties.data_ids, vec!["app.yaml", "db.yaml"]);
//! ```

mod binder;
mod bootstrap;
pub mod constants;
pub mod editors;
mod environment;
mod error;
mod extract;
mod normalize;
mod properties;

pub use binder::{BindableProperties, PropertyBinding, Setter, bind, bind_list};
pub use bootstrap::{
    BootstrapSettings, bind_properties, build_nacos_config_properties, load_for_bootstrap,
};
pub use environment::{
    Environment, MapPropertySource, SystemEnvironmentPropertySource, config_file_path,
    toml_file_source,
};
pub use error::{BindError, ConversionError};
pub use extract::extract_properties;
pub use figment::value::{Dict, Value};
pub use normalize::{filter_and_normalize, normalize_key};
pub use properties::{ConfigType, DEFAULT_GROUP, ExtConfig, NacosConfigProperties};
