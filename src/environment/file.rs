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

//! TOML file property source.

use crate::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use figment::providers::{Data, Format, Toml};
use std::{env, path::Path};
use tracing::{info, warn};

/// The TOML file location: `NACOS_CONFIG_PATH` when set, `nacos.toml` otherwise.
pub fn config_file_path() -> String {
    env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// A TOML file source, or `None` when no file is found at `path`.
///
/// Relative paths are searched for in the current directory and its parents.
pub fn toml_file_source(path: &str) -> Option<Data<Toml>> {
    if file_exists(path) {
        info!("Found configuration file at path: '{}'.", path);
        Some(Toml::file(path))
    } else {
        warn!("Configuration file not found at path: '{}'.", path);
        None
    }
}

fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();

    if path.is_absolute() {
        return path.is_file();
    }

    let cwd = match env::current_dir() {
        Ok(dir) => dir,
        Err(_) => return false,
    };

    let mut current_dir = cwd.as_path();
    loop {
        let file_path = current_dir.join(path);
        if file_path.is_file() {
            return true;
        }

        current_dir = match current_dir.parent() {
            Some(parent) => parent,
            None => return false,
        };
    }
}
