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
use figment::{
    Metadata, Profile, Provider,
    value::{Dict, Map as FigmentMap, Value},
};
use std::collections::BTreeMap;

type ProfileMap = FigmentMap<Profile, Dict>;

/// In-memory source of flat `dotted.key = value` properties.
///
/// List elements may be addressed either as `ext-config[0].data-id` or
/// `ext-config.0.data-id`.
#[derive(Debug, Clone)]
pub struct MapPropertySource {
    name: String,
    properties: BTreeMap<String, String>,
}

impl MapPropertySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Parse `key=value` (or `key: value`) lines in the style of a properties file.
    /// Blank lines and lines starting with `#` or `!` are ignored.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        let properties = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .filter_map(|line| {
                let separator = line.find(['=', ':'])?;
                let key = line[..separator].trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_owned(), line[separator + 1..].trim().to_owned()))
            })
            .collect();
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for MapPropertySource {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.properties
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl Provider for MapPropertySource {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.name.clone())
    }

    fn data(&self) -> Result<ProfileMap, figment::Error> {
        let mut root = Dict::new();
        for (key, value) in &self.properties {
            insert_at_path(&mut root, &index_to_path(key), Value::from(value.as_str()));
        }

        let mut data = ProfileMap::new();
        data.insert(Profile::default(), root);
        Ok(data)
    }
}

/// Rewrite `name[0].field` into `name.0.field`.
fn index_to_path(key: &str) -> String {
    key.replace('[', ".").replace(']', "")
}
