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

//! Binding error types.

use thiserror::Error;

/// A property value could not be converted to the type of its target field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Invalid boolean value: '{value}'")]
    InvalidBoolean { value: String },
    #[error("Unknown value '{value}', expected one of: {}", .expected.join(", "))]
    UnknownVariant {
        value: String,
        expected: &'static [&'static str],
    },
    #[error("Invalid number: '{value}'")]
    InvalidNumber { value: String },
    #[error("Element {index} property '{key}': {source}")]
    InElement {
        index: usize,
        key: String,
        source: Box<ConversionError>,
    },
    #[error("Expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum BindError {
    #[error("Cannot extract properties from environment")]
    Extraction(#[from] figment::Error),
    #[error("Cannot bind property '{key}'")]
    Conversion {
        key: String,
        #[source]
        source: ConversionError,
    },
}

impl BindError {
    pub(crate) fn conversion(key: impl Into<String>, source: ConversionError) -> Self {
        Self::Conversion {
            key: key.into(),
            source,
        }
    }

    /// The property key that failed to bind, when the failure is a conversion error.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Conversion { key, .. } => Some(key),
            Self::Extraction(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn conversion_error_keeps_key_and_cause() {
        let error = BindError::conversion(
            "autoRefresh",
            ConversionError::InvalidBoolean {
                value: "notabool".to_string(),
            },
        );

        assert_eq!(error.key(), Some("autoRefresh"));
        assert_eq!(error.to_string(), "Cannot bind property 'autoRefresh'");
        let cause = error.source().expect("missing cause");
        assert_eq!(cause.to_string(), "Invalid boolean value: 'notabool'");
    }

    #[test]
    fn unknown_variant_lists_expected_values() {
        let error = ConversionError::UnknownVariant {
            value: "ini".to_string(),
            expected: &["properties", "yaml"],
        };
        assert_eq!(
            error.to_string(),
            "Unknown value 'ini', expected one of: properties, yaml"
        );
    }
}
