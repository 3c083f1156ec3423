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

//! Typed value editors applied while binding properties onto fields.
//!
//! Each editor accepts a raw figment [`Value`] as produced by a property source and
//! either returns the typed field value or a [`ConversionError`] describing why the
//! value does not fit.

use crate::error::ConversionError;
use figment::value::Value;
use std::str::FromStr;
use strum::VariantNames;

/// String editor: trims surrounding whitespace, renders scalars as text.
pub fn to_string(value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::String(_, s) => Ok(s.trim().to_owned()),
        Value::Char(_, c) => Ok(c.to_string()),
        Value::Bool(_, b) => Ok(b.to_string()),
        Value::Num(..) => number_to_string(value),
        other => Err(unexpected("string", other)),
    }
}

/// Boolean editor accepting `true/false`, `on/off`, `yes/no` and `1/0`.
pub fn to_bool(value: &Value) -> Result<bool, ConversionError> {
    match value {
        Value::Bool(_, b) => Ok(*b),
        Value::String(_, s) => parse_bool(s),
        Value::Num(..) => match unsigned_of(value) {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ConversionError::InvalidBoolean {
                value: number_to_string(value)?,
            }),
        },
        other => Err(unexpected("boolean", other)),
    }
}

fn parse_bool(text: &str) -> Result<bool, ConversionError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ConversionError::InvalidBoolean {
            value: text.to_owned(),
        }),
    }
}

/// Enum editor: looks the value up by variant name.
pub fn to_enum<E>(value: &Value) -> Result<E, ConversionError>
where
    E: FromStr + VariantNames,
{
    let text = match value {
        Value::String(_, s) => s.trim(),
        other => return Err(unexpected("string", other)),
    };
    E::from_str(text).map_err(|_| ConversionError::UnknownVariant {
        value: text.to_owned(),
        expected: E::VARIANTS,
    })
}

/// Collection editor: arrays are converted element-wise, a string is split on commas.
///
/// A string written as `[a, "b, c"]` is split on the commas outside quotes.
pub fn to_list(value: &Value) -> Result<Vec<String>, ConversionError> {
    match value {
        Value::String(_, s) if is_bracketed(s) => {
            let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
            Ok(split_array_elements(inner)
                .into_iter()
                .map(strip_quotes)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect())
        }
        Value::Array(_, items) => items
            .iter()
            .map(to_string)
            .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
            .collect(),
        Value::String(_, s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()),
        Value::Empty(..) => Ok(Vec::new()),
        other => Ok(vec![to_string(other)?]),
    }
}

/// Integer editor for unsigned fields.
pub fn to_unsigned<N>(value: &Value) -> Result<N, ConversionError>
where
    N: TryFrom<u128> + FromStr,
{
    match value {
        Value::Num(..) => unsigned_of(value)
            .and_then(|n| N::try_from(n).ok())
            .ok_or_else(|| ConversionError::InvalidNumber {
                value: number_to_string(value).unwrap_or_default(),
            }),
        Value::String(_, s) => {
            N::from_str(s.trim()).map_err(|_| ConversionError::InvalidNumber { value: s.clone() })
        }
        other => Err(unexpected("number", other)),
    }
}

/// TOML integers arrive as signed numbers, environment values as unsigned ones.
fn unsigned_of(value: &Value) -> Option<u128> {
    value
        .to_u128()
        .or_else(|| value.to_i128().and_then(|n| u128::try_from(n).ok()))
}

fn number_to_string(value: &Value) -> Result<String, ConversionError> {
    if let Some(n) = value.to_u128() {
        return Ok(n.to_string());
    }
    if let Some(n) = value.to_i128() {
        return Ok(n.to_string());
    }
    if let Some(n) = value.to_f64() {
        return Ok(n.to_string());
    }
    Err(unexpected("number", value))
}

fn unexpected(expected: &'static str, found: &Value) -> ConversionError {
    ConversionError::UnexpectedType {
        expected,
        found: kind(found),
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::String(..) => "string",
        Value::Char(..) => "char",
        Value::Bool(..) => "boolean",
        Value::Num(..) => "number",
        Value::Empty(..) => "empty value",
        Value::Dict(..) => "table",
        Value::Array(..) => "array",
    }
}

fn is_bracketed(s: &str) -> bool {
    let s = s.trim();
    s.len() >= 2 && s.starts_with('[') && s.ends_with(']')
}

pub(crate) fn split_array_elements(s: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                elements.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < s.len() {
        elements.push(s[start..].trim());
    }
    elements
}

pub(crate) fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::ConfigType;

    #[test]
    fn string_editor_trims_whitespace() {
        assert_eq!(to_string(&Value::from("  127.0.0.1:8848 ")).unwrap(), "127.0.0.1:8848");
        assert_eq!(to_string(&Value::from(8848u64)).unwrap(), "8848");
        assert_eq!(to_string(&Value::from(true)).unwrap(), "true");
    }

    #[test]
    fn string_editor_rejects_tables() {
        let value = Value::from(figment::value::Dict::new());
        assert_eq!(
            to_string(&value),
            Err(ConversionError::UnexpectedType {
                expected: "string",
                found: "table"
            })
        );
    }

    #[test]
    fn bool_editor_accepts_common_spellings() {
        for text in ["true", "TRUE", " on ", "yes", "1"] {
            assert!(to_bool(&Value::from(text)).unwrap(), "{text}");
        }
        for text in ["false", "False", "off", "NO", "0"] {
            assert!(!to_bool(&Value::from(text)).unwrap(), "{text}");
        }
        assert!(to_bool(&Value::from(true)).unwrap());
        assert!(!to_bool(&Value::from(0u64)).unwrap());
    }

    #[test]
    fn bool_editor_rejects_garbage() {
        assert_eq!(
            to_bool(&Value::from("notabool")),
            Err(ConversionError::InvalidBoolean {
                value: "notabool".to_string()
            })
        );
        assert!(to_bool(&Value::from(2u64)).is_err());
    }

    #[test]
    fn enum_editor_is_case_insensitive() {
        assert_eq!(to_enum::<ConfigType>(&Value::from("yaml")).unwrap(), ConfigType::Yaml);
        assert_eq!(to_enum::<ConfigType>(&Value::from("JSON")).unwrap(), ConfigType::Json);
        assert_eq!(
            to_enum::<ConfigType>(&Value::from(" Properties ")).unwrap(),
            ConfigType::Properties
        );
    }

    #[test]
    fn enum_editor_reports_unknown_variant() {
        let error = to_enum::<ConfigType>(&Value::from("ini")).unwrap_err();
        match error {
            ConversionError::UnknownVariant { value, expected } => {
                assert_eq!(value, "ini");
                assert!(expected.contains(&"yaml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn list_editor_splits_comma_delimited_strings() {
        assert_eq!(
            to_list(&Value::from("app.yaml, db.yaml,,cache.yaml ")).unwrap(),
            vec!["app.yaml", "db.yaml", "cache.yaml"]
        );
    }

    #[test]
    fn list_editor_converts_arrays() {
        let value = Value::from(vec![Value::from(" a "), Value::from(2u64)]);
        assert_eq!(to_list(&value).unwrap(), vec!["a", "2"]);
    }

    #[test]
    fn unsigned_editor_parses_numbers_and_strings() {
        assert_eq!(to_unsigned::<u32>(&Value::from(3u64)).unwrap(), 3);
        assert_eq!(to_unsigned::<u32>(&Value::from(5i64)).unwrap(), 5);
        assert!(to_unsigned::<u32>(&Value::from(-5i64)).is_err());
        assert_eq!(to_unsigned::<u64>(&Value::from(" 30000 ")).unwrap(), 30000);
        assert!(to_unsigned::<u32>(&Value::from("-1")).is_err());
        assert!(to_unsigned::<u32>(&Value::from(u64::MAX)).is_err());
    }

    #[test]
    fn string_editor_keeps_bracketed_values() {
        assert_eq!(to_string(&Value::from(" [::1] ")).unwrap(), "[::1]");
        assert_eq!(to_string(&Value::from("[a, b]")).unwrap(), "[a, b]");
    }

    #[test]
    fn list_editor_handles_bracket_syntax() {
        assert_eq!(
            to_list(&Value::from("[\"a, b\", c]")).unwrap(),
            vec!["a, b", "c"]
        );
        assert_eq!(to_list(&Value::from("[]")).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn split_array_elements_handles_quoted_strings() {
        assert_eq!(
            split_array_elements("\"hello, world\", \"foo\""),
            vec!["\"hello, world\"", "\"foo\""]
        );
        assert_eq!(split_array_elements("1,2,3"), vec!["1", "2", "3"]);
    }
}
