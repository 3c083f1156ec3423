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

//! Statically declared property bindings.
//!
//! A bindable type lists its fields once, as a table of normalized property names
//! paired with typed setters. The table doubles as the set of declared field names
//! used to filter incoming properties, so only exact names ever reach a setter.

use crate::editors;
use crate::error::{BindError, ConversionError};
use crate::extract::flatten_into;
use crate::normalize::normalize_key;
use figment::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

pub(crate) const SECRET_MASK: &str = "******";

/// Assigns an already converted property value onto a field of `T`.
pub type Setter<T> = fn(&mut T, &Value) -> Result<(), ConversionError>;

/// A single normalized property name to field setter mapping.
pub struct PropertyBinding<T> {
    /// The normalized property name (e.g., "serverAddr")
    pub field: &'static str,
    /// Converts the raw value and assigns it to the field
    pub set: Setter<T>,
    /// Whether this field contains secret data
    pub is_secret: bool,
}

impl<T> PropertyBinding<T> {
    pub const fn new(field: &'static str, set: Setter<T>) -> Self {
        Self {
            field,
            set,
            is_secret: false,
        }
    }

    pub const fn secret(field: &'static str, set: Setter<T>) -> Self {
        Self {
            field,
            set,
            is_secret: true,
        }
    }
}

impl<T> fmt::Debug for PropertyBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("field", &self.field)
            .field("is_secret", &self.is_secret)
            .finish()
    }
}

/// Builds a [`Setter`] that runs `$editor` on the raw value and stores the result in `$field`.
#[macro_export]
macro_rules! bind_with {
    ($target:ty, $field:ident, $editor:expr) => {
        |target: &mut $target,
         value: &$crate::Value|
         -> ::std::result::Result<(), $crate::ConversionError> {
            target.$field = $editor(value)?;
            Ok(())
        }
    };
}

/// Trait for configuration types that can be populated from normalized properties.
pub trait BindableProperties: Default + Sized + 'static {
    /// Returns all property bindings for this type.
    fn bindings() -> &'static [PropertyBinding<Self>];

    /// Finds a binding by normalized property name.
    fn find_binding(field: &str) -> Option<&'static PropertyBinding<Self>> {
        Self::bindings().iter().find(|b| b.field == field)
    }

    /// Returns all declared field names.
    fn field_names() -> Vec<&'static str> {
        Self::bindings().iter().map(|b| b.field).collect()
    }

    /// Returns field names marked as secrets.
    fn secret_field_names() -> Vec<&'static str> {
        Self::bindings()
            .iter()
            .filter(|b| b.is_secret)
            .map(|b| b.field)
            .collect()
    }
}

/// Bind normalized properties onto a fresh `T`.
///
/// Keys without a matching binding are skipped. The first conversion failure aborts
/// the whole binding and is reported together with the offending key.
pub fn bind<T: BindableProperties>(properties: &BTreeMap<String, Value>) -> Result<T, BindError> {
    let mut target = T::default();
    for (key, value) in properties {
        let Some(binding) = T::find_binding(key) else {
            debug!("Property '{}' has no binding and will be ignored.", key);
            continue;
        };

        debug!("Binding property '{}' = {}", key, display_value(binding, value));
        (binding.set)(&mut target, value).map_err(|e| BindError::conversion(key.as_str(), e))?;
    }
    Ok(target)
}

/// Collection editor for lists of nested bindable values.
///
/// Each element must be a table; its keys are normalized the same way as top level
/// properties and bound onto a fresh `T`. Gaps left by sparse indexes are filled
/// with `T::default()`.
pub fn bind_list<T: BindableProperties>(value: &Value) -> Result<Vec<T>, ConversionError> {
    let items: Vec<&Value> = match value {
        Value::Array(_, items) => items.iter().collect(),
        Value::Dict(..) => vec![value],
        Value::Empty(..) => Vec::new(),
        other => {
            return Err(ConversionError::UnexpectedType {
                expected: "array of tables",
                found: editors::kind(other),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| bind_element(index, item))
        .collect()
}

fn bind_element<T: BindableProperties>(index: usize, item: &Value) -> Result<T, ConversionError> {
    let dict = match item {
        Value::Dict(_, dict) => dict,
        other => {
            return Err(ConversionError::UnexpectedType {
                expected: "table",
                found: editors::kind(other),
            });
        }
    };

    let mut flat = BTreeMap::new();
    flatten_into(&mut flat, "", dict);

    let mut target = T::default();
    for (key, value) in flat {
        let field = normalize_key(&key);
        let Some(binding) = T::find_binding(&field) else {
            debug!("Element {} property '{}' has no binding and will be ignored.", index, key);
            continue;
        };
        (binding.set)(&mut target, &value).map_err(|e| ConversionError::InElement {
            index,
            key: field.clone(),
            source: Box::new(e),
        })?;
    }
    Ok(target)
}

pub(crate) fn display_value<T>(binding: &PropertyBinding<T>, value: &Value) -> String {
    if binding.is_secret {
        return SECRET_MASK.to_string();
    }
    match editors::to_string(value) {
        Ok(text) => text,
        Err(_) => format!("<{}>", editors::kind(value)),
    }
}
