//! Registry search request and response shapes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{SEARCH_LIMIT_FIELD, SEARCH_PAGE_FIELD};
use crate::errors::{GradeBridgeError, Result};

/// Filter fields for a registry search.
///
/// The contents are defined by the registry API and passed through as-is;
/// only `Page` and `Limit` are added per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteria(Map<String, Value>);

impl SearchCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one filter field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Build criteria from any value that serializes to a JSON object.
    ///
    /// # Errors
    /// Returns `GradeBridgeError::Internal` if the value does not serialize to
    /// an object.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(GradeBridgeError::Internal(format!(
                "search criteria must be a JSON object, got {}",
                json_type_name(&other)
            ))),
            Err(err) => {
                Err(GradeBridgeError::Internal(format!("search criteria not serializable: {err}")))
            }
        }
    }

    /// The filter fields.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Request body for one page: the criteria plus `Page` and `Limit`.
    ///
    /// Pagination fields always override same-named criteria fields.
    #[must_use]
    pub fn paged(&self, page: u32, limit: u32) -> Value {
        let mut body = self.0.clone();
        body.insert(SEARCH_PAGE_FIELD.to_string(), Value::from(page));
        body.insert(SEARCH_LIMIT_FIELD.to_string(), Value::from(limit));
        Value::Object(body)
    }
}

impl From<Map<String, Value>> for SearchCriteria {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One page of registry search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    /// 1-based page number.
    pub page: u32,
    /// Total hit count learned from the probe request; fixed for the search.
    pub total_count: u64,
    /// Raw response body.
    pub body: Value,
}

impl SearchPage {
    /// The result array stored under `key`.
    ///
    /// # Errors
    /// Returns `GradeBridgeError::InvalidResponse` when `key` is missing or
    /// not an array.
    pub fn items(&self, key: &str) -> Result<&[Value]> {
        match self.body.get(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(GradeBridgeError::InvalidResponse(format!(
                "search page {} field '{key}' is {}, expected array",
                self.page,
                json_type_name(other)
            ))),
            None => Err(GradeBridgeError::InvalidResponse(format!(
                "search page {} has no field '{key}'",
                self.page
            ))),
        }
    }

    /// Consume the page and decode every element under `key`, keeping
    /// server order.
    ///
    /// # Errors
    /// Returns `GradeBridgeError::InvalidResponse` when `key` is missing, not
    /// an array, or an element does not decode as `T`.
    pub fn into_elements<T: DeserializeOwned>(self, key: &str) -> Result<Vec<T>> {
        let page = self.page;
        let items = match self.body {
            Value::Object(mut map) => match map.remove(key) {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(GradeBridgeError::InvalidResponse(format!(
                        "search page {page} field '{key}' is {}, expected array",
                        json_type_name(&other)
                    )))
                }
                None => {
                    return Err(GradeBridgeError::InvalidResponse(format!(
                        "search page {page} has no field '{key}'"
                    )))
                }
            },
            other => {
                return Err(GradeBridgeError::InvalidResponse(format!(
                    "search page {page} body is {}, expected object",
                    json_type_name(&other)
                )))
            }
        };

        items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|err| {
                    GradeBridgeError::InvalidResponse(format!(
                        "search page {page} element under '{key}' did not decode: {err}"
                    ))
                })
            })
            .collect()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
