//! Decoding of metric aggregation results from a search response

use crate::error::AggError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of a `stats` aggregation.
///
/// Statistics over an empty set come back as `null` and decode to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsMetric {
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub sum: Option<f64>,
    // Present when a format was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_as_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_as_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_as_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum_as_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// Result of avg, min, max, sum or value_count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMetric {
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_as_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// The `aggregations` object of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregationsResult(Map<String, Value>);

impl AggregationsResult {
    pub fn new(aggregations: Map<String, Value>) -> Self {
        Self(aggregations)
    }

    /// Pull the `aggregations` object out of a full search response.
    /// A response without one yields an empty result.
    pub fn from_response(response: &Value) -> Result<Self, AggError> {
        match response.get("aggregations") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(map)) => Ok(Self(map.clone())),
            Some(other) => Err(AggError::Decode(format!(
                "aggregations must be an object, got {}",
                other
            ))),
        }
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn stats(&self, name: &str) -> Result<Option<StatsMetric>, AggError> {
        self.decode(name)
    }

    pub fn avg(&self, name: &str) -> Result<Option<ValueMetric>, AggError> {
        self.decode(name)
    }

    pub fn min(&self, name: &str) -> Result<Option<ValueMetric>, AggError> {
        self.decode(name)
    }

    pub fn max(&self, name: &str) -> Result<Option<ValueMetric>, AggError> {
        self.decode(name)
    }

    pub fn sum(&self, name: &str) -> Result<Option<ValueMetric>, AggError> {
        self.decode(name)
    }

    pub fn value_count(&self, name: &str) -> Result<Option<ValueMetric>, AggError> {
        self.decode(name)
    }

    fn decode<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, AggError> {
        let Some(raw) = self.0.get(name) else {
            return Ok(None);
        };
        serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|e| AggError::Decode(format!("aggregation [{}]: {}", name, e)))
    }
}
