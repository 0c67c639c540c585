//! Top-level aggregation section of a search request body

use crate::aggregation::{Aggregation, SubAggregations};
use crate::error::AggError;
use serde_json::{Map, Value};

/// Named top-level aggregations plus the hit count of the search.
///
/// Renders to `{"size": n, "aggregations": {...}}`, ready to be merged into
/// (or sent as) the body of a `_search` call.
#[derive(Debug, Default)]
pub struct AggregationRequest {
    size: Option<usize>,
    aggregations: SubAggregations,
}

impl AggregationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hits to return alongside the aggregations.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn aggregation(
        mut self,
        name: impl Into<String>,
        aggregation: impl Aggregation + 'static,
    ) -> Self {
        self.aggregations.insert(name, aggregation);
        self
    }

    pub fn aggregations(&self) -> &SubAggregations {
        &self.aggregations
    }

    pub fn source(&self) -> Result<Value, AggError> {
        let mut body = Map::new();
        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }
        if !self.aggregations.is_empty() {
            body.insert(
                "aggregations".to_string(),
                Value::Object(self.aggregations.source()?),
            );
        }
        tracing::debug!(
            aggregations = self.aggregations.len(),
            "built aggregation request"
        );
        Ok(Value::Object(body))
    }

    /// Serialize the body for the HTTP layer.
    pub fn to_json_string(&self, pretty: bool) -> Result<String, AggError> {
        let body = self.source()?;
        let text = if pretty {
            serde_json::to_string_pretty(&body)?
        } else {
            serde_json::to_string(&body)?
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::test_support::Failing;
    use crate::metrics::{AvgAggregation, StatsAggregation};
    use serde_json::json;

    #[test]
    fn test_empty_request() {
        assert_eq!(AggregationRequest::new().source().unwrap(), json!({}));
    }

    #[test]
    fn test_size_zero() {
        let req = AggregationRequest::new()
            .size(0)
            .aggregation("grades_stats", StatsAggregation::new().field("grade"));
        assert_eq!(
            req.source().unwrap(),
            json!({
                "size": 0,
                "aggregations": {
                    "grades_stats": {"stats": {"field": "grade"}}
                }
            })
        );
    }

    #[test]
    fn test_multiple_aggregations_in_order() {
        let req = AggregationRequest::new()
            .aggregation("b", AvgAggregation::new().field("x"))
            .aggregation("a", StatsAggregation::new().field("y"));
        let body = req.source().unwrap();
        let names: Vec<&String> = body["aggregations"].as_object().unwrap().keys().collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_error_propagates() {
        let req = AggregationRequest::new().aggregation("bad", Failing("boom"));
        assert!(matches!(req.source(), Err(AggError::Serialization(m)) if m == "boom"));
        assert!(req.to_json_string(false).is_err());
    }

    #[test]
    fn test_to_json_string_compact() {
        let req = AggregationRequest::new()
            .size(0)
            .aggregation("s", StatsAggregation::new().field("grade"));
        assert_eq!(
            req.to_json_string(false).unwrap(),
            r#"{"size":0,"aggregations":{"s":{"stats":{"field":"grade"}}}}"#
        );
    }

    #[test]
    fn test_to_json_string_pretty_parses_back() {
        let req = AggregationRequest::new().aggregation("s", StatsAggregation::new());
        let text = req.to_json_string(true).unwrap();
        assert!(text.contains('\n'));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"aggregations": {"s": {"stats": {}}}}));
    }
}
