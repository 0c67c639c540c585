//! `stats` metric aggregation
//!
//! Computes count, min, max, avg and sum over numeric values taken from a
//! document field or produced by a script.
//!
//! ```
//! use elastic_aggs::{Aggregation, StatsAggregation};
//! use serde_json::json;
//!
//! let agg = StatsAggregation::new().field("grade");
//! assert_eq!(agg.source().unwrap(), json!({"stats": {"field": "grade"}}));
//! ```

use crate::aggregation::{Aggregation, SubAggregations};
use crate::error::AggError;
use crate::metrics::values_source::ValuesSource;
use crate::script::Script;
use serde_json::{Map, Value};

/// Builder for a `stats` aggregation.
///
/// `field` and `script` are independent; setting both is passed through to
/// the service unchanged.
#[derive(Debug, Default)]
pub struct StatsAggregation {
    inner: ValuesSource,
}

impl StatsAggregation {
    pub const KIND: &'static str = "stats";

    pub fn new() -> Self {
        Self::default()
    }

    /// Field to aggregate. An empty name leaves `"field"` out of the output.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.inner.field = field.into();
        self
    }

    /// Script computing the value per document.
    pub fn script(mut self, script: impl Into<Script>) -> Self {
        self.inner.script = Some(script.into());
        self
    }

    /// Display format for the numeric results, e.g. `"0.00"`.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.inner.format = format.into();
        self
    }

    /// Nest another aggregation under `name`, replacing any existing entry
    /// with that name.
    pub fn sub_aggregation(
        mut self,
        name: impl Into<String>,
        aggregation: impl Aggregation + 'static,
    ) -> Self {
        self.inner.sub_aggregations.insert(name, aggregation);
        self
    }

    /// Metadata echoed back with the result. Replaces any previous map.
    pub fn meta(mut self, meta: Map<String, Value>) -> Self {
        self.inner.meta = meta;
        self
    }

    pub fn field_name(&self) -> &str {
        &self.inner.field
    }

    pub fn script_ref(&self) -> Option<&Script> {
        self.inner.script.as_ref()
    }

    pub fn format_str(&self) -> &str {
        &self.inner.format
    }

    pub fn meta_map(&self) -> &Map<String, Value> {
        &self.inner.meta
    }

    pub fn sub_aggregations(&self) -> &SubAggregations {
        &self.inner.sub_aggregations
    }
}

impl Aggregation for StatsAggregation {
    /// Renders
    ///
    /// ```text
    /// {
    ///   "stats": {"field": ..., "script": ..., "format": ...},
    ///   "aggregations": {name: ..., ...},
    ///   "meta": {...}
    /// }
    /// ```
    ///
    /// with every optional part left out when unset.
    fn source(&self) -> Result<Value, AggError> {
        self.inner.render(Self::KIND)
    }
}
