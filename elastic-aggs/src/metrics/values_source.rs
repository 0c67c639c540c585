//! Options shared by metric aggregations that read a field or a script

use crate::aggregation::SubAggregations;
use crate::error::AggError;
use crate::script::Script;
use serde_json::{Map, Value};

/// Field, script and format plus the sub-aggregations and metadata every
/// metric builder carries.
#[derive(Debug, Default)]
pub struct ValuesSource {
    pub(crate) field: String,
    pub(crate) script: Option<Script>,
    pub(crate) format: String,
    pub(crate) sub_aggregations: SubAggregations,
    pub(crate) meta: Map<String, Value>,
}

impl ValuesSource {
    /// Render as `{kind: {...}, "aggregations": {...}, "meta": {...}}`.
    ///
    /// Empty `field` and `format` are left out. Errors from the script or a
    /// sub-aggregation are returned unchanged and nothing is produced.
    pub fn render(&self, kind: &str) -> Result<Value, AggError> {
        let mut opts = Map::new();
        if !self.field.is_empty() {
            opts.insert("field".to_string(), Value::String(self.field.clone()));
        }
        if let Some(script) = &self.script {
            let src = script.source().map_err(|e| {
                tracing::debug!(kind, error = %e, "script failed to render");
                e
            })?;
            opts.insert("script".to_string(), src);
        }
        if !self.format.is_empty() {
            opts.insert("format".to_string(), Value::String(self.format.clone()));
        }

        let mut source = Map::new();
        source.insert(kind.to_string(), Value::Object(opts));

        if !self.sub_aggregations.is_empty() {
            let aggs = self.sub_aggregations.source()?;
            source.insert("aggregations".to_string(), Value::Object(aggs));
        }

        if !self.meta.is_empty() {
            source.insert("meta".to_string(), Value::Object(self.meta.clone()));
        }

        tracing::trace!(kind, "rendered metric aggregation");
        Ok(Value::Object(source))
    }
}

/// Generates a single-value metric builder over `ValuesSource`.
///
/// `metric_aggregation!(AvgAggregation, "avg")` yields a type with the
/// same fluent setters as `StatsAggregation` that renders under `"avg"`.
macro_rules! metric_aggregation {
    ($(#[$attr:meta])* $name:ident, $kind:literal) => {
        $(#[$attr])*
        #[derive(Debug, Default)]
        pub struct $name {
            inner: $crate::metrics::values_source::ValuesSource,
        }

        impl $name {
            /// Key this aggregation renders under.
            pub const KIND: &'static str = $kind;

            pub fn new() -> Self {
                Self::default()
            }

            pub fn field(mut self, field: impl Into<String>) -> Self {
                self.inner.field = field.into();
                self
            }

            pub fn script(mut self, script: impl Into<$crate::script::Script>) -> Self {
                self.inner.script = Some(script.into());
                self
            }

            pub fn format(mut self, format: impl Into<String>) -> Self {
                self.inner.format = format.into();
                self
            }

            pub fn sub_aggregation(
                mut self,
                name: impl Into<String>,
                aggregation: impl $crate::aggregation::Aggregation + 'static,
            ) -> Self {
                self.inner.sub_aggregations.insert(name, aggregation);
                self
            }

            pub fn meta(mut self, meta: serde_json::Map<String, serde_json::Value>) -> Self {
                self.inner.meta = meta;
                self
            }

            pub fn field_name(&self) -> &str {
                &self.inner.field
            }

            pub fn script_ref(&self) -> Option<&$crate::script::Script> {
                self.inner.script.as_ref()
            }

            pub fn format_str(&self) -> &str {
                &self.inner.format
            }

            pub fn meta_map(&self) -> &serde_json::Map<String, serde_json::Value> {
                &self.inner.meta
            }

            pub fn sub_aggregations(&self) -> &$crate::aggregation::SubAggregations {
                &self.inner.sub_aggregations
            }
        }

        impl $crate::aggregation::Aggregation for $name {
            fn source(&self) -> Result<serde_json::Value, $crate::error::AggError> {
                self.inner.render(Self::KIND)
            }
        }
    };
}

pub(crate) use metric_aggregation;
