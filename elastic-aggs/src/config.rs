//! Declarative aggregation definitions
//!
//! A TOML file describes the aggregation section of a request:
//!
//! ```toml
//! size = 0
//!
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [aggregations.grades_stats]
//! type = "stats"
//! field = "grade"
//!
//! [aggregations.grades_stats.aggregations.avg_grade]
//! type = "avg"
//! field = "grade"
//! ```

use crate::aggregation::Aggregation;
use crate::error::AggError;
use crate::metrics::{
    AvgAggregation, MaxAggregation, MinAggregation, StatsAggregation, SumAggregation,
    ValueCountAggregation,
};
use crate::request::AggregationRequest;
use crate::script::ScriptDef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Root of an aggregation definition file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationsConfig {
    #[serde(default)]
    pub size: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub aggregations: IndexMap<String, AggregationDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter string
    /// Override with RUST_LOG env var
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "pretty" or "json"
    /// Override with LOG_FORMAT env var
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Stats,
    Avg,
    Min,
    Max,
    Sum,
    ValueCount,
}

/// One aggregation and its children.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationDef {
    #[serde(rename = "type")]
    pub kind: MetricKind,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub script: Option<ScriptDef>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
    #[serde(default)]
    pub aggregations: IndexMap<String, AggregationDef>,
}

// Every metric builder exposes the same setters.
macro_rules! configure {
    ($builder:expr, $def:expr) => {{
        let mut agg = $builder;
        if let Some(field) = &$def.field {
            agg = agg.field(field.clone());
        }
        if let Some(script) = &$def.script {
            agg = agg.script(script.clone());
        }
        if let Some(format) = &$def.format {
            agg = agg.format(format.clone());
        }
        if let Some(meta) = &$def.meta {
            agg = agg.meta(meta.clone());
        }
        for (name, child) in &$def.aggregations {
            agg = agg.sub_aggregation(name.clone(), child.build()?);
        }
        Box::new(agg) as Box<dyn Aggregation>
    }};
}

impl AggregationDef {
    pub fn build(&self) -> Result<Box<dyn Aggregation>, AggError> {
        check_names(&self.aggregations)?;
        let agg = match self.kind {
            MetricKind::Stats => configure!(StatsAggregation::new(), self),
            MetricKind::Avg => configure!(AvgAggregation::new(), self),
            MetricKind::Min => configure!(MinAggregation::new(), self),
            MetricKind::Max => configure!(MaxAggregation::new(), self),
            MetricKind::Sum => configure!(SumAggregation::new(), self),
            MetricKind::ValueCount => configure!(ValueCountAggregation::new(), self),
        };
        Ok(agg)
    }
}

fn check_names(aggregations: &IndexMap<String, AggregationDef>) -> Result<(), AggError> {
    if aggregations.keys().any(|name| name.is_empty()) {
        return Err(AggError::Config(
            "aggregation names must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl AggregationsConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, AggError> {
        let config: AggregationsConfig = toml::from_str(content)?;
        check_names(&config.aggregations)?;
        Ok(config)
    }

    /// Load a definition file.
    pub fn load(path: &Path) -> Result<Self, AggError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            aggregations = config.aggregations.len(),
            "loaded aggregation config"
        );
        Ok(config)
    }

    /// Build the request described by this config.
    pub fn build(&self) -> Result<AggregationRequest, AggError> {
        let mut request = AggregationRequest::new();
        if let Some(size) = self.size {
            request = request.size(size);
        }
        for (name, def) in &self.aggregations {
            request = request.aggregation(name.clone(), def.build()?);
        }
        Ok(request)
    }
}
