//! Fluent builders for Elasticsearch aggregation request fragments
//!
//! Each builder renders only its own part of the aggregation DSL; the
//! caller stores it under a name of its choosing:
//!
//! ```
//! use elastic_aggs::{AggregationRequest, AvgAggregation, StatsAggregation};
//! use serde_json::json;
//!
//! let request = AggregationRequest::new().size(0).aggregation(
//!     "grades_stats",
//!     StatsAggregation::new()
//!         .field("grade")
//!         .sub_aggregation("avg_bonus", AvgAggregation::new().field("bonus")),
//! );
//!
//! assert_eq!(
//!     request.source().unwrap(),
//!     json!({
//!         "size": 0,
//!         "aggregations": {
//!             "grades_stats": {
//!                 "stats": {"field": "grade"},
//!                 "aggregations": {"avg_bonus": {"avg": {"field": "bonus"}}}
//!             }
//!         }
//!     })
//! );
//! ```
//!
//! # Builders
//!
//! - `stats` ([`StatsAggregation`])
//! - `avg` / `min` / `max` / `sum` / `value_count`
//!
//! Results coming back from the service are decoded with
//! [`AggregationsResult`].

pub mod aggregation;
pub mod config;
pub mod error;
pub mod metrics;
pub mod request;
pub mod response;
pub mod script;

pub use aggregation::{Aggregation, SubAggregations};
pub use config::{AggregationDef, AggregationsConfig, LoggingConfig, MetricKind};
pub use error::AggError;
pub use metrics::{
    AvgAggregation, MaxAggregation, MinAggregation, StatsAggregation, SumAggregation,
    ValueCountAggregation,
};
pub use request::AggregationRequest;
pub use response::{AggregationsResult, StatsMetric, ValueMetric};
pub use script::{Script, ScriptDef, ScriptTable, ScriptType};

/// Result type for aggregation operations
pub type Result<T> = std::result::Result<T, AggError>;
