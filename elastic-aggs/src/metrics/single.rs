//! Single-value metric aggregations: avg, min, max, sum and value_count

use crate::metrics::values_source::metric_aggregation;

metric_aggregation!(
    /// Average of the numeric values of a field or script.
    AvgAggregation,
    "avg"
);

metric_aggregation!(
    /// Smallest numeric value.
    MinAggregation,
    "min"
);

metric_aggregation!(
    /// Largest numeric value.
    MaxAggregation,
    "max"
);

metric_aggregation!(
    /// Sum of the numeric values.
    SumAggregation,
    "sum"
);

metric_aggregation!(
    /// Number of values extracted, not the number of documents.
    ValueCountAggregation,
    "value_count"
);
