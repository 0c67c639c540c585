pub mod single;
pub mod stats;
pub mod values_source;

pub use single::{
    AvgAggregation, MaxAggregation, MinAggregation, SumAggregation, ValueCountAggregation,
};
pub use stats::StatsAggregation;
pub use values_source::ValuesSource;
