//! The `Aggregation` trait and the named sub-aggregation map shared by all builders

use crate::error::AggError;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Anything that renders to a fragment of the aggregation DSL.
///
/// `source` returns only the body of the aggregation, e.g.
/// `{"stats": {"field": "grade"}}`; the caller decides the name it is
/// stored under.
pub trait Aggregation: fmt::Debug + Send + Sync {
    fn source(&self) -> Result<Value, AggError>;
}

impl<A: Aggregation + ?Sized> Aggregation for Box<A> {
    fn source(&self) -> Result<Value, AggError> {
        (**self).source()
    }
}

impl<A: Aggregation + ?Sized> Aggregation for Arc<A> {
    fn source(&self) -> Result<Value, AggError> {
        (**self).source()
    }
}

impl<A: Aggregation + ?Sized> Aggregation for &A {
    fn source(&self) -> Result<Value, AggError> {
        (**self).source()
    }
}

/// Named child aggregations, kept in insertion order.
#[derive(Debug, Default)]
pub struct SubAggregations {
    entries: IndexMap<String, Box<dyn Aggregation>>,
}

impl SubAggregations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a child. A name that already exists is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, aggregation: impl Aggregation + 'static) {
        self.entries.insert(name.into(), Box::new(aggregation));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Aggregation> {
        self.entries.get(name).map(|agg| &**agg as &dyn Aggregation)
    }

    /// Render every child as `{name: source}`. The first child that fails
    /// aborts the whole map and its error is returned as is.
    pub fn source(&self) -> Result<Map<String, Value>, AggError> {
        let mut map = Map::with_capacity(self.entries.len());
        for (name, aggregation) in &self.entries {
            let src = aggregation.source().map_err(|e| {
                tracing::debug!(aggregation = %name, error = %e, "sub-aggregation failed to render");
                e
            })?;
            map.insert(name.clone(), src);
        }
        Ok(map)
    }
}
