//! Parameter storage using Arc for clone-friendly builders.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly parameter wrapper using Arc.
///
/// Any `ToSql` value can be stored; the concrete type is resolved by the driver at
/// execution time, which replaces per-type `setString`/`setInt` style dispatch.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&self.0).finish()
    }
}

/// Positional index to value mapping.
///
/// Keys are 1-based placeholder indices (`$1` is key `1`).
pub type IndexedParams = BTreeMap<usize, Param>;

/// An ordered parameter list whose positions become placeholder indices.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a pre-wrapped Param and return its 1-based index.
    pub fn push(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Move all of `other`'s parameters to the end of this list.
    pub fn append(&mut self, other: &mut ParamList) {
        self.params.append(&mut other.params);
    }

    /// Build the 1-based index mapping.
    pub fn indexed(&self) -> IndexedParams {
        self.params
            .iter()
            .enumerate()
            .map(|(i, p)| (i + 1, p.clone()))
            .collect()
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_sql).collect()
    }
}
