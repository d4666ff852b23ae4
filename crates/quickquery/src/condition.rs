//! Query condition types for dynamic WHERE clauses.
//!
//! A [`Condition`] is a `(column, operator, value)` triple. A [`ConditionGroup`] joins
//! conditions with `AND`/`OR` and can be appended into a
//! [`QueryBuilder`](crate::QueryBuilder) as a parenthesized group.
//!
//! Neither type validates column names or operators: both are copied into the SQL text
//! as given. Only values travel as bound parameters.

use crate::error::{DataAccessError, DataAccessResult};
use crate::fragment::Fragment;
use crate::param::{IndexedParams, Param};
use tokio_postgres::types::ToSql;

/// A single comparison: `column operator $n`.
///
/// # Example
/// ```ignore
/// use quickquery::Condition;
///
/// Condition::new("name", "John");          // name = $n
/// Condition::with_op("age", ">=", 18_i32); // age >= $n
/// Condition::like("name", "J%");           // name LIKE $n
/// ```
#[derive(Debug, Clone)]
pub struct Condition {
    column: String,
    operator: String,
    value: Param,
}

impl Condition {
    /// Create an equality condition. The operator defaults to `=`.
    pub fn new<T>(column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::with_op(column, "=", value)
    }

    /// Create a condition with an explicit operator.
    pub fn with_op<T>(column: impl Into<String>, operator: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: Param::new(value),
        }
    }

    /// column = value
    pub fn eq<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::with_op(column, "=", value)
    }

    /// column != value
    pub fn ne<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::with_op(column, "!=", value)
    }

    /// column > value
    pub fn gt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::with_op(column, ">", value)
    }

    /// column >= value
    pub fn gte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::with_op(column, ">=", value)
    }

    /// column < value
    pub fn lt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::with_op(column, "<", value)
    }

    /// column <= value
    pub fn lte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::with_op(column, "<=", value)
    }

    /// column LIKE pattern
    pub fn like<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, pattern: T) -> Self {
        Self::with_op(column, "LIKE", pattern)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn value(&self) -> &Param {
        &self.value
    }

    /// Append `column operator <slot>` to a fragment.
    pub(crate) fn append_to(&self, fragment: &mut Fragment) {
        fragment
            .push(&self.column)
            .push(" ")
            .push(&self.operator)
            .push(" ")
            .push_bind(self.value.clone());
    }
}

/// An ordered group of conditions joined with `AND`/`OR`.
///
/// Placeholders and [`index_parameters`](Self::index_parameters) are numbered from 1
/// relative to the group. When the group is appended into a query builder they are
/// renumbered to follow the builder's existing parameters.
///
/// # Example
/// ```ignore
/// use quickquery::{Condition, ConditionGroup};
///
/// let group = ConditionGroup::eq("name", "Ana").or(Condition::gt("age", 30_i32));
/// assert_eq!(group.to_sql(), "name = $1 OR age > $2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConditionGroup {
    fragment: Fragment,
}

impl ConditionGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group whose first entry is `condition`.
    pub fn from_condition(condition: Condition) -> Self {
        let mut group = Self::new();
        condition.append_to(&mut group.fragment);
        group
    }

    /// Create a group starting with `column = value`.
    pub fn eq<T>(column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        Self::from_condition(Condition::new(column, value))
    }

    /// Combine all conditions with `OR`.
    ///
    /// Returns an error when `conditions` is empty.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> DataAccessResult<Self> {
        Self::joined(conditions, Self::or, "OR")
    }

    /// Combine all conditions with `AND`.
    ///
    /// Returns an error when `conditions` is empty.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> DataAccessResult<Self> {
        Self::joined(conditions, Self::and, "AND")
    }

    fn joined(
        conditions: impl IntoIterator<Item = Condition>,
        join: fn(Self, Condition) -> Self,
        keyword: &str,
    ) -> DataAccessResult<Self> {
        let mut iter = conditions.into_iter();
        let Some(first) = iter.next() else {
            return Err(DataAccessError::usage(format!(
                "At least one condition is required for {keyword}"
            )));
        };
        Ok(iter.fold(Self::from_condition(first), join))
    }

    /// Append ` AND condition`.
    pub fn and(mut self, condition: Condition) -> Self {
        self.fragment.push(" AND ");
        condition.append_to(&mut self.fragment);
        self
    }

    /// Append ` OR condition`.
    pub fn or(mut self, condition: Condition) -> Self {
        self.fragment.push(" OR ");
        condition.append_to(&mut self.fragment);
        self
    }

    /// Append ` AND column = value`.
    pub fn and_eq<T>(self, column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.and(Condition::new(column, value))
    }

    /// Append ` OR column = value`.
    pub fn or_eq<T>(self, column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.or(Condition::new(column, value))
    }

    /// Parameters keyed by their 1-based index within this group.
    pub fn index_parameters(&self) -> IndexedParams {
        self.fragment.index_parameters()
    }

    /// Render this group on its own, placeholders starting at `$1`.
    pub fn to_sql(&self) -> String {
        self.fragment.to_sql()
    }

    pub fn param_count(&self) -> usize {
        self.fragment.param_count()
    }

    pub(crate) fn into_fragment(self) -> Fragment {
        self.fragment
    }
}
