//! Fluent SELECT builder.
//!
//! [`QueryBuilder`] starts from an initial SQL string (usually produced by
//! [`DataAccess::select`](crate::DataAccess::select)) and appends `WHERE`, `AND`, `OR`,
//! grouped conditions and `ORDER BY` clauses. Every value is carried as a positional
//! parameter; placeholders are numbered `$1, $2, ...` in the order they were added.
//!
//! # Example
//!
//! ```ignore
//! use quickquery::{Condition, ConditionGroup};
//!
//! let people: Vec<Person> = data
//!     .select("person")
//!     .where_eq("country", "MX")
//!     .and_group(ConditionGroup::eq("name", "Ana").or(Condition::gt("age", 30_i32)))
//!     .order_by_desc(&["age"])
//!     .prepare(&data)
//!     .map_to::<Person>()
//!     .list()
//!     .await?;
//! // SELECT * FROM person WHERE country = $1 AND ( name = $2 OR age > $3 ) ORDER BY age DESC
//! ```

use crate::access::{ConnectionSource, DataAccess};
use crate::condition::{Condition, ConditionGroup};
use crate::fragment::Fragment;
use crate::param::{IndexedParams, ParamList};
use crate::statement::StatementBuilder;
use tokio_postgres::types::ToSql;

/// Mutable SQL text plus the parameters bound so far. Built once, consumed by
/// [`prepare`](Self::prepare).
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    fragment: Fragment,
}

impl QueryBuilder {
    /// Start a builder from arbitrary SQL.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            fragment: Fragment::new(initial_sql),
        }
    }

    /// `SELECT * FROM table`
    pub fn select_all(table: &str) -> Self {
        Self::new(format!("SELECT * FROM {table}"))
    }

    /// `SELECT c1, c2 FROM table`
    pub fn select_columns(table: &str, columns: &[&str]) -> Self {
        Self::new(format!("SELECT {} FROM {table}", columns.join(", ")))
    }

    fn push_condition(mut self, condition: Condition) -> Self {
        condition.append_to(&mut self.fragment);
        self
    }

    /// Append ` WHERE column = value`.
    pub fn where_eq<T>(self, column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.where_condition(Condition::new(column, value))
    }

    /// Append ` WHERE condition`.
    pub fn where_condition(mut self, condition: Condition) -> Self {
        self.fragment.push(" WHERE ");
        self.push_condition(condition)
    }

    /// Append ` AND condition`.
    pub fn and(mut self, condition: Condition) -> Self {
        self.fragment.push(" AND ");
        self.push_condition(condition)
    }

    /// Append ` AND column = value`.
    pub fn and_eq<T>(self, column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.and(Condition::new(column, value))
    }

    /// Append ` OR condition`.
    pub fn or(mut self, condition: Condition) -> Self {
        self.fragment.push(" OR ");
        self.push_condition(condition)
    }

    /// Append ` OR column = value`.
    pub fn or_eq<T>(self, column: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.or(Condition::new(column, value))
    }

    fn push_group(mut self, keyword: &str, group: ConditionGroup) -> Self {
        self.fragment.push(keyword).push(" ( ");
        self.fragment.push_fragment(group.into_fragment());
        self.fragment.push(" )");
        self
    }

    /// Append ` AND ( group )`. The group's parameters follow the ones already bound.
    pub fn and_group(self, group: ConditionGroup) -> Self {
        self.push_group(" AND", group)
    }

    /// Append ` OR ( group )`. The group's parameters follow the ones already bound.
    pub fn or_group(self, group: ConditionGroup) -> Self {
        self.push_group(" OR", group)
    }

    /// Append ` ORDER BY c1, c2 ASC` (or `DESC` when `asc` is false).
    pub fn order_by_dir(mut self, asc: bool, columns: &[&str]) -> Self {
        self.fragment
            .push(" ORDER BY ")
            .push(&columns.join(", "))
            .push(if asc { " ASC" } else { " DESC" });
        self
    }

    /// Append ` ORDER BY c1, c2 ASC`.
    pub fn order_by(self, columns: &[&str]) -> Self {
        self.order_by_dir(true, columns)
    }

    /// Append ` ORDER BY c1, c2 DESC`.
    pub fn order_by_desc(self, columns: &[&str]) -> Self {
        self.order_by_dir(false, columns)
    }

    /// Append raw SQL, separated by a space.
    pub fn append(mut self, sql: &str) -> Self {
        self.fragment.push(" ").push(sql);
        self
    }

    /// Parameters keyed by their 1-based placeholder index.
    pub fn index_parameters(&self) -> IndexedParams {
        self.fragment.index_parameters()
    }

    pub fn param_count(&self) -> usize {
        self.fragment.param_count()
    }

    /// The SQL built so far.
    pub fn to_sql(&self) -> String {
        self.fragment.to_sql()
    }

    pub(crate) fn into_parts(self) -> (String, ParamList) {
        self.fragment.into_parts()
    }

    /// Consume the builder into a statement with every parameter already bound.
    pub fn prepare<S: ConnectionSource>(self, access: &DataAccess<S>) -> StatementBuilder<'_, S> {
        access.prepare(self)
    }
}

#[cfg(test)]
mod tests;
