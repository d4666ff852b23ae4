//! Parameter binding and statement execution.

use crate::access::{ConnectionSource, DataAccess};
use crate::client::GenericClient;
use crate::epoch;
use crate::error::{DataAccessError, DataAccessResult, DriverResultExt};
use crate::param::{IndexedParams, Param};
use crate::row::{FromRow, ResultRow, ResultSet};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use std::marker::PhantomData;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, ToSql, Type};

/// Mapper used by [`StatementBuilder::map_to`].
pub type RowMapper<T> = fn(&ResultRow) -> DataAccessResult<T>;

/// A SQL string plus its positional parameters, waiting for a terminal operation.
///
/// [`bind`](Self::bind) fills `$1, $2, ...` in call order.
/// [`set_parameters`](Self::set_parameters) fills explicit indices without moving that
/// cursor. Every index from `$1` to the highest one bound must have a value when a
/// terminal operation runs.
///
/// Each terminal operation checks out a connection, prepares the statement, runs it and
/// releases everything before returning.
#[must_use = "a statement does nothing until a terminal operation is awaited"]
pub struct StatementBuilder<'a, S> {
    access: &'a DataAccess<S>,
    sql: String,
    params: IndexedParams,
    next_index: usize,
}

impl<'a, S: ConnectionSource> StatementBuilder<'a, S> {
    pub(crate) fn new(access: &'a DataAccess<S>, sql: String) -> Self {
        Self {
            access,
            sql,
            params: IndexedParams::new(),
            next_index: 1,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of parameters bound so far.
    pub fn bound_count(&self) -> usize {
        self.params.len()
    }

    /// Bind an already wrapped parameter to the next index.
    pub fn bind_param(mut self, param: Param) -> Self {
        self.params.insert(self.next_index, param);
        self.next_index += 1;
        self
    }

    /// Bind `value` to the next index.
    pub fn bind<T: ToSql + Send + Sync + 'static>(self, value: T) -> Self {
        self.bind_param(Param::new(value))
    }

    /// Bind SQL NULL, typed as `T`, to the next index.
    pub fn bind_null<T: ToSql + Send + Sync + 'static>(self) -> Self {
        self.bind(None::<T>)
    }

    /// Bind `Some(value)` or NULL to the next index.
    pub fn bind_opt<T: ToSql + Send + Sync + 'static>(self, value: Option<T>) -> Self {
        self.bind(value)
    }

    /// Bind local wall-clock time as UTC epoch milliseconds (`BIGINT`).
    pub fn bind_local_datetime_millis(self, value: NaiveDateTime) -> DataAccessResult<Self> {
        let millis = epoch::local_to_epoch_millis(value)?;
        Ok(self.bind(millis))
    }

    /// Bind a zoned date-time as UTC epoch milliseconds (`BIGINT`).
    pub fn bind_zoned_datetime_millis<Tz: TimeZone>(self, value: &DateTime<Tz>) -> Self {
        self.bind(epoch::zoned_to_epoch_millis(value))
    }

    /// Bind explicit `index -> value` pairs (1-based). The [`bind`](Self::bind) cursor is
    /// left where it is; an index bound twice keeps the last value.
    pub fn set_parameters(mut self, params: IndexedParams) -> Self {
        self.params.extend(params);
        self
    }

    fn ordered_params(&self) -> DataAccessResult<Vec<&(dyn ToSql + Sync)>> {
        if self.params.contains_key(&0) {
            return Err(DataAccessError::usage("Parameter indices start at $1"));
        }
        for (expected, index) in (1..).zip(self.params.keys()) {
            if *index != expected {
                return Err(DataAccessError::usage(format!(
                    "Parameter ${expected} was not bound"
                )));
            }
        }
        Ok(self.params.values().map(Param::as_sql).collect())
    }

    async fn run_query(&self, operation: &'static str, failure: &str) -> DataAccessResult<Vec<Row>> {
        let params = self.ordered_params()?;
        let log = self.access.log();
        log.before(operation, &self.sql, params.len());

        let result = async {
            let conn = self.access.connection().await?;
            let stmt = conn
                .prepare(&self.sql)
                .await
                .context("Error creating prepared statement")?;
            conn.query(&stmt, &params).await.context(failure)
        }
        .await;

        if let Err(e) = &result {
            log.failed(operation, &self.sql, e);
        }
        result
    }

    async fn run_execute(&self, operation: &'static str, failure: &str) -> DataAccessResult<u64> {
        let params = self.ordered_params()?;
        let log = self.access.log();
        log.before(operation, &self.sql, params.len());

        let result = async {
            let conn = self.access.connection().await?;
            let stmt = conn
                .prepare(&self.sql)
                .await
                .context("Error creating prepared statement")?;
            conn.execute(&stmt, &params).await.context(failure)
        }
        .await;

        if let Err(e) = &result {
            log.failed(operation, &self.sql, e);
        }
        result
    }

    /// Run the statement and discard any result.
    pub async fn execute(self) -> DataAccessResult<()> {
        self.run_execute("execute", "Error executing query").await?;
        Ok(())
    }

    /// Run an INSERT/UPDATE/DELETE and return the number of affected rows.
    pub async fn execute_update(self) -> DataAccessResult<u64> {
        self.run_execute("update", "Error executing update").await
    }

    /// Run a query and return every row.
    pub async fn execute_query(self) -> DataAccessResult<ResultSet> {
        let rows = self.run_query("query", "Error executing query").await?;
        Ok(ResultSet::new(rows))
    }

    async fn first_key_row(&self) -> DataAccessResult<ResultRow> {
        let rows = self.run_query("insert", "Error executing insert").await?;
        rows.into_iter().next().map(ResultRow::new).ok_or_else(|| {
            DataAccessError::usage("Error executing insert: no generated key was returned")
        })
    }

    /// Run an INSERT built with
    /// [`query_with_generated_key`](DataAccess::query_with_generated_key) and return the
    /// generated key. `SMALLINT`, `INTEGER` and `BIGINT` keys are all widened to `i64`.
    pub async fn insert_autoincrement(self) -> DataAccessResult<i64> {
        let row = self.first_key_row().await?;
        let key_type = row.inner().columns().first().map(|c| c.type_());
        if key_type == Some(&Type::INT2) {
            row.get_i16(0).map(i64::from)
        } else if key_type == Some(&Type::INT4) {
            row.get_i32(0).map(i64::from)
        } else {
            row.get_i64(0)
        }
    }

    /// Run an INSERT with a `RETURNING` clause and read the first returned column as `T`.
    pub async fn insert_returning_key<T>(self) -> DataAccessResult<T>
    where
        T: for<'r> FromSql<'r>,
    {
        let row = self.first_key_row().await?;
        row.get(0)
    }

    /// Map every row with `mapper`.
    pub fn result_mapper<T, F>(self, mapper: F) -> MappedStatement<'a, S, T, F>
    where
        F: Fn(&ResultRow) -> DataAccessResult<T>,
    {
        MappedStatement {
            statement: self,
            mapper,
            _marker: PhantomData,
        }
    }

    /// Map every row with `T`'s [`FromRow`] implementation.
    pub fn map_to<T: FromRow>(self) -> MappedStatement<'a, S, T, RowMapper<T>> {
        self.result_mapper(T::from_row as RowMapper<T>)
    }
}

/// A statement with a row mapper attached.
#[must_use = "a statement does nothing until a terminal operation is awaited"]
pub struct MappedStatement<'a, S, T, F> {
    statement: StatementBuilder<'a, S>,
    mapper: F,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, S, T, F> MappedStatement<'a, S, T, F>
where
    S: ConnectionSource,
    F: Fn(&ResultRow) -> DataAccessResult<T>,
{
    pub fn sql(&self) -> &str {
        self.statement.sql()
    }

    /// The first row mapped, or `None` when the query returns nothing. Extra rows are ignored.
    pub async fn find_one(self) -> DataAccessResult<Option<T>> {
        let rows = self
            .statement
            .run_query("find_one", "Error querying item")
            .await?;
        rows.into_iter()
            .next()
            .map(|row| (self.mapper)(&ResultRow::new(row)))
            .transpose()
    }

    /// Every row mapped, in order.
    pub async fn list(self) -> DataAccessResult<Vec<T>> {
        let rows = self
            .statement
            .run_query("list", "Error querying list")
            .await?;
        rows.into_iter()
            .map(|row| (self.mapper)(&ResultRow::new(row)))
            .collect()
    }

    /// Hand every mapped row to `consumer`, in order. Stops at the first mapping error.
    pub async fn for_each<C>(self, mut consumer: C) -> DataAccessResult<()>
    where
        C: FnMut(T),
    {
        let rows = self
            .statement
            .run_query("for_each", "Error querying list")
            .await?;
        for row in rows {
            consumer((self.mapper)(&ResultRow::new(row))?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::access::Supplier;
    use std::future::Pending;

    type NeverConnects = fn() -> Pending<Result<tokio_postgres::Client, tokio_postgres::Error>>;

    // Statements are only built here, never run.
    fn access() -> DataAccess<Supplier<NeverConnects>> {
        DataAccess::from_supplier(std::future::pending as NeverConnects)
    }

    #[test]
    fn bind_uses_consecutive_indices() {
        let data = access();
        let stmt = data.query("SELECT $1, $2, $3").bind("a").bind(2_i32).bind_null::<String>();
        assert_eq!(stmt.bound_count(), 3);
        let keys: Vec<usize> = stmt.params.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert!(stmt.ordered_params().is_ok());
    }

    #[test]
    fn set_parameters_does_not_move_cursor() {
        let data = access();
        let mut explicit = IndexedParams::new();
        explicit.insert(2, Param::new("second"));
        let stmt = data
            .query("SELECT $1, $2")
            .set_parameters(explicit)
            .bind("first");

        assert_eq!(stmt.bound_count(), 2);
        assert_eq!(stmt.ordered_params().unwrap().len(), 2);
    }

    #[test]
    fn gap_in_indices_is_reported() {
        let data = access();
        let mut explicit = IndexedParams::new();
        explicit.insert(1, Param::new(1_i32));
        explicit.insert(3, Param::new(3_i32));
        let stmt = data.query("SELECT $1, $2, $3").set_parameters(explicit);

        let err = stmt.ordered_params().unwrap_err();
        assert_eq!(err.to_string(), "Parameter $2 was not bound");
    }

    #[test]
    fn zero_index_is_rejected() {
        let data = access();
        let mut explicit = IndexedParams::new();
        explicit.insert(0, Param::new(1_i32));
        let err = data
            .query("SELECT 1")
            .set_parameters(explicit)
            .ordered_params()
            .unwrap_err();
        assert!(matches!(err, DataAccessError::Usage(_)));
    }

    #[test]
    fn builder_parameters_are_prebound() {
        let data = access();
        let stmt = data
            .select("person")
            .where_eq("name", "John")
            .and_eq("age", 90_i32)
            .prepare(&data);

        assert_eq!(stmt.sql(), "SELECT * FROM person WHERE name = $1 AND age = $2");
        assert_eq!(stmt.bound_count(), 2);
    }

    #[test]
    fn generated_key_adds_returning_clause() {
        let data = access();
        let stmt = data.query_with_generated_key("INSERT INTO person(name) VALUES ($1)", "id");
        assert_eq!(stmt.sql(), "INSERT INTO person(name) VALUES ($1) RETURNING id");
    }

    #[test]
    fn generated_key_drops_trailing_semicolon() {
        let data = access();
        let stmt = data.query_with_generated_key("INSERT INTO person(name) VALUES ($1);  \n", "id");
        assert_eq!(stmt.sql(), "INSERT INTO person(name) VALUES ($1) RETURNING id");
    }

    #[test]
    fn epoch_binders_store_millis() {
        let data = access();
        let at = NaiveDate::from_ymd_opt(2025, 3, 26)
            .unwrap()
            .and_hms_milli_opt(21, 30, 5, 123)
            .unwrap();
        let stmt = data
            .query("INSERT INTO point(t1, t2) VALUES ($1, $2)")
            .bind_local_datetime_millis(at)
            .unwrap()
            .bind_zoned_datetime_millis(&Utc.from_utc_datetime(&at));
        assert_eq!(stmt.bound_count(), 2);
    }
}
