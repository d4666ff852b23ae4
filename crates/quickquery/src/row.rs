//! Row access and row-to-record mapping.

use crate::epoch;
use crate::error::{DataAccessError, DataAccessResult};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;
use tokio_postgres::Row;
use tokio_postgres::row::RowIndex;
use tokio_postgres::types::FromSql;

/// One result row with typed getters.
///
/// Every getter takes either a column name (`"age"`) or a 0-based column index (`1`).
/// Read failures, including SQL NULL read into a non-`Option` type, become
/// [`DataAccessError::Decode`] naming the column. Use [`get_opt`](Self::get_opt) for
/// nullable columns.
#[derive(Debug)]
pub struct ResultRow {
    row: Row,
}

impl ResultRow {
    pub fn new(row: Row) -> Self {
        Self { row }
    }

    /// The wrapped driver row.
    pub fn inner(&self) -> &Row {
        &self.row
    }

    pub fn into_inner(self) -> Row {
        self.row
    }

    pub fn column_count(&self) -> usize {
        self.row.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.row.columns().iter().map(|c| c.name()).collect()
    }

    fn read<'a, I, T>(&'a self, idx: I, kind: &str) -> DataAccessResult<T>
    where
        I: RowIndex + fmt::Display,
        T: FromSql<'a>,
    {
        let column = idx.to_string();
        self.row
            .try_get(idx)
            .map_err(|e| DataAccessError::decode(column, format!("Error getting {kind}"), e))
    }

    /// Read any `FromSql` value.
    pub fn get<'a, I, T>(&'a self, idx: I) -> DataAccessResult<T>
    where
        I: RowIndex + fmt::Display,
        T: FromSql<'a>,
    {
        self.read(idx, "value")
    }

    /// Read a nullable value; SQL NULL becomes `None`.
    pub fn get_opt<'a, I, T>(&'a self, idx: I) -> DataAccessResult<Option<T>>
    where
        I: RowIndex + fmt::Display,
        T: FromSql<'a>,
    {
        self.read(idx, "value")
    }

    pub fn get_string<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<String> {
        self.read(idx, "string")
    }

    pub fn get_bool<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<bool> {
        self.read(idx, "boolean")
    }

    /// Read a Postgres `"char"` column.
    pub fn get_i8<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<i8> {
        self.read(idx, "byte")
    }

    pub fn get_i16<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<i16> {
        self.read(idx, "short")
    }

    pub fn get_i32<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<i32> {
        self.read(idx, "int")
    }

    pub fn get_i64<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<i64> {
        self.read(idx, "long")
    }

    pub fn get_f32<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<f32> {
        self.read(idx, "float")
    }

    pub fn get_f64<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<f64> {
        self.read(idx, "double")
    }

    pub fn get_bytes<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<Vec<u8>> {
        self.read(idx, "bytes")
    }

    /// Read a `DATE` column.
    pub fn get_date<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<NaiveDate> {
        self.read(idx, "date")
    }

    /// Read a `TIME` column.
    pub fn get_time<I: RowIndex + fmt::Display>(&self, idx: I) -> DataAccessResult<NaiveTime> {
        self.read(idx, "time")
    }

    /// Read a `TIMESTAMP` (without time zone) column.
    pub fn get_timestamp<I: RowIndex + fmt::Display>(
        &self,
        idx: I,
    ) -> DataAccessResult<NaiveDateTime> {
        self.read(idx, "timestamp")
    }

    /// Read a `TIMESTAMPTZ` column.
    pub fn get_timestamptz<I: RowIndex + fmt::Display>(
        &self,
        idx: I,
    ) -> DataAccessResult<DateTime<Utc>> {
        self.read(idx, "timestamptz")
    }

    /// Read a `BIGINT` column of UTC epoch millis as local wall-clock time.
    pub fn get_local_datetime_millis<I: RowIndex + fmt::Display>(
        &self,
        idx: I,
    ) -> DataAccessResult<NaiveDateTime> {
        let column = idx.to_string();
        let millis: i64 = self.read(idx, "epoch millis")?;
        millis_in_range(&column, epoch::epoch_millis_to_local(millis))
    }

    /// Read a `BIGINT` column of UTC epoch millis as a date-time in the system zone.
    pub fn get_zoned_datetime_millis<I: RowIndex + fmt::Display>(
        &self,
        idx: I,
    ) -> DataAccessResult<DateTime<Local>> {
        let column = idx.to_string();
        let millis: i64 = self.read(idx, "epoch millis")?;
        millis_in_range(&column, epoch::epoch_millis_to_zoned(millis))
    }
}

/// Report an unrepresentable epoch-millis value as a read failure of `column`.
fn millis_in_range<T>(column: &str, converted: DataAccessResult<T>) -> DataAccessResult<T> {
    converted.map_err(|e| DataAccessError::decode(column, "Error getting epoch millis", e))
}

impl From<Row> for ResultRow {
    fn from(row: Row) -> Self {
        Self::new(row)
    }
}

/// All rows returned by a query, in order.
#[derive(Debug, Default)]
pub struct ResultSet {
    rows: Vec<ResultRow>,
}

impl ResultSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into_iter().map(ResultRow::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&ResultRow> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.rows.iter()
    }

    /// Run `f` on every row in order, stopping at the first error.
    pub fn for_each<F>(&self, mut f: F) -> DataAccessResult<()>
    where
        F: FnMut(&ResultRow) -> DataAccessResult<()>,
    {
        self.rows.iter().try_for_each(|row| f(row))
    }

    /// Map every row in order, stopping at the first error.
    pub fn map_rows<T, F>(&self, f: F) -> DataAccessResult<Vec<T>>
    where
        F: FnMut(&ResultRow) -> DataAccessResult<T>,
    {
        self.rows.iter().map(f).collect()
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultRow;
    type IntoIter = std::vec::IntoIter<ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Trait for converting a result row into a Rust struct.
///
/// Derive it with `#[derive(FromRow)]`, which reads every named field from the column of
/// the same name, or write it by hand when the mapping needs logic.
///
/// # Example
///
/// ```ignore
/// use quickquery::{FromRow, ResultRow, DataAccessResult};
///
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// impl FromRow for Person {
///     fn from_row(row: &ResultRow) -> DataAccessResult<Self> {
///         Ok(Self {
///             name: row.get_string("name")?,
///             age: row.get_i32("age")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a result row into Self
    fn from_row(row: &ResultRow) -> DataAccessResult<Self>;
}

/// A [`FromRow`] type backed by a single table.
///
/// `#[derive(Record)]` uses the struct name in lower case unless
/// `#[qq(table = "...")]` says otherwise.
pub trait Record: FromRow {
    const TABLE: &'static str;
}
