//! Derive macros for quickquery
//!
//! Provides `#[derive(FromRow)]` and `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod from_row;
mod record;

/// Derive `FromRow` for a struct with named fields.
///
/// Every field is read from the column with the same name; field order does not matter.
///
/// # Example
///
/// ```ignore
/// use quickquery::FromRow;
///
/// #[derive(FromRow)]
/// struct Person {
///     name: String,
///     #[qq(column = "years")]
///     age: i32,
///     nickname: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[qq(column = "name")]` - Map field to a different column name
/// - `#[qq(epoch_millis)]` - Read a `BIGINT` of UTC epoch millis into a `NaiveDateTime`
///   (local wall clock) or `DateTime<Local>` field
#[proc_macro_derive(FromRow, attributes(qq))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Record`: ties a `FromRow` struct to its table.
///
/// # Example
///
/// ```ignore
/// use quickquery::{FromRow, Record};
///
/// #[derive(FromRow, Record)]
/// #[qq(table = "people")]
/// struct Person {
///     name: String,
///     age: i32,
/// }
/// ```
///
/// # Attributes
///
/// - `#[qq(table = "name")]` - Table name (defaults to the struct name in lower case)
#[proc_macro_derive(Record, attributes(qq))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
