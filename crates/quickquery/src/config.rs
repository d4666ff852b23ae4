//! Runtime configuration.
//!
//! [`DataAccessConfig`] can be built in code, deserialized with `serde` from whatever
//! configuration format the application uses, or read from the environment:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `DATABASE_URL` | `database_url` | required |
//! | `QUICKQUERY_POOL_MAX_SIZE` | `pool_max_size` | `16` |
//! | `QUICKQUERY_LOG_SQL` | `log_sql` | `true` |
//! | `QUICKQUERY_MAX_SQL_LENGTH` | `max_sql_length` | `200` (`0` disables truncation) |

use crate::error::{DataAccessError, DataAccessResult};
use crate::sql_log::SqlLog;
use serde::Deserialize;
use std::str::FromStr;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const POOL_MAX_SIZE: &str = "QUICKQUERY_POOL_MAX_SIZE";
pub const LOG_SQL: &str = "QUICKQUERY_LOG_SQL";
pub const MAX_SQL_LENGTH: &str = "QUICKQUERY_MAX_SQL_LENGTH";

/// Connection and logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataAccessConfig {
    pub database_url: String,
    pub pool_max_size: usize,
    pub log_sql: bool,
    /// `0` disables truncation.
    pub max_sql_length: usize,
}

impl Default for DataAccessConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            pool_max_size: 16,
            log_sql: true,
            max_sql_length: 200,
        }
    }
}

impl DataAccessConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    pub fn pool_max_size(mut self, size: usize) -> Self {
        self.pool_max_size = size;
        self
    }

    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    pub fn max_sql_length(mut self, max: usize) -> Self {
        self.max_sql_length = max;
        self
    }

    /// Read the configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> DataAccessResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> DataAccessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let database_url = lookup(DATABASE_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| DataAccessError::usage(format!("{DATABASE_URL} is not set")))?;

        Ok(Self {
            database_url,
            pool_max_size: parse_or(&lookup, POOL_MAX_SIZE, defaults.pool_max_size)?,
            log_sql: parse_flag_or(&lookup, LOG_SQL, defaults.log_sql)?,
            max_sql_length: parse_or(&lookup, MAX_SQL_LENGTH, defaults.max_sql_length)?,
        })
    }

    pub fn validate(&self) -> DataAccessResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(DataAccessError::usage("database_url is empty"));
        }
        if self.pool_max_size == 0 {
            return Err(DataAccessError::usage("pool_max_size must be at least 1"));
        }
        Ok(())
    }

    /// The logging settings these values describe.
    pub fn sql_log(&self) -> SqlLog {
        SqlLog {
            enabled: self.log_sql,
            max_sql_length: (self.max_sql_length > 0).then_some(self.max_sql_length),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> DataAccessResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DataAccessError::usage(format!("{key} has an invalid value: {raw}"))),
    }
}

fn parse_flag_or<F>(lookup: &F, key: &str, default: bool) -> DataAccessResult<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(DataAccessError::usage(format!(
                "{key} has an invalid value: {raw}"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let config =
            DataAccessConfig::from_lookup(lookup(&[(DATABASE_URL, "postgres://localhost/app")]))
                .unwrap();
        assert_eq!(config, DataAccessConfig::new("postgres://localhost/app"));
        assert_eq!(config.sql_log().max_sql_length, Some(200));
    }

    #[test]
    fn reads_every_variable() {
        let config = DataAccessConfig::from_lookup(lookup(&[
            (DATABASE_URL, "postgres://localhost/app"),
            (POOL_MAX_SIZE, "4"),
            (LOG_SQL, "off"),
            (MAX_SQL_LENGTH, "0"),
        ]))
        .unwrap();

        assert_eq!(config.pool_max_size, 4);
        assert!(!config.log_sql);
        let log = config.sql_log();
        assert!(!log.enabled);
        assert_eq!(log.max_sql_length, None);
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = DataAccessConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.to_string(), "DATABASE_URL is not set");
    }

    #[test]
    fn bad_numbers_and_flags_are_errors() {
        let bad_size = DataAccessConfig::from_lookup(lookup(&[
            (DATABASE_URL, "postgres://localhost/app"),
            (POOL_MAX_SIZE, "many"),
        ]));
        assert!(bad_size.is_err());

        let bad_flag = DataAccessConfig::from_lookup(lookup(&[
            (DATABASE_URL, "postgres://localhost/app"),
            (LOG_SQL, "maybe"),
        ]));
        assert!(bad_flag.is_err());
    }

    #[test]
    fn validate_rejects_empty_pool() {
        let config = DataAccessConfig::new("postgres://localhost/app").pool_max_size(0);
        assert!(config.validate().is_err());
        assert!(DataAccessConfig::new("postgres://localhost/app").validate().is_ok());
    }
}
