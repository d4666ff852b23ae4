//! SQL debug logging via `tracing`.
//!
//! Events go to the `quickquery.sql` target: `debug` before a statement runs, `warn`
//! when it fails. Without the `tracing` feature every call here is a no-op.

use crate::error::DataAccessError;

/// How statements are logged.
#[derive(Debug, Clone)]
pub struct SqlLog {
    /// Emit events at all.
    pub enabled: bool,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLog {
    fn default() -> Self {
        Self {
            enabled: true,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLog {
    /// Logging switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    fn truncate<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }

    pub(crate) fn before(&self, operation: &'static str, sql: &str, param_count: usize) {
        if !self.enabled {
            return;
        }
        let sql = self.truncate(sql);
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "quickquery.sql", operation, param_count, sql = %sql);
        #[cfg(not(feature = "tracing"))]
        let _ = (operation, param_count, sql);
    }

    pub(crate) fn failed(&self, operation: &'static str, sql: &str, error: &DataAccessError) {
        if !self.enabled {
            return;
        }
        let sql = self.truncate(sql);
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "quickquery.sql", operation, sql = %sql, error = %error);
        #[cfg(not(feature = "tracing"))]
        let _ = (operation, sql, error);
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(truncate_sql_bytes("hello", 10), "hello");
    }

    #[test]
    fn long_sql_gets_ellipsis() {
        let log = SqlLog {
            enabled: true,
            max_sql_length: Some(6),
        };
        assert_eq!(log.truncate("SELECT * FROM person"), "SELECT...");
        assert_eq!(log.truncate("SELECT"), "SELECT");
    }
}
