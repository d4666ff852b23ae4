//! Generic client trait over the driver's connection types.

use tokio_postgres::types::ToSql;
use tokio_postgres::{Row, Statement};

/// The driver primitives quickquery needs: prepare, then query or execute.
///
/// Implemented for `tokio_postgres::Client`, `tokio_postgres::Transaction`, pooled
/// `deadpool_postgres` clients and references to any of them, so the same statement
/// code runs against a plain connection, a transaction or a pool.
///
/// Errors are returned as raw driver errors; callers attach the step description.
pub trait GenericClient: Send + Sync {
    /// Prepare a statement on this connection.
    fn prepare(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = Result<Statement, tokio_postgres::Error>> + Send;

    /// Execute a prepared statement and return all rows.
    fn query(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = Result<Vec<Row>, tokio_postgres::Error>> + Send;

    /// Execute a prepared statement and return the number of affected rows.
    fn execute(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = Result<u64, tokio_postgres::Error>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    async fn prepare(&self, sql: &str) -> Result<Statement, tokio_postgres::Error> {
        tokio_postgres::Client::prepare(self, sql).await
    }

    async fn query(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, tokio_postgres::Error> {
        tokio_postgres::Client::query(self, stmt, params).await
    }

    async fn execute(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, tokio_postgres::Error> {
        tokio_postgres::Client::execute(self, stmt, params).await
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn prepare(&self, sql: &str) -> Result<Statement, tokio_postgres::Error> {
        tokio_postgres::Transaction::prepare(self, sql).await
    }

    async fn query(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, tokio_postgres::Error> {
        tokio_postgres::Transaction::query(self, stmt, params).await
    }

    async fn execute(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, tokio_postgres::Error> {
        tokio_postgres::Transaction::execute(self, stmt, params).await
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::ClientWrapper {
    async fn prepare(&self, sql: &str) -> Result<Statement, tokio_postgres::Error> {
        GenericClient::prepare(&**self, sql).await
    }

    async fn query(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, tokio_postgres::Error> {
        GenericClient::query(&**self, stmt, params).await
    }

    async fn execute(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, tokio_postgres::Error> {
        GenericClient::execute(&**self, stmt, params).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn prepare(&self, sql: &str) -> Result<Statement, tokio_postgres::Error> {
        // Delegate to the deref target (ClientWrapper).
        GenericClient::prepare(&**self, sql).await
    }

    async fn query(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, tokio_postgres::Error> {
        GenericClient::query(&**self, stmt, params).await
    }

    async fn execute(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, tokio_postgres::Error> {
        GenericClient::execute(&**self, stmt, params).await
    }
}

impl<C: GenericClient> GenericClient for &C {
    fn prepare(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = Result<Statement, tokio_postgres::Error>> + Send {
        (*self).prepare(sql)
    }

    fn query(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = Result<Vec<Row>, tokio_postgres::Error>> + Send {
        (*self).query(stmt, params)
    }

    fn execute(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = Result<u64, tokio_postgres::Error>> + Send {
        (*self).execute(stmt, params)
    }
}

impl<C: GenericClient> GenericClient for std::sync::Arc<C> {
    fn prepare(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = Result<Statement, tokio_postgres::Error>> + Send {
        (**self).prepare(sql)
    }

    fn query(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = Result<Vec<Row>, tokio_postgres::Error>> + Send {
        (**self).query(stmt, params)
    }

    fn execute(
        &self,
        stmt: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = Result<u64, tokio_postgres::Error>> + Send {
        (**self).execute(stmt, params)
    }
}
