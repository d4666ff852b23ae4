//! Connection failures against a closed local port. These run without a database.

use quickquery::{DataAccess, DataAccessError, DataAccessResult};
use std::error::Error as _;

const CLOSED_PORT_URL: &str = "postgres://postgres@127.0.0.1:1/quickquery";

fn assert_wrapped(err: &DataAccessError, message: &str) {
    assert_eq!(err.message(), message);
    assert!(err.to_string().starts_with(message), "{err}");
    assert!(err.source().is_some());
}

#[tokio::test]
async fn connect_to_closed_port_fails_opening_database() {
    let err = match DataAccess::connect(CLOSED_PORT_URL).await {
        Ok(_) => panic!("connected to a closed port"),
        Err(e) => e,
    };
    assert!(err.is_driver());
    assert_wrapped(&err, "Error opening database");
}

#[tokio::test]
async fn supplier_failure_is_wrapped_as_connection_error() {
    let data = DataAccess::from_supplier(|| async {
        let (client, connection) =
            tokio_postgres::connect(CLOSED_PORT_URL, tokio_postgres::NoTls).await?;
        tokio::spawn(connection);
        Ok::<_, tokio_postgres::Error>(client)
    });

    let err = data.query("SELECT 1").execute().await.unwrap_err();
    assert!(err.is_driver());
    assert_wrapped(&err, "Error getting connection");
}

#[cfg(feature = "pool")]
#[tokio::test]
async fn pool_checkout_failure_is_wrapped() -> DataAccessResult<()> {
    let data = DataAccess::from_pool(quickquery::create_pool(CLOSED_PORT_URL)?);

    let err = data.query("SELECT 1").execute().await.unwrap_err();
    assert!(err.is_pool());
    assert!(!err.is_driver());
    assert_wrapped(&err, "Error getting connection from pool");
    Ok(())
}

#[tokio::test]
async fn unbound_parameter_fails_before_connecting() {
    let data = DataAccess::from_supplier(|| async {
        let (client, connection) =
            tokio_postgres::connect(CLOSED_PORT_URL, tokio_postgres::NoTls).await?;
        tokio::spawn(connection);
        Ok::<_, tokio_postgres::Error>(client)
    });

    let mut params = quickquery::IndexedParams::new();
    params.insert(2, quickquery::Param::new(1_i32));
    let err = data
        .query("SELECT $1, $2")
        .set_parameters(params)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::Usage(_)));
    assert_eq!(err.to_string(), "Parameter $1 was not bound");
}
