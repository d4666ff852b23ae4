#![allow(dead_code)]

use quickquery::{DataAccess, DataAccessResult};

/// Connect to `DATABASE_URL`, or `None` (and a note on stderr) when it is not set.
pub async fn connect(test: &str) -> DataAccessResult<Option<DataAccess<tokio_postgres::Client>>> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            return Ok(None);
        }
    };

    DataAccess::connect(&database_url).await.map(Some)
}
