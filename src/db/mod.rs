pub mod memory;
pub mod postgres;

use std::sync::Arc;
use async_trait::async_trait;
use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use crate::config::{Config, StoreBackend};
use crate::models::employee::{Employee, NewEmployee};
use crate::search::LocationFilter;

pub use memory::MemoryEmployeeStore;
pub use postgres::PgEmployeeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Database(format!("Failed to apply migrations: {}", err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence gateway for employees and their nested contacts and locations.
///
/// Writes replace the child collections wholesale and are atomic: either the
/// employee and all of its children are written, or nothing is.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// All employees with contacts and locations joined, ordered by id.
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;

    /// Employees having at least one location matching `filter`, with
    /// `locations` narrowed to the matches.
    async fn search_employees(&self, filter: &LocationFilter) -> StoreResult<Vec<Employee>>;

    async fn create_employee(&self, employee: NewEmployee) -> StoreResult<Employee>;

    /// Replaces scalar fields and all children of employee `id`.
    async fn update_employee(&self, id: i32, employee: NewEmployee) -> StoreResult<Employee>;

    /// Removes employee `id` together with its contacts, links and locations.
    async fn delete_employee(&self, id: i32) -> StoreResult<()>;

    /// Releases backing resources on shutdown.
    async fn close(&self) {}
}

pub(crate) fn not_found(id: i32) -> StoreError {
    StoreError::NotFound(format!("Employee {} not found", id))
}

/// Opens the connection pool and applies pending migrations.
pub async fn create_pool(database_url: &str, max_connections: u32) -> StoreResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    info!("Database connection established (max_connections={})", max_connections);

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}

/// Builds the store selected by configuration.
pub async fn connect_store(config: &Config) -> StoreResult<Arc<dyn EmployeeStore>> {
    match &config.store {
        StoreBackend::Memory => {
            info!("Using in-memory employee store");
            Ok(Arc::new(MemoryEmployeeStore::new()))
        }
        StoreBackend::Postgres { database_url } => {
            let pool = create_pool(database_url, config.max_connections).await?;
            Ok(Arc::new(PgEmployeeStore::new(pool)))
        }
    }
}
