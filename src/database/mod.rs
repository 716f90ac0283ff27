//! # Database Operations
//!
//! Storage backends for test requests.
//!
//! ## Key Components
//!
//! - [`connection`] - PostgreSQL pool management and migrations
//! - [`postgres`] - [`TestRequestStore`](crate::state_machine::TestRequestStore) over SQLx
//! - [`memory`] - in-process store for tests and embedded use
//!
//! Both stores implement the same compare-and-set contract for transitions:
//! the write commits only if the stored status still equals the status the
//! caller read.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use upstac_core::config::UpstacConfig;
//! use upstac_core::database::{DatabaseConnection, PgTestRequestStore};
//! use upstac_core::events::EventPublisher;
//! use upstac_core::state_machine::TestRequestWorkflow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UpstacConfig::from_env()?;
//! let db = DatabaseConnection::connect(&config.database).await?;
//! db.migrate().await?;
//!
//! let store = Arc::new(PgTestRequestStore::new(db.pool().clone()));
//! let workflow = TestRequestWorkflow::new(store, EventPublisher::from_config(&config.events));
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use connection::DatabaseConnection;
pub use memory::InMemoryTestRequestStore;
#[cfg(feature = "postgres")]
pub use postgres::PgTestRequestStore;
