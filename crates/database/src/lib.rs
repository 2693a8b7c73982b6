//! # Newsdesk Database Crate
//!
//! This crate is the storage adapter for the news service. Everything that knows
//! about SQL lives here: statement construction, the executor seam, error
//! classification and the repository the HTTP layer calls into.
//!
//! ## Architectural Principles
//!
//! - **Injected Executor:** `NewsRepository` is generic over `QueryExecutor`, so the
//!   same operations run against a live `PgPool` or a scripted stand-in.
//! - **Bound Parameters Only:** User input is never spliced into SQL. Sort columns
//!   and directions come from a fixed whitelist.
//! - **One Error Taxonomy:** Storage failures are reclassified into `NewsError`
//!   before they leave the crate.
//!
//! ## Public API
//!
//! - `connect`: Builds the connection pool from `ConnectionSettings`.
//! - `run_migrations`: Applies the embedded schema migrations.
//! - `NewsRepository`: The news operations (articles, comments, topics, users).
//! - `seed`: Resets the tables to a known fixture set.
//! - `DbError`: The errors raised below the classifier.

pub mod classifier;
pub mod connection;
pub mod error;
pub mod executor;
pub mod query;
pub mod repository;
pub mod seed;
pub mod shaping;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use connection::{ConnectionSettings, connect, run_migrations};
pub use error::{DbError, StorageErrorCode};
pub use executor::{PgExecutor, QueryExecutor, QueryPlan, Row, SqlParam};
pub use repository::{NewsRepository, QuerySettings};
pub use seed::seed;
