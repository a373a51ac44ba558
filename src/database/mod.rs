//! Read Later database layer.
//!
//! Provides the SQLite connection and schema migrations behind
//! [`SqliteStore`](crate::storage::sqlite_store::SqliteStore).
//!
//! # Usage
//!
//! ```no_run
//! use readlater::database::Database;
//!
//! let db = Database::open("readlater.db").expect("failed to open database");
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
