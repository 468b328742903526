//! # Compound Search
//!
//! Look up database records for a known set of identifiers, narrowed by a
//! caller-supplied filter expression.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use compound_search::{search_compounds, Credentials, QueryShape, SearchConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // DB_URL, USERNAME and DB_KEY are read once, here
//!     let credentials = Credentials::from_env()?;
//!     let shape = QueryShape::new(
//!         "BATCH JOIN MOLECULE ON BATCH.MOL_COMP_ID = MOLECULE.MOL_COMP_ID",
//!         "BATCH.BATCH_REGID",
//!     )
//!     .with_projection(["BATCH.BATCH_REGID", "MOLECULE.MOL_REGID", "MOLECULE.MOL_CTFILE"]);
//!     let config = SearchConfig::new(credentials, shape).with_max_batch_size(500);
//!
//!     let records =
//!         search_compounds(&config, &["B-0001", "B-0002"], "MOLECULE.MOL_WEIGHT < 900")?;
//!     for record in &records {
//!         let molfile = record.get("MOL_CTFILE").and_then(|v| v.as_text());
//!         println!("{:?} {}", record.get_str("BATCH_REGID"), molfile.is_some());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## How a search runs
//!
//! ```text
//! search(ids, filter)
//!   ├─ ids empty?            → Error::EmptyInput (nothing opened)
//!   ├─ filter check          → Error::Query on ';', comments, unbalanced ()
//!   ├─ connector.connect()   → Error::Connection
//!   ├─ for each batch of ≤ max_batch_size ids:
//!   │     SELECT … WHERE <id column> IN (?1, …, ?n) AND (<filter>)
//!   └─ session dropped       → connection closed on every path
//! ```
//!
//! The filter is trusted query logic. The structural check keeps it inside
//! its parentheses; it does not make end-user input safe. Sanitise or
//! whitelist untrusted filter text before it reaches this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod connector;
pub mod logging;
pub mod service;
pub mod sqlite;

// Re-export core types
pub use compound_core::{Error, Record, Result, Value};

// Query assembly
pub use compound_query::{FilterExpression, Placeholder, QueryShape, StatementTemplate};

pub use config::{Credentials, SearchConfig, DEFAULT_MAX_BATCH_SIZE};
pub use connector::{Connector, Session};
pub use service::CompoundSearch;
pub use sqlite::{SqliteConnector, SqliteSession};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs one search against the SQLite database named by `config`.
///
/// Shorthand for building a [`CompoundSearch`] over a default
/// [`SqliteConnector`] and calling [`CompoundSearch::search`].
///
/// # Errors
///
/// See [`CompoundSearch::search`]; additionally `Error::InvalidConfig` if
/// `config` does not validate.
pub fn search_compounds<S: AsRef<str>>(
    config: &SearchConfig,
    identifiers: &[S],
    filter: &str,
) -> Result<Vec<Record>> {
    CompoundSearch::new(config, SqliteConnector::new())?.search(identifiers, filter)
}
