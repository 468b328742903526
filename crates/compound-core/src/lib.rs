//! # Compound Search Core
//!
//! Shared types for the compound search workspace: the error taxonomy,
//! column values and result records.
//!
//! Users should depend on the `compound-search` crate instead, which
//! re-exports everything needed from here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;
pub mod value;

pub use error::{Error, Result};
pub use record::Record;
pub use value::Value;
