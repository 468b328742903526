//! Engine seam.
//!
//! A [`Connector`] opens one [`Session`] per search call. Sessions are
//! released by dropping them, so every exit path of a search (success,
//! engine error, panic unwind) closes the connection exactly once.

use crate::config::Credentials;
use compound_core::{Record, Result};
use compound_query::Placeholder;

/// Opens authenticated sessions against one database engine.
pub trait Connector {
    /// Session type produced by this connector
    type Session: Session;

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if the engine cannot be reached or
    /// rejects the credentials.
    fn connect(&self, credentials: &Credentials) -> Result<Self::Session>;

    /// Placeholder syntax for bound parameters
    fn placeholder(&self) -> Placeholder;

    /// Maximum bind parameters the engine accepts in one statement
    fn max_bind_parameters(&self) -> usize;
}

/// One open session. Dropping it releases the connection.
pub trait Session {
    /// Executes `sql` with `params` bound positionally and collects every row.
    ///
    /// # Errors
    ///
    /// Returns `Error::Query` with the engine's message if the statement is
    /// rejected or fails while stepping.
    fn fetch(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Record>>;
}

impl<C: Connector + ?Sized> Connector for &C {
    type Session = C::Session;

    fn connect(&self, credentials: &Credentials) -> Result<Self::Session> {
        (**self).connect(credentials)
    }

    fn placeholder(&self) -> Placeholder {
        (**self).placeholder()
    }

    fn max_bind_parameters(&self) -> usize {
        (**self).max_bind_parameters()
    }
}
