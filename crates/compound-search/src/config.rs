//! Search configuration.
//!
//! Credentials are read once, at process start, and validated there. The
//! search service borrows the finished [`SearchConfig`] for its whole life.

use compound_core::{Error, Result};
use compound_query::QueryShape;
use std::fmt;

/// Environment variable holding the database URL (DSN, path or URI)
pub const URL_VAR: &str = "DB_URL";
/// Environment variable holding the database user name
pub const USERNAME_VAR: &str = "USERNAME";
/// Environment variable holding the database secret
pub const SECRET_VAR: &str = "DB_KEY";

/// Default identifiers per statement.
///
/// 1000 is the element limit of an Oracle `IN` list and fits every engine
/// we connect to.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Database credentials.
///
/// The secret is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    url: String,
    username: String,
    secret: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if any value is blank or contains a NUL
    /// byte.
    pub fn new<U, N, S>(url: U, username: N, secret: S) -> Result<Self>
    where
        U: Into<String>,
        N: Into<String>,
        S: Into<String>,
    {
        let credentials = Self {
            url: url.into(),
            username: username.into(),
            secret: secret.into(),
        };
        check_value(URL_VAR, &credentials.url)?;
        check_value(USERNAME_VAR, &credentials.username)?;
        check_value(SECRET_VAR, &credentials.secret)?;
        Ok(credentials)
    }

    /// Reads credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads credentials through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &str| {
            lookup(key).ok_or_else(|| Error::Connection(format!("{} is not set", key)))
        };
        Self::new(fetch(URL_VAR)?, fetch(USERNAME_VAR)?, fetch(SECRET_VAR)?)
    }

    /// Database URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// User name
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Secret (password or key)
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn check_value(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Connection(format!("{} is empty", name)));
    }
    if value.contains('\0') {
        return Err(Error::Connection(format!("{} contains a NUL byte", name)));
    }
    Ok(())
}

/// Everything a search needs besides its inputs.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Connection credentials
    pub credentials: Credentials,
    /// Source relation, identifier column and projection
    pub shape: QueryShape,
    /// Maximum identifiers bound into one statement
    pub max_batch_size: usize,
}

impl SearchConfig {
    /// Creates a configuration with the default batch size.
    pub fn new(credentials: Credentials, shape: QueryShape) -> Self {
        Self {
            credentials,
            shape,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    /// Set the maximum identifiers per statement
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Validates the configuration against an engine's bind ceiling.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the batch size is zero or above
    /// `max_bind_parameters`, or if the query shape is invalid.
    pub fn validate(&self, max_bind_parameters: usize) -> Result<()> {
        if self.max_batch_size == 0 {
            return Err(Error::InvalidConfig(
                "max_batch_size must be at least 1".to_string(),
            ));
        }
        if self.max_batch_size > max_bind_parameters {
            return Err(Error::InvalidConfig(format!(
                "max_batch_size {} exceeds the engine limit of {} bind parameters",
                self.max_batch_size, max_bind_parameters
            )));
        }
        self.shape.validate()
    }
}
