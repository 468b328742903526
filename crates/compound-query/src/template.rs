//! Statement templates.
//!
//! A template is built once per search call from the configured
//! [`QueryShape`] and the caller's filter, then rendered once per batch with
//! the batch's placeholder count.

use crate::filter::{check_fragment, FilterExpression};
use compound_core::{Error, Result};
use std::fmt::Write;

/// Bind placeholder syntax understood by the target engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?1, ?2, ...` (SQLite)
    QuestionNumbered,
    /// `?, ?, ...` (MySQL, ODBC)
    Question,
    /// `$1, $2, ...` (PostgreSQL)
    Dollar,
    /// `:1, :2, ...` (Oracle)
    Colon,
}

impl Placeholder {
    /// Writes the placeholder for the 1-based parameter `index`.
    fn write(self, out: &mut String, index: usize) {
        // Writing to a String cannot fail.
        let _ = match self {
            Placeholder::QuestionNumbered => write!(out, "?{}", index),
            Placeholder::Question => write!(out, "?"),
            Placeholder::Dollar => write!(out, "${}", index),
            Placeholder::Colon => write!(out, ":{}", index),
        };
    }
}

/// Where the identifiers live and what to return.
///
/// The engine schema is not discoverable from an identifier set, so the
/// source relation, identifier column and projection are explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryShape {
    /// FROM clause: a table name or a join expression (trusted text)
    pub source: String,
    /// Column constrained to the identifier set
    pub identifier_column: String,
    /// Columns to return; empty selects `*`
    pub projection: Vec<String>,
}

impl QueryShape {
    /// Creates a shape selecting every column of `source`.
    pub fn new<S: Into<String>, C: Into<String>>(source: S, identifier_column: C) -> Self {
        Self {
            source: source.into(),
            identifier_column: identifier_column.into(),
            projection: Vec::new(),
        }
    }

    /// Sets the projected columns
    pub fn with_projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the shape.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the source is blank or not
    /// self-contained, or if any column is not a plain (optionally
    /// qualified) identifier.
    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(Error::InvalidConfig("source cannot be empty".to_string()));
        }
        check_fragment(&self.source)
            .map_err(|issue| Error::InvalidConfig(format!("source rejected: {}", issue)))?;

        validate_column_name(&self.identifier_column)?;
        for column in &self.projection {
            validate_column_name(column)?;
        }
        Ok(())
    }
}

/// Validates a dotted SQL identifier such as `QUATTRO_CR.MOLECULE.MOL_REGID`.
///
/// # Errors
///
/// Returns `Error::InvalidConfig` if validation fails
pub fn validate_column_name(name: &str) -> Result<()> {
    const MAX_COLUMN_NAME_LENGTH: usize = 256;

    if name.is_empty() {
        return Err(Error::InvalidConfig(
            "column name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_COLUMN_NAME_LENGTH {
        return Err(Error::InvalidConfig(format!(
            "column name length {} exceeds maximum {}",
            name.len(),
            MAX_COLUMN_NAME_LENGTH
        )));
    }

    for segment in name.split('.') {
        let mut chars = segment.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#'));
        if !valid_start || !valid_rest {
            return Err(Error::InvalidConfig(format!(
                "invalid column name '{}'",
                name
            )));
        }
    }

    Ok(())
}

/// A statement with a variable-length identifier list.
#[derive(Debug, Clone)]
pub struct StatementTemplate {
    head: String,
    tail: String,
    placeholder: Placeholder,
}

impl StatementTemplate {
    /// Builds a template from a validated shape and filter.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the shape does not validate.
    pub fn new(
        shape: &QueryShape,
        filter: &FilterExpression,
        placeholder: Placeholder,
    ) -> Result<Self> {
        shape.validate()?;

        let projection = if shape.projection.is_empty() {
            "*".to_string()
        } else {
            shape.projection.join(", ")
        };

        let head = format!(
            "SELECT {} FROM {} WHERE {} IN (",
            projection,
            shape.source.trim(),
            shape.identifier_column
        );
        let tail = match filter.as_str() {
            Some(predicate) => format!(") AND ({})", predicate),
            None => ")".to_string(),
        };

        Ok(Self {
            head,
            tail,
            placeholder,
        })
    }

    /// Renders the statement for `count` bound identifiers.
    ///
    /// `count` must be at least 1; an empty `IN ()` list is not valid SQL.
    pub fn render(&self, count: usize) -> String {
        debug_assert!(count > 0, "statement needs at least one identifier");
        let mut sql = String::with_capacity(self.head.len() + self.tail.len() + count * 5);
        sql.push_str(&self.head);
        for index in 1..=count {
            if index > 1 {
                sql.push_str(", ");
            }
            self.placeholder.write(&mut sql, index);
        }
        sql.push_str(&self.tail);
        sql
    }
}
