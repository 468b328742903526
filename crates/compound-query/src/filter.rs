//! Filter expression checks
//!
//! Caller-supplied predicate text is trusted query logic: it is not
//! sanitised and may reference any column of the source relation. The scan
//! here only guarantees the text stays inside the `AND (...)` slot it is
//! placed in.

use compound_core::{Error, Result};
use std::fmt;

/// Upper bound on filter text length (64 KiB)
pub const MAX_FILTER_LENGTH: usize = 64 * 1024;

/// Structural problems found in a query fragment
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentIssue {
    /// `;` outside a quoted section
    StatementSeparator { position: usize },
    /// `--` or `/*` outside a quoted section
    Comment { position: usize },
    /// `)` with no matching `(`
    UnmatchedClose { position: usize },
    /// Input ended with open parentheses
    UnclosedParen { depth: usize },
    /// Input ended inside a string literal or quoted identifier
    UnterminatedQuote { position: usize },
}

impl fmt::Display for FragmentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentIssue::StatementSeparator { position } => {
                write!(f, "statement separator ';' at position {}", position)
            }
            FragmentIssue::Comment { position } => {
                write!(f, "comment marker at position {}", position)
            }
            FragmentIssue::UnmatchedClose { position } => {
                write!(f, "unmatched ')' at position {}", position)
            }
            FragmentIssue::UnclosedParen { depth } => {
                write!(f, "{} unclosed '(' at end of input", depth)
            }
            FragmentIssue::UnterminatedQuote { position } => {
                write!(f, "quote opened at position {} is never closed", position)
            }
        }
    }
}

/// Scanner over a query fragment, tracking quoting and nesting.
struct FragmentScanner {
    input: Vec<char>,
    position: usize,
    depth: usize,
}

impl FragmentScanner {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            depth: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Skips a quoted section closed by `close`. A doubled `close` is an
    /// escape, except for `[...]` identifiers which have none.
    fn skip_quoted(&mut self, close: char) -> std::result::Result<(), FragmentIssue> {
        let start = self.position;
        self.position += 1;
        while let Some(ch) = self.current() {
            if ch == close {
                if close != ']' && self.peek() == Some(close) {
                    self.position += 2;
                    continue;
                }
                self.position += 1;
                return Ok(());
            }
            self.position += 1;
        }
        Err(FragmentIssue::UnterminatedQuote { position: start })
    }

    fn scan(mut self) -> std::result::Result<(), FragmentIssue> {
        while let Some(ch) = self.current() {
            match ch {
                '\'' | '"' | '`' => {
                    self.skip_quoted(ch)?;
                    continue;
                }
                '[' => {
                    self.skip_quoted(']')?;
                    continue;
                }
                ';' => {
                    return Err(FragmentIssue::StatementSeparator {
                        position: self.position,
                    })
                }
                '-' if self.peek() == Some('-') => {
                    return Err(FragmentIssue::Comment {
                        position: self.position,
                    })
                }
                '/' if self.peek() == Some('*') => {
                    return Err(FragmentIssue::Comment {
                        position: self.position,
                    })
                }
                '(' => self.depth += 1,
                ')' => {
                    if self.depth == 0 {
                        return Err(FragmentIssue::UnmatchedClose {
                            position: self.position,
                        });
                    }
                    self.depth -= 1;
                }
                _ => {}
            }
            self.position += 1;
        }

        if self.depth > 0 {
            return Err(FragmentIssue::UnclosedParen { depth: self.depth });
        }
        Ok(())
    }
}

/// Checks that a fragment can be embedded inside parentheses without
/// escaping them or terminating the statement.
pub fn check_fragment(text: &str) -> std::result::Result<(), FragmentIssue> {
    FragmentScanner::new(text).scan()
}

/// A structurally checked filter predicate.
///
/// Blank text means "no additional predicate".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterExpression {
    text: Option<String>,
}

impl FilterExpression {
    /// Checks and wraps caller-supplied filter text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Query` if the text is oversized or would break out of
    /// its parenthesised slot.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::none());
        }

        if trimmed.len() > MAX_FILTER_LENGTH {
            return Err(Error::Query(format!(
                "filter length {} exceeds maximum {}",
                trimmed.len(),
                MAX_FILTER_LENGTH
            )));
        }

        check_fragment(trimmed)
            .map_err(|issue| Error::Query(format!("filter rejected: {}", issue)))?;

        Ok(Self {
            text: Some(trimmed.to_string()),
        })
    }

    /// A filter that adds no predicate
    pub fn none() -> Self {
        Self { text: None }
    }

    /// The predicate text, if any
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns true if no predicate is attached
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}
