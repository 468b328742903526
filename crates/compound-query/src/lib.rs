//! # Compound Search Query Assembly
//!
//! Builds the bounded, parameterized statements issued by the search
//! service:
//!
//! - **Filter check**: a structural scan of caller-supplied predicate text
//! - **Statement templates**: `SELECT ... WHERE <id> IN (<params>) AND (<filter>)`
//! - **Batching**: splitting an identifier set into bind-safe chunks
//!
//! ```text
//! identifiers ──► Batches ──► StatementTemplate::render(n) ──► engine
//!                                  ▲
//! filter text ──► FilterExpression ┘
//! ```
//!
//! Identifiers are never written into statement text; only placeholders are.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
#[allow(missing_docs)]
pub mod filter;
pub mod template;

pub use batch::{batch_count, Batch, Batches};
pub use filter::{check_fragment, FilterExpression, FragmentIssue};
pub use template::{Placeholder, QueryShape, StatementTemplate};
