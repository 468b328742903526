//! Compound search service.

use crate::config::SearchConfig;
use crate::connector::{Connector, Session};
use compound_core::{Error, Record, Result};
use compound_query::{Batches, FilterExpression, StatementTemplate};
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// Looks up records for a set of identifiers.
///
/// Each call to [`search`](Self::search) opens its own session and shares
/// nothing mutable with other calls, so one service can be used from many
/// threads at once when its connector is `Sync`.
///
/// # Examples
///
/// ```rust,no_run
/// use compound_search::{CompoundSearch, Credentials, QueryShape, SearchConfig, SqliteConnector};
///
/// let config = SearchConfig::new(
///     Credentials::from_env()?,
///     QueryShape::new("MOLECULE", "MOL_REGID").with_projection(["MOL_REGID", "MOL_CTFILE"]),
/// );
/// let search = CompoundSearch::new(&config, SqliteConnector::new())?;
/// let records = search.search(&["CPD-000123", "CPD-000456"], "MOL_WEIGHT < 500")?;
/// for record in &records {
///     println!("{:?}", record.get_str("MOL_REGID"));
/// }
/// # Ok::<(), compound_search::Error>(())
/// ```
pub struct CompoundSearch<'cfg, C: Connector> {
    config: &'cfg SearchConfig,
    connector: C,
}

impl<'cfg, C: Connector> CompoundSearch<'cfg, C> {
    /// Creates a service over `connector`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the query shape is invalid or the
    /// batch size does not fit the engine's bind ceiling.
    pub fn new(config: &'cfg SearchConfig, connector: C) -> Result<Self> {
        config.validate(connector.max_bind_parameters())?;
        Ok(Self { config, connector })
    }

    /// The configuration this service was built with
    pub fn config(&self) -> &SearchConfig {
        self.config
    }

    /// Returns every row whose identifier column is in `identifiers` and
    /// that satisfies `filter`.
    ///
    /// Identifiers are bound as parameters, `max_batch_size` at a time.
    /// Results are concatenated batch by batch, each batch in the order
    /// the engine returned it. A blank filter adds no predicate.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyInput` if `identifiers` is empty (nothing is opened)
    /// - `Error::Query` if the filter fails the structural check or the
    ///   engine rejects a statement
    /// - `Error::Connection` if the session cannot be opened
    ///
    /// No records are returned when any batch fails.
    pub fn search<S: AsRef<str>>(&self, identifiers: &[S], filter: &str) -> Result<Vec<Record>> {
        if identifiers.is_empty() {
            return Err(Error::EmptyInput);
        }

        let span = info_span!("search", identifiers = identifiers.len());
        let _enter = span.enter();
        let started = Instant::now();

        let result = self.run(identifiers, filter);
        match &result {
            Ok(records) => info!(
                rows = records.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "search finished"
            ),
            Err(err) => warn!(error = %err, "search failed"),
        }
        result
    }

    fn run<S: AsRef<str>>(&self, identifiers: &[S], filter: &str) -> Result<Vec<Record>> {
        let filter = FilterExpression::parse(filter)?;
        let template =
            StatementTemplate::new(&self.config.shape, &filter, self.connector.placeholder())?;
        let batches = Batches::new(identifiers, self.config.max_batch_size);

        let mut session = self.connector.connect(&self.config.credentials)?;
        let mut records = Vec::new();
        let mut params: Vec<&str> = Vec::with_capacity(self.config.max_batch_size);
        for batch in batches {
            params.clear();
            params.extend(batch.identifiers.iter().map(<S as AsRef<str>>::as_ref));

            let sql = template.render(params.len());
            let rows = session.fetch(&sql, &params)?;
            debug!(
                batch = batch.index + 1,
                of = batch.total,
                bound = params.len(),
                rows = rows.len(),
                "batch fetched"
            );
            records.extend(rows);
        }
        Ok(records)
    }
}
