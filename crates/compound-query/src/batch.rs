//! Identifier batching.
//!
//! Engines cap the number of bind parameters per statement. An identifier
//! set is split into consecutive chunks of at most `max_batch_size`
//! elements; chunk order follows input order and no identifier is dropped,
//! repeated or split.

use std::slice::Chunks;

/// Number of statements needed for `len` identifiers.
///
/// Returns 0 for an empty set. `max_batch_size` must be non-zero.
pub fn batch_count(len: usize, max_batch_size: usize) -> usize {
    debug_assert!(max_batch_size > 0);
    len.div_ceil(max_batch_size)
}

/// One chunk of identifiers bound into a single statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a, T> {
    /// Zero-based batch number
    pub index: usize,
    /// Total number of batches in this search
    pub total: usize,
    /// Identifiers bound by this batch, in input order
    pub identifiers: &'a [T],
}

/// Iterator over the batches of an identifier set.
pub struct Batches<'a, T> {
    chunks: Chunks<'a, T>,
    index: usize,
    total: usize,
}

impl<'a, T> Batches<'a, T> {
    /// Splits `identifiers` into chunks of at most `max_batch_size`.
    ///
    /// # Panics
    ///
    /// Panics if `max_batch_size` is zero. Batch sizes are validated when
    /// the search service is constructed.
    pub fn new(identifiers: &'a [T], max_batch_size: usize) -> Self {
        assert!(max_batch_size > 0, "max_batch_size must be non-zero");
        Self {
            chunks: identifiers.chunks(max_batch_size),
            index: 0,
            total: batch_count(identifiers.len(), max_batch_size),
        }
    }

    /// Total number of batches
    pub fn total(&self) -> usize {
        self.total
    }
}

impl<'a, T> Iterator for Batches<'a, T> {
    type Item = Batch<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let identifiers = self.chunks.next()?;
        let batch = Batch {
            index: self.index,
            total: self.total,
            identifiers,
        };
        self.index += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T> ExactSizeIterator for Batches<'_, T> {}
