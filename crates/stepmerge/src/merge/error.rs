//! Errors raised by the merge iterator.

use super::config::ConfigError;

/// Errors from constructing or driving a [`SeriesMerge`](super::SeriesMerge).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// At least one series is required.
    #[error("no series to merge")]
    NoSeries,

    /// The x or y column does not exist in a non-empty series.
    #[error("column {dim} out of bounds for series {series} with {n_cols} columns")]
    DimensionOutOfBounds {
        /// Index of the offending series.
        series: usize,
        /// Requested column.
        dim: usize,
        /// Columns the series has.
        n_cols: usize,
    },

    /// Invalid merge configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `next_section` was called with no cross-section left.
    #[error("no further cross-section; check has_next() first")]
    Exhausted,

    /// Cross-sections are synthesized and cannot be removed.
    #[error("remove is not supported by a series merge")]
    RemoveUnsupported,
}
