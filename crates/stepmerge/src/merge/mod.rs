//! Lazy k-way merge of step-function series.
//!
//! Each input series is a [`Matrix`] whose `x_dim` column holds ascending
//! ordinal values and whose `y_dim` column holds the sampled value. A
//! [`SeriesMerge`] walks all series at once and stops at every x where some
//! series changes value, reporting the y each series holds there
//! ("last value at or before x").
//!
//! # Example
//!
//! ```
//! use stepmerge::data::DenseMatrix;
//! use stepmerge::merge::iterate;
//! use stepmerge::{Matrix, Number};
//!
//! let a = DenseMatrix::<i64>::from_rows(&[[0, 1], [2, 3], [4, 3]]);
//! let b = DenseMatrix::<i64>::from_rows(&[[1, 5], [3, 5]]);
//!
//! let sections: Vec<_> = iterate(0, 1, &[&a, &b]).unwrap().collect();
//! let xs: Vec<Number> = sections.iter().map(|s| s.x()).collect();
//! assert_eq!(xs, vec![Number::Int(0), Number::Int(1), Number::Int(2)]);
//! assert_eq!(sections[1].values(), &[Number::Int(1), Number::Int(5)]);
//! assert!(sections[2].is_integer());
//! ```
//!
//! # Specializations
//!
//! The x and y columns are classified once at construction through the
//! matrix contract (`select_columns(&[dim]).is_integer()`). Integer columns
//! are compared as `i64`, everything else as `f64`; see [`Specialization`].

mod config;
mod error;
mod kernel;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::data::{fmt_matrix, matrix_eq, matrix_hash, Matrix, View};
use crate::number::Number;

pub use config::{ConfigError, MergeConfig, MergeConfigBuilder};
pub use error::MergeError;

use kernel::{Coord, Merger};

// =============================================================================
// Specialization
// =============================================================================

/// Numeric types the merge loop runs on, chosen once per merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Specialization {
    /// Integer x, integer y.
    IntegerInteger,
    /// Integer x, real y.
    IntegerReal,
    /// Real x, real y. Also used for real x with integer y.
    RealReal,
}

impl Specialization {
    /// Specialization for the given column kinds.
    pub fn select(x_integer: bool, y_integer: bool) -> Self {
        match (x_integer, y_integer) {
            (true, true) => Self::IntegerInteger,
            (true, false) => Self::IntegerReal,
            (false, _) => Self::RealReal,
        }
    }

    /// Classify the x and y columns of every non-empty series.
    ///
    /// A column is integer only if it is integer in every series. Series
    /// without rows never contribute and are not probed.
    pub fn for_series(config: &MergeConfig, series: &[&dyn Matrix]) -> Self {
        let column_is_integer = |dim: usize| {
            series
                .iter()
                .filter(|s| s.m() > 0)
                .all(|s| View::new(*s).select_columns(&[dim]).is_integer())
        };
        Self::select(column_is_integer(config.x_dim), column_is_integer(config.y_dim))
    }

    #[inline]
    pub fn x_is_integer(self) -> bool {
        matches!(self, Self::IntegerInteger | Self::IntegerReal)
    }

    #[inline]
    pub fn y_is_integer(self) -> bool {
        matches!(self, Self::IntegerInteger)
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Merge `series` on columns `x_dim` / `y_dim`, with series extending past
/// their last sample.
///
/// # Errors
///
/// - [`MergeError::NoSeries`] if `series` is empty.
/// - [`MergeError::Config`] if `x_dim == y_dim`.
/// - [`MergeError::DimensionOutOfBounds`] if a non-empty series lacks
///   either column.
pub fn iterate<'a>(
    x_dim: usize,
    y_dim: usize,
    series: &[&'a dyn Matrix],
) -> Result<SeriesMerge<'a>, MergeError> {
    let config = MergeConfig::builder().x_dim(x_dim).y_dim(y_dim).build()?;
    iterate_with(&config, series)
}

/// Merge `series` with an explicit configuration.
///
/// # Errors
///
/// Same as [`iterate`].
pub fn iterate_with<'a>(
    config: &MergeConfig,
    series: &[&'a dyn Matrix],
) -> Result<SeriesMerge<'a>, MergeError> {
    config.validate()?;
    if series.is_empty() {
        return Err(MergeError::NoSeries);
    }
    for (index, s) in series.iter().enumerate() {
        if s.m() == 0 {
            continue;
        }
        for dim in [config.x_dim, config.y_dim] {
            if dim >= s.n() {
                return Err(MergeError::DimensionOutOfBounds {
                    series: index,
                    dim,
                    n_cols: s.n(),
                });
            }
        }
    }

    let specialization = Specialization::for_series(config, series);
    debug!(
        ?specialization,
        n_series = series.len(),
        early_end = config.early_end,
        "series merge created"
    );

    let kernel = match specialization {
        Specialization::IntegerInteger => Kernel::IntegerInteger(Merger::new(*config, series)),
        Specialization::IntegerReal => Kernel::IntegerReal(Merger::new(*config, series)),
        Specialization::RealReal => Kernel::RealReal(Merger::new(*config, series)),
    };

    Ok(SeriesMerge {
        kernel,
        specialization,
        positioned: false,
        finished: false,
        produced: 0,
    })
}

// =============================================================================
// SeriesMerge
// =============================================================================

#[derive(Debug, Clone)]
enum Kernel<'a> {
    IntegerInteger(Merger<'a, i64, i64>),
    IntegerReal(Merger<'a, i64, f64>),
    RealReal(Merger<'a, f64, f64>),
}

macro_rules! dispatch {
    ($kernel:expr, $merger:ident => $body:expr) => {
        match $kernel {
            Kernel::IntegerInteger($merger) => $body,
            Kernel::IntegerReal($merger) => $body,
            Kernel::RealReal($merger) => $body,
        }
    };
}

/// Forward-only merge of several series into cross-sections.
///
/// Two ways to consume it:
///
/// - As an [`Iterator`] of owned [`CrossSection`]s.
/// - Cursor style: [`has_next`](Self::has_next) /
///   [`next_section`](Self::next_section), reading the current
///   cross-section through the [`Matrix`] contract (one row, one column
///   per contributing series) plus [`x`](Self::x) and
///   [`sources`](Self::sources).
///
/// `has_next` positions the merge on the upcoming cross-section, so the
/// matrix contract shows that cross-section from then on. Copy it with
/// [`snapshot`](Self::snapshot) or [`Matrix::copy`] to keep it.
#[derive(Debug, Clone)]
pub struct SeriesMerge<'a> {
    kernel: Kernel<'a>,
    specialization: Specialization,
    positioned: bool,
    finished: bool,
    produced: usize,
}

impl<'a> SeriesMerge<'a> {
    /// Whether another cross-section exists. Idempotent.
    pub fn has_next(&mut self) -> bool {
        if self.positioned || self.finished {
            return self.positioned;
        }
        if dispatch!(&mut self.kernel, m => m.advance()) {
            self.positioned = true;
            self.produced += 1;
            trace!(x = %self.x_or_nan(), contributors = self.n(), "cross-section");
        } else {
            self.finished = true;
            debug!(produced = self.produced, "series merge finished");
        }
        self.positioned
    }

    /// Consume the upcoming cross-section and return the merge positioned
    /// on it.
    ///
    /// # Errors
    ///
    /// [`MergeError::Exhausted`] if there is none.
    pub fn next_section(&mut self) -> Result<&Self, MergeError> {
        if !self.has_next() {
            return Err(MergeError::Exhausted);
        }
        self.positioned = false;
        Ok(self)
    }

    /// Cross-sections cannot be removed.
    ///
    /// # Errors
    ///
    /// Always [`MergeError::RemoveUnsupported`].
    pub fn remove(&mut self) -> Result<(), MergeError> {
        Err(MergeError::RemoveUnsupported)
    }

    /// Representative x of the current cross-section, `None` before the
    /// first one.
    pub fn x(&self) -> Option<Number> {
        dispatch!(&self.kernel, m => m.x().map(Coord::to_number))
    }

    /// Indices (into the input slice) of the series contributing to the
    /// current cross-section, in input order.
    pub fn sources(&self) -> &[usize] {
        dispatch!(&self.kernel, m => m.sources())
    }

    /// Value of the `j`-th contributor.
    pub fn value(&self, j: usize) -> Number {
        dispatch!(&self.kernel, m => m.values()[j].to_number())
    }

    #[inline]
    pub fn specialization(&self) -> Specialization {
        self.specialization
    }

    /// Number of input series.
    pub fn n_series(&self) -> usize {
        dispatch!(&self.kernel, m => m.n_series())
    }

    /// Cross-sections positioned so far.
    #[inline]
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Owned copy of the current cross-section.
    ///
    /// # Panics
    ///
    /// Panics before the first cross-section.
    pub fn snapshot(&self) -> CrossSection {
        let x = self
            .x()
            .expect("no cross-section to snapshot; call has_next() first");
        CrossSection {
            x,
            sources: self.sources().to_vec(),
            values: (0..self.n()).map(|j| self.value(j)).collect(),
            integer: self.is_integer(),
        }
    }

    fn x_or_nan(&self) -> Number {
        self.x().unwrap_or(Number::Real(f64::NAN))
    }
}

#[inline]
fn check_row(row: usize) {
    assert!(row == 0, "Row index {} out of bounds for length 1", row);
}

impl Matrix for SeriesMerge<'_> {
    #[inline]
    fn m(&self) -> usize {
        1
    }

    #[inline]
    fn n(&self) -> usize {
        self.sources().len()
    }

    fn get_f64(&self, row: usize, col: usize) -> f64 {
        check_row(row);
        self.value(col).as_f64()
    }

    fn get_i64(&self, row: usize, col: usize) -> i64 {
        check_row(row);
        self.value(col).as_i64()
    }

    fn is_integer(&self) -> bool {
        dispatch!(&self.kernel, m => m.is_integer())
    }
}

impl Iterator for SeriesMerge<'_> {
    type Item = CrossSection;

    fn next(&mut self) -> Option<CrossSection> {
        if !self.has_next() {
            return None;
        }
        self.positioned = false;
        Some(self.snapshot())
    }
}

impl FusedIterator for SeriesMerge<'_> {}

// =============================================================================
// CrossSection
// =============================================================================

/// Owned copy of one cross-section: a `1 x n` matrix of contributor values.
#[derive(Debug, Clone)]
pub struct CrossSection {
    x: Number,
    sources: Vec<usize>,
    values: Vec<Number>,
    integer: bool,
}

impl CrossSection {
    /// Representative x.
    #[inline]
    pub fn x(&self) -> Number {
        self.x
    }

    /// Contributing series indices, in input order.
    #[inline]
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    /// Contributor values, aligned with [`sources`](Self::sources).
    #[inline]
    pub fn values(&self) -> &[Number] {
        &self.values
    }

    /// `(source, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Number)> + '_ {
        self.sources.iter().copied().zip(self.values.iter().copied())
    }

    /// Value of series `source`, if it contributes.
    pub fn value_of(&self, source: usize) -> Option<Number> {
        self.sources
            .iter()
            .position(|&s| s == source)
            .map(|j| self.values[j])
    }
}

impl Matrix for CrossSection {
    #[inline]
    fn m(&self) -> usize {
        1
    }

    #[inline]
    fn n(&self) -> usize {
        self.values.len()
    }

    fn get_f64(&self, row: usize, col: usize) -> f64 {
        check_row(row);
        self.values[col].as_f64()
    }

    fn get_i64(&self, row: usize, col: usize) -> i64 {
        check_row(row);
        self.values[col].as_i64()
    }

    #[inline]
    fn is_integer(&self) -> bool {
        self.integer
    }
}

impl PartialEq for CrossSection {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.sources == other.sources && matrix_eq(self, other)
    }
}

impl Eq for CrossSection {}

impl Hash for CrossSection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.sources.hash(state);
        matrix_hash(self, state);
    }
}

impl fmt::Display for CrossSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={} ", self.x)?;
        fmt_matrix(self, f)
    }
}
