//! The k-way merge loop, generic over the x and y value types.
//!
//! [`Merger<X, Y>`] is monomorphized per specialization, so the inner scan
//! compares native `i64` or `f64` values without any per-cell dispatch on
//! the numeric kind.

use std::fmt::Debug;

use super::config::MergeConfig;
use crate::data::Matrix;
use crate::number::{is_exact_i64, Number};

// =============================================================================
// Coord
// =============================================================================

/// Value type of an x or y column inside a specialization.
pub(crate) trait Coord: Copy + PartialOrd + Debug {
    /// Whether this is an exact integer type.
    const INTEGER: bool;

    /// Read a cell, promoting it to `Self` through the matching accessor.
    fn read(matrix: &dyn Matrix, row: usize, col: usize) -> Self;

    /// Whether `self` and `other` are different sample values.
    fn is_distinct(self, other: Self) -> bool;

    /// Whether the value is an exact integer.
    fn is_integral(self) -> bool;

    /// Whether the value is absent (NaN) and has no place in the x order.
    fn is_missing(self) -> bool;

    fn to_number(self) -> Number;
}

impl Coord for i64 {
    const INTEGER: bool = true;

    #[inline]
    fn read(matrix: &dyn Matrix, row: usize, col: usize) -> Self {
        matrix.get_i64(row, col)
    }

    #[inline]
    fn is_distinct(self, other: Self) -> bool {
        self != other
    }

    #[inline]
    fn is_integral(self) -> bool {
        true
    }

    #[inline]
    fn is_missing(self) -> bool {
        false
    }

    #[inline]
    fn to_number(self) -> Number {
        Number::Int(self)
    }
}

impl Coord for f64 {
    const INTEGER: bool = false;

    #[inline]
    fn read(matrix: &dyn Matrix, row: usize, col: usize) -> Self {
        matrix.get_f64(row, col)
    }

    // Two NaNs are the same (missing) sample.
    #[inline]
    fn is_distinct(self, other: Self) -> bool {
        self != other && !(self.is_nan() && other.is_nan())
    }

    #[inline]
    fn is_integral(self) -> bool {
        is_exact_i64(self)
    }

    #[inline]
    fn is_missing(self) -> bool {
        self.is_nan()
    }

    #[inline]
    fn to_number(self) -> Number {
        Number::Real(self)
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Per-series merge state.
///
/// Rows whose x is missing (NaN) are invisible to the merge: they are never
/// breakpoints, never contribute, and flat-run detection compares across
/// them.
#[derive(Debug, Clone)]
struct Cursor<'a> {
    matrix: &'a dyn Matrix,
    /// One past the last row with a present x.
    len: usize,
    /// Rows with x at or before the current representative x, or missing.
    pos: usize,
    /// Last row with a present x at or before the representative x.
    last: Option<usize>,
    /// Rows before this index can never become the next breakpoint.
    scan: usize,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    fn new<X: Coord>(matrix: &'a dyn Matrix, x_dim: usize) -> Self {
        let mut len = matrix.m();
        while len > 0 && X::read(matrix, len - 1, x_dim).is_missing() {
            len -= 1;
        }
        Self {
            matrix,
            len,
            pos: 0,
            last: None,
            scan: 0,
            exhausted: false,
        }
    }

    /// First present x of the series.
    fn first_x<X: Coord>(&self, x_dim: usize) -> Option<X> {
        (0..self.len)
            .map(|row| X::read(self.matrix, row, x_dim))
            .find(|x| !x.is_missing())
    }

    /// First x after `old` that starts a new step in this series.
    fn next_breakpoint<X: Coord, Y: Coord>(&mut self, config: &MergeConfig, old: X) -> Option<X> {
        if self.exhausted {
            return None;
        }
        let mut row = self.scan.max(self.pos);
        while row < self.len {
            let x = X::read(self.matrix, row, config.x_dim);
            if x > old && self.starts_step::<X, Y>(row, config) {
                self.scan = row;
                return Some(x);
            }
            row += 1;
        }
        self.scan = self.len;
        None
    }

    #[inline]
    fn starts_step<X: Coord, Y: Coord>(&self, row: usize, config: &MergeConfig) -> bool {
        if config.early_end && row + 1 == self.len {
            return true;
        }
        match self.previous_row::<X>(row, config.x_dim) {
            None => true,
            Some(prev) => Y::read(self.matrix, row, config.y_dim)
                .is_distinct(Y::read(self.matrix, prev, config.y_dim)),
        }
    }

    /// Closest row before `row` with a present x.
    #[inline]
    fn previous_row<X: Coord>(&self, row: usize, x_dim: usize) -> Option<usize> {
        (0..row)
            .rev()
            .find(|&r| !X::read(self.matrix, r, x_dim).is_missing())
    }

    /// Step past every row at or before `x`. Returns the row holding the
    /// value at `x`, if the series has started.
    fn seek<X: Coord>(&mut self, x: X, x_dim: usize) -> Option<usize> {
        while self.pos < self.len {
            let row_x = X::read(self.matrix, self.pos, x_dim);
            if !row_x.is_missing() {
                if row_x > x {
                    break;
                }
                self.last = Some(self.pos);
            }
            self.pos += 1;
        }
        self.last
    }
}

// =============================================================================
// Merger
// =============================================================================

/// Merge state for one (x type, y type) specialization.
#[derive(Debug, Clone)]
pub(crate) struct Merger<'a, X, Y> {
    config: MergeConfig,
    cursors: Vec<Cursor<'a>>,
    x: Option<X>,
    values: Vec<Y>,
    sources: Vec<usize>,
}

impl<'a, X: Coord, Y: Coord> Merger<'a, X, Y> {
    pub(crate) fn new(config: MergeConfig, series: &[&'a dyn Matrix]) -> Self {
        Self {
            config,
            cursors: series
                .iter()
                .map(|&m| Cursor::new::<X>(m, config.x_dim))
                .collect(),
            x: None,
            values: Vec::with_capacity(series.len()),
            sources: Vec::with_capacity(series.len()),
        }
    }

    /// Move to the next cross-section. Returns `false` once there is none;
    /// the previous cross-section is left untouched in that case.
    pub(crate) fn advance(&mut self) -> bool {
        loop {
            let next = match self.x {
                None => self.first_x(),
                Some(old) => self.next_x(old),
            };
            let Some(x) = next else {
                return false;
            };
            self.materialize(x);
            // Only unsorted input can leave a breakpoint without contributors.
            if !self.values.is_empty() {
                return true;
            }
        }
    }

    /// Smallest first present x over all series.
    fn first_x(&self) -> Option<X> {
        let x_dim = self.config.x_dim;
        self.cursors
            .iter()
            .filter_map(|c| c.first_x::<X>(x_dim))
            .fold(None, |best, x| match best {
                Some(b) if b <= x => Some(b),
                _ => Some(x),
            })
    }

    /// Smallest breakpoint strictly after `old` over all series.
    fn next_x(&mut self, old: X) -> Option<X> {
        let config = self.config;
        let mut best: Option<X> = None;
        for cursor in &mut self.cursors {
            if let Some(x) = cursor.next_breakpoint::<X, Y>(&config, old) {
                if best.map_or(true, |b| x < b) {
                    best = Some(x);
                }
            }
        }
        best
    }

    /// Collect the y at or before `x` from every live series.
    fn materialize(&mut self, x: X) {
        let MergeConfig {
            x_dim,
            y_dim,
            early_end,
        } = self.config;
        self.values.clear();
        self.sources.clear();

        for (index, cursor) in self.cursors.iter_mut().enumerate() {
            if cursor.exhausted {
                continue;
            }
            let Some(row) = cursor.seek(x, x_dim) else {
                continue;
            };
            self.values.push(Y::read(cursor.matrix, row, y_dim));
            self.sources.push(index);
            if early_end && cursor.pos == cursor.len {
                cursor.exhausted = true;
            }
        }
        self.x = Some(x);
    }

    #[inline]
    pub(crate) fn x(&self) -> Option<X> {
        self.x
    }

    #[inline]
    pub(crate) fn values(&self) -> &[Y] {
        &self.values
    }

    #[inline]
    pub(crate) fn sources(&self) -> &[usize] {
        &self.sources
    }

    #[inline]
    pub(crate) fn n_series(&self) -> usize {
        self.cursors.len()
    }

    /// Integer-typed specialization and every contributing value integral.
    #[inline]
    pub(crate) fn is_integer(&self) -> bool {
        Y::INTEGER && self.values.iter().all(|v| v.is_integral())
    }
}
