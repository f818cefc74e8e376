//! Core traits for matrix access.

use std::iter::FusedIterator;

use super::compact::CompactMatrix;
use super::views::View;
use crate::number::Number;

// ============================================================================
// Matrix Trait
// ============================================================================

/// Fixed-shape two-dimensional numeric container.
///
/// Exactly one accessor is authoritative for the whole matrix: when
/// [`is_integer`](Self::is_integer) is `true`, [`get_i64`](Self::get_i64)
/// returns the exact stored values; otherwise [`get_f64`](Self::get_f64)
/// does. Both accessors are always available, but only the authoritative one
/// is lossless. [`get`](Self::get) picks it for you.
///
/// # Views
///
/// [`select_rows`](Self::select_rows), [`select_columns`](Self::select_columns)
/// and [`transpose`](Self::transpose) return a borrowed [`View`] that owns no
/// cell storage. Views of views collapse into a single [`View`] over the
/// original owner.
///
/// # Trait objects
///
/// The view-producing methods require `Self: Sized`. On `dyn Matrix` the
/// same methods are provided as inherent methods, so `&dyn Matrix` supports
/// the full contract.
///
/// # Panics
///
/// Cell accessors panic when `row >= m()` or `col >= n()`.
pub trait Matrix {
    /// Number of rows.
    fn m(&self) -> usize;

    /// Number of columns.
    fn n(&self) -> usize;

    /// Cell value as `f64`.
    fn get_f64(&self, row: usize, col: usize) -> f64;

    /// Cell value as `i64`.
    fn get_i64(&self, row: usize, col: usize) -> i64;

    /// Whether [`get_i64`](Self::get_i64) is the authoritative accessor.
    fn is_integer(&self) -> bool;

    /// Cell value through the authoritative accessor.
    #[inline]
    fn get(&self, row: usize, col: usize) -> Number {
        if self.is_integer() {
            Number::Int(self.get_i64(row, col))
        } else {
            Number::Real(self.get_f64(row, col))
        }
    }

    /// Whether the matrix has no cells.
    #[inline]
    fn is_empty(&self) -> bool {
        self.m() == 0 || self.n() == 0
    }

    /// The view this matrix already is, if any.
    ///
    /// Only [`View`] returns `Some`. [`View::new`] uses this to compose a
    /// view of a view at the field level instead of wrapping it again.
    #[inline]
    fn as_view(&self) -> Option<View<'_>> {
        None
    }

    /// Pass-through view of the whole matrix.
    fn view(&self) -> View<'_>
    where
        Self: Sized,
    {
        View::new(self)
    }

    /// Rows `rows[0], rows[1], ...` of this matrix, in that order.
    ///
    /// Repeats are allowed. The identity selection `0..m()` returns a
    /// pass-through view.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= m()`.
    fn select_rows(&self, rows: &[usize]) -> View<'_>
    where
        Self: Sized,
    {
        View::new(self).select_rows(rows)
    }

    /// Columns `cols[0], cols[1], ...` of this matrix, in that order.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= n()`.
    fn select_columns(&self, cols: &[usize]) -> View<'_>
    where
        Self: Sized,
    {
        View::new(self).select_columns(cols)
    }

    /// Transposed view.
    fn transpose(&self) -> View<'_>
    where
        Self: Sized,
    {
        View::new(self).transpose()
    }

    /// Row `i` as a `1 x n` view.
    fn row(&self, i: usize) -> View<'_>
    where
        Self: Sized,
    {
        View::new(self).row(i)
    }

    /// Column `j` as an `m x 1` view.
    fn column(&self, j: usize) -> View<'_>
    where
        Self: Sized,
    {
        View::new(self).column(j)
    }

    /// Iterate over the rows as `1 x n` views.
    fn rows(&self) -> Lines<'_>
    where
        Self: Sized,
    {
        Lines::rows(View::new(self))
    }

    /// Iterate over the columns as `m x 1` views.
    fn columns(&self) -> Lines<'_>
    where
        Self: Sized,
    {
        Lines::columns(View::new(self))
    }

    /// Materialize into the narrowest typed storage that holds every cell
    /// exactly. See [`CompactMatrix::from_matrix`].
    fn copy(&self) -> CompactMatrix {
        CompactMatrix::from_matrix(self)
    }
}

// The view-producing half of the contract for trait objects.
impl<'a> dyn Matrix + 'a {
    /// Pass-through view of the whole matrix.
    pub fn view(&self) -> View<'_> {
        View::new(self)
    }

    /// See [`Matrix::select_rows`].
    pub fn select_rows(&self, rows: &[usize]) -> View<'_> {
        View::new(self).select_rows(rows)
    }

    /// See [`Matrix::select_columns`].
    pub fn select_columns(&self, cols: &[usize]) -> View<'_> {
        View::new(self).select_columns(cols)
    }

    /// See [`Matrix::transpose`].
    pub fn transpose(&self) -> View<'_> {
        View::new(self).transpose()
    }

    /// See [`Matrix::row`].
    pub fn row(&self, i: usize) -> View<'_> {
        View::new(self).row(i)
    }

    /// See [`Matrix::column`].
    pub fn column(&self, j: usize) -> View<'_> {
        View::new(self).column(j)
    }

    /// See [`Matrix::rows`].
    pub fn rows(&self) -> Lines<'_> {
        Lines::rows(View::new(self))
    }

    /// See [`Matrix::columns`].
    pub fn columns(&self) -> Lines<'_> {
        Lines::columns(View::new(self))
    }
}

// ============================================================================
// Lines
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Rows,
    Columns,
}

/// Iterator over the rows or columns of a matrix, each as a [`View`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    view: View<'a>,
    axis: Axis,
    front: usize,
    back: usize,
}

impl<'a> Lines<'a> {
    pub(crate) fn rows(view: View<'a>) -> Self {
        let back = view.m();
        Self {
            view,
            axis: Axis::Rows,
            front: 0,
            back,
        }
    }

    pub(crate) fn columns(view: View<'a>) -> Self {
        let back = view.n();
        Self {
            view,
            axis: Axis::Columns,
            front: 0,
            back,
        }
    }

    fn line(&self, i: usize) -> View<'a> {
        match self.axis {
            Axis::Rows => self.view.row(i),
            Axis::Columns => self.view.column(i),
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = View<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let line = self.line(self.front);
        self.front += 1;
        Some(line)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Lines<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.line(self.back))
    }
}

impl ExactSizeIterator for Lines<'_> {}
impl FusedIterator for Lines<'_> {}
