//! Borrowed, reindexed and transposed perspectives of a matrix.
//!
//! Every view is the same four fields: the owner, an optional row map, an
//! optional column map, and a transposed flag. Maps index the owner's rows
//! and columns, and the transpose is applied last. Selecting from a view or
//! transposing it combines those fields and returns another [`View`] over
//! the same owner, so views never nest.
//!
//! # Example
//!
//! ```
//! use stepmerge::data::{DenseMatrix, Matrix};
//!
//! let owner = DenseMatrix::<i64>::from_rows(&[[1, 2, 3], [4, 5, 6]]);
//!
//! // Rows of the transpose are owner columns.
//! let t = owner.transpose();
//! let picked = t.select_rows(&[2, 0]);
//! assert_eq!((picked.m(), picked.n()), (2, 2));
//! assert_eq!(picked.get_i64(0, 1), 6);
//!
//! // Still a single view over `owner`.
//! assert_eq!(picked.column_map(), Some(&[2, 0][..]));
//! assert!(picked.is_transposed());
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use super::ops;
use super::traits::{Lines, Matrix};

/// A non-owning matrix over some owner.
///
/// Valid for as long as the owner is borrowed. Owns only its index maps.
#[derive(Clone)]
pub struct View<'a> {
    owner: &'a dyn Matrix,
    rows: Option<Vec<usize>>,
    cols: Option<Vec<usize>>,
    transposed: bool,
}

impl<'a> View<'a> {
    /// Pass-through view of `owner`.
    ///
    /// If `owner` is itself a view, its fields are reused so the result
    /// points straight at the underlying matrix.
    pub fn new(owner: &'a dyn Matrix) -> Self {
        owner.as_view().unwrap_or(Self {
            owner,
            rows: None,
            cols: None,
            transposed: false,
        })
    }

    /// The matrix this view reads from.
    #[inline]
    pub fn owner(&self) -> &'a dyn Matrix {
        self.owner
    }

    /// Owner rows selected by this view, before transposition.
    #[inline]
    pub fn row_map(&self) -> Option<&[usize]> {
        self.rows.as_deref()
    }

    /// Owner columns selected by this view, before transposition.
    #[inline]
    pub fn column_map(&self) -> Option<&[usize]> {
        self.cols.as_deref()
    }

    /// Whether the selection is presented transposed.
    #[inline]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Whether this view shows the owner unchanged.
    #[inline]
    pub fn is_pass_through(&self) -> bool {
        self.rows.is_none() && self.cols.is_none() && !self.transposed
    }

    /// See [`Matrix::select_rows`].
    pub fn select_rows(&self, rows: &[usize]) -> View<'a> {
        check_indices(rows, self.m(), "Row");
        if is_identity(rows, self.m()) {
            return self.clone();
        }
        let mut view = self.clone();
        if self.transposed {
            view.cols = compose(self.cols.as_deref(), rows, self.owner.n());
        } else {
            view.rows = compose(self.rows.as_deref(), rows, self.owner.m());
        }
        view
    }

    /// See [`Matrix::select_columns`].
    pub fn select_columns(&self, cols: &[usize]) -> View<'a> {
        check_indices(cols, self.n(), "Column");
        if is_identity(cols, self.n()) {
            return self.clone();
        }
        let mut view = self.clone();
        if self.transposed {
            view.rows = compose(self.rows.as_deref(), cols, self.owner.m());
        } else {
            view.cols = compose(self.cols.as_deref(), cols, self.owner.n());
        }
        view
    }

    /// See [`Matrix::transpose`]. A `1 x 1` view is returned unchanged.
    pub fn transpose(&self) -> View<'a> {
        let mut view = self.clone();
        if !(self.m() == 1 && self.n() == 1) {
            view.transposed = !self.transposed;
        }
        view
    }

    /// Row `i` as a `1 x n` view.
    pub fn row(&self, i: usize) -> View<'a> {
        self.select_rows(&[i])
    }

    /// Column `j` as an `m x 1` view.
    pub fn column(&self, j: usize) -> View<'a> {
        self.select_columns(&[j])
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> Lines<'a> {
        Lines::rows(self.clone())
    }

    /// Iterate over the columns.
    pub fn columns(&self) -> Lines<'a> {
        Lines::columns(self.clone())
    }

    #[inline]
    fn inner_shape(&self) -> (usize, usize) {
        (
            self.rows.as_ref().map_or(self.owner.m(), Vec::len),
            self.cols.as_ref().map_or(self.owner.n(), Vec::len),
        )
    }

    /// Owner coordinates of view cell (row, col).
    #[inline]
    fn locate(&self, row: usize, col: usize) -> (usize, usize) {
        assert!(
            row < self.m() && col < self.n(),
            "Index ({}, {}) out of bounds for {}x{} view",
            row,
            col,
            self.m(),
            self.n()
        );
        let (r, c) = if self.transposed { (col, row) } else { (row, col) };
        (
            self.rows.as_ref().map_or(r, |map| map[r]),
            self.cols.as_ref().map_or(c, |map| map[c]),
        )
    }
}

/// `indices` pushed through `map`, or `None` when the result selects every
/// owner line in order.
fn compose(map: Option<&[usize]>, indices: &[usize], owner_len: usize) -> Option<Vec<usize>> {
    let composed: Vec<usize> = match map {
        Some(map) => indices.iter().map(|&i| map[i]).collect(),
        None => indices.to_vec(),
    };
    if is_identity(&composed, owner_len) {
        None
    } else {
        Some(composed)
    }
}

#[inline]
fn is_identity(indices: &[usize], len: usize) -> bool {
    indices.len() == len && indices.iter().enumerate().all(|(i, &idx)| i == idx)
}

fn check_indices(indices: &[usize], len: usize, what: &str) {
    if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
        panic!("{} index {} out of bounds for length {}", what, bad, len);
    }
}

impl Matrix for View<'_> {
    #[inline]
    fn m(&self) -> usize {
        let (m, n) = self.inner_shape();
        if self.transposed { n } else { m }
    }

    #[inline]
    fn n(&self) -> usize {
        let (m, n) = self.inner_shape();
        if self.transposed { m } else { n }
    }

    #[inline]
    fn get_f64(&self, row: usize, col: usize) -> f64 {
        let (r, c) = self.locate(row, col);
        self.owner.get_f64(r, c)
    }

    #[inline]
    fn get_i64(&self, row: usize, col: usize) -> i64 {
        let (r, c) = self.locate(row, col);
        self.owner.get_i64(r, c)
    }

    #[inline]
    fn is_integer(&self) -> bool {
        self.owner.is_integer()
    }

    fn as_view(&self) -> Option<View<'_>> {
        Some(self.clone())
    }
}

impl PartialEq for View<'_> {
    fn eq(&self, other: &Self) -> bool {
        ops::matrix_eq(self, other)
    }
}

impl Eq for View<'_> {}

impl Hash for View<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ops::matrix_hash(self, state);
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ops::fmt_matrix(self, f)
    }
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("m", &self.m())
            .field("n", &self.n())
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("transposed", &self.transposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DenseMatrix;

    fn owner() -> DenseMatrix<i64> {
        // 3x4, value = 10 * row + col
        DenseMatrix::from_rows(&[[0, 1, 2, 3], [10, 11, 12, 13], [20, 21, 22, 23]])
    }

    fn values(view: &View<'_>) -> Vec<Vec<i64>> {
        (0..view.m())
            .map(|i| (0..view.n()).map(|j| view.get_i64(i, j)).collect())
            .collect()
    }

    #[test]
    fn identity_selection_is_pass_through() {
        let owner = owner();
        assert!(owner.select_rows(&[0, 1, 2]).is_pass_through());
        assert!(owner.select_columns(&[0, 1, 2, 3]).is_pass_through());
        assert!(!owner.select_columns(&[0, 1, 2]).is_pass_through());
    }

    #[test]
    fn repeats_and_reordering() {
        let owner = owner();
        let view = owner.select_rows(&[2, 2, 0]);
        assert_eq!(
            values(&view.select_columns(&[3, 0])),
            vec![vec![23, 20], vec![23, 20], vec![3, 0]]
        );
    }

    #[test]
    fn column_of_column_view_remaps() {
        let owner = owner();
        let first = owner.select_columns(&[3, 1, 2]);
        let second = first.select_columns(&[2, 0]);
        assert_eq!(second.column_map(), Some(&[2, 3][..]));
        assert_eq!(values(&second)[1], vec![12, 13]);
    }

    #[test]
    fn remap_back_to_identity_drops_the_map() {
        let owner = owner();
        let swapped = owner.select_columns(&[1, 0, 2, 3]);
        let restored = swapped.select_columns(&[1, 0, 2, 3]);
        assert!(restored.is_pass_through());
    }

    #[test]
    fn row_and_column_views_merge_in_either_order() {
        let owner = owner();
        let a = owner.select_rows(&[1, 2]).select_columns(&[0, 3]);
        let b = owner.select_columns(&[0, 3]).select_rows(&[1, 2]);
        assert_eq!(a.row_map(), b.row_map());
        assert_eq!(a.column_map(), b.column_map());
        assert_eq!(values(&a), vec![vec![10, 13], vec![20, 23]]);
    }

    #[test]
    fn double_transpose_flattens() {
        let owner = owner();
        let tt = owner.transpose().transpose();
        assert!(tt.is_pass_through());
    }

    #[test]
    fn selection_through_transpose() {
        let owner = owner();
        let t = owner.transpose(); // 4x3
        assert_eq!((t.m(), t.n()), (4, 3));
        let view = t.select_rows(&[3]).select_columns(&[0, 2]);
        assert_eq!(view.column_map(), Some(&[3][..]));
        assert_eq!(view.row_map(), Some(&[0, 2][..]));
        assert_eq!(values(&view), vec![vec![3, 23]]);
    }

    #[test]
    fn one_by_one_transpose_is_unchanged() {
        let owner = owner();
        let cell = owner.select_rows(&[1]).select_columns(&[2]);
        assert!(!cell.transpose().is_transposed());
        assert_eq!(cell.transpose().get_i64(0, 0), 12);
    }

    #[test]
    fn view_of_trait_object_view_flattens() {
        let owner = owner();
        let inner = owner.select_rows(&[2, 0]);
        let object: &dyn Matrix = &inner;
        let outer = View::new(object).select_rows(&[1]);
        assert_eq!(outer.row_map(), Some(&[0][..]));
        assert_eq!(outer.get_i64(0, 3), 3);
    }

    #[test]
    #[should_panic(expected = "Column index 4 out of bounds")]
    fn out_of_range_selection_panics() {
        let owner = owner();
        owner.select_columns(&[4]);
    }

    #[test]
    fn equality_across_construction_paths() {
        let owner = owner();
        let a = owner.transpose().select_columns(&[1]);
        let b = owner.select_rows(&[1]).transpose();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "[[10], [11], [12], [13]]");
    }
}
