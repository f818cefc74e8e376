//! Dense matrix implementation with configurable layout.
//!
//! Supports both row-major and column-major storage via the [`Layout`] trait,
//! and any [`Element`] type from `i8` to `f64`. Integer element types make
//! the matrix an integer matrix in the [`Matrix`] sense.
//!
//! # Layouts
//!
//! Layout is a type parameter, so all layout-dependent code is monomorphized.
//!
//! - [`RowMajor`]: Rows are contiguous. `index = row * n_cols + col`
//! - [`ColMajor`]: Columns are contiguous. `index = col * n_rows + row`
//!
//! # Example
//!
//! ```
//! use stepmerge::data::{ColMajor, DenseMatrix, Matrix, RowMajor};
//!
//! // Row-major (default): rows are contiguous
//! let rm = DenseMatrix::<i64, RowMajor>::from_vec(vec![1, 2, 3, 4], 2, 2);
//! assert_eq!(rm.get_i64(0, 1), 2);
//! assert!(rm.is_integer());
//!
//! // Column-major: columns are contiguous
//! let cm = DenseMatrix::<f64, ColMajor>::from_vec(vec![1.0, 3.0, 2.0, 4.0], 2, 2);
//! assert_eq!(cm.as_slice(), &[1.0, 3.0, 2.0, 4.0]);
//! assert_eq!(cm.get_f64(0, 1), 2.0);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::ops;
use super::traits::Matrix;

// Sealed trait pattern to prevent external implementations
mod sealed {
    pub trait Sealed {}
}

// =============================================================================
// Element
// =============================================================================

/// Cell type of a [`DenseMatrix`].
///
/// Sealed; implemented for `i8`, `i16`, `i32`, `i64`, `f32` and `f64`.
pub trait Element: sealed::Sealed + Copy + fmt::Debug + 'static {
    /// Whether matrices of this element type are integer matrices.
    const INTEGER: bool;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Convert to `i64` (`as`-cast semantics for floats).
    fn to_i64(self) -> i64;
}

macro_rules! integer_element {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const INTEGER: bool = true;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }
        }
    )*};
}

macro_rules! real_element {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const INTEGER: bool = false;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }
        }
    )*};
}

integer_element!(i8, i16, i32, i64);
real_element!(f32, f64);

// =============================================================================
// Layout
// =============================================================================

/// Matrix memory layout.
///
/// Determines how 2D indices map to linear memory offsets.
/// Sealed to prevent external implementations.
pub trait Layout: sealed::Sealed + Copy + Default + fmt::Debug + 'static {
    /// Convert (row, col) to linear index.
    fn index(row: usize, col: usize, n_rows: usize, n_cols: usize) -> usize;

    /// Convert a linear index back to (row, col).
    fn coords(index: usize, n_rows: usize, n_cols: usize) -> (usize, usize);
}

/// Row-major layout: rows are stored contiguously.
///
/// ```text
/// Logical:     Memory:
/// [a b c]      [a b c d e f]
/// [d e f]       ^row0^ ^row1^
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowMajor;

impl sealed::Sealed for RowMajor {}

impl Layout for RowMajor {
    #[inline]
    fn index(row: usize, col: usize, _n_rows: usize, n_cols: usize) -> usize {
        row * n_cols + col
    }

    #[inline]
    fn coords(index: usize, _n_rows: usize, n_cols: usize) -> (usize, usize) {
        (index / n_cols, index % n_cols)
    }
}

/// Column-major layout: columns are stored contiguously.
///
/// ```text
/// Logical:     Memory:
/// [a b c]      [a d b e c f]
/// [d e f]       ^c0 ^c1 ^c2
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColMajor;

impl sealed::Sealed for ColMajor {}

impl Layout for ColMajor {
    #[inline]
    fn index(row: usize, col: usize, n_rows: usize, _n_cols: usize) -> usize {
        col * n_rows + row
    }

    #[inline]
    fn coords(index: usize, n_rows: usize, _n_cols: usize) -> (usize, usize) {
        (index % n_rows, index / n_rows)
    }
}

// =============================================================================
// DenseMatrix
// =============================================================================

/// Dense matrix with configurable memory layout.
///
/// # Generic Parameters
///
/// - `T`: Element type (default `f64`)
/// - `L`: Memory layout (default [`RowMajor`])
#[derive(Clone)]
pub struct DenseMatrix<T = f64, L: Layout = RowMajor> {
    data: Box<[T]>,
    n_rows: usize,
    n_cols: usize,
    _layout: PhantomData<L>,
}

impl<T, L: Layout> DenseMatrix<T, L> {
    /// Create a dense matrix from a Vec, taking ownership.
    ///
    /// Data must already be in the order given by `L`.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != n_rows * n_cols`.
    pub fn from_vec(data: Vec<T>, n_rows: usize, n_cols: usize) -> Self {
        assert_eq!(
            data.len(),
            n_rows * n_cols,
            "Data length {} does not match dimensions {}x{}",
            data.len(),
            n_rows,
            n_cols
        );
        Self {
            data: data.into_boxed_slice(),
            n_rows,
            n_cols,
            _layout: PhantomData,
        }
    }

    /// Underlying data in layout order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.n_rows && col < self.n_cols,
            "Index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.n_rows,
            self.n_cols
        );
        L::index(row, col, self.n_rows, self.n_cols)
    }
}

impl<T: Copy, L: Layout> DenseMatrix<T, L> {
    /// Create a dense matrix from a list of equally long rows.
    ///
    /// An empty list yields a `0 x 0` matrix.
    ///
    /// # Panics
    ///
    /// Panics if the rows differ in length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                row.as_ref().len(),
                n_cols,
                "Row {} has length {}, expected {}",
                i,
                row.as_ref().len(),
                n_cols
            );
        }

        let data = (0..n_rows * n_cols)
            .map(|idx| {
                let (row, col) = L::coords(idx, n_rows, n_cols);
                rows[row].as_ref()[col]
            })
            .collect();
        Self::from_vec(data, n_rows, n_cols)
    }
}

// =============================================================================
// Matrix implementation
// =============================================================================

impl<T: Element, L: Layout> Matrix for DenseMatrix<T, L> {
    #[inline]
    fn m(&self) -> usize {
        self.n_rows
    }

    #[inline]
    fn n(&self) -> usize {
        self.n_cols
    }

    #[inline]
    fn get_f64(&self, row: usize, col: usize) -> f64 {
        self.data[self.offset(row, col)].to_f64()
    }

    #[inline]
    fn get_i64(&self, row: usize, col: usize) -> i64 {
        self.data[self.offset(row, col)].to_i64()
    }

    #[inline]
    fn is_integer(&self) -> bool {
        T::INTEGER
    }
}

impl<T: Element, L: Layout> PartialEq for DenseMatrix<T, L> {
    fn eq(&self, other: &Self) -> bool {
        ops::matrix_eq(self, other)
    }
}

impl<T: Element, L: Layout> Eq for DenseMatrix<T, L> {}

impl<T: Element, L: Layout> Hash for DenseMatrix<T, L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ops::matrix_hash(self, state);
    }
}

impl<T: Element, L: Layout> fmt::Display for DenseMatrix<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ops::fmt_matrix(self, f)
    }
}

impl<T: Element, L: Layout> fmt::Debug for DenseMatrix<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseMatrix")
            .field("n_rows", &self.n_rows)
            .field("n_cols", &self.n_cols)
            .field("layout", &L::default())
            .field("data", &self.as_slice())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
