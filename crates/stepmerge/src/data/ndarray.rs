//! ndarray integration.
//!
//! Any 2-D `ndarray` array or view whose element type is an [`Element`]
//! implements [`Matrix`] directly, with `(row, col)` meaning `[[row, col]]`.
//! [`to_array_f64`] / [`to_array_i64`] go the other way for consumers that
//! want to run ndarray statistics over a matrix or a cross-section.

use ndarray::{Array2, ArrayBase, Data, Ix2};

use super::matrix::Element;
use super::traits::Matrix;

/// Semantic axis constants.
pub mod axis {
    use ndarray::Axis;

    pub const ROWS: Axis = Axis(0);
    pub const COLS: Axis = Axis(1);
}

impl<S, T> Matrix for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
    T: Element,
{
    #[inline]
    fn m(&self) -> usize {
        self.nrows()
    }

    #[inline]
    fn n(&self) -> usize {
        self.ncols()
    }

    #[inline]
    fn get_f64(&self, row: usize, col: usize) -> f64 {
        self[[row, col]].to_f64()
    }

    #[inline]
    fn get_i64(&self, row: usize, col: usize) -> i64 {
        self[[row, col]].to_i64()
    }

    #[inline]
    fn is_integer(&self) -> bool {
        T::INTEGER
    }
}

/// Copy any matrix into a standard-layout `f64` array.
pub fn to_array_f64<M: Matrix + ?Sized>(matrix: &M) -> Array2<f64> {
    Array2::from_shape_fn((matrix.m(), matrix.n()), |(i, j)| matrix.get_f64(i, j))
}

/// Copy any matrix into a standard-layout `i64` array.
pub fn to_array_i64<M: Matrix + ?Sized>(matrix: &M) -> Array2<i64> {
    Array2::from_shape_fn((matrix.m(), matrix.n()), |(i, j)| matrix.get_i64(i, j))
}
