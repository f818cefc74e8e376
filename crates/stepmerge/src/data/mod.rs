//! Matrix abstractions.
//!
//! The core abstraction is [`Matrix`]: a fixed-shape grid of numbers whose
//! cells are either all exact integers or all reals.
//!
//! # Types
//!
//! - [`DenseMatrix`]: owned or borrowed dense storage, row- or column-major
//! - [`View`]: borrowed row/column selection and transposition of any matrix
//! - [`CompactMatrix`]: the storage-minimal result of [`Matrix::copy`]
//!
//! `ndarray` 2-D arrays and views implement [`Matrix`] as well.

mod compact;
mod matrix;
mod ndarray;
mod ops;
mod traits;
mod views;

pub use compact::{CompactMatrix, StorageKind};
pub use matrix::{ColMajor, DenseMatrix, Element, Layout, RowMajor};
pub use self::ndarray::{axis, to_array_f64, to_array_i64};
pub use ops::{fmt_matrix, matrix_eq, matrix_hash};
pub use traits::{Lines, Matrix};
pub use views::View;
