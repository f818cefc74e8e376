//! Storage-minimal materialized copies.
//!
//! [`CompactMatrix::from_matrix`] (and therefore [`Matrix::copy`]) reads every
//! cell once and picks the narrowest storage that reproduces each value
//! exactly:
//!
//! 1. Integer sources, and real sources whose cells are all exact integers,
//!    get the smallest of `i8` / `i16` / `i32` / `i64` that covers the range.
//! 2. Other real sources get `f32` when every cell survives an `f32`
//!    round trip, `f64` otherwise.
//!
//! A real matrix of small whole numbers therefore copies into an *integer*
//! matrix.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::matrix::{DenseMatrix, Element, RowMajor};
use super::ops;
use super::traits::Matrix;
use crate::number::is_exact_i64;

/// Backing type chosen for a [`CompactMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// 8-bit integers.
    I8,
    /// 16-bit integers.
    I16,
    /// 32-bit integers.
    I32,
    /// 64-bit integers.
    I64,
    /// 32-bit floats.
    F32,
    /// 64-bit floats.
    F64,
}

impl StorageKind {
    /// Size in bytes per cell.
    #[inline]
    pub const fn size_bytes(self) -> usize {
        match self {
            Self::I8 => 1,
            Self::I16 => 2,
            Self::I32 | Self::F32 => 4,
            Self::I64 | Self::F64 => 8,
        }
    }

    /// Whether this is an integer storage type.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Narrowest integer type covering `min..=max`.
    #[inline]
    pub fn for_int_range(min: i64, max: i64) -> Self {
        let fits = |lo: i64, hi: i64| min >= lo && max <= hi;
        if fits(i8::MIN.into(), i8::MAX.into()) {
            Self::I8
        } else if fits(i16::MIN.into(), i16::MAX.into()) {
            Self::I16
        } else if fits(i32::MIN.into(), i32::MAX.into()) {
            Self::I32
        } else {
            Self::I64
        }
    }
}

/// Row-major dense matrix in the narrowest lossless element type.
#[derive(Clone)]
pub enum CompactMatrix {
    /// 8-bit integer cells.
    I8(DenseMatrix<i8>),
    /// 16-bit integer cells.
    I16(DenseMatrix<i16>),
    /// 32-bit integer cells.
    I32(DenseMatrix<i32>),
    /// 64-bit integer cells.
    I64(DenseMatrix<i64>),
    /// 32-bit float cells.
    F32(DenseMatrix<f32>),
    /// 64-bit float cells.
    F64(DenseMatrix<f64>),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            CompactMatrix::I8($m) => $body,
            CompactMatrix::I16($m) => $body,
            CompactMatrix::I32($m) => $body,
            CompactMatrix::I64($m) => $body,
            CompactMatrix::F32($m) => $body,
            CompactMatrix::F64($m) => $body,
        }
    };
}

impl CompactMatrix {
    /// Materialize `source` into the narrowest storage that holds every cell
    /// exactly.
    ///
    /// An empty source keeps its kind: `I8` for integer sources, `F32` for
    /// real ones.
    pub fn from_matrix<M: Matrix + ?Sized>(source: &M) -> Self {
        let (m, n) = (source.m(), source.n());

        if source.is_integer() {
            let cells: Vec<i64> = row_major(m, n, |i, j| source.get_i64(i, j));
            return Self::from_ints(cells, m, n);
        }

        let cells: Vec<f64> = row_major(m, n, |i, j| source.get_f64(i, j));
        if !cells.is_empty() && cells.iter().all(|&v| is_exact_i64(v)) {
            let ints = cells.into_iter().map(|v| v as i64).collect();
            return Self::from_ints(ints, m, n);
        }
        if cells.iter().all(|&v| survives_f32(v)) {
            Self::F32(narrow(&cells, m, n, |v| v as f32))
        } else {
            Self::F64(DenseMatrix::from_vec(cells, m, n))
        }
    }

    fn from_ints(cells: Vec<i64>, m: usize, n: usize) -> Self {
        let min = cells.iter().copied().min().unwrap_or(0);
        let max = cells.iter().copied().max().unwrap_or(0);
        match StorageKind::for_int_range(min, max) {
            StorageKind::I8 => Self::I8(narrow(&cells, m, n, |v| v as i8)),
            StorageKind::I16 => Self::I16(narrow(&cells, m, n, |v| v as i16)),
            StorageKind::I32 => Self::I32(narrow(&cells, m, n, |v| v as i32)),
            _ => Self::I64(DenseMatrix::from_vec(cells, m, n)),
        }
    }

    /// Backing type of this copy.
    pub fn storage_kind(&self) -> StorageKind {
        match self {
            Self::I8(_) => StorageKind::I8,
            Self::I16(_) => StorageKind::I16,
            Self::I32(_) => StorageKind::I32,
            Self::I64(_) => StorageKind::I64,
            Self::F32(_) => StorageKind::F32,
            Self::F64(_) => StorageKind::F64,
        }
    }

    /// Bytes used by the cell storage.
    pub fn size_bytes(&self) -> usize {
        self.m() * self.n() * self.storage_kind().size_bytes()
    }
}

fn row_major<T>(m: usize, n: usize, cell: impl Fn(usize, usize) -> T) -> Vec<T> {
    let mut cells = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            cells.push(cell(i, j));
        }
    }
    cells
}

fn narrow<S: Copy, T: Element>(
    cells: &[S],
    m: usize,
    n: usize,
    cast: impl Fn(S) -> T,
) -> DenseMatrix<T, RowMajor> {
    DenseMatrix::from_vec(cells.iter().map(|&v| cast(v)).collect(), m, n)
}

#[inline]
fn survives_f32(value: f64) -> bool {
    value.is_nan() || (value as f32) as f64 == value
}

impl Matrix for CompactMatrix {
    #[inline]
    fn m(&self) -> usize {
        dispatch!(self, inner => inner.m())
    }

    #[inline]
    fn n(&self) -> usize {
        dispatch!(self, inner => inner.n())
    }

    #[inline]
    fn get_f64(&self, row: usize, col: usize) -> f64 {
        dispatch!(self, inner => inner.get_f64(row, col))
    }

    #[inline]
    fn get_i64(&self, row: usize, col: usize) -> i64 {
        dispatch!(self, inner => inner.get_i64(row, col))
    }

    #[inline]
    fn is_integer(&self) -> bool {
        self.storage_kind().is_integer()
    }

    fn copy(&self) -> CompactMatrix {
        self.clone()
    }
}

impl PartialEq for CompactMatrix {
    fn eq(&self, other: &Self) -> bool {
        ops::matrix_eq(self, other)
    }
}

impl Eq for CompactMatrix {}

impl Hash for CompactMatrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ops::matrix_hash(self, state);
    }
}

impl fmt::Display for CompactMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ops::fmt_matrix(self, f)
    }
}

impl fmt::Debug for CompactMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompactMatrix")
            .field(&self.storage_kind())
            .field(&format_args!("{}", self))
            .finish()
    }
}
