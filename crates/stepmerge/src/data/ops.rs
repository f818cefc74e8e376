//! Equality, hashing and text form shared by every [`Matrix`].
//!
//! Cells are compared in their authoritative kind only: integer matrices by
//! `i64`, real matrices by canonical `f64` bits (all NaNs equal, `0.0` and
//! `-0.0` distinct). An integer matrix never equals a real one, even when
//! the values coincide.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::traits::Matrix;
use crate::number::canonical_bits;

/// Whether two matrices have the same shape, kind and cell values.
pub fn matrix_eq<A, B>(a: &A, b: &B) -> bool
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    let (m, n) = (a.m(), a.n());
    if m != b.m() || n != b.n() || a.is_integer() != b.is_integer() {
        return false;
    }
    let integer = a.is_integer();
    (0..m).all(|i| {
        (0..n).all(|j| {
            if integer {
                a.get_i64(i, j) == b.get_i64(i, j)
            } else {
                canonical_bits(a.get_f64(i, j)) == canonical_bits(b.get_f64(i, j))
            }
        })
    })
}

/// Feed shape, kind and cells (row-major) into `state`.
pub fn matrix_hash<M, H>(matrix: &M, state: &mut H)
where
    M: Matrix + ?Sized,
    H: Hasher,
{
    let (m, n) = (matrix.m(), matrix.n());
    m.hash(state);
    n.hash(state);
    let integer = matrix.is_integer();
    integer.hash(state);
    for i in 0..m {
        for j in 0..n {
            if integer {
                matrix.get_i64(i, j).hash(state);
            } else {
                canonical_bits(matrix.get_f64(i, j)).hash(state);
            }
        }
    }
}

/// Write `[[a, b], [c, d]]` using the authoritative accessor.
pub fn fmt_matrix<M>(matrix: &M, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    M: Matrix + ?Sized,
{
    f.write_str("[")?;
    for i in 0..matrix.m() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str("[")?;
        for j in 0..matrix.n() {
            if j > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", matrix.get(i, j))?;
        }
        f.write_str("]")?;
    }
    f.write_str("]")
}

impl PartialEq for dyn Matrix + '_ {
    fn eq(&self, other: &Self) -> bool {
        matrix_eq(self, other)
    }
}

impl Eq for dyn Matrix + '_ {}

impl Hash for dyn Matrix + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        matrix_hash(self, state);
    }
}

impl fmt::Display for dyn Matrix + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_matrix(self, f)
    }
}

// Shape only; cells can be arbitrarily many.
impl fmt::Debug for dyn Matrix + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("m", &self.m())
            .field("n", &self.n())
            .field("integer", &self.is_integer())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColMajor, DenseMatrix, RowMajor};
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(matrix: &dyn Matrix) -> u64 {
        let mut hasher = DefaultHasher::new();
        matrix.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equal_across_types_and_layouts() {
        let a = DenseMatrix::<i64, RowMajor>::from_rows(&[[1, 2], [3, 4]]);
        let b = DenseMatrix::<i8, ColMajor>::from_rows(&[[1i8, 2], [3, 4]]);
        let (a, b): (&dyn Matrix, &dyn Matrix) = (&a, &b);
        assert!(a == b);
        assert_eq!(hash_of(a), hash_of(b));
    }

    #[test]
    fn kind_mismatch_is_unequal() {
        let ints = DenseMatrix::<i64>::from_rows(&[[1, 2]]);
        let reals = DenseMatrix::<f64>::from_rows(&[[1.0, 2.0]]);
        assert!(!matrix_eq(&ints, &reals));
    }

    #[test]
    fn shape_mismatch_is_unequal() {
        let wide = DenseMatrix::<i64>::from_rows(&[[1, 2]]);
        let tall = DenseMatrix::<i64>::from_rows(&[[1], [2]]);
        assert!(!matrix_eq(&wide, &tall));
        assert!(matrix_eq(&wide.transpose(), &tall));
    }

    #[test]
    fn nan_cells_compare_equal() {
        let a = DenseMatrix::<f64>::from_rows(&[[f64::NAN, 0.0]]);
        let b = DenseMatrix::<f32>::from_rows(&[[f32::NAN, 0.0f32]]);
        let c = DenseMatrix::<f64>::from_rows(&[[f64::NAN, -0.0]]);
        assert!(matrix_eq(&a, &b));
        assert!(!matrix_eq(&a, &c));
    }

    #[test]
    fn display_uses_authoritative_kind() {
        let reals = DenseMatrix::<f64>::from_rows(&[[1.0, 2.5]]);
        let object: &dyn Matrix = &reals;
        assert_eq!(object.to_string(), "[[1.0, 2.5]]");
        let empty = DenseMatrix::<i64>::from_vec(vec![], 0, 3);
        assert_eq!(empty.to_string(), "[]");
    }
}
