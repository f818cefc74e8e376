//! Series builders and a brute-force reference for tests and benchmarks.

use rand::prelude::*;

use crate::data::{DenseMatrix, Matrix};

/// Two-column `(x, y)` integer series.
pub fn int_series(points: &[(i64, i64)]) -> DenseMatrix<i64> {
    let data = points.iter().flat_map(|&(x, y)| [x, y]).collect();
    DenseMatrix::from_vec(data, points.len(), 2)
}

/// Two-column `(x, y)` real series.
pub fn real_series(points: &[(f64, f64)]) -> DenseMatrix<f64> {
    let data = points.iter().flat_map(|&(x, y)| [x, y]).collect();
    DenseMatrix::from_vec(data, points.len(), 2)
}

/// Random integer series with strictly increasing x.
///
/// x starts in `[0, max_step)` and grows by `1..=max_step`; y is drawn from
/// `0..levels`, so small `levels` produce long flat runs.
pub fn random_int_series(len: usize, seed: u64, max_step: i64, levels: i64) -> DenseMatrix<i64> {
    assert!(max_step >= 1 && levels >= 1);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = rng.gen_range(0..max_step);
    let mut points = Vec::with_capacity(len);
    for _ in 0..len {
        points.push((x, rng.gen_range(0..levels)));
        x += rng.gen_range(1..=max_step);
    }
    int_series(&points)
}

/// Random real series with strictly increasing x and y uniform in `[0, 1)`.
pub fn random_real_series(len: usize, seed: u64) -> DenseMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = 0.0;
    let mut points = Vec::with_capacity(len);
    for _ in 0..len {
        x += rng.gen_range(0.01..1.0);
        points.push((x, rng.r#gen::<f64>()));
    }
    real_series(&points)
}

/// Last y at or before `x`, by linear scan.
pub fn value_at(series: &dyn Matrix, x_dim: usize, y_dim: usize, x: f64) -> Option<f64> {
    (0..series.m())
        .take_while(|&i| series.get_f64(i, x_dim) <= x)
        .last()
        .map(|i| series.get_f64(i, y_dim))
}
