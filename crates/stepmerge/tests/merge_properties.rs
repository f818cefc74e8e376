//! Property-based tests for the series merge.
//!
//! Inputs are random step functions with strictly increasing x. Every
//! produced cross-section is checked against a brute-force scan of the
//! inputs.

use std::collections::BTreeSet;

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use stepmerge::testing::{int_series, real_series, value_at};
use stepmerge::{iterate, iterate_with, DenseMatrix, Matrix, MergeConfig, Number};

// =============================================================================
// Strategies
// =============================================================================

/// Points with strictly increasing x and y from a small set of levels.
fn arb_points(max_len: usize) -> impl Strategy<Value = Vec<(i64, i64)>> {
    (-5i64..5, prop_vec((1i64..4, 0i64..3), 0..max_len)).prop_map(|(start, steps)| {
        let mut x = start;
        steps
            .into_iter()
            .map(|(dx, y)| {
                x += dx;
                (x, y)
            })
            .collect()
    })
}

fn arb_series_set() -> impl Strategy<Value = Vec<Vec<(i64, i64)>>> {
    prop_vec(arb_points(12), 1..5)
}

fn build(points: &[Vec<(i64, i64)>]) -> Vec<DenseMatrix<i64>> {
    points.iter().map(|p| int_series(p)).collect()
}

fn as_dyn(series: &[DenseMatrix<i64>]) -> Vec<&dyn Matrix> {
    series.iter().map(|s| s as &dyn Matrix).collect()
}

/// x values where some series starts or changes y.
fn breakpoints(points: &[Vec<(i64, i64)>]) -> BTreeSet<i64> {
    let mut xs = BTreeSet::new();
    for p in points {
        for (i, &(x, y)) in p.iter().enumerate() {
            if i == 0 || p[i - 1].1 != y {
                xs.insert(x);
            }
        }
    }
    xs
}

fn early_end() -> MergeConfig {
    MergeConfig::builder().early_end(true).build().unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Representative x strictly increases, with and without early end.
    #[test]
    fn x_strictly_increases(points in arb_series_set(), early in any::<bool>()) {
        let series = build(&points);
        let config = MergeConfig::builder().early_end(early).build().unwrap();
        let xs: Vec<i64> = iterate_with(&config, &as_dyn(&series))
            .unwrap()
            .map(|s| s.x().as_i64())
            .collect();
        prop_assert!(xs.windows(2).all(|w| w[0] < w[1]), "xs = {:?}", xs);
    }

    /// Every cross-section has between 1 and N contributors.
    #[test]
    fn contributor_count_bounds(points in arb_series_set(), early in any::<bool>()) {
        let series = build(&points);
        let config = MergeConfig::builder().early_end(early).build().unwrap();
        for section in iterate_with(&config, &as_dyn(&series)).unwrap() {
            prop_assert!(section.n() >= 1);
            prop_assert!(section.n() <= series.len());
            prop_assert!(section.sources().windows(2).all(|w| w[0] < w[1]));
        }
    }

    /// Without early end, the cross-sections sit exactly on the breakpoints
    /// and report the last value at or before x for every started series.
    #[test]
    fn matches_brute_force(points in arb_series_set()) {
        let series = build(&points);
        let dyns = as_dyn(&series);
        let sections: Vec<_> = iterate(0, 1, &dyns).unwrap().collect();

        let xs: Vec<i64> = sections.iter().map(|s| s.x().as_i64()).collect();
        let expected: Vec<i64> = breakpoints(&points).into_iter().collect();
        prop_assert_eq!(xs, expected);

        for section in &sections {
            let x = section.x().as_f64();
            let expected: Vec<(usize, Number)> = dyns
                .iter()
                .enumerate()
                .filter_map(|(i, s)| value_at(*s, 0, 1, x).map(|y| (i, Number::Int(y as i64))))
                .collect();
            prop_assert_eq!(section.iter().collect::<Vec<_>>(), expected);
        }
    }

    /// With early end, a series stops contributing after its last row.
    #[test]
    fn early_end_stops_after_last_row(points in arb_series_set()) {
        let series = build(&points);
        for section in iterate_with(&early_end(), &as_dyn(&series)).unwrap() {
            let x = section.x().as_i64();
            for &source in section.sources() {
                let p = &points[source];
                prop_assert!(p[0].0 <= x && x <= p[p.len() - 1].0);
            }
        }
    }

    /// Repeated `has_next` calls do not change what `next_section` returns.
    #[test]
    fn has_next_is_idempotent(points in arb_series_set(), repeats in prop_vec(1usize..4, 64)) {
        let series = build(&points);
        let dyns = as_dyn(&series);
        let expected: Vec<_> = iterate(0, 1, &dyns).unwrap().collect();

        let mut merge = iterate(0, 1, &dyns).unwrap();
        let mut got = Vec::new();
        for &k in repeats.iter().cycle() {
            let mut has = merge.has_next();
            for _ in 1..k {
                has = merge.has_next();
            }
            if !has {
                break;
            }
            got.push(merge.next_section().unwrap().snapshot());
        }
        prop_assert_eq!(got, expected);
    }

    /// One series with no repeated y merges into itself.
    #[test]
    fn single_series_round_trip(
        start in -100i64..100,
        steps in prop_vec((1i64..10, 1i64..5), 1..30),
    ) {
        let mut points = Vec::new();
        let (mut x, mut y) = (start, 0i64);
        for (dx, dy) in steps {
            points.push((x, y));
            x += dx;
            y += dy;
        }
        let series = int_series(&points);
        let got: Vec<(i64, i64)> = iterate(0, 1, &[&series])
            .unwrap()
            .map(|s| (s.x().as_i64(), s.get_i64(0, 0)))
            .collect();
        prop_assert_eq!(got, points);
    }

    /// A flat series contributes a breakpoint only at its first sample, or
    /// at its first and last sample with early end.
    #[test]
    fn flat_series_is_compressed(start in -10i64..10, len in 1usize..20, y in -3i64..3) {
        let points: Vec<(i64, i64)> = (0..len as i64).map(|i| (start + i, y)).collect();
        let series = int_series(&points);

        let xs: Vec<i64> = iterate(0, 1, &[&series]).unwrap().map(|s| s.x().as_i64()).collect();
        prop_assert_eq!(xs, vec![start]);

        let xs: Vec<i64> = iterate_with(&early_end(), &[&series])
            .unwrap()
            .map(|s| s.x().as_i64())
            .collect();
        let last = start + len as i64 - 1;
        let expected = if len == 1 { vec![start] } else { vec![start, last] };
        prop_assert_eq!(xs, expected);
    }

    /// Integer inputs give integer cross-sections; a fractional y makes
    /// the cross-sections that hold it real.
    #[test]
    fn type_fidelity(points in arb_series_set(), bump in 0usize..5) {
        let series = build(&points);
        for section in iterate(0, 1, &as_dyn(&series)).unwrap() {
            prop_assert!(section.is_integer());
            prop_assert!(section.values().iter().all(|v| v.is_int()));
        }

        let target = bump % points.len();
        let reals: Vec<DenseMatrix<f64>> = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let shift = if i == target { 0.5 } else { 0.0 };
                real_series(&p.iter().map(|&(x, y)| (x as f64, y as f64 + shift)).collect::<Vec<_>>())
            })
            .collect();
        let dyns: Vec<&dyn Matrix> = reals.iter().map(|s| s as &dyn Matrix).collect();
        for section in iterate(0, 1, &dyns).unwrap() {
            if section.sources().contains(&target) {
                prop_assert!(!section.is_integer());
            }
        }
    }

    /// Real series agree with the brute-force reference too.
    #[test]
    fn real_series_match_brute_force(
        raw in prop_vec(prop_vec((0.1f64..2.0, 0u8..3), 0..10), 1..4),
    ) {
        let reals: Vec<DenseMatrix<f64>> = raw
            .iter()
            .map(|steps| {
                let mut x = 0.0;
                let points: Vec<(f64, f64)> = steps
                    .iter()
                    .map(|&(dx, level)| {
                        x += dx;
                        (x, f64::from(level) * 0.25)
                    })
                    .collect();
                real_series(&points)
            })
            .collect();
        let dyns: Vec<&dyn Matrix> = reals.iter().map(|s| s as &dyn Matrix).collect();
        for section in iterate(0, 1, &dyns).unwrap() {
            let x = section.x().as_f64();
            for (source, value) in section.iter() {
                prop_assert_eq!(value_at(dyns[source], 0, 1, x), Some(value.as_f64()));
            }
            let started = dyns.iter().filter(|s| s.m() > 0 && s.get_f64(0, 0) <= x).count();
            prop_assert_eq!(section.n(), started);
        }
    }

    /// Rows with a NaN x merge as if they were absent.
    #[test]
    fn nan_x_rows_are_invisible(
        points in arb_series_set(),
        holes in prop_vec(prop_vec(any::<bool>(), 13), 5),
        early in any::<bool>(),
    ) {
        let config = MergeConfig::builder().early_end(early).build().unwrap();
        let mut clean = Vec::new();
        let mut holed = Vec::new();
        for (p, mask) in points.iter().zip(&holes) {
            let reals: Vec<(f64, f64)> = p.iter().map(|&(x, y)| (x as f64, y as f64)).collect();
            let mut with_holes = Vec::new();
            for (i, &point) in reals.iter().enumerate() {
                if mask[i] {
                    with_holes.push((f64::NAN, 100.0 + i as f64));
                }
                with_holes.push(point);
            }
            if mask[reals.len()] {
                with_holes.push((f64::NAN, -1.0));
            }
            clean.push(real_series(&reals));
            holed.push(real_series(&with_holes));
        }
        let clean_dyns: Vec<&dyn Matrix> = clean.iter().map(|s| s as &dyn Matrix).collect();
        let holed_dyns: Vec<&dyn Matrix> = holed.iter().map(|s| s as &dyn Matrix).collect();

        let expected: Vec<_> = iterate_with(&config, &clean_dyns).unwrap().collect();
        let got: Vec<_> = iterate_with(&config, &holed_dyns).unwrap().collect();
        for section in &got {
            prop_assert!(section.n() >= 1);
        }
        prop_assert_eq!(got, expected);
    }
}

// =============================================================================
// Worked Example
// =============================================================================

#[test]
fn two_series_example() {
    let a = int_series(&[(0, 1), (2, 3), (4, 3)]);
    let b = int_series(&[(1, 5), (3, 5)]);
    let got: Vec<String> = iterate(0, 1, &[&a, &b])
        .unwrap()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(got, vec!["x=0 [[1]]", "x=1 [[1, 5]]", "x=2 [[3, 5]]"]);
}

#[test]
fn swapped_dimensions() {
    // y in column 0, x in column 1.
    let a = DenseMatrix::<i64>::from_rows(&[[7, 0], [8, 10]]);
    let xs: Vec<Number> = iterate(1, 0, &[&a]).unwrap().map(|s| s.x()).collect();
    assert_eq!(xs, vec![Number::Int(0), Number::Int(10)]);
}
