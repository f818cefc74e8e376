//! stepmerge: lazy alignment of step-function series.
//!
//! Given several independently sampled step functions (each a matrix with a
//! sorted x column and a y column), [`iterate`] produces the synchronized
//! cross-sections at every x where some series changes value, without ever
//! building a dense grid.
//!
//! # Key Types
//!
//! - [`Matrix`] - Fixed-shape numeric container contract
//! - [`DenseMatrix`] / [`View`] / [`CompactMatrix`] - Implementations
//! - [`SeriesMerge`] / [`CrossSection`] - Merge results
//! - [`MergeConfig`] - Dimension and early-end settings
//! - [`Number`] - Exact integer or real value
//!
//! # Example
//!
//! ```
//! use stepmerge::{iterate, DenseMatrix, Matrix};
//!
//! let run_a = DenseMatrix::<f64>::from_rows(&[[0.0, 10.0], [1.5, 12.0]]);
//! let run_b = DenseMatrix::<f64>::from_rows(&[[1.0, 11.0]]);
//!
//! for section in iterate(0, 1, &[&run_a, &run_b]).unwrap() {
//!     let mean = (0..section.n()).map(|j| section.get_f64(0, j)).sum::<f64>()
//!         / section.n() as f64;
//!     println!("{}: {mean}", section.x());
//! }
//! ```

// Re-export approx traits for users who compare numbers
pub use approx;

pub mod data;
pub mod merge;
pub mod number;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use number::{Number, NumberKind};

pub use data::{CompactMatrix, DenseMatrix, Matrix, StorageKind, View};

pub use merge::{
    iterate, iterate_with, ConfigError, CrossSection, MergeConfig, MergeError, SeriesMerge,
    Specialization,
};
