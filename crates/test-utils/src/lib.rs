//! Test helpers shared across the heif-map workspace.
//!
//! - [`generators`]: synthetic pixel grids whose values encode position
//! - [`fixtures`]: extents, encoded source images and provider YAML files
//! - [`paths`]: optional real sample images and scratch directories
//! - assertion macros for floating point coordinates
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a sample image or skip the current test.
///
/// Real HEIC captures are large and stay out of the repository. When the
/// file is not found in [`paths::sample_dirs`] the test logs a skip notice
/// and returns.
///
/// ```ignore
/// #[test]
/// fn test_real_capture() {
///     let path = test_utils::require_test_file!("sample.heic");
///     let bytes = std::fs::read(path).unwrap();
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: sample '{}' not found (searched {:?}; set {})",
                    $name,
                    $crate::sample_dirs(),
                    $crate::TEST_DATA_ENV
                );
                return;
            }
        }
    };
}

/// Difference between two values when it exceeds `epsilon`.
#[doc(hidden)]
pub fn approx_mismatch(left: f64, right: f64, epsilon: f64) -> Option<f64> {
    let diff = (left - right).abs();
    // NaN never compares within tolerance
    (diff.is_nan() || diff > epsilon).then_some(diff)
}

/// Assert two floats are within `epsilon` of each other.
///
/// ```
/// test_utils::assert_approx_eq!(1.0001, 1.0, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        if let Some(diff) = $crate::approx_mismatch(left, right, epsilon) {
            panic!(
                "assertion failed: {} ≈ {}\n  left: {:?}\n right: {:?}\n  diff: {:?} (epsilon {:?})",
                stringify!($left),
                stringify!($right),
                left,
                right,
                diff,
                epsilon
            );
        }
    }};
}

/// Assert two `(x, y)` pairs are within `epsilon` on both axes.
///
/// ```
/// test_utils::assert_coords_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (x1, y1) = $left;
        let (x2, y2) = $right;
        $crate::assert_approx_eq!(x1, x2, $epsilon);
        $crate::assert_approx_eq!(y1, y2, $epsilon);
    }};
}
