//! Convergence reporting
//!
//! Compares the sign of the neural state against the target memory. Reads the
//! state only, never mutates it.

use std::fmt;

use ndarray::{Array1, ArrayView1, Zip};

use crate::error::{AstroError, Result};

/// Elementwise sign with `sign(0) = 0`
pub fn sign_vector(x: ArrayView1<'_, f64>) -> Array1<f64> {
    x.mapv(|v| {
        if v > 0.0 {
            1.0
        } else if v < 0.0 {
            -1.0
        } else {
            0.0
        }
    })
}

fn check_lengths(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(AstroError::ShapeMismatch {
            expected: vec![expected],
            actual: vec![actual],
        });
    }
    Ok(())
}

/// Euclidean distance `‖a - b‖₂`
pub fn l2_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Result<f64> {
    check_lengths(b.len(), a.len())?;
    let mut acc = 0.0;
    Zip::from(&a).and(&b).for_each(|&x, &y| acc += (x - y) * (x - y));
    Ok(acc.sqrt())
}

/// Number of positions where `sign(x)` disagrees with the ±1 pattern `mem`
pub fn hamming_distance(x: ArrayView1<'_, f64>, mem: ArrayView1<'_, f64>) -> Result<usize> {
    check_lengths(mem.len(), x.len())?;
    let mut count = 0;
    Zip::from(&x).and(&mem).for_each(|&v, &m| {
        if v * m <= 0.0 {
            count += 1;
        }
    });
    Ok(count)
}

/// Recall outcome of one run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecallReport {
    /// `‖sign(x0) - mem‖₂`
    pub initial_distance: f64,
    /// `‖sign(x_final) - mem‖₂`
    pub final_distance: f64,
    /// Corrupted entries at the start
    pub initial_flipped: usize,
    /// Entries of `sign(x_final)` that disagree with the memory
    pub final_flipped: usize,
}

impl RecallReport {
    /// Compare both states against `mem`; every vector must have the same length.
    pub fn new(
        mem: ArrayView1<'_, f64>,
        x_initial: ArrayView1<'_, f64>,
        x_final: ArrayView1<'_, f64>,
    ) -> Result<Self> {
        Ok(Self {
            initial_distance: l2_distance(sign_vector(x_initial).view(), mem)?,
            final_distance: l2_distance(sign_vector(x_final).view(), mem)?,
            initial_flipped: hamming_distance(x_initial, mem)?,
            final_flipped: hamming_distance(x_final, mem)?,
        })
    }

    /// True when the final sign pattern equals the memory exactly
    pub fn recalled(&self) -> bool {
        self.final_flipped == 0
    }
}

impl fmt::Display for RecallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "distance {:.3} -> {:.3} ({} -> {} wrong), {}",
            self.initial_distance,
            self.final_distance,
            self.initial_flipped,
            self.final_flipped,
            if self.recalled() { "recalled" } else { "not recalled" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sign_of_zero_is_zero() {
        assert_eq!(sign_vector(array![2.5, -0.1, 0.0].view()), array![1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_single_flip_distance_is_two() {
        let mem = array![1.0, -1.0, 1.0, 1.0];
        let x = array![0.3, -2.0, -0.7, 4.0];

        assert_eq!(l2_distance(sign_vector(x.view()).view(), mem.view()).unwrap(), 2.0);
        assert_eq!(hamming_distance(x.view(), mem.view()).unwrap(), 1);
    }

    #[test]
    fn test_zero_entry_counts_as_wrong() {
        let mem = array![1.0, -1.0];
        let x = array![0.0, -1.0];
        assert_eq!(hamming_distance(x.view(), mem.view()).unwrap(), 1);
        assert_eq!(l2_distance(sign_vector(x.view()).view(), mem.view()).unwrap(), 1.0);
    }

    #[test]
    fn test_report() {
        let mem = array![1.0, -1.0, 1.0, -1.0];
        let x0 = array![-1.0, -1.0, 1.0, 1.0];
        let x1 = array![3.0, -3.0, 3.0, -3.0];

        let report = RecallReport::new(mem.view(), x0.view(), x1.view()).unwrap();
        assert_eq!(report.initial_flipped, 2);
        assert!((report.initial_distance - 8.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(report.final_distance, 0.0);
        assert!(report.recalled());
        assert!(!report.to_string().contains("not recalled"));
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let mem = array![1.0, -1.0, 1.0];
        let short = array![1.0, -1.0];

        assert!(matches!(
            l2_distance(short.view(), mem.view()),
            Err(AstroError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            hamming_distance(short.view(), mem.view()),
            Err(AstroError::ShapeMismatch { .. })
        ));
        assert!(RecallReport::new(mem.view(), mem.view(), short.view()).is_err());
    }
}
