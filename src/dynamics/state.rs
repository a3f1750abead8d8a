//! Coupled network state
//!
//! The triple `(x, S, P)` is a single object: created by the initial-condition
//! solver, advanced in place by the integrator, then only read.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::{AstroError, Result};

/// Which part of the coupled state a diagnostic refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateField {
    /// Neural activation vector `x`
    Neural,
    /// Synaptic coupling matrix `S`
    Synaptic,
    /// Astrocyte coupling matrix `P`
    Astrocyte,
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Neural => "neural (x)",
            Self::Synaptic => "synaptic (S)",
            Self::Astrocyte => "astrocyte (P)",
        };
        f.write_str(name)
    }
}

/// Relative asymmetry of the two coupling matrices
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymmetryDrift {
    /// `‖S - Sᵀ‖ / ‖S‖` over finite entries
    pub synaptic: f64,
    /// `‖P - Pᵀ‖ / ‖P‖` over finite entries
    pub astrocyte: f64,
}

impl SymmetryDrift {
    /// Largest of the two drifts
    pub fn max(&self) -> f64 {
        self.synaptic.max(self.astrocyte)
    }
}

/// Neural vector plus synaptic and astrocyte coupling matrices
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkState {
    /// Neural state (pre-nonlinearity), length N
    pub x: Array1<f64>,
    /// Synaptic coupling, N×N
    pub s: Array2<f64>,
    /// Astrocyte coupling, N×N
    pub p: Array2<f64>,
}

impl NetworkState {
    /// Assemble a state, checking that `S` and `P` are N×N for N = `x.len()`.
    pub fn new(x: Array1<f64>, s: Array2<f64>, p: Array2<f64>) -> Result<Self> {
        let n = x.len();
        for m in [&s, &p] {
            if m.dim() != (n, n) {
                return Err(AstroError::ShapeMismatch {
                    expected: vec![n, n],
                    actual: m.shape().to_vec(),
                });
            }
        }
        Ok(Self { x, s, p })
    }

    /// Neuron count (N)
    pub fn n(&self) -> usize {
        self.x.len()
    }

    /// Neural activation `h = tanh(β x)`
    pub fn activation(&self, beta: f64) -> Array1<f64> {
        self.x.mapv(|v| (beta * v).tanh())
    }

    /// Measure how far `S` and `P` have drifted from symmetry.
    ///
    /// Pairs where either entry is non-finite are skipped, so a saturated
    /// astrocyte diagonal does not poison the measurement.
    pub fn symmetry_drift(&self) -> SymmetryDrift {
        SymmetryDrift {
            synaptic: relative_asymmetry(self.s.view()),
            astrocyte: relative_asymmetry(self.p.view()),
        }
    }

    /// First field holding a value the integrator cannot continue from.
    ///
    /// `x` and `S` must be finite everywhere. `P` may hold ±∞ (a saturated
    /// coupling, which `tanh` maps to ±1) but never NaN.
    pub fn first_non_finite(&self) -> Option<StateField> {
        if self.x.iter().any(|v| !v.is_finite()) {
            Some(StateField::Neural)
        } else if self.s.iter().any(|v| !v.is_finite()) {
            Some(StateField::Synaptic)
        } else if self.p.iter().any(|v| v.is_nan()) {
            Some(StateField::Astrocyte)
        } else {
            None
        }
    }

    /// True when every off-diagonal entry of `P` is finite
    pub fn astrocyte_off_diagonal_finite(&self) -> bool {
        self.p
            .indexed_iter()
            .all(|((i, j), v)| i == j || v.is_finite())
    }
}

fn relative_asymmetry(m: ArrayView2<'_, f64>) -> f64 {
    let n = m.nrows();
    let mut diff = 0.0;
    let mut norm = 0.0;
    for i in 0..n {
        for j in 0..n {
            let (a, b) = (m[[i, j]], m[[j, i]]);
            if !a.is_finite() || !b.is_finite() {
                continue;
            }
            diff += (a - b) * (a - b);
            norm += a * a;
        }
    }
    if norm == 0.0 {
        0.0
    } else {
        (diff / norm).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_rejects_bad_shapes() {
        let x = array![1.0, -1.0];
        let ok = Array2::zeros((2, 2));
        let bad = Array2::zeros((2, 3));

        assert!(NetworkState::new(x.clone(), ok.clone(), ok.clone()).is_ok());
        assert!(NetworkState::new(x.clone(), bad.clone(), ok.clone()).is_err());
        assert!(NetworkState::new(x, ok, bad).is_err());
    }

    #[test]
    fn test_symmetry_drift() {
        let x = array![0.0, 0.0];
        let sym = array![[1.0, 2.0], [2.0, 1.0]];
        let skew = array![[1.0, 2.0], [0.0, 1.0]];
        let state = NetworkState::new(x, sym, skew).unwrap();

        let drift = state.symmetry_drift();
        assert_eq!(drift.synaptic, 0.0);
        // ‖P - Pᵀ‖² = 8, ‖P‖² = 6
        assert!((drift.astrocyte - (8.0_f64 / 6.0).sqrt()).abs() < 1e-12);
        assert_eq!(drift.max(), drift.astrocyte);
    }

    #[test]
    fn test_saturated_astrocyte_diagonal_is_tolerated() {
        let x = array![0.5, -0.5];
        let s = Array2::zeros((2, 2));
        let p = array![[f64::NEG_INFINITY, 0.2], [0.2, f64::NEG_INFINITY]];
        let state = NetworkState::new(x, s, p).unwrap();

        assert_eq!(state.first_non_finite(), None);
        assert!(state.astrocyte_off_diagonal_finite());
        assert_eq!(state.symmetry_drift().astrocyte, 0.0);
    }

    #[test]
    fn test_nan_is_reported() {
        let x = array![0.5, f64::NAN];
        let s = Array2::zeros((2, 2));
        let p = Array2::zeros((2, 2));
        let state = NetworkState::new(x, s, p).unwrap();
        assert_eq!(state.first_non_finite(), Some(StateField::Neural));

        let mut state = state;
        state.x[1] = 0.0;
        state.p[[0, 1]] = f64::NAN;
        assert_eq!(state.first_non_finite(), Some(StateField::Astrocyte));
    }
}
