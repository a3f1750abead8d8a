//! Initial-Condition Solver
//!
//! Builds the starting triple from a corrupted memory `x0` so that the
//! coupling matrices already sit next to a fixed point of the dynamics:
//!
//! ```text
//! ψ0 = -tanh(βx0) tanh(βx0)ᵀ
//! P0 = atanh(ψ0) / β
//! S0 = atanh(-C(η, ψ0) / N³) / β
//! ```
//!
//! ## Saturated diagonal
//!
//! When `|tanh(βx0_i)|` rounds to exactly 1 (large β), `ψ0[i,i] = -1` and
//! `P0[i,i] = -∞`. That value is kept as is: `tanh` maps it straight back to -1
//! and the integrator's decay-form update keeps it from turning into NaN.

use log::{debug, warn};
use ndarray::{Array2, ArrayView1};

use crate::backend::TensorBackend;
use crate::error::{AstroError, Result};
use crate::field::MemoryBank;

use super::contraction::contract;
use super::NetworkState;

/// Solve for `(x0, S0, P0)` given the target memory and its corrupted copy.
///
/// `mem` is only used to check shapes and report how corrupted the seed is;
/// the coupling matrices depend on `x0` and the bank.
pub fn initial_state(
    mem: ArrayView1<'_, f64>,
    x0: ArrayView1<'_, f64>,
    bank: &MemoryBank,
    beta: f64,
    backend: &dyn TensorBackend,
) -> Result<NetworkState> {
    let n = bank.n();
    for len in [mem.len(), x0.len()] {
        if len != n {
            return Err(AstroError::ShapeMismatch {
                expected: vec![n],
                actual: vec![len],
            });
        }
    }

    let flipped = mem.iter().zip(x0.iter()).filter(|(m, x)| m != x).count();
    debug!(
        "Solving initial state: N={}, K={}, beta={}, {} of {} entries corrupted",
        n,
        bank.k(),
        beta,
        flipped,
        n
    );

    let h0 = x0.mapv(|v| (beta * v).tanh());
    let psi0 = backend.outer(h0.view(), h0.view()).mapv(|v| -v);

    let p0 = psi0.mapv(|v| v.atanh() / beta);
    let saturated = count_non_finite(&p0);
    if saturated > 0 {
        debug!(
            "{} astrocyte couplings saturated at initialisation (|ψ0| = 1)",
            saturated
        );
    }

    let scale = -1.0 / (n as f64).powi(3);
    let mut drive = contract(backend, bank.patterns(), psi0.view());
    drive *= scale;
    let out_of_domain = drive.iter().filter(|v| v.abs() > 1.0).count();
    if out_of_domain > 0 {
        warn!(
            "{} synaptic couplings outside the atanh domain at initialisation (K={} is large for N={})",
            out_of_domain,
            bank.k(),
            n
        );
    }
    let s0 = drive.mapv(|v| v.atanh() / beta);

    NetworkState::new(x0.to_owned(), s0, p0)
}

fn count_non_finite(m: &Array2<f64>) -> usize {
    m.iter().filter(|v| !v.is_finite()).count()
}
