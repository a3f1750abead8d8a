//! Memory contraction
//!
//! The astrocyte drive couples every pair of neurons through every stored
//! pattern:
//!
//! ```text
//! C[i,j] = Σ_m Σ_{k,l} η[i,m] η[j,m] η[k,m] η[l,m] ψ[k,l]
//! ```
//!
//! Summed directly this is O(N⁴K). It factorizes per pattern:
//!
//! ```text
//! v_m    = η_mᵀ ψ η_m                  (Y = ψ·η,  v_m = Σ_i η[i,m] Y[i,m])
//! C[i,j] = Σ_m η[i,m] η[j,m] v_m       (C = (η ⊙ v) · ηᵀ)
//! ```
//!
//! which is two dense products, O(N²K). The pattern bank is fixed for a run but
//! ψ changes every step, so nothing here is cached between calls.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::backend::TensorBackend;

/// Per-pattern quadratic forms `v_m = η_mᵀ ψ η_m`
pub fn pattern_energies(
    backend: &dyn TensorBackend,
    etas: ArrayView2<'_, f64>,
    psi: ArrayView2<'_, f64>,
) -> Array1<f64> {
    let projected = backend.mat_mul(psi, etas);
    (&etas * &projected).sum_axis(Axis(0))
}

/// Factorized contraction `C = (η ⊙ v) · ηᵀ`, unscaled.
pub fn contract(
    backend: &dyn TensorBackend,
    etas: ArrayView2<'_, f64>,
    psi: ArrayView2<'_, f64>,
) -> Array2<f64> {
    let energies = pattern_energies(backend, etas, psi);
    let weighted = &etas * &energies;
    backend.mat_mul(weighted.view(), etas.t())
}

/// Direct O(N⁴K) summation of the same contraction.
///
/// Only meant for checking [`contract`] on small banks.
pub fn contract_naive(etas: ArrayView2<'_, f64>, psi: ArrayView2<'_, f64>) -> Array2<f64> {
    let (n, k) = etas.dim();
    Array2::from_shape_fn((n, n), |(i, j)| {
        let mut acc = 0.0;
        for m in 0..k {
            let pair = etas[[i, m]] * etas[[j, m]];
            for a in 0..n {
                for b in 0..n {
                    acc += pair * etas[[a, m]] * etas[[b, m]] * psi[[a, b]];
                }
            }
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::field::generate_memory_bank;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
        (a - b).mapv(f64::abs).fold(0.0_f64, |acc, &d| acc.max(d))
    }

    fn random_psi(n: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
        let raw = Array2::from_shape_fn((n, n), |_| rng.gen_range(-1.0..1.0));
        // symmetric like every ψ the integrator produces
        (&raw + &raw.t()) * 0.5
    }

    #[test]
    fn test_factorized_matches_naive_small() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let bank = generate_memory_bank(4, 2, &mut rng);
        let psi = random_psi(4, &mut rng);

        let fast = contract(&CpuBackend, bank.patterns(), psi.view());
        let slow = contract_naive(bank.patterns(), psi.view());
        assert!(max_abs_diff(&fast, &slow) < 1e-6);
    }

    #[test]
    fn test_factorized_matches_naive_asymmetric_psi() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let bank = generate_memory_bank(9, 3, &mut rng);
        let psi = Array2::from_shape_fn((9, 9), |_| rng.gen_range(-1.0..1.0));

        let fast = contract(&CpuBackend, bank.patterns(), psi.view());
        let slow = contract_naive(bank.patterns(), psi.view());
        assert!(max_abs_diff(&fast, &slow) < 1e-9);
    }

    #[test]
    fn test_contraction_is_symmetric() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let bank = generate_memory_bank(16, 4, &mut rng);
        let psi = random_psi(16, &mut rng);

        let c = contract(&CpuBackend, bank.patterns(), psi.view());
        assert!(max_abs_diff(&c, &c.t().to_owned()) < 1e-9);
    }

    #[test]
    fn test_energy_of_outer_product() {
        // ψ = -η_0 η_0ᵀ gives v_0 = -(η_0ᵀ η_0)² = -N²
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let bank = generate_memory_bank(6, 2, &mut rng);
        let eta0 = bank.column(0).unwrap();
        let psi = CpuBackend.outer(eta0, eta0).mapv(|v| -v);

        let energies = pattern_energies(&CpuBackend, bank.patterns(), psi.view());
        assert!((energies[0] + 36.0).abs() < 1e-12);
    }
}
