//! Random Field Generator
//!
//! Samples the two random inputs of a recall run:
//!
//! - **MemoryBank**: N×K matrix of stored ±1 patterns (one pattern per column)
//! - **Corruption vector**: ±1 mask flipping each neuron with probability `corruption`
//!
//! Both draw from a caller-supplied RNG so a seeded run is reproducible.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use rand::Rng;

use crate::error::{AstroError, Result};

/// Stored memory patterns, immutable once built.
///
/// Rows index neurons, columns index patterns. Every entry is exactly `+1.0`
/// or `-1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryBank {
    patterns: Array2<f64>,
}

impl MemoryBank {
    /// Wrap an explicit pattern matrix, rejecting empty shapes and non-±1 entries.
    pub fn from_array(patterns: Array2<f64>) -> Result<Self> {
        let (n, k) = patterns.dim();
        if n == 0 || k == 0 {
            return Err(AstroError::ShapeMismatch {
                expected: vec![n.max(1), k.max(1)],
                actual: vec![n, k],
            });
        }

        if let Some(((row, col), &value)) = patterns
            .indexed_iter()
            .find(|(_, v)| **v != 1.0 && **v != -1.0)
        {
            return Err(AstroError::InvalidPattern { row, col, value });
        }

        Ok(Self { patterns })
    }

    /// Neuron count (N)
    pub fn n(&self) -> usize {
        self.patterns.nrows()
    }

    /// Stored pattern count (K)
    pub fn k(&self) -> usize {
        self.patterns.ncols()
    }

    /// The full N×K pattern matrix
    pub fn patterns(&self) -> ArrayView2<'_, f64> {
        self.patterns.view()
    }

    /// Pattern `m` as a length-N vector, `None` when `m >= k`
    pub fn column(&self, m: usize) -> Option<ArrayView1<'_, f64>> {
        (m < self.k()).then(|| self.patterns.column(m))
    }
}

/// Sample an N×K bank with each entry independently ±1 at probability 0.5.
pub fn generate_memory_bank<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> MemoryBank {
    let patterns = Array2::from_shape_fn((n, k), |_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 });
    MemoryBank { patterns }
}

/// Sample a ±1 corruption mask of length `len`.
///
/// Each entry draws u ∈ [0, 1) and is +1 when `u <= 1 - corruption`, else -1.
/// A zero keep probability yields -1 unconditionally, so `corruption = 1.0`
/// flips every neuron.
pub fn generate_corruption_vector<R: Rng + ?Sized>(
    len: usize,
    corruption: f64,
    rng: &mut R,
) -> Array1<f64> {
    let keep = 1.0 - corruption;
    Array1::from_shape_fn(len, |_| {
        let u: f64 = rng.gen();
        if keep > 0.0 && u <= keep {
            1.0
        } else {
            -1.0
        }
    })
}

/// Apply a corruption mask to a memory (elementwise product).
pub fn corrupt(mem: ArrayView1<'_, f64>, mask: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    if mem.len() != mask.len() {
        return Err(AstroError::ShapeMismatch {
            expected: vec![mem.len()],
            actual: vec![mask.len()],
        });
    }

    let mut out = Array1::zeros(mem.len());
    Zip::from(&mut out)
        .and(&mem)
        .and(&mask)
        .for_each(|o, &m, &c| *o = m * c);
    Ok(out)
}
