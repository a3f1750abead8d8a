//! Execution backends for the dense tensor arithmetic
//!
//! The dynamics never touch a global device setting. Every dense kernel the
//! solver and integrator need goes through a [`TensorBackend`] passed in by
//! the caller.
//!
//! | Backend | Availability | Notes |
//! |---------|--------------|-------|
//! | [`CpuBackend`] | always | single-threaded ndarray kernels |
//! | `RayonBackend` | `parallel` feature | row-parallel kernels on the rayon pool |

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut2, Zip};

/// Dense tensor kernels used by one simulation step.
pub trait TensorBackend: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Matrix-matrix product `a · b`
    fn mat_mul(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Array2<f64>;

    /// Matrix-vector product `a · v`
    fn mat_vec(&self, a: ArrayView2<'_, f64>, v: ArrayView1<'_, f64>) -> Array1<f64>;

    /// Outer product `a bᵀ`
    fn outer(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Array2<f64>;

    /// Elementwise `tanh(gain · a)`
    fn tanh_scaled(&self, a: ArrayView2<'_, f64>, gain: f64) -> Array2<f64>;

    /// Euler leak step `m ← (1 - dt)·m + dt·drive`, i.e. `m += dt·(drive - m)`.
    ///
    /// Written in the decay form so an infinite entry stays infinite instead
    /// of evaluating `∞ - ∞`.
    fn relax(&self, m: ArrayViewMut2<'_, f64>, drive: ArrayView2<'_, f64>, dt: f64);
}

/// Sequential ndarray backend
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackend;

impl TensorBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn mat_mul(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Array2<f64> {
        a.dot(&b)
    }

    fn mat_vec(&self, a: ArrayView2<'_, f64>, v: ArrayView1<'_, f64>) -> Array1<f64> {
        a.dot(&v)
    }

    fn outer(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Array2<f64> {
        Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
    }

    fn tanh_scaled(&self, a: ArrayView2<'_, f64>, gain: f64) -> Array2<f64> {
        a.mapv(|v| (gain * v).tanh())
    }

    fn relax(&self, m: ArrayViewMut2<'_, f64>, drive: ArrayView2<'_, f64>, dt: f64) {
        let decay = 1.0 - dt;
        Zip::from(m)
            .and(drive)
            .for_each(|m, &d| *m = decay * *m + dt * d);
    }
}

/// Row-parallel backend on the global rayon pool
#[cfg(feature = "parallel")]
#[derive(Clone, Copy, Debug, Default)]
pub struct RayonBackend;

#[cfg(feature = "parallel")]
impl TensorBackend for RayonBackend {
    fn name(&self) -> &'static str {
        "rayon"
    }

    fn mat_mul(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = Array2::zeros((a.nrows(), b.ncols()));
        let bt = b.t();
        Zip::from(out.rows_mut())
            .and(a.rows())
            .par_for_each(|mut row, a_row| row.assign(&bt.dot(&a_row)));
        out
    }

    fn mat_vec(&self, a: ArrayView2<'_, f64>, v: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = Array1::zeros(a.nrows());
        Zip::from(&mut out)
            .and(a.rows())
            .par_for_each(|o, row| *o = row.dot(&v));
        out
    }

    fn outer(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Array2<f64> {
        let mut out = Array2::zeros((a.len(), b.len()));
        Zip::indexed(&mut out).par_for_each(|(i, j), o| *o = a[i] * b[j]);
        out
    }

    fn tanh_scaled(&self, a: ArrayView2<'_, f64>, gain: f64) -> Array2<f64> {
        let mut out = Array2::zeros(a.raw_dim());
        Zip::from(&mut out)
            .and(a)
            .par_for_each(|o, &v| *o = (gain * v).tanh());
        out
    }

    fn relax(&self, m: ArrayViewMut2<'_, f64>, drive: ArrayView2<'_, f64>, dt: f64) {
        let decay = 1.0 - dt;
        Zip::from(m)
            .and(drive)
            .par_for_each(|m, &d| *m = decay * *m + dt * d);
    }
}
