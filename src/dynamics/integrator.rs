//! Dynamics Integrator
//!
//! Fixed-step explicit Euler over the coupled system:
//!
//! ```text
//! h = tanh(βx)   g = tanh(βS)   ψ = tanh(βP)
//!
//! dx/dt = -x + S·h
//! dS/dt = -S + h hᵀ + ψ
//! dP/dt = -P + C(η, ψ) / N³ + g
//! ```
//!
//! All three drives are evaluated from the same pre-update snapshot before
//! anything is written back. The contraction is recomputed from the current ψ
//! every step (see [`contract`]).

use log::debug;
use ndarray::Zip;

use crate::backend::TensorBackend;
use crate::error::{AstroError, Result};
use crate::field::MemoryBank;

use super::contraction::contract;
use super::{NetworkState, StepObserver};

/// Euler integrator bound to one memory bank and backend
pub struct Integrator<'a> {
    bank: &'a MemoryBank,
    backend: &'a dyn TensorBackend,
    /// Nonlinearity gain
    beta: f64,
    /// Step size
    dt: f64,
    /// 1 / N³
    contraction_scale: f64,
    /// Fail on non-finite state after each step
    check_finite: bool,
    /// Steps applied since construction
    steps_taken: u64,
}

impl<'a> Integrator<'a> {
    pub fn new(bank: &'a MemoryBank, backend: &'a dyn TensorBackend, beta: f64, dt: f64) -> Self {
        Self {
            bank,
            backend,
            beta,
            dt,
            contraction_scale: 1.0 / (bank.n() as f64).powi(3),
            check_finite: true,
            steps_taken: 0,
        }
    }

    /// Enable or disable the per-step finiteness check
    pub fn with_finite_check(mut self, enabled: bool) -> Self {
        self.check_finite = enabled;
        self
    }

    /// Steps applied so far
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Advance `state` by one Euler step.
    pub fn step(&mut self, state: &mut NetworkState) -> Result<()> {
        let n = self.bank.n();
        if state.n() != n {
            return Err(AstroError::ShapeMismatch {
                expected: vec![n],
                actual: vec![state.n()],
            });
        }
        // hand-built states bypass the check in `NetworkState::new`
        for m in [&state.s, &state.p] {
            if m.dim() != (n, n) {
                return Err(AstroError::ShapeMismatch {
                    expected: vec![n, n],
                    actual: m.shape().to_vec(),
                });
            }
        }

        let backend = self.backend;
        let h = state.activation(self.beta);
        let g = backend.tanh_scaled(state.s.view(), self.beta);
        let psi = backend.tanh_scaled(state.p.view(), self.beta);

        let neural_drive = backend.mat_vec(state.s.view(), h.view());

        let mut synaptic_drive = backend.outer(h.view(), h.view());
        synaptic_drive += &psi;

        let mut astrocyte_drive = contract(backend, self.bank.patterns(), psi.view());
        astrocyte_drive *= self.contraction_scale;
        astrocyte_drive += &g;

        let decay = 1.0 - self.dt;
        let dt = self.dt;
        Zip::from(&mut state.x)
            .and(&neural_drive)
            .for_each(|x, &d| *x = decay * *x + dt * d);
        backend.relax(state.s.view_mut(), synaptic_drive.view(), dt);
        backend.relax(state.p.view_mut(), astrocyte_drive.view(), dt);

        self.steps_taken += 1;

        if self.check_finite {
            if let Some(field) = state.first_non_finite() {
                return Err(AstroError::ComputationFailed {
                    step: self.steps_taken,
                    field,
                });
            }
        }
        Ok(())
    }

    /// Apply exactly `num_steps` steps, reporting each to `observer`.
    ///
    /// `num_steps = 0` leaves `state` untouched.
    pub fn run<O>(&mut self, state: &mut NetworkState, num_steps: u64, observer: &mut O) -> Result<()>
    where
        O: StepObserver + ?Sized,
    {
        debug!(
            "Integrating {} steps (dt={}, beta={}, backend={})",
            num_steps,
            self.dt,
            self.beta,
            self.backend.name()
        );
        for _ in 0..num_steps {
            self.step(state)?;
            observer.on_step(self.steps_taken, state);
        }
        Ok(())
    }
}
