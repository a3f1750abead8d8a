//! # Neuron-Astrocyte Dynamics
//!
//! The numerical core: initial conditions plus the Euler integration loop for
//! the coupled neural / synaptic / astrocyte state.
//!
//! ## State
//!
//! | Symbol | Shape | Meaning |
//! |--------|-------|---------|
//! | `x` | N | neural state (pre-nonlinearity) |
//! | `S` | N×N | synaptic coupling |
//! | `P` | N×N | astrocyte coupling |
//!
//! `S` and `P` start symmetric and every update is symmetric, so they stay
//! symmetric up to rounding. [`NetworkState::symmetry_drift`] measures it.
//!
//! ## Example
//!
//! ```ignore
//! use astromem::backend::CpuBackend;
//! use astromem::dynamics::{initial_state, Integrator, ProgressLog};
//!
//! let mut state = initial_state(mem.view(), x0.view(), &bank, 5.0, &CpuBackend)?;
//! let mut integrator = Integrator::new(&bank, &CpuBackend, 5.0, 0.05);
//! integrator.run(&mut state, 1000, &mut ProgressLog::new(100, 1000))?;
//! ```

// Coupled state triple and diagnostics
mod state;
pub use state::{NetworkState, StateField, SymmetryDrift};

// Factorized memory contraction
pub mod contraction;
pub use contraction::contract;

// Initial-condition solver
mod initial;
pub use initial::initial_state;

// Step hooks
mod observer;
pub use observer::{NoopObserver, ProgressLog, StepObserver};

// Euler integrator
mod integrator;
pub use integrator::Integrator;
