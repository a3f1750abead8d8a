//! # Astromem - Neuron-Astrocyte Associative Memory
//!
//! Continuous-time simulation of a neuron-astrocyte associative memory:
//! a neural state vector coupled to synaptic and astrocyte matrices, driven by
//! a 4th-order contraction over the stored ±1 patterns, integrated with
//! fixed-step Euler to test recall from a corrupted seed.
//!
//! ## Pipeline
//!
//! 1. **Field**: sample the memory bank (N×K, ±1) and a corruption mask
//! 2. **Initial state**: solve `(x0, S0, P0)` next to the seeded memory's fixed point
//! 3. **Integrate**: `num_steps` Euler steps of the coupled ODEs
//! 4. **Report**: compare `sign(x_final)` with the target memory
//!
//! ## Design Principles
//!
//! - **Factorized contraction**: O(N²K) per step, never the O(N⁴) direct sum
//! - **Injected backend**: dense kernels go through [`TensorBackend`], no global device
//! - **Hooks, not printing**: progress is a [`StepObserver`]
//! - **Reproducible**: every run is driven by one seeded ChaCha8 stream
//!
//! ## Example
//!
//! ```no_run
//! use astromem::{run_simulation, SimConfig};
//!
//! let config = SimConfig::default().with_seed(7);
//! let outcome = run_simulation(&config)?;
//! println!("{}", outcome.report);
//! # Ok::<(), astromem::AstroError>(())
//! ```

// Error types
mod error;
pub use error::{AstroError, Result};

// Run configuration
pub mod config;
pub use config::SimConfig;

// Random field generator
pub mod field;
pub use field::{corrupt, generate_corruption_vector, generate_memory_bank, MemoryBank};

// Execution backends
pub mod backend;
#[cfg(feature = "parallel")]
pub use backend::RayonBackend;
pub use backend::{CpuBackend, TensorBackend};

// Numerical core
pub mod dynamics;
pub use dynamics::{
    initial_state, Integrator, NetworkState, NoopObserver, ProgressLog, StateField,
    StepObserver, SymmetryDrift,
};

// Convergence reporting
pub mod report;
pub use report::{hamming_distance, l2_distance, sign_vector, RecallReport};

// Single-run wiring
pub mod simulation;
pub use simulation::{recall, run_simulation, run_simulation_with, SimulationOutcome};
