//! Single recall run
//!
//! Wires the pipeline for one configuration:
//!
//! ```text
//! field (bank, mask) -> initial_state -> Integrator::run -> RecallReport
//! ```
//!
//! [`run_simulation`] samples its own bank. [`recall`] takes an existing bank,
//! so independent runs can share one immutable bank by reference.

use log::info;
use ndarray::{Array1, Array2, ArrayView1};

use crate::backend::{CpuBackend, TensorBackend};
use crate::config::SimConfig;
use crate::dynamics::{initial_state, Integrator, NetworkState, NoopObserver, StepObserver};
use crate::error::{AstroError, Result};
use crate::field::{corrupt, generate_corruption_vector, generate_memory_bank, MemoryBank};
use crate::report::RecallReport;

/// Everything a finished run exposes to its consumers
#[derive(Clone, Debug)]
pub struct SimulationOutcome {
    /// Final `(x, S, P)`
    pub state: NetworkState,
    /// `tanh(β x_final)`
    pub h_final: Array1<f64>,
    /// Corrupted seed `x0`
    pub x_initial: Array1<f64>,
    /// Memory the run tried to recall
    pub target: Array1<f64>,
    /// Seed the bank and mask were drawn with (`None` for [`recall`])
    pub seed: Option<u64>,
    pub report: RecallReport,
}

impl SimulationOutcome {
    pub fn x_final(&self) -> &Array1<f64> {
        &self.state.x
    }

    pub fn s_final(&self) -> &Array2<f64> {
        &self.state.s
    }

    pub fn p_final(&self) -> &Array2<f64> {
        &self.state.p
    }
}

/// Run one recall on the CPU backend with no step hook.
pub fn run_simulation(config: &SimConfig) -> Result<SimulationOutcome> {
    run_simulation_with(config, &CpuBackend, &mut NoopObserver)
}

/// Run one recall with an injected backend and step observer.
///
/// Samples the bank first, then the corruption mask, from a ChaCha8 stream
/// seeded by the config, so equal configs with equal seeds replay exactly.
pub fn run_simulation_with<O>(
    config: &SimConfig,
    backend: &dyn TensorBackend,
    observer: &mut O,
) -> Result<SimulationOutcome>
where
    O: StepObserver + ?Sized,
{
    config.validate()?;

    let seed = config.effective_seed();
    info!(
        "Recall run: N={}, K={}, memory {}, corruption {}, seed {}",
        config.n, config.k, config.memory_to_seed_from, config.corruption, seed
    );

    let mut rng = SimConfig::rng_for(seed);
    let bank = generate_memory_bank(config.n, config.k, &mut rng);
    let mask = generate_corruption_vector(config.n, config.corruption, &mut rng);

    let mut outcome = recall(config, &bank, mask.view(), backend, observer)?;
    outcome.seed = Some(seed);
    Ok(outcome)
}

/// Recall `config.memory_to_seed_from` from `bank`, corrupted by `mask`.
///
/// The bank must be `config.n × config.k`.
pub fn recall<O>(
    config: &SimConfig,
    bank: &MemoryBank,
    mask: ArrayView1<'_, f64>,
    backend: &dyn TensorBackend,
    observer: &mut O,
) -> Result<SimulationOutcome>
where
    O: StepObserver + ?Sized,
{
    config.validate()?;
    if (bank.n(), bank.k()) != (config.n, config.k) {
        return Err(AstroError::ShapeMismatch {
            expected: vec![config.n, config.k],
            actual: vec![bank.n(), bank.k()],
        });
    }

    let target = bank
        .column(config.memory_to_seed_from)
        .ok_or_else(|| AstroError::invalid_config("memory_to_seed_from", "outside the bank"))?
        .to_owned();
    let x0 = corrupt(target.view(), mask)?;

    let mut state = initial_state(target.view(), x0.view(), bank, config.beta, backend)?;
    let mut integrator = Integrator::new(bank, backend, config.beta, config.dt)
        .with_finite_check(config.check_finite);
    integrator.run(&mut state, config.num_steps, observer)?;

    let h_final = state.activation(config.beta);
    let report = RecallReport::new(target.view(), x0.view(), state.x.view())?;
    info!("Recall finished after {} steps: {}", integrator.steps_taken(), report);

    Ok(SimulationOutcome {
        state,
        h_final,
        x_initial: x0,
        target,
        seed: None,
        report,
    })
}
