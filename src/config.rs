//! Simulation configuration
//!
//! One [`SimConfig`] describes one recall run. It is plain data: serde
//! deserializable (missing fields fall back to the defaults) and checked by
//! [`SimConfig::validate`] before any tensor is allocated.
//!
//! ```json
//! { "n": 500, "k": 10, "num_steps": 1000, "dt": 0.05, "beta": 5.0,
//!   "corruption": 0.1, "memory_to_seed_from": 2, "seed": 7 }
//! ```

use std::fs;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AstroError, Result};

/// Recall run configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Neuron count (N)
    pub n: usize,
    /// Stored memory count (K)
    pub k: usize,
    /// Euler steps to integrate
    pub num_steps: u64,
    /// Step size
    pub dt: f64,
    /// Nonlinearity gain (β)
    pub beta: f64,
    /// Probability of flipping each neuron of the seed memory
    pub corruption: f64,
    /// Index of the memory to recall, in `0..k`
    pub memory_to_seed_from: usize,
    /// RNG seed; `None` draws a fresh seed (logged so the run can be repeated)
    pub seed: Option<u64>,
    /// Fail the run when the state stops being finite
    pub check_finite: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::tutorial()
    }
}

impl SimConfig {
    /// The reference recall scenario: N=500, K=10, β=5, 10% corruption,
    /// 1000 steps of dt=0.05, seeded from memory 2.
    pub fn tutorial() -> Self {
        Self {
            n: 500,
            k: 10,
            num_steps: 1000,
            dt: 0.05,
            beta: 5.0,
            corruption: 0.1,
            memory_to_seed_from: 2,
            seed: None,
            check_finite: true,
        }
    }

    /// Set network size
    pub fn with_size(mut self, n: usize, k: usize) -> Self {
        self.n = n;
        self.k = k;
        self
    }

    /// Set integration horizon
    pub fn with_steps(mut self, num_steps: u64, dt: f64) -> Self {
        self.num_steps = num_steps;
        self.dt = dt;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_corruption(mut self, corruption: f64) -> Self {
        self.corruption = corruption;
        self
    }

    pub fn with_memory(mut self, memory_to_seed_from: usize) -> Self {
        self.memory_to_seed_from = memory_to_seed_from;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations the dynamics are undefined for.
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(AstroError::invalid_config("n", "must be at least 1"));
        }
        if self.k == 0 {
            return Err(AstroError::invalid_config("k", "must be at least 1"));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(AstroError::invalid_config(
                "dt",
                format!("must be finite and > 0, got {}", self.dt),
            ));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(AstroError::invalid_config(
                "beta",
                format!("must be finite and > 0, got {}", self.beta),
            ));
        }
        if !(0.0..=1.0).contains(&self.corruption) {
            return Err(AstroError::invalid_config(
                "corruption",
                format!("must be within [0, 1], got {}", self.corruption),
            ));
        }
        if self.memory_to_seed_from >= self.k {
            return Err(AstroError::invalid_config(
                "memory_to_seed_from",
                format!("must be below k = {}, got {}", self.k, self.memory_to_seed_from),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Seed to use for this run, drawing one when none is configured
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::thread_rng().gen())
    }

    /// Reproducible RNG for a run with the given seed
    pub fn rng_for(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn field_of(err: AstroError) -> &'static str {
        match err {
            AstroError::InvalidConfig { field, .. } => field,
            other => panic!("expected InvalidConfig, got {other}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config, SimConfig::tutorial());
        assert!(config.validate().is_ok());
        assert_eq!(config.n, 500);
        assert_eq!(config.memory_to_seed_from, 2);
    }

    #[test]
    fn test_each_invalid_field_is_named() {
        let base = SimConfig::default().with_size(16, 3).with_memory(0);

        let cases: Vec<(SimConfig, &str)> = vec![
            (base.clone().with_size(0, 3), "n"),
            (base.clone().with_size(16, 0), "k"),
            (base.clone().with_steps(10, 0.0), "dt"),
            (base.clone().with_steps(10, -0.1), "dt"),
            (base.clone().with_steps(10, f64::NAN), "dt"),
            (base.clone().with_beta(0.0), "beta"),
            (base.clone().with_beta(f64::INFINITY), "beta"),
            (base.clone().with_corruption(-0.01), "corruption"),
            (base.clone().with_corruption(1.5), "corruption"),
            (base.clone().with_memory(3), "memory_to_seed_from"),
        ];

        for (config, expected) in cases {
            let err = config.validate().unwrap_err();
            assert_eq!(field_of(err), expected);
        }
    }

    #[test]
    fn test_corruption_endpoints_are_valid() {
        let base = SimConfig::default();
        assert!(base.clone().with_corruption(0.0).validate().is_ok());
        assert!(base.with_corruption(1.0).validate().is_ok());
    }

    #[test]
    fn test_json_partial_fields_use_defaults() {
        let config = SimConfig::from_json_str(r#"{ "n": 64, "k": 3, "memory_to_seed_from": 1, "seed": 9 }"#).unwrap();
        assert_eq!(config.n, 64);
        assert_eq!(config.k, 3);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.dt, 0.05);
        assert!(config.check_finite);
    }

    #[test]
    fn test_json_is_validated() {
        let err = SimConfig::from_json_str(r#"{ "k": 2, "memory_to_seed_from": 2 }"#).unwrap_err();
        assert_eq!(field_of(err), "memory_to_seed_from");

        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, AstroError::ConfigParse(_)));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let config = SimConfig::default().with_size(32, 4).with_seed(77);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string_pretty(&config).unwrap().as_bytes())
            .unwrap();

        let loaded = SimConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::from_json_file("definitely/does/not/exist.json").unwrap_err();
        assert!(matches!(err, AstroError::Io(_)));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = SimConfig::default().with_seed(5);
        assert_eq!(config.effective_seed(), 5);

        let a: Vec<u32> = (0..4).map(|_| SimConfig::rng_for(5).gen()).collect();
        let mut rng = SimConfig::rng_for(5);
        let first: u32 = rng.gen();
        assert!(a.iter().all(|&v| v == first));
    }
}
