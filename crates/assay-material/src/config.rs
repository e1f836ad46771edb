//! Simulation configuration.
//!
//! Provides [`SimConfig`] with defaults for the clock, the decay step and the
//! negligibility threshold used by composition arithmetic.

use std::fmt;
use std::str::FromStr;

use assay_core::SimTime;
use assay_core::constants::{DEFAULT_STEP_SECONDS, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Whether materials age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayMode {
    /// Decay is applied when a caller asks for it (`decay` / `decay_all`).
    #[default]
    Manual,
    /// Decay calls are no-ops.
    Never,
}

impl fmt::Display for DecayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Manual => "manual",
            Self::Never => "never",
        })
    }
}

impl FromStr for DecayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown decay mode '{other}' (expected manual or never)")),
        }
    }
}

/// Configuration for one simulation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Clock value when the context is built.
    pub start_time: SimTime,
    /// Seconds covered by one time step (used by the default decay engine).
    pub step_seconds: u64,
    /// Whether materials age.
    pub decay_mode: DecayMode,
    /// Negligibility threshold for composition arithmetic, in kilograms.
    pub threshold: f64,
    /// Log level filter string (e.g. "info", "debug", "assay_material=trace").
    pub log_level: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_time: 0,
            step_seconds: DEFAULT_STEP_SECONDS,
            decay_mode: DecayMode::Manual,
            threshold: DEFAULT_THRESHOLD,
            log_level: "info".to_string(),
        }
    }
}

impl SimConfig {
    /// Whether decay calls do any work.
    pub fn decays(&self) -> bool {
        self.decay_mode != DecayMode::Never
    }
}
