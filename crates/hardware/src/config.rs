//! Configuration system for the verification harness.
//!
//! This module defines the configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline constants (time step, settle bound, artifact paths).
//! 2. **Structures:** Hierarchical config for general run options and DUT driving.
//! 3. **Loading and validation:** JSON parsing with field defaults and
//!    range checks.
//!
//! Configuration is supplied as a JSON file (`--config`) or taken from
//! `HarnessConfig::default()`; command-line flags override individual fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the harness.
mod defaults {
    /// Trace time advance per vector.
    ///
    /// Vector `i` is recorded at `i * TIME_STEP`.
    pub const TIME_STEP: u64 = 10;

    /// Maximum evaluation passes per settle.
    ///
    /// A DUT that still changes its outputs after this many passes is
    /// treated as non-convergent and the run aborts.
    pub const SETTLE_LIMIT: u32 = 16;

    /// Default VCD trace path.
    pub const TRACE_PATH: &str = "trace.vcd";

    /// Default coverage ledger path.
    pub const COVERAGE_PATH: &str = "coverage.json";
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// General run options
    #[serde(default)]
    pub general: GeneralConfig,
    /// DUT driving options
    #[serde(default)]
    pub dut: DutConfig,
}

impl HarnessConfig {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for malformed JSON, or a validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] or [`ConfigError::Parse`] for I/O and JSON
    /// failures, or a validation error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Zero`] if the time step or the settle limit is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.general.time_step == 0 {
            return Err(ConfigError::Zero {
                field: "general.time_step",
            });
        }
        if self.dut.settle_limit == 0 {
            return Err(ConfigError::Zero {
                field: "dut.settle_limit",
            });
        }
        Ok(())
    }
}

/// General run options.
///
/// Controls the optional trace and coverage artifacts and the trace time base.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Write a VCD trace of every vector
    #[serde(default)]
    pub trace: bool,

    /// Trace output path
    #[serde(default = "GeneralConfig::default_trace_path")]
    pub trace_path: PathBuf,

    /// Write a coverage ledger
    #[serde(default)]
    pub coverage: bool,

    /// Coverage ledger path
    #[serde(default = "GeneralConfig::default_coverage_path")]
    pub coverage_path: PathBuf,

    /// Trace time advance per vector (must be non-zero)
    #[serde(default = "GeneralConfig::default_time_step")]
    pub time_step: u64,
}

impl GeneralConfig {
    fn default_trace_path() -> PathBuf {
        PathBuf::from(defaults::TRACE_PATH)
    }

    fn default_coverage_path() -> PathBuf {
        PathBuf::from(defaults::COVERAGE_PATH)
    }

    const fn default_time_step() -> u64 {
        defaults::TIME_STEP
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            trace_path: Self::default_trace_path(),
            coverage: false,
            coverage_path: Self::default_coverage_path(),
            time_step: defaults::TIME_STEP,
        }
    }
}

/// DUT driving options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DutConfig {
    /// Maximum evaluation passes per settle (must be non-zero)
    #[serde(default = "DutConfig::default_settle_limit")]
    pub settle_limit: u32,
}

impl DutConfig {
    const fn default_settle_limit() -> u32 {
        defaults::SETTLE_LIMIT
    }
}

impl Default for DutConfig {
    fn default() -> Self {
        Self {
            settle_limit: defaults::SETTLE_LIMIT,
        }
    }
}
