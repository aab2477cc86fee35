use crate::config::types::{ProbeError, Result};
/// Configuration loading for the probe harness
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming a JSON config file
pub const CONFIG_PATH_ENV: &str = "PROBEBOX_CONFIG";
pub const SAMPLER_ENV: &str = "PROBEBOX_SAMPLER";
pub const CLOCK_ENV: &str = "PROBEBOX_CLOCK";
pub const AUDIT_LOG_ENV: &str = "PROBEBOX_AUDIT_LOG";
pub const MEMORY_CEILING_ENV: &str = "PROBEBOX_MEMORY_CEILING";

/// Which heap sampler backs the profiled invoker
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    /// Counters of the tracking global allocator
    #[default]
    Allocator,
    /// `VmHWM` from /proc/self/status
    ProcStatus,
    /// `ru_maxrss` from getrusage(2)
    Rusage,
}

impl FromStr for SamplerKind {
    type Err = ProbeError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allocator" => Ok(SamplerKind::Allocator),
            "proc_status" | "procstatus" => Ok(SamplerKind::ProcStatus),
            "rusage" => Ok(SamplerKind::Rusage),
            other => Err(ProbeError::Config(format!(
                "unknown heap sampler: {}",
                other
            ))),
        }
    }
}

/// Which timestamp source the profiled invoker uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockKind {
    #[default]
    Monotonic,
    /// Calendar milliseconds since the Unix epoch
    System,
}

impl FromStr for ClockKind {
    type Err = ProbeError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Ok(ClockKind::Monotonic),
            "system" => Ok(ClockKind::System),
            other => Err(ProbeError::Config(format!("unknown clock: {}", other))),
        }
    }
}

/// Harness configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub sampler: SamplerKind,
    pub clock: ClockKind,
    /// Append-only JSON-lines audit file (optional)
    pub audit_log: Option<PathBuf>,
    /// Peak heap size above which invocations are reported (never enforced)
    pub memory_ceiling_bytes: Option<u64>,
}

impl ProbeConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProbeError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: ProbeConfig = serde_json::from_str(&content)
            .map_err(|e| ProbeError::Config(format!("Failed to parse config JSON: {}", e)))?;

        log::debug!("Loaded probe config from {}", path.display());
        Ok(config)
    }

    /// Build configuration from the process environment.
    ///
    /// `PROBEBOX_CONFIG` names a base file; the individual variables then
    /// override single fields.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply field overrides from a key lookup (environment-shaped)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(SAMPLER_ENV) {
            self.sampler = value.parse()?;
        }
        if let Some(value) = lookup(CLOCK_ENV) {
            self.clock = value.parse()?;
        }
        if let Some(value) = lookup(AUDIT_LOG_ENV) {
            self.audit_log = if value.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        if let Some(value) = lookup(MEMORY_CEILING_ENV) {
            let bytes = value.trim().parse::<u64>().map_err(|e| {
                ProbeError::Config(format!(
                    "{} must be a byte count, got {:?}: {}",
                    MEMORY_CEILING_ENV, value, e
                ))
            })?;
            self.memory_ceiling_bytes = Some(bytes);
        }
        Ok(())
    }
}
