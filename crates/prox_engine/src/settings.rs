//! Estimator settings from TOML files and environment variables.
//!
//! Priority (highest to lowest):
//! 1. Environment variables (`HJPROX_*`)
//! 2. Settings file
//! 3. Default values
//!
//! # Example File
//!
//! ```toml
//! delta = 0.05
//! int_samples = 2000
//! stability = "non_finite_weights"
//! envelope = "direct"
//! verbose = true
//! seed = 42
//! ```

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use prox_core::types::{ConfigError, Device};

use crate::hj::{
    EnvelopeFormula, HjProxConfig, StabilityCriterion, DEFAULT_ALPHA, DEFAULT_ALPHA_DECAY,
    DEFAULT_DELTA, DEFAULT_INT_SAMPLES, DEFAULT_MAX_ATTEMPTS, DEFAULT_TOL_UNDERFLOW,
    DEFAULT_UNDERFLOW_TOL,
};

/// Prefix of every recognised environment variable.
pub const ENV_PREFIX: &str = "HJPROX_";

/// Settings loading error types
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Settings file error: {0}")]
    File(String),

    /// The settings file is not valid TOML for [`EstimatorSettings`].
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment variable holds an unparseable value.
    #[error("Environment variable {name}: cannot parse {value:?}")]
    Env {
        /// Variable name, including the prefix.
        name: String,
        /// Raw value.
        value: String,
    },

    /// Parsed settings describe an invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Stability test name as written in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityKind {
    /// Underflow-fraction test, thresholds from `tol` and `tol_underflow`.
    #[default]
    UnderflowFraction,
    /// Non-finite weight test.
    NonFiniteWeights,
}

impl FromStr for StabilityKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "underflow_fraction" | "underflow" => Ok(Self::UnderflowFraction),
            "non_finite_weights" | "non_finite" | "overflow" => Ok(Self::NonFiniteWeights),
            _ => Err(()),
        }
    }
}

/// Envelope formula name as written in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    /// See [`EnvelopeFormula::LogMeanExp`].
    #[default]
    LogMeanExp,
    /// See [`EnvelopeFormula::Direct`].
    Direct,
}

impl FromStr for EnvelopeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log_mean_exp" | "logmeanexp" => Ok(Self::LogMeanExp),
            "direct" => Ok(Self::Direct),
            _ => Err(()),
        }
    }
}

impl From<EnvelopeKind> for EnvelopeFormula {
    fn from(kind: EnvelopeKind) -> Self {
        match kind {
            EnvelopeKind::LogMeanExp => EnvelopeFormula::LogMeanExp,
            EnvelopeKind::Direct => EnvelopeFormula::Direct,
        }
    }
}

/// Flat, serialisable form of [`HjProxConfig`].
///
/// Missing keys take the estimator defaults; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorSettings {
    /// Smoothing scale.
    pub delta: f64,
    /// Samples per attempt.
    pub int_samples: usize,
    /// Initial scale parameter.
    pub alpha: f64,
    /// Decay factor applied on each retry.
    pub alpha_decay: f64,
    /// Stability test.
    pub stability: StabilityKind,
    /// Underflow threshold, used by the underflow-fraction test.
    pub tol: f64,
    /// Tolerated underflow fraction, used by the underflow-fraction test.
    pub tol_underflow: f64,
    /// Envelope formula.
    pub envelope: EnvelopeKind,
    /// Attempt limit.
    pub max_attempts: usize,
    /// Execution context name forwarded to the objective.
    pub device: String,
    /// Compute the envelope value.
    pub verbose: bool,
    /// Return the accepted samples and weights.
    pub return_samples: bool,
    /// RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            int_samples: DEFAULT_INT_SAMPLES,
            alpha: DEFAULT_ALPHA,
            alpha_decay: DEFAULT_ALPHA_DECAY,
            stability: StabilityKind::default(),
            tol: DEFAULT_UNDERFLOW_TOL,
            tol_underflow: DEFAULT_TOL_UNDERFLOW,
            envelope: EnvelopeKind::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            device: Device::default().name().to_string(),
            verbose: false,
            return_samples: false,
            seed: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: String) -> Result<T, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::Env {
        name: format!("{}{}", ENV_PREFIX, name),
        value,
    })
}

fn parse_flag(name: &str, value: String) -> Result<bool, SettingsError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::Env {
            name: format!("{}{}", ENV_PREFIX, name),
            value,
        }),
    }
}

impl EstimatorSettings {
    /// Parses settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::File(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Overrides fields from the process environment.
    pub fn apply_env(&mut self) -> Result<(), SettingsError> {
        self.apply_env_from(|name| std::env::var(format!("{}{}", ENV_PREFIX, name)).ok())
    }

    /// Overrides fields from `lookup`, which maps an unprefixed variable
    /// name such as `DELTA` to its value.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DELTA") {
            self.delta = parse_var("DELTA", v)?;
        }
        if let Some(v) = lookup("INT_SAMPLES") {
            self.int_samples = parse_var("INT_SAMPLES", v)?;
        }
        if let Some(v) = lookup("ALPHA") {
            self.alpha = parse_var("ALPHA", v)?;
        }
        if let Some(v) = lookup("ALPHA_DECAY") {
            self.alpha_decay = parse_var("ALPHA_DECAY", v)?;
        }
        if let Some(v) = lookup("MAX_ATTEMPTS") {
            self.max_attempts = parse_var("MAX_ATTEMPTS", v)?;
        }
        if let Some(v) = lookup("SEED") {
            self.seed = Some(parse_var("SEED", v)?);
        }
        if let Some(v) = lookup("STABILITY") {
            self.stability = parse_var("STABILITY", v)?;
        }
        if let Some(v) = lookup("TOL") {
            self.tol = parse_var("TOL", v)?;
        }
        if let Some(v) = lookup("TOL_UNDERFLOW") {
            self.tol_underflow = parse_var("TOL_UNDERFLOW", v)?;
        }
        if let Some(v) = lookup("ENVELOPE") {
            self.envelope = parse_var("ENVELOPE", v)?;
        }
        if let Some(v) = lookup("DEVICE") {
            self.device = v;
        }
        if let Some(v) = lookup("VERBOSE") {
            self.verbose = parse_flag("VERBOSE", v)?;
        }
        if let Some(v) = lookup("RETURN_SAMPLES") {
            self.return_samples = parse_flag("RETURN_SAMPLES", v)?;
        }
        Ok(())
    }

    /// Converts into a validated [`HjProxConfig`].
    pub fn into_config(self) -> Result<HjProxConfig, ConfigError> {
        let stability = match self.stability {
            StabilityKind::UnderflowFraction => StabilityCriterion::UnderflowFraction {
                tol: self.tol,
                tol_underflow: self.tol_underflow,
            },
            StabilityKind::NonFiniteWeights => StabilityCriterion::NonFiniteWeights,
        };

        let builder = HjProxConfig::builder()
            .delta(self.delta)
            .int_samples(self.int_samples)
            .alpha(self.alpha)
            .alpha_decay(self.alpha_decay)
            .stability(stability)
            .envelope(self.envelope.into())
            .max_attempts(self.max_attempts)
            .device(Device::new(self.device))
            .verbose(self.verbose)
            .return_samples(self.return_samples);

        match self.seed {
            Some(seed) => builder.seed(seed).build(),
            None => builder.build(),
        }
    }
}

/// Builds a configuration from all sources.
///
/// Starts from `path` if given, else the defaults, then applies `HJPROX_*`
/// environment overrides and validates.
pub fn load_config(path: Option<&Path>) -> Result<HjProxConfig, SettingsError> {
    let mut settings = match path {
        Some(path) => EstimatorSettings::from_file(path)?,
        None => EstimatorSettings::default(),
    };
    settings.apply_env()?;

    let config = settings.into_config()?;
    tracing::debug!(?config, "estimator configuration loaded");
    Ok(config)
}
