//! # Analysis Configuration Module
//!
//! Every tunable constant of the pipeline lives here so thresholds can be
//! adjusted per footage source without touching the stages.
//!
//! ## Usage
//! ```rust
//! use match_core::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default();
//! let strict = AnalysisConfig::strict();
//! assert!(strict.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `MATCH_ANALYSIS_PROFILE`: Select preset (strict, lenient, default)

mod filter_config;
mod thresholds_config;
mod validation_config;

pub use filter_config::FilterConfig;
pub use thresholds_config::{OccupancyConfig, PassConfig, PossessionConfig};
pub use validation_config::BallValidationConfig;

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const PROFILE_ENV_VAR: &str = "MATCH_ANALYSIS_PROFILE";

/// Full pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub filter: FilterConfig,
    pub ball: BallValidationConfig,
    pub possession: PossessionConfig,
    pub pass: PassConfig,
    pub occupancy: OccupancyConfig,
}

impl AnalysisConfig {
    /// Fewer possessions and passes: tighter distance gate, faster ball needed
    pub fn strict() -> Self {
        let mut cfg = Self::default();
        cfg.possession.threshold_scale = 0.5;
        cfg.possession.default_threshold = 35.0;
        cfg.pass.speed_threshold = 8.0;
        cfg
    }

    /// Noisy broadcast footage: tolerance band on ball colour, looser gates
    pub fn lenient() -> Self {
        let mut cfg = Self::default();
        cfg.ball.color_tolerance = 10;
        cfg.ball.min_ball_size = 3.0;
        cfg.ball.max_ball_size = 30.0;
        cfg.pass.speed_threshold = 3.0;
        cfg.filter = FilterConfig::responsive();
        cfg
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default()),
            "strict" => Some(Self::strict()),
            "lenient" => Some(Self::lenient()),
            _ => None,
        }
    }

    /// Load from environment variable MATCH_ANALYSIS_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        let profile = env::var(PROFILE_ENV_VAR).unwrap_or_default();
        Self::preset(&profile).unwrap_or_default()
    }

    /// Load a YAML (`.yaml`/`.yml`) or JSON config file and validate it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let cfg: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(CoreError::InvalidConfig(msg.to_string()));

        if !(self.filter.process_noise > 0.0) || !(self.filter.measurement_noise > 0.0) {
            return invalid("filter noise magnitudes must be positive");
        }
        if !(self.ball.min_ball_size >= 0.0) || self.ball.min_ball_size >= self.ball.max_ball_size
        {
            return invalid("ball size bounds must satisfy 0 <= min < max");
        }
        if self.ball.max_cluster_iterations == 0 {
            return invalid("max_cluster_iterations must be at least 1");
        }
        if !(self.possession.default_threshold > 0.0) || !(self.possession.threshold_scale > 0.0) {
            return invalid("possession thresholds must be positive");
        }
        if !(self.pass.speed_threshold >= 0.0) {
            return invalid("pass speed threshold must be non-negative");
        }
        if !(self.occupancy.grid_size_m > 0.0)
            || !(self.occupancy.field_width_m > 0.0)
            || !(self.occupancy.field_length_m > 0.0)
        {
            return invalid("occupancy grid dimensions must be positive");
        }
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = AnalysisConfig::default();
        assert!((cfg.filter.process_noise - 0.01).abs() < 1e-6);
        assert!((cfg.filter.measurement_noise - 0.1).abs() < 1e-6);
        assert_eq!(cfg.ball.min_ball_size, 5.0);
        assert_eq!(cfg.ball.max_ball_size, 20.0);
        assert_eq!(cfg.ball.color_tolerance, 0);
        assert_eq!(cfg.possession.default_threshold, 70.0);
        assert_eq!(cfg.pass.speed_threshold, 5.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for name in ["default", "strict", "lenient", "STRICT"] {
            let cfg = AnalysisConfig::preset(name).unwrap();
            assert!(cfg.validate().is_ok(), "{name} preset invalid");
        }
        assert!(AnalysisConfig::preset("arcade").is_none());
    }

    #[test]
    fn test_strict_needs_faster_ball() {
        let strict = AnalysisConfig::strict();
        let default = AnalysisConfig::default();
        assert!(strict.pass.speed_threshold > default.pass.speed_threshold);
        assert!(strict.possession.threshold_scale < default.possession.threshold_scale);
    }

    #[test]
    fn test_validate_rejects_inverted_sizes() {
        let mut cfg = AnalysisConfig::default();
        cfg.ball.min_ball_size = 25.0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_nan_noise() {
        let mut cfg = AnalysisConfig::default();
        cfg.filter.process_noise = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "pass:\n  speed_threshold: 7.5\nball:\n  color_tolerance: 4").unwrap();

        let cfg = AnalysisConfig::from_path(file.path()).unwrap();
        assert_eq!(cfg.pass.speed_threshold, 7.5);
        assert_eq!(cfg.ball.color_tolerance, 4);
        assert_eq!(cfg.ball.max_ball_size, 20.0);
        assert_eq!(cfg.possession.default_threshold, 70.0);
    }

    #[test]
    fn test_json_config_is_validated() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"possession": {{"default_threshold": -1.0}}}}"#).unwrap();

        let err = AnalysisConfig::from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("possession thresholds"));
    }
}
