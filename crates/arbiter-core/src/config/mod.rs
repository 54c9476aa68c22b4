//! Engine configuration, loaded from TOML with per-section defaults.

mod cache_config;
mod calibration_config;
mod constraint_config;
pub mod defaults;
mod observability_config;
mod session_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use cache_config::CacheConfig;
pub use calibration_config::CalibrationConfig;
pub use constraint_config::ConstraintConfig;
pub use observability_config::ObservabilityConfig;
pub use session_config::SessionConfig;

use crate::errors::ConfigError;

/// Top-level configuration. Every section falls back to its defaults when
/// omitted from the TOML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    pub calibration: CalibrationConfig,
    pub session: SessionConfig,
    pub cache: CacheConfig,
    pub constraints: ConstraintConfig,
    pub observability: ObservabilityConfig,
    /// Optional keyword corpus file replacing the built-in corpus.
    pub corpus_path: Option<String>,
}

impl ArbiterConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::ParseError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let config: Self = toml::from_str(&source).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges. Called by both loaders; call it again after
    /// mutating a config programmatically.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.calibration;
        for (field, value) in [
            ("calibration.single_with_subdomain", c.single_with_subdomain),
            ("calibration.single_without_subdomain", c.single_without_subdomain),
            ("calibration.multi_fast_path", c.multi_fast_path),
            ("calibration.weighted_single_base", c.weighted_single_base),
            ("calibration.weighted_multi_base", c.weighted_multi_base),
            ("calibration.multi_ceiling", c.multi_ceiling),
        ] {
            unit_interval(field, value)?;
        }
        for (field, value) in [
            ("calibration.dominance_slope", c.dominance_slope),
            ("calibration.subdomain_bonus", c.subdomain_bonus),
            ("calibration.gap_slope", c.gap_slope),
            ("calibration.reconstruction_gap", c.reconstruction_gap),
        ] {
            non_negative(field, value)?;
        }
        if c.multi_ceiling >= crate::constants::SINGLE_SYSTEM_THRESHOLD {
            return Err(ConfigError::InvalidValue {
                field: "calibration.multi_ceiling".to_string(),
                message: format!(
                    "must stay below the single-system threshold {}",
                    crate::constants::SINGLE_SYSTEM_THRESHOLD
                ),
            });
        }

        let s = &self.session;
        if s.history_max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.history_max_entries".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        open_unit_interval("session.history_keep_ratio", s.history_keep_ratio)?;
        open_unit_interval("session.boost_decay", s.boost_decay)?;
        unit_interval("session.boost_cap", s.boost_cap)?;
        non_negative("session.boost_scale", s.boost_scale)?;
        non_negative("session.context_reweight", s.context_reweight)?;
        unit_interval("session.min_transition_confidence", s.min_transition_confidence)?;
        bounded_positive(
            "session.recent_window_minutes",
            s.recent_window_minutes,
            defaults::MAX_RECENT_WINDOW_MINUTES,
        )?;

        if self.cache.promotion_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.promotion_threshold".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        bounded_positive(
            "cache.retention_days",
            self.cache.retention_days,
            defaults::MAX_CACHE_RETENTION_DAYS,
        )?;
        if self.constraints.archive_retention == 0 {
            return Err(ConfigError::InvalidValue {
                field: "constraints.archive_retention".to_string(),
                message: "must keep at least one archive".to_string(),
            });
        }
        Ok(())
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} is outside [0, 1]"),
        })
    }
}

fn open_unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} is outside (0, 1]"),
        })
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} must be a finite, non-negative number"),
        })
    }
}

fn bounded_positive(field: &str, value: i64, max: i64) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} is outside [1, {max}]"),
        })
    }
}
