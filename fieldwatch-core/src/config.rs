//! Monitor configuration
//!
//! One immutable struct carries everything the core needs: the averaging
//! interval, the three detection thresholds, the per-condition debounce
//! timing, and the lightning gating policy. Configuration is validated
//! once, up front; a rejected configuration leaves the previous one in
//! effect. Nothing in the per-sample path re-reads or re-checks it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FIELD_AVERAGE_SECS, DEFAULT_FIELD_CLEARED_MS, DEFAULT_FIELD_REPORT_MS,
    DEFAULT_HIGH_FIELD, DEFAULT_LIGHTNING_CLEARED_MS, DEFAULT_LIGHTNING_MIN_FIELD_CHANGE,
    DEFAULT_LIGHTNING_REPORT_MS, DEFAULT_VERY_HIGH_FIELD, MAX_WINDOW_SAMPLES, MIN_WINDOW_SAMPLES,
    NOMINAL_SAMPLE_RATE_HZ,
};
use crate::errors::{FieldError, FieldResult};

/// Debounce timing for one monitored condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NotifierTiming {
    /// Minimum milliseconds between repeated notifications while the
    /// condition persists
    pub report_ms: u64,
    /// Milliseconds the condition must stay absent (measured from the last
    /// notification) before a clear notice is sent
    pub cleared_ms: u64,
}

/// Complete configuration for a [`FieldMonitor`]
///
/// [`FieldMonitor`]: crate::monitor::FieldMonitor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Averaging interval in seconds; sets the window length at the
    /// nominal sample rate
    pub field_average_secs: f32,

    /// High-field threshold in kV/m (compared against |field|)
    pub high_field: f32,

    /// Very-high-field threshold in kV/m (compared against |field|)
    pub very_high_field: f32,

    /// Minimum smoothed field change over the derivative gap to classify
    /// as lightning, in kV/m
    pub lightning_min_field_change: f32,

    /// Debounce timing shared by the high and very-high field conditions
    pub field_timing: NotifierTiming,

    /// Debounce timing for the lightning condition
    pub lightning_timing: NotifierTiming,

    /// When set, a lightning-shaped derivative spike is only reported
    /// while the field magnitude is also above the high-field threshold
    pub lightning_requires_high_field: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            field_average_secs: DEFAULT_FIELD_AVERAGE_SECS,
            high_field: DEFAULT_HIGH_FIELD,
            very_high_field: DEFAULT_VERY_HIGH_FIELD,
            lightning_min_field_change: DEFAULT_LIGHTNING_MIN_FIELD_CHANGE,
            field_timing: NotifierTiming {
                report_ms: DEFAULT_FIELD_REPORT_MS,
                cleared_ms: DEFAULT_FIELD_CLEARED_MS,
            },
            lightning_timing: NotifierTiming {
                report_ms: DEFAULT_LIGHTNING_REPORT_MS,
                cleared_ms: DEFAULT_LIGHTNING_CLEARED_MS,
            },
            lightning_requires_high_field: false,
        }
    }
}

impl MonitorConfig {
    /// Check the configuration for values the core cannot operate with
    ///
    /// Thresholds and the averaging interval must be positive and finite.
    /// Callers that hold a previous configuration keep it when this
    /// returns an error.
    pub fn validate(&self) -> FieldResult<()> {
        if !(self.field_average_secs.is_finite() && self.field_average_secs > 0.0) {
            return Err(FieldError::InvalidConfig {
                reason: "averaging interval must be a positive number of seconds",
            });
        }
        if !(self.high_field.is_finite() && self.high_field > 0.0) {
            return Err(FieldError::InvalidConfig {
                reason: "high-field threshold must be positive",
            });
        }
        if !(self.very_high_field.is_finite() && self.very_high_field > 0.0) {
            return Err(FieldError::InvalidConfig {
                reason: "very-high-field threshold must be positive",
            });
        }
        if self.very_high_field < self.high_field {
            return Err(FieldError::InvalidConfig {
                reason: "very-high-field threshold below high-field threshold",
            });
        }
        if !(self.lightning_min_field_change.is_finite() && self.lightning_min_field_change > 0.0) {
            return Err(FieldError::InvalidConfig {
                reason: "minimum lightning field change must be positive",
            });
        }

        Ok(())
    }

    /// Window length in samples for this configuration
    ///
    /// `round(rate * averaging_secs)`, never less than the seven samples
    /// the derivative needs, clamped to the fixed storage bound.
    pub fn window_capacity(&self) -> usize {
        let requested = libm::roundf(NOMINAL_SAMPLE_RATE_HZ * self.field_average_secs) as usize;

        if requested > MAX_WINDOW_SAMPLES {
            log_warn!(
                "averaging interval of {} s exceeds window storage; clamping to {} samples",
                self.field_average_secs,
                MAX_WINDOW_SAMPLES
            );
        }

        requested.clamp(MIN_WINDOW_SAMPLES, MAX_WINDOW_SAMPLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_capacity(), 20);
    }

    #[test]
    fn short_averaging_floors_at_minimum_window() {
        let config = MonitorConfig {
            field_average_secs: 0.1, // 2 samples requested
            ..MonitorConfig::default()
        };
        assert_eq!(config.window_capacity(), MIN_WINDOW_SAMPLES);
    }

    #[test]
    fn long_averaging_clamps_to_storage() {
        let config = MonitorConfig {
            field_average_secs: 3600.0,
            ..MonitorConfig::default()
        };
        assert_eq!(config.window_capacity(), MAX_WINDOW_SAMPLES);
    }

    #[test]
    fn rejects_nonpositive_values() {
        let mut config = MonitorConfig::default();
        config.high_field = 0.0;
        assert!(matches!(
            config.validate(),
            Err(FieldError::InvalidConfig { .. })
        ));

        let mut config = MonitorConfig::default();
        config.field_average_secs = -1.0;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.lightning_min_field_change = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = MonitorConfig {
            high_field: 7.0,
            very_high_field: 5.0,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
