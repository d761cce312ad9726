//! Sliding field window: statistics and classification
//!
//! [`FieldWindow`] keeps the rolling history of field samples and answers
//! the per-cycle questions: what is the mean field, how fast is it
//! changing, and does the current state look like a high field or a
//! lightning strike.
//!
//! ## Derivative
//!
//! The "derivative" is deliberately not a time-normalized slope. Each of
//! the two endpoints is denoised with a backward boxcar of up to three
//! samples, and the derivative is the plain difference of those two
//! smoothed points six samples (~0.3 s at the nominal rate) apart. The
//! sample cadence is fixed by the instrument, so the time base is implied
//! and the detection threshold is quoted in kV/m per gap, not kV/m/s.
//!
//! ## Distance heuristic
//!
//! `(10 / |d|)^(1/3) * 5` km: an inverse-cube falloff anchored at one
//! calibration point, a 10 kV/m jump from a strike 5 km out. It is a
//! single-station estimate and is treated as rough range, not a fix.

use crate::buffer::{FieldSample, SampleBuffer};
use crate::config::MonitorConfig;
use crate::constants::{
    DERIVATIVE_GAP_SAMPLES, KM_TO_MILES, MAX_WINDOW_SAMPLES, REFERENCE_DISTANCE_KM,
    REFERENCE_FIELD_CHANGE, SMOOTHING_SPAN,
};
use crate::errors::{FieldError, FieldResult};
use crate::time::Timestamp;

/// Unit for the lightning distance estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    /// Kilometers
    Kilometers,
    /// Statute miles
    Miles,
}

/// Rolling window of field samples with classification predicates
pub struct FieldWindow {
    samples: SampleBuffer<MAX_WINDOW_SAMPLES>,
    high_field: f32,
    very_high_field: f32,
    lightning_min_field_change: f32,
}

impl FieldWindow {
    /// Create a window from a validated configuration
    pub fn new(config: &MonitorConfig) -> FieldResult<Self> {
        config.validate()?;

        Ok(Self {
            samples: SampleBuffer::new(config.window_capacity()),
            high_field: config.high_field,
            very_high_field: config.very_high_field,
            lightning_min_field_change: config.lightning_min_field_change,
        })
    }

    /// Swap in a new configuration
    ///
    /// Validates first; on error the window is untouched and the previous
    /// configuration stays in effect. On success the retained history is
    /// truncated oldest-first to the new capacity.
    pub fn apply_config(&mut self, config: &MonitorConfig) -> FieldResult<()> {
        config.validate()?;

        self.samples.set_capacity(config.window_capacity());
        self.high_field = config.high_field;
        self.very_high_field = config.very_high_field;
        self.lightning_min_field_change = config.lightning_min_field_change;

        Ok(())
    }

    /// Append a timestamped field value, evicting the oldest sample once
    /// the window is full
    ///
    /// Any finite value is accepted; classification is the predicates'
    /// job, not append's.
    pub fn append(&mut self, timestamp: Timestamp, value: f32) {
        self.samples.push(FieldSample { value, timestamp });
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if no samples have been appended yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Current window capacity in samples
    pub fn capacity(&self) -> usize {
        self.samples.capacity()
    }

    /// Most recent field value in kV/m
    pub fn latest(&self) -> FieldResult<f32> {
        self.samples
            .last()
            .map(|s| s.value)
            .ok_or(FieldError::EmptyWindow)
    }

    /// Arithmetic mean of the retained field values in kV/m
    pub fn mean(&self) -> FieldResult<f32> {
        if self.samples.is_empty() {
            return Err(FieldError::EmptyWindow);
        }

        let sum: f32 = self.samples.iter().map(|s| s.value).sum();
        Ok(sum / self.samples.len() as f32)
    }

    /// Backward boxcar smoothing at `index_from_end` (0 = newest)
    ///
    /// Averages the addressed sample with up to two immediately preceding
    /// samples. Near the old edge of the window the divisor shrinks to the
    /// number of samples actually present. Fails with
    /// [`FieldError::EmptyWindow`] when the index reaches past the
    /// retained history.
    pub fn smoothed_from_end(&self, index_from_end: usize) -> FieldResult<f32> {
        let len = self.samples.len();
        if index_from_end >= len {
            return Err(FieldError::EmptyWindow);
        }

        let at = len - 1 - index_from_end;
        let from = at.saturating_sub(SMOOTHING_SPAN - 1);

        let mut sum = 0.0;
        let mut count = 0;
        for i in from..=at {
            if let Some(sample) = self.samples.get(i) {
                sum += sample.value;
                count += 1;
            }
        }

        Ok(sum / count as f32)
    }

    /// Smoothed field change across the derivative gap, in kV/m
    ///
    /// The difference of the smoothed newest point and the smoothed point
    /// six samples earlier. Returns 0.0 until seven samples are present.
    pub fn derivative(&self) -> f32 {
        if self.samples.len() <= DERIVATIVE_GAP_SAMPLES {
            return 0.0;
        }

        match (
            self.smoothed_from_end(0),
            self.smoothed_from_end(DERIVATIVE_GAP_SAMPLES),
        ) {
            (Ok(newest), Ok(older)) => newest - older,
            _ => 0.0,
        }
    }

    /// Check if |latest field| exceeds the high-field threshold
    pub fn is_high(&self) -> FieldResult<bool> {
        Ok(libm::fabsf(self.latest()?) > self.high_field)
    }

    /// Check if |latest field| exceeds the very-high-field threshold
    pub fn is_very_high(&self) -> FieldResult<bool> {
        Ok(libm::fabsf(self.latest()?) > self.very_high_field)
    }

    /// Check if the smoothed field change looks like lightning
    pub fn is_lightning(&self) -> bool {
        libm::fabsf(self.derivative()) > self.lightning_min_field_change
    }

    /// Estimate the strike distance from the current derivative
    ///
    /// Callers must gate on [`is_lightning`](Self::is_lightning) first;
    /// that guarantees a nonzero derivative. A zero derivative is a caller
    /// bug and reported as [`FieldError::DegenerateDerivative`].
    pub fn lightning_distance(&self, unit: DistanceUnit) -> FieldResult<f32> {
        let change = libm::fabsf(self.derivative());
        if change == 0.0 {
            return Err(FieldError::DegenerateDerivative);
        }

        let km = libm::cbrtf(REFERENCE_FIELD_CHANGE / change) * REFERENCE_DISTANCE_KM;

        Ok(match unit {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Miles => km * KM_TO_MILES,
        })
    }
}
