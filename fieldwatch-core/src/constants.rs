//! Constants for the fieldwatch core
//!
//! Centralized numeric values used across the crate. The sampling-related
//! constants all assume the EFM-100's fixed output cadence; the detection
//! defaults match the values the instrument is normally deployed with.

/// Nominal mill output rate in samples per second.
///
/// The instrument emits one frame every 50 ms regardless of field
/// conditions, so durations and sample counts convert at this fixed rate.
pub const NOMINAL_SAMPLE_RATE_HZ: f32 = 20.0;

/// Smallest usable window length in samples.
///
/// The derivative compares two smoothed points six samples apart, so any
/// window shorter than seven samples cannot produce one.
pub const MIN_WINDOW_SAMPLES: usize = 7;

/// Fixed storage bound for the sample window.
///
/// At 20 samples/s this allows averaging intervals up to 6.4 s; longer
/// configured intervals are clamped here.
pub const MAX_WINDOW_SAMPLES: usize = 128;

/// Backward boxcar smoothing span in samples.
pub const SMOOTHING_SPAN: usize = 3;

/// Gap between the two smoothed points differenced by the derivative.
///
/// Six samples at the nominal rate is ~0.3 s, the timescale of the field
/// collapse following a nearby return stroke.
pub const DERIVATIVE_GAP_SAMPLES: usize = 6;

/// Kilometers to statute miles.
pub const KM_TO_MILES: f32 = 0.621_371_192;

/// Reference field change for the distance heuristic: a 10 kV/m jump
/// corresponds to a strike at [`REFERENCE_DISTANCE_KM`].
pub const REFERENCE_FIELD_CHANGE: f32 = 10.0;

/// Distance assigned to the reference field change, in kilometers.
pub const REFERENCE_DISTANCE_KM: f32 = 5.0;

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1_000;

/// Milliseconds per minute, the unit the report/cleared intervals are
/// configured in.
pub const MS_PER_MINUTE: u64 = 60_000;

/// Default averaging interval in seconds.
pub const DEFAULT_FIELD_AVERAGE_SECS: f32 = 1.0;

/// Default high-field threshold in kV/m.
pub const DEFAULT_HIGH_FIELD: f32 = 5.0;

/// Default very-high-field threshold in kV/m.
pub const DEFAULT_VERY_HIGH_FIELD: f32 = 7.0;

/// Default minimum field change over the derivative gap to call lightning,
/// in kV/m.
pub const DEFAULT_LIGHTNING_MIN_FIELD_CHANGE: f32 = 0.05;

/// Default field-condition report interval in milliseconds (1 minute).
pub const DEFAULT_FIELD_REPORT_MS: u64 = 60_000;

/// Default field-condition cleared interval in milliseconds (1 minute).
pub const DEFAULT_FIELD_CLEARED_MS: u64 = 60_000;

/// Default lightning report interval in milliseconds (0.83 minutes).
pub const DEFAULT_LIGHTNING_REPORT_MS: u64 = 49_800;

/// Default lightning cleared interval in milliseconds (2 minutes).
pub const DEFAULT_LIGHTNING_CLEARED_MS: u64 = 120_000;
