//! Notification and summary events
//!
//! The monitor's only outputs. A [`Notification`] marks a debounced edge
//! or reminder for one monitored condition; a [`FieldSummary`] is the
//! periodic field/derivative report sent once per full window. Both are
//! small `Copy` values the caller can hand to whatever sink it likes;
//! the core neither formats timestamps nor touches sockets.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Monitored condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConditionKind {
    /// |field| above the high-field threshold
    HighField,
    /// |field| above the very-high-field threshold
    VeryHighField,
    /// Smoothed field change consistent with a nearby strike
    Lightning,
}

impl ConditionKind {
    /// Stable machine-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            ConditionKind::HighField => "high-field",
            ConditionKind::VeryHighField => "very-high-field",
            ConditionKind::Lightning => "lightning",
        }
    }
}

/// What a notification announces about its condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NotificationKind {
    /// Condition just became true
    Assert,
    /// Condition still true; periodic reminder
    Repeat,
    /// Condition has stayed false long enough to be considered over
    Clear,
}

/// One debounced notification
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Notification {
    /// Which condition this is about
    pub condition: ConditionKind,
    /// Assert, repeat, or clear
    pub kind: NotificationKind,
    /// Sample timestamp of the cycle that produced this event
    pub timestamp: Timestamp,
    /// Estimated strike distance in km; present on lightning
    /// assert/repeat only
    pub distance_km: Option<f32>,
}

impl fmt::Display for Notification {
    /// Message body without the timestamp prefix; the sink supplies
    /// whatever timestamp format its channel wants
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.condition) {
            (NotificationKind::Clear, ConditionKind::HighField) => {
                write!(f, "NOTICE: high field cleared")
            }
            (NotificationKind::Clear, ConditionKind::VeryHighField) => {
                write!(f, "NOTICE: very high field cleared")
            }
            (NotificationKind::Clear, ConditionKind::Lightning) => {
                write!(f, "NOTICE: lightning cleared")
            }
            (_, ConditionKind::HighField) => write!(f, "WARNING: high field"),
            (_, ConditionKind::VeryHighField) => write!(f, "WARNING: very high field"),
            (_, ConditionKind::Lightning) => match self.distance_km {
                Some(km) => write!(f, "LIGHTNING: {:.1} km", km),
                None => write!(f, "LIGHTNING: range unknown"),
            },
        }
    }
}

/// Periodic field report, one per full window of samples
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSummary {
    /// Sample timestamp of the cycle that closed the window
    pub timestamp: Timestamp,
    /// Mean field over the window in kV/m
    pub mean: f32,
    /// Smoothed field derivative in kV/m per derivative gap
    pub derivative: f32,
}
