//! Per-sample monitoring cycle
//!
//! [`FieldMonitor`] owns the window and the three condition notifiers and
//! runs one evaluation cycle per sample: append, classify, debounce,
//! collect. It is single-threaded; callers that reconfigure
//! from a separate control path must serialize `apply_config` against
//! `process` externally, so each cycle observes exactly one
//! configuration.

use heapless::Vec;

use crate::config::MonitorConfig;
use crate::errors::FieldResult;
use crate::events::{ConditionKind, FieldSummary, Notification, NotificationKind};
use crate::notifier::ConditionNotifier;
use crate::time::Timestamp;
use crate::window::{DistanceUnit, FieldWindow};

/// Upper bound on notifications from one cycle (one per condition)
pub const MAX_CYCLE_NOTIFICATIONS: usize = 3;

/// Everything one sample cycle produced
#[derive(Debug, Clone, Default)]
pub struct CycleOutput {
    /// Periodic field report; present once per full window of samples
    pub summary: Option<FieldSummary>,
    /// Debounced notifications, at most one per condition
    pub notifications: Vec<Notification, MAX_CYCLE_NOTIFICATIONS>,
}

/// Sliding window plus one debounce machine per monitored condition
pub struct FieldMonitor {
    window: FieldWindow,
    high: ConditionNotifier,
    very_high: ConditionNotifier,
    lightning: ConditionNotifier,
    lightning_requires_high_field: bool,
    cycles_since_summary: usize,
}

impl FieldMonitor {
    /// Build a monitor from a configuration, validating it first
    pub fn new(config: &MonitorConfig) -> FieldResult<Self> {
        Ok(Self {
            window: FieldWindow::new(config)?,
            high: ConditionNotifier::new(config.field_timing),
            very_high: ConditionNotifier::new(config.field_timing),
            lightning: ConditionNotifier::new(config.lightning_timing),
            lightning_requires_high_field: config.lightning_requires_high_field,
            cycles_since_summary: 0,
        })
    }

    /// Swap in a new configuration between cycles
    ///
    /// Validates first; on error nothing changes and the previous
    /// configuration stays in effect. Notifier state and timers carry
    /// over, so a live condition is not re-asserted by a reload.
    pub fn apply_config(&mut self, config: &MonitorConfig) -> FieldResult<()> {
        self.window.apply_config(config)?;

        self.high.set_timing(config.field_timing);
        self.very_high.set_timing(config.field_timing);
        self.lightning.set_timing(config.lightning_timing);
        self.lightning_requires_high_field = config.lightning_requires_high_field;

        Ok(())
    }

    /// Read access to the window for ad hoc queries
    pub fn window(&self) -> &FieldWindow {
        &self.window
    }

    /// Run one sample cycle: append the reading, evaluate every
    /// condition, and collect whatever is due this cycle
    pub fn process(&mut self, timestamp: Timestamp, value: f32) -> FieldResult<CycleOutput> {
        self.window.append(timestamp, value);

        let is_high = self.window.is_high()?;
        let is_very_high = self.window.is_very_high()?;
        let is_lightning =
            self.window.is_lightning() && (!self.lightning_requires_high_field || is_high);

        let mut output = CycleOutput::default();

        if let Some(kind) = self.high.evaluate(is_high, timestamp) {
            let _ = output.notifications.push(Notification {
                condition: ConditionKind::HighField,
                kind,
                timestamp,
                distance_km: None,
            });
        }

        if let Some(kind) = self.very_high.evaluate(is_very_high, timestamp) {
            let _ = output.notifications.push(Notification {
                condition: ConditionKind::VeryHighField,
                kind,
                timestamp,
                distance_km: None,
            });
        }

        if let Some(kind) = self.lightning.evaluate(is_lightning, timestamp) {
            let distance_km = match kind {
                // The lightning predicate guarantees a nonzero derivative
                NotificationKind::Assert | NotificationKind::Repeat => {
                    Some(self.window.lightning_distance(DistanceUnit::Kilometers)?)
                }
                NotificationKind::Clear => None,
            };

            let _ = output.notifications.push(Notification {
                condition: ConditionKind::Lightning,
                kind,
                timestamp,
                distance_km,
            });
        }

        self.cycles_since_summary += 1;
        if self.cycles_since_summary >= self.window.capacity() {
            output.summary = Some(FieldSummary {
                timestamp,
                mean: self.window.mean()?,
                derivative: self.window.derivative(),
            });
            self.cycles_since_summary = 0;
        }

        Ok(output)
    }
}
