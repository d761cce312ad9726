//! Outbound message formatting
//!
//! One place owns the line formats the listeners parse, so the daemon
//! and the replay tool cannot drift apart. Notification lines wrap the
//! core's message body in a bracketed timestamp; summaries go out as a
//! `FIELD:`/`DELTA:` pair.

use chrono::{DateTime, Utc};

use fieldwatch_core::{FieldSummary, Notification};

use crate::DATE_FORMAT;

/// Format one notification line
pub fn notification_line(time: DateTime<Utc>, notification: &Notification) -> String {
    format!("[{}] {}", time.format(DATE_FORMAT), notification)
}

/// Format the periodic field/delta summary pair
pub fn summary_lines(time: DateTime<Utc>, summary: &FieldSummary) -> (String, String) {
    let stamp = time.format(DATE_FORMAT);
    (
        format!("[{stamp}] FIELD: {:+.3} kV/m", summary.mean),
        format!("[{stamp}] DELTA: {:+.3} kV/m", summary.derivative),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwatch_core::{ConditionKind, NotificationKind};

    fn at_epoch() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(0).unwrap()
    }

    #[test]
    fn notification_lines() {
        let warning = Notification {
            condition: ConditionKind::VeryHighField,
            kind: NotificationKind::Assert,
            timestamp: 0,
            distance_km: None,
        };
        assert_eq!(
            notification_line(at_epoch(), &warning),
            "[1970-01-01 00:00:00.000000] WARNING: very high field"
        );

        let strike = Notification {
            condition: ConditionKind::Lightning,
            kind: NotificationKind::Repeat,
            timestamp: 0,
            distance_km: Some(7.06),
        };
        assert_eq!(
            notification_line(at_epoch(), &strike),
            "[1970-01-01 00:00:00.000000] LIGHTNING: 7.1 km"
        );
    }

    #[test]
    fn summary_pair() {
        let summary = FieldSummary {
            timestamp: 0,
            mean: -0.875,
            derivative: 0.025,
        };
        let (field, delta) = summary_lines(at_epoch(), &summary);
        assert_eq!(field, "[1970-01-01 00:00:00.000000] FIELD: -0.875 kV/m");
        assert_eq!(delta, "[1970-01-01 00:00:00.000000] DELTA: +0.025 kV/m");
    }
}
