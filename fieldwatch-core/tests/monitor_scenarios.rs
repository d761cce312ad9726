//! End-to-end monitoring scenarios
//!
//! Drives a [`FieldMonitor`] through storm profiles at the nominal 20 Hz
//! cadence and checks the full notification lifecycle: assert on the
//! first threshold crossing, paced reminders while the condition holds,
//! and a single debounced clear once it lapses.

use fieldwatch_core::{
    ConditionKind, FieldMonitor, MonitorConfig, Notification, NotificationKind, NotifierTiming,
    Timestamp,
};

const STEP_MS: Timestamp = 50;

/// Feed `value` for `secs` seconds starting at `*t`, advancing `*t`
fn hold(
    monitor: &mut FieldMonitor,
    t: &mut Timestamp,
    value: f32,
    secs: u64,
    sink: &mut Vec<Notification>,
) {
    let cycles = secs * 1_000 / STEP_MS;
    for _ in 0..cycles {
        let cycle = monitor.process(*t, value).unwrap();
        sink.extend(cycle.notifications.iter().copied());
        *t += STEP_MS;
    }
}

fn of_kind(
    notifications: &[Notification],
    condition: ConditionKind,
    kind: NotificationKind,
) -> Vec<Notification> {
    notifications
        .iter()
        .filter(|n| n.condition == condition && n.kind == kind)
        .copied()
        .collect()
}

#[test]
fn high_field_storm_lifecycle() {
    let config = MonitorConfig {
        field_timing: NotifierTiming {
            report_ms: 60_000,
            cleared_ms: 120_000,
        },
        ..MonitorConfig::default()
    };
    let mut monitor = FieldMonitor::new(&config).unwrap();
    let mut events = Vec::new();
    let mut t: Timestamp = 0;

    // Ten calm seconds, then the field parks at 6 kV/m for 61 s
    hold(&mut monitor, &mut t, 0.2, 10, &mut events);
    assert!(events.is_empty());

    hold(&mut monitor, &mut t, 6.0, 61, &mut events);

    let asserts = of_kind(&events, ConditionKind::HighField, NotificationKind::Assert);
    let repeats = of_kind(&events, ConditionKind::HighField, NotificationKind::Repeat);
    assert_eq!(asserts.len(), 1);
    assert_eq!(asserts[0].timestamp, 10_000);
    assert_eq!(repeats.len(), 1, "one reminder in 61 s at a 60 s cadence");
    assert_eq!(repeats[0].timestamp, 70_000);

    // Never crossed 7 kV/m
    assert!(of_kind(&events, ConditionKind::VeryHighField, NotificationKind::Assert).is_empty());

    // Field drops; the clear waits out 120 s from the last event (t=70 s)
    hold(&mut monitor, &mut t, 0.2, 130, &mut events);

    let clears = of_kind(&events, ConditionKind::HighField, NotificationKind::Clear);
    assert_eq!(clears.len(), 1);
    assert_eq!(clears[0].timestamp, 190_000);

    // Quiet aftermath stays quiet
    let before = events.len();
    hold(&mut monitor, &mut t, 0.2, 30, &mut events);
    assert_eq!(events.len(), before);
}

#[test]
fn flicker_does_not_flood_the_channel() {
    let config = MonitorConfig {
        field_timing: NotifierTiming {
            report_ms: 60_000,
            cleared_ms: 120_000,
        },
        ..MonitorConfig::default()
    };
    let mut monitor = FieldMonitor::new(&config).unwrap();
    let mut events = Vec::new();
    let mut t: Timestamp = 0;

    // Field oscillates across the 5 kV/m threshold every two seconds
    for _ in 0..15 {
        hold(&mut monitor, &mut t, 5.5, 2, &mut events);
        hold(&mut monitor, &mut t, 4.5, 2, &mut events);
    }

    // One assert, no clear, no duplicate asserts in a minute of flapping
    let high = of_kind(&events, ConditionKind::HighField, NotificationKind::Assert);
    assert_eq!(high.len(), 1);
    assert!(of_kind(&events, ConditionKind::HighField, NotificationKind::Clear).is_empty());
}

#[test]
fn nearby_strike_reports_range() {
    let mut monitor = FieldMonitor::new(&MonitorConfig::default()).unwrap();
    let mut events = Vec::new();
    let mut t: Timestamp = 0;

    hold(&mut monitor, &mut t, 0.0, 2, &mut events);

    // Step change: the field jumps 12 kV/m inside one derivative gap
    hold(&mut monitor, &mut t, 12.0, 1, &mut events);

    let strikes = of_kind(&events, ConditionKind::Lightning, NotificationKind::Assert);
    assert_eq!(strikes.len(), 1);

    // The assert fires on the first sample of the jump, when the boxcar
    // has seen one of three post-jump samples: smoothed change 4 kV/m,
    // so the range is (10/4)^(1/3) * 5 km ≈ 6.79 km
    let km = strikes[0].distance_km.expect("distance payload");
    assert!((km - 6.786).abs() < 0.05, "got {km} km");

    // The jump also crossed both field thresholds
    assert_eq!(
        of_kind(&events, ConditionKind::HighField, NotificationKind::Assert).len(),
        1
    );
    assert_eq!(
        of_kind(&events, ConditionKind::VeryHighField, NotificationKind::Assert).len(),
        1
    );
}

#[test]
fn reload_tightens_thresholds_mid_stream() {
    let mut monitor = FieldMonitor::new(&MonitorConfig::default()).unwrap();
    let mut events = Vec::new();
    let mut t: Timestamp = 0;

    // 6 kV/m is high under the default 5 kV/m threshold
    hold(&mut monitor, &mut t, 6.0, 1, &mut events);
    assert_eq!(
        of_kind(&events, ConditionKind::HighField, NotificationKind::Assert).len(),
        1
    );

    // Raise the threshold above the ambient field; use short debounce so
    // the clear arrives quickly
    let relaxed = MonitorConfig {
        high_field: 8.0,
        very_high_field: 9.0,
        field_timing: NotifierTiming {
            report_ms: 1_000,
            cleared_ms: 2_000,
        },
        ..MonitorConfig::default()
    };
    monitor.apply_config(&relaxed).unwrap();

    // Same 6 kV/m field is no longer a condition; the clear fires once
    // the cleared interval elapses
    hold(&mut monitor, &mut t, 6.0, 5, &mut events);

    let clears = of_kind(&events, ConditionKind::HighField, NotificationKind::Clear);
    assert_eq!(clears.len(), 1);
    let repeats = of_kind(&events, ConditionKind::HighField, NotificationKind::Repeat);
    assert!(repeats.is_empty());
}

#[test]
fn summaries_pace_with_the_window() {
    let config = MonitorConfig {
        field_average_secs: 0.5, // 10-sample window
        ..MonitorConfig::default()
    };
    let mut monitor = FieldMonitor::new(&config).unwrap();

    let mut summaries = Vec::new();
    for i in 0..100u64 {
        let cycle = monitor.process(i * STEP_MS, 2.0).unwrap();
        if let Some(summary) = cycle.summary {
            summaries.push(summary);
        }
    }

    assert_eq!(summaries.len(), 10);
    for summary in &summaries {
        assert!((summary.mean - 2.0).abs() < 1e-5);
        assert_eq!(summary.derivative, 0.0);
    }
}
