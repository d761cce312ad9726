//! Property tests for window retention and statistics

use proptest::prelude::*;

use fieldwatch_core::buffer::{FieldSample, SampleBuffer};
use fieldwatch_core::{FieldWindow, MonitorConfig};

proptest! {
    /// The mean of N <= capacity samples is their exact arithmetic average
    #[test]
    fn mean_matches_arithmetic_average(
        values in prop::collection::vec(-20.0f32..20.0, 1..=20)
    ) {
        let mut window = FieldWindow::new(&MonitorConfig::default()).unwrap();
        for (i, &v) in values.iter().enumerate() {
            window.append(i as u64 * 50, v);
        }

        let expected = values.iter().sum::<f32>() / values.len() as f32;
        prop_assert!((window.mean().unwrap() - expected).abs() < 1e-4);
    }

    /// Overfilling always leaves exactly the most recent `capacity`
    /// samples, in arrival order
    #[test]
    fn overfull_buffer_retains_most_recent_in_order(
        values in prop::collection::vec(-20.0f32..20.0, 21..200),
        capacity in 1usize..=20,
    ) {
        let mut buffer: SampleBuffer<20> = SampleBuffer::new(capacity);
        for (i, &v) in values.iter().enumerate() {
            buffer.push(FieldSample { value: v, timestamp: i as u64 });
        }

        prop_assert_eq!(buffer.len(), capacity);

        let tail = &values[values.len() - capacity..];
        for (i, &expected) in tail.iter().enumerate() {
            prop_assert_eq!(buffer.get(i).unwrap().value, expected);
        }

        // Timestamps stay non-decreasing through eviction
        let times: Vec<u64> = buffer.iter().map(|s| s.timestamp).collect();
        prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Shrinking capacity never discards the newest samples
    #[test]
    fn shrink_preserves_newest(
        len in 1usize..=20,
        shrink_to in 1usize..=20,
    ) {
        let mut buffer: SampleBuffer<20> = SampleBuffer::new(20);
        for i in 0..len {
            buffer.push(FieldSample { value: i as f32, timestamp: i as u64 });
        }

        buffer.set_capacity(shrink_to);

        prop_assert_eq!(buffer.len(), len.min(shrink_to));
        prop_assert_eq!(buffer.last().unwrap().value, (len - 1) as f32);
    }
}
