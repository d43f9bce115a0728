// src/pipeline/extractor.rs
//! Sample buffer and window extraction.
//!
//! Samples append unconditionally; a window is dispatched only when the
//! buffer holds a full `WIN`, no request is outstanding, the throttle
//! interval has elapsed, and no reset grace period is active. Skipped
//! dispatches shed load: samples keep accumulating and the next eligible tick
//! takes the most recent `WIN`, so stale excess never queues extra requests.

use crate::config::PipelineConfig;
use crate::types::{Sample, Window};
use crate::utils::time::TimeProvider;
use std::collections::VecDeque;
use std::sync::Arc;

/// Sample buffer plus dispatch-eligibility logic. Never fails; it only
/// decides to dispatch or wait.
pub struct WindowExtractor {
    buffer: VecDeque<Sample>,
    win: usize,
    step: usize,
    throttle_ms: u64,
    grace_ms: u64,
    last_dispatch_ms: Option<u64>,
    grace_until_ms: Option<u64>,
    clock: Arc<dyn TimeProvider>,
}

impl WindowExtractor {
    /// Build an extractor from validated pipeline parameters.
    pub fn new(config: &PipelineConfig, clock: Arc<dyn TimeProvider>) -> Self {
        let win = config.win_samples();
        Self {
            buffer: VecDeque::with_capacity(win * 2),
            win,
            step: config.step_samples(),
            throttle_ms: config.throttle_ms,
            grace_ms: config.reset_grace_ms,
            last_dispatch_ms: None,
            grace_until_ms: None,
            clock,
        }
    }

    /// Append one sample, then evaluate dispatch eligibility.
    ///
    /// Returns the window to hand to the transport boundary when eligible.
    pub fn push(&mut self, sample: Sample, in_flight: bool) -> Option<Window> {
        self.buffer.push_back(sample);
        self.try_dispatch(in_flight)
    }

    fn try_dispatch(&mut self, in_flight: bool) -> Option<Window> {
        let now = self.clock.now_millis();

        if let Some(until) = self.grace_until_ms {
            if now < until {
                return None;
            }
            self.grace_until_ms = None;
        }

        if in_flight || self.buffer.len() < self.win {
            return None;
        }

        if let Some(last) = self.last_dispatch_ms {
            if now.saturating_sub(last) < self.throttle_ms {
                return None;
            }
        }

        // Most recent WIN samples become the window.
        let start = self.buffer.len() - self.win;
        let window: Vec<Sample> = self.buffer.iter().skip(start).copied().collect();

        // Retain the overlap tail for the next window.
        let tail = self.win - self.step;
        let excess = self.buffer.len() - tail;
        self.buffer.drain(..excess);

        self.last_dispatch_ms = Some(now);
        Some(Window::new(window))
    }

    /// Drop all buffered samples and enter the post-reset grace period.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_dispatch_ms = None;
        self.grace_until_ms = Some(self.clock.now_millis() + self.grace_ms);
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no samples are buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffered samples, oldest first.
    pub fn buffered(&self) -> impl Iterator<Item = &Sample> {
        self.buffer.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::MockTimeProvider;

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            sampling_rate_hz: 4,
            window_seconds: 1.0,
            overlap_fraction: 0.5,
            throttle_ms: 1_000,
            smoothing_window: 3,
            reset_grace_ms: 1_500,
        }
    }

    fn sample(i: usize) -> Sample {
        Sample::new(i as f64, 0.0, 1.0)
    }

    #[test]
    fn test_no_dispatch_below_win() {
        let clock = Arc::new(MockTimeProvider::new(0));
        let mut extractor = WindowExtractor::new(&small_config(), clock);
        for i in 0..3 {
            assert!(extractor.push(sample(i), false).is_none());
        }
        assert_eq!(extractor.len(), 3);
    }

    #[test]
    fn test_dispatch_and_retained_tail() {
        let clock = Arc::new(MockTimeProvider::new(0));
        let mut extractor = WindowExtractor::new(&small_config(), clock);

        let mut window = None;
        for i in 0..4 {
            window = extractor.push(sample(i), false);
        }
        let window = window.expect("full buffer dispatches");
        assert_eq!(window.len(), 4);

        // The tail equals the last WIN - STEP samples of the dispatched window.
        assert_eq!(extractor.len(), 2);
        let tail: Vec<Sample> = extractor.buffered().copied().collect();
        assert_eq!(&tail[..], &window.samples()[2..]);
    }

    #[test]
    fn test_in_flight_suppresses_dispatch_without_discarding() {
        let clock = Arc::new(MockTimeProvider::new(0));
        let mut extractor = WindowExtractor::new(&small_config(), clock);

        for i in 0..6 {
            assert!(extractor.push(sample(i), true).is_none());
        }
        // Nothing was discarded while suppressed.
        assert_eq!(extractor.len(), 6);

        // Once clear, the most recent WIN samples form the window.
        let window = extractor.push(sample(6), false).unwrap();
        let values: Vec<f64> = window.samples().iter().map(|s| s.x).collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_throttle_blocks_until_interval_elapses() {
        let clock = Arc::new(MockTimeProvider::new(0));
        let mut extractor = WindowExtractor::new(&small_config(), Arc::clone(&clock) as _);

        for i in 0..4 {
            extractor.push(sample(i), false);
        }
        // Buffer refills immediately, but the throttle holds.
        for i in 4..8 {
            assert!(extractor.push(sample(i), false).is_none());
        }

        clock.advance_by(1_000);
        assert!(extractor.push(sample(8), false).is_some());
    }

    #[test]
    fn test_reset_enters_grace_period() {
        let clock = Arc::new(MockTimeProvider::new(0));
        let mut extractor = WindowExtractor::new(&small_config(), Arc::clone(&clock) as _);

        for i in 0..4 {
            extractor.push(sample(i), false);
        }
        extractor.reset();
        assert!(extractor.is_empty());

        // A full buffer inside the grace window stays quiet.
        for i in 0..8 {
            assert!(extractor.push(sample(i), false).is_none());
        }

        clock.advance_by(1_500);
        assert!(extractor.push(sample(9), false).is_some());
    }
}
