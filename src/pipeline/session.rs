// src/pipeline/session.rs
//! Per-session activity time accounting.
//!
//! A 1 Hz tick attributes one second to whichever class is currently
//! stabilized, whether or not a new prediction arrived that second — under
//! network failure the last known class keeps accruing time. Summary metrics
//! are derived on demand, never stored.

use crate::types::MetClass;
use serde::Serialize;

/// Percentage of `part` in `whole`, rounded to the nearest integer; 0 when
/// `whole` is 0.
pub fn pct(part: u64, whole: u64) -> u32 {
    if whole > 0 {
        (100.0 * part as f64 / whole as f64).round() as u32
    } else {
        0
    }
}

/// Per-class elapsed seconds plus the currently displayed class.
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    timers: [u64; MetClass::COUNT],
    current: MetClass,
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAggregator {
    /// Fresh session: all timers zero, current class Sedentary.
    pub fn new() -> Self {
        Self {
            timers: [0; MetClass::COUNT],
            current: MetClass::Sedentary,
        }
    }

    /// One second elapsed; attribute it to the current class.
    pub fn tick(&mut self) {
        self.timers[self.current.index()] += 1;
    }

    /// Replace the currently displayed class.
    pub fn set_current(&mut self, class: MetClass) {
        self.current = class;
    }

    /// Currently displayed class.
    pub fn current(&self) -> MetClass {
        self.current
    }

    /// Elapsed seconds attributed to `class`.
    pub fn seconds(&self, class: MetClass) -> u64 {
        self.timers[class.index()]
    }

    /// Total session seconds across all classes.
    pub fn total(&self) -> u64 {
        self.timers.iter().sum()
    }

    /// Seconds in any non-sedentary class.
    pub fn active(&self) -> u64 {
        self.seconds(MetClass::Light) + self.mvpa()
    }

    /// Moderate-to-vigorous physical activity seconds.
    pub fn mvpa(&self) -> u64 {
        self.seconds(MetClass::Moderate) + self.seconds(MetClass::Vigorous)
    }

    /// Zero all timers and return the display class to Sedentary.
    pub fn reset(&mut self) {
        self.timers = [0; MetClass::COUNT];
        self.current = MetClass::Sedentary;
    }

    /// Snapshot of all derived metrics.
    pub fn summary(&self) -> SessionSummary {
        let total = self.total();
        let active = self.active();
        let mvpa = self.mvpa();
        SessionSummary {
            sedentary_s: self.seconds(MetClass::Sedentary),
            light_s: self.seconds(MetClass::Light),
            moderate_s: self.seconds(MetClass::Moderate),
            vigorous_s: self.seconds(MetClass::Vigorous),
            total_s: total,
            active_s: active,
            mvpa_s: mvpa,
            active_pct: pct(active, total),
            mvpa_pct: pct(mvpa, total),
            current: self.current,
        }
    }
}

/// Derived session metrics, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Seconds spent Sedentary.
    pub sedentary_s: u64,
    /// Seconds spent Light.
    pub light_s: u64,
    /// Seconds spent Moderate.
    pub moderate_s: u64,
    /// Seconds spent Vigorous.
    pub vigorous_s: u64,
    /// Sum of all class timers.
    pub total_s: u64,
    /// Light + Moderate + Vigorous.
    pub active_s: u64,
    /// Moderate + Vigorous.
    pub mvpa_s: u64,
    /// Active share of the session, percent.
    pub active_pct: u32,
    /// MVPA share of the session, percent.
    pub mvpa_pct: u32,
    /// Class the session is currently accruing to.
    pub current: MetClass,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct() {
        assert_eq!(pct(0, 0), 0);
        assert_eq!(pct(50, 100), 50);
        assert_eq!(pct(1, 3), 33);
        assert_eq!(pct(2, 3), 67);
    }

    #[test]
    fn test_ticks_accrue_to_current_class() {
        let mut session = SessionAggregator::new();
        session.tick();
        session.tick();
        session.set_current(MetClass::Moderate);
        session.tick();

        assert_eq!(session.seconds(MetClass::Sedentary), 2);
        assert_eq!(session.seconds(MetClass::Moderate), 1);
        assert_eq!(session.total(), 3);
    }

    #[test]
    fn test_tick_sum_invariant() {
        let mut session = SessionAggregator::new();
        let classes = [
            MetClass::Light,
            MetClass::Vigorous,
            MetClass::Light,
            MetClass::Sedentary,
            MetClass::Moderate,
        ];
        let mut ticks = 0;
        for class in classes {
            session.set_current(class);
            for _ in 0..4 {
                session.tick();
                ticks += 1;
            }
        }
        assert_eq!(session.total(), ticks);
    }

    #[test]
    fn test_derived_metrics() {
        let mut session = SessionAggregator::new();
        session.set_current(MetClass::Sedentary);
        for _ in 0..10 {
            session.tick();
        }
        session.set_current(MetClass::Light);
        for _ in 0..5 {
            session.tick();
        }
        session.set_current(MetClass::Moderate);
        for _ in 0..3 {
            session.tick();
        }
        session.set_current(MetClass::Vigorous);
        for _ in 0..2 {
            session.tick();
        }

        let summary = session.summary();
        assert_eq!(summary.total_s, 20);
        assert_eq!(summary.active_s, 10);
        assert_eq!(summary.mvpa_s, 5);
        assert_eq!(summary.active_pct, 50);
        assert_eq!(summary.mvpa_pct, 25);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut session = SessionAggregator::new();
        session.set_current(MetClass::Vigorous);
        session.tick();
        session.reset();

        assert_eq!(session.total(), 0);
        assert_eq!(session.current(), MetClass::Sedentary);
        for class in MetClass::ALL {
            assert_eq!(session.seconds(class), 0);
        }
    }
}
