#![forbid(unsafe_code)]

//! Debounced close deadlines for panel levels.
//!
//! Leaving a panel does not close it immediately: a per-level deadline is
//! armed, and only if it fires with no level hovered does the cascade
//! collapse begin. Re-entering a level clears its own deadline without
//! touching siblings. At most one deadline per level exists; arming again
//! replaces the previous one.

use web_time::{Duration, Instant};

use crate::panel::{LEVEL_COUNT, PanelLevel};

/// Hover timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverConfig {
    close_delay: Duration,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            close_delay: Duration::from_millis(150),
        }
    }
}

impl HoverConfig {
    /// Default timing (150 ms close debounce).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the close debounce delay.
    #[must_use]
    pub const fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    /// The close debounce delay.
    #[must_use]
    pub const fn close_delay(&self) -> Duration {
        self.close_delay
    }
}

/// One pending-close deadline per panel level.
#[derive(Debug, Clone, Default)]
pub struct CloseTimers {
    deadlines: [Option<Instant>; LEVEL_COUNT],
}

impl CloseTimers {
    /// No deadlines armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the deadline for `level`.
    pub fn arm(&mut self, level: PanelLevel, now: Instant, config: &HoverConfig) {
        self.deadlines[level.index()] = Some(now + config.close_delay());
    }

    /// Clear the deadline for `level`, if armed.
    pub fn cancel(&mut self, level: PanelLevel) {
        self.deadlines[level.index()] = None;
    }

    /// Clear every deadline.
    pub fn cancel_all(&mut self) {
        self.deadlines = [None; LEVEL_COUNT];
    }

    /// Whether `level` has an armed deadline.
    #[must_use]
    pub fn is_armed(&self, level: PanelLevel) -> bool {
        self.deadlines[level.index()].is_some()
    }

    /// Drain every deadline at or before `now`, returning the fired levels
    /// shallowest first.
    pub fn due(&mut self, now: Instant) -> Vec<PanelLevel> {
        let mut fired = Vec::new();
        for level in PanelLevel::ALL {
            if let Some(deadline) = self.deadlines[level.index()]
                && deadline <= now
            {
                self.deadlines[level.index()] = None;
                fired.push(level);
            }
        }
        fired
    }

    /// The earliest armed deadline, for hosts that schedule wakeups.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().flatten().min().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_then_due_fires_once() {
        let cfg = HoverConfig::new().with_close_delay(Duration::from_millis(150));
        let start = Instant::now();
        let mut timers = CloseTimers::new();

        timers.arm(PanelLevel::Aux1, start, &cfg);
        assert!(timers.due(start + Duration::from_millis(100)).is_empty());

        let fired = timers.due(start + Duration::from_millis(150));
        assert_eq!(fired, vec![PanelLevel::Aux1]);
        assert!(timers.due(start + Duration::from_millis(200)).is_empty());
    }

    #[test]
    fn cancel_disarms_only_that_level() {
        let cfg = HoverConfig::new();
        let start = Instant::now();
        let mut timers = CloseTimers::new();

        timers.arm(PanelLevel::Main, start, &cfg);
        timers.arm(PanelLevel::Aux3, start, &cfg);
        timers.cancel(PanelLevel::Main);

        assert!(!timers.is_armed(PanelLevel::Main));
        assert!(timers.is_armed(PanelLevel::Aux3));
    }

    #[test]
    fn rearming_replaces_the_deadline() {
        let cfg = HoverConfig::new().with_close_delay(Duration::from_millis(100));
        let start = Instant::now();
        let mut timers = CloseTimers::new();

        timers.arm(PanelLevel::Aux2, start, &cfg);
        timers.arm(PanelLevel::Aux2, start + Duration::from_millis(80), &cfg);

        // Original deadline would have been at +100; the replacement is at +180.
        assert!(timers.due(start + Duration::from_millis(120)).is_empty());
        assert_eq!(
            timers.due(start + Duration::from_millis(180)),
            vec![PanelLevel::Aux2]
        );
    }

    #[test]
    fn next_deadline_is_earliest() {
        let cfg = HoverConfig::new().with_close_delay(Duration::from_millis(100));
        let start = Instant::now();
        let mut timers = CloseTimers::new();

        timers.arm(PanelLevel::Aux4, start + Duration::from_millis(50), &cfg);
        timers.arm(PanelLevel::Aux1, start, &cfg);

        assert_eq!(timers.next_deadline(), Some(start + Duration::from_millis(100)));
    }
}
