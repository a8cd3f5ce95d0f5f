#![forbid(unsafe_code)]

//! Per-level panel slide state machine.
//!
//! Each navigation level (main plus four auxiliary panels) carries a
//! [`SlideState`]: a four-phase machine driving a height fraction the
//! renderer maps onto its own transition primitives. The machine owns no
//! clock; callers feed [`SlideState::tick`] elapsed time.
//!
//! State machine: `Collapsed → Expanding → Expanded → Collapsing → Collapsed`.
//! Rapid toggling reverses mid-flight (e.g. `Expanding → Collapsing`)
//! keeping the current progress, so a half-open panel slides back from
//! where it is instead of snapping.
//!
//! # Invariants
//!
//! - Progress is always in [0.0, 1.0].
//! - Zero-duration or reduced-motion configs complete transitions
//!   immediately; no intermediate phase is observable.
//! - `tick` never changes phase except `Expanding → Expanded` and
//!   `Collapsing → Collapsed` on completion.

use web_time::Duration;

/// Number of panel levels (main + aux1..aux4).
pub const LEVEL_COUNT: usize = 5;

/// One nested panel level; `Main` is the shallowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PanelLevel {
    /// Level-1 entries.
    Main,
    /// Children of the level-1 selection.
    Aux1,
    /// Children of the level-2 selection.
    Aux2,
    /// Children of the level-3 selection.
    Aux3,
    /// Children of the level-4 selection.
    Aux4,
}

impl PanelLevel {
    /// All levels, shallowest first.
    pub const ALL: [Self; LEVEL_COUNT] = [Self::Main, Self::Aux1, Self::Aux2, Self::Aux3, Self::Aux4];

    /// Zero-based index (`Main` is 0).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Main => 0,
            Self::Aux1 => 1,
            Self::Aux2 => 2,
            Self::Aux3 => 3,
            Self::Aux4 => 4,
        }
    }

    /// Level from a zero-based index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The panel displaying children of an open prefix of `depth`
    /// segments: depth 0 (the root) is shown by `Main`, depth 1 by
    /// `Aux1`, and so on.
    #[must_use]
    pub fn for_depth(depth: usize) -> Option<Self> {
        Self::from_index(depth)
    }
}

/// Phase of the slide lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlidePhase {
    /// Fully closed; not rendered.
    #[default]
    Collapsed,
    /// Sliding open.
    Expanding,
    /// Fully open.
    Expanded,
    /// Sliding shut.
    Collapsing,
}

impl SlidePhase {
    /// Whether the panel occupies any space.
    #[inline]
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Collapsed)
    }

    /// Whether a transition is in flight.
    #[inline]
    #[must_use]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Expanding | Self::Collapsing)
    }
}

/// Slide timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideConfig {
    duration: Duration,
    reduced_motion: bool,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            reduced_motion: false,
        }
    }
}

impl SlideConfig {
    /// Default timing (300 ms slides).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slide duration.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Disable animation entirely (transitions complete instantly).
    #[must_use]
    pub const fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Slide duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether transitions complete instantly.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.reduced_motion || self.duration.is_zero()
    }
}

/// The slide state machine for one panel level.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideState {
    phase: SlidePhase,
    /// Open fraction in [0.0, 1.0]; 1.0 is fully open.
    progress: f64,
}

impl SlideState {
    /// A collapsed panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SlidePhase {
        self.phase
    }

    /// Open fraction in [0.0, 1.0].
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Begin (or continue) opening. Returns whether the state changed.
    pub fn expand(&mut self, config: &SlideConfig) -> bool {
        match self.phase {
            SlidePhase::Expanded | SlidePhase::Expanding => false,
            SlidePhase::Collapsed => {
                self.progress = 0.0;
                if config.is_instant() {
                    self.set_phase(SlidePhase::Expanded);
                    self.progress = 1.0;
                } else {
                    self.set_phase(SlidePhase::Expanding);
                }
                true
            }
            // Reverse mid-flight, keeping the current height.
            SlidePhase::Collapsing => {
                if config.is_instant() {
                    self.set_phase(SlidePhase::Expanded);
                    self.progress = 1.0;
                } else {
                    self.set_phase(SlidePhase::Expanding);
                }
                true
            }
        }
    }

    /// Begin (or continue) closing. Returns whether the state changed.
    pub fn collapse(&mut self, config: &SlideConfig) -> bool {
        match self.phase {
            SlidePhase::Collapsed | SlidePhase::Collapsing => false,
            SlidePhase::Expanded => {
                self.progress = 1.0;
                if config.is_instant() {
                    self.set_phase(SlidePhase::Collapsed);
                    self.progress = 0.0;
                } else {
                    self.set_phase(SlidePhase::Collapsing);
                }
                true
            }
            SlidePhase::Expanding => {
                if config.is_instant() {
                    self.set_phase(SlidePhase::Collapsed);
                    self.progress = 0.0;
                } else {
                    self.set_phase(SlidePhase::Collapsing);
                }
                true
            }
        }
    }

    /// Jump straight to `Expanded` (cascade restore after content return).
    pub fn force_expanded(&mut self) {
        self.set_phase(SlidePhase::Expanded);
        self.progress = 1.0;
    }

    /// Jump straight to `Collapsed`.
    pub fn force_collapsed(&mut self) {
        self.set_phase(SlidePhase::Collapsed);
        self.progress = 0.0;
    }

    /// Advance an in-flight transition by `delta`.
    ///
    /// Returns `true` when a transition completed during this tick.
    pub fn tick(&mut self, delta: Duration, config: &SlideConfig) -> bool {
        if !self.phase.is_animating() {
            return false;
        }
        let step = if config.is_instant() {
            1.0
        } else {
            delta.as_secs_f64() / config.duration().as_secs_f64().max(f64::EPSILON)
        };
        match self.phase {
            SlidePhase::Expanding => {
                self.progress = (self.progress + step).min(1.0);
                if self.progress >= 1.0 {
                    self.set_phase(SlidePhase::Expanded);
                    return true;
                }
            }
            SlidePhase::Collapsing => {
                self.progress = (self.progress - step).max(0.0);
                if self.progress <= 0.0 {
                    self.set_phase(SlidePhase::Collapsed);
                    return true;
                }
            }
            SlidePhase::Collapsed | SlidePhase::Expanded => {}
        }
        false
    }

    fn set_phase(&mut self, next: SlidePhase) {
        #[cfg(feature = "tracing")]
        if self.phase != next {
            tracing::trace!(
                target: "wayline::panel",
                from = ?self.phase,
                to = ?next,
                "slide phase"
            );
        }
        self.phase = next;
    }
}

/// Interaction state for one panel level.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelState {
    /// Slide machine for this level.
    pub slide: SlideState,
    /// Whether the pointer is currently over this level.
    pub hovered: bool,
}

/// All five panel levels.
#[derive(Debug, Clone, Default)]
pub struct PanelSet {
    states: [PanelState; LEVEL_COUNT],
}

impl PanelSet {
    /// All levels collapsed, nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a level.
    #[must_use]
    pub fn get(&self, level: PanelLevel) -> &PanelState {
        &self.states[level.index()]
    }

    /// Mutable state for a level.
    pub fn get_mut(&mut self, level: PanelLevel) -> &mut PanelState {
        &mut self.states[level.index()]
    }

    /// Whether any level is hovered.
    #[must_use]
    pub fn any_hovered(&self) -> bool {
        self.states.iter().any(|s| s.hovered)
    }

    /// Levels currently visible (phase not `Collapsed`), shallowest first.
    #[must_use]
    pub fn visible_levels(&self) -> Vec<PanelLevel> {
        PanelLevel::ALL
            .into_iter()
            .filter(|level| self.get(*level).slide.phase().is_visible())
            .collect()
    }

    /// Iterate `(level, state)` pairs, shallowest first.
    pub fn iter(&self) -> impl Iterator<Item = (PanelLevel, &PanelState)> {
        PanelLevel::ALL.into_iter().map(|level| (level, self.get(level)))
    }
}
