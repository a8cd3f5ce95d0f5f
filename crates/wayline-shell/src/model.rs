#![forbid(unsafe_code)]

//! The navigation store: one model, one update function.
//!
//! [`NavModel`] owns every piece of navigation state — the pruned menu
//! tree, the active location, the open-path chain, the five panel slide
//! machines, the hover debounce deadlines, and the transition guard. The
//! host feeds it [`NavMsg`]s (with an explicit `now`, so the model never
//! reads a wall clock) and executes the returned [`NavCmd`]s.
//!
//! Cascades stay strictly sequential: one slide step is in flight at a
//! time, and the next begins only when the previous one finishes, either
//! through [`NavMsg::Tick`] progress or an explicit
//! [`NavMsg::SlideFinished`] from a renderer driving its own transitions.

use web_time::{Duration, Instant};

use wayline_core::access::{AccessCell, FlagSource, TableFlags};
use wayline_core::builder::{BuilderConfig, build_menu};
use wayline_core::location::LocationKey;
use wayline_core::menu::{MenuTemplate, MenuTree};
use wayline_guard::detect::ChangeDetector;
use wayline_guard::form::{FormSnapshot, MassiveMarker, MultiRowBuffer, OperationTab};
use wayline_guard::guard::{GuardDecision, TransitionGuard, table_of};
use wayline_panels::hover::{CloseTimers, HoverConfig};
use wayline_panels::open_path::OpenPath;
use wayline_panels::panel::{PanelLevel, PanelSet, SlideConfig};
use wayline_panels::sync::{self, Cascade, StepKind};

use crate::events::HostEvent;

/// Stable screen identifier for a location's dirty-map entry.
#[must_use]
pub fn panel_id_for(key: &LocationKey) -> String {
    match table_of(key) {
        Some(table) => format!("screen-{table}"),
        None => "screen-home".to_owned(),
    }
}

/// Messages the host feeds the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavMsg {
    /// The pointer entered a panel level.
    PointerEnterPanel(PanelLevel),
    /// The pointer left a panel level.
    PointerLeavePanel(PanelLevel),
    /// The pointer entered the content area.
    PointerEnterContent,
    /// The pointer left the content area.
    PointerLeaveContent,
    /// A control proposed a location change.
    Navigate(LocationKey),
    /// The user confirmed the parked transition.
    ConfirmLeave,
    /// The user cancelled the parked transition.
    CancelLeave,
    /// A renderer-driven slide transition finished on a level.
    SlideFinished(PanelLevel),
    /// Advance time-driven work (slides, debounce deadlines).
    Tick,
}

/// Commands returned from [`NavModel::update`] for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCmd {
    /// Nothing to do.
    None,
    /// Execute several commands in order.
    Batch(Vec<NavCmd>),
    /// Surface a host event.
    Emit(HostEvent),
}

impl NavCmd {
    /// The no-op command.
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Emit one host event.
    #[inline]
    #[must_use]
    pub const fn emit(event: HostEvent) -> Self {
        Self::Emit(event)
    }

    /// Batch commands, collapsing empty and singleton cases.
    #[must_use]
    pub fn batch(mut cmds: Vec<NavCmd>) -> Self {
        cmds.retain(|c| !matches!(c, Self::None));
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Flatten into the contained events, in order.
    #[must_use]
    pub fn into_events(self) -> Vec<HostEvent> {
        match self {
            Self::None => Vec::new(),
            Self::Emit(event) => vec![event],
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::into_events).collect(),
        }
    }
}

/// Timing configuration for the whole shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavConfig {
    /// Panel slide timing.
    pub slide: SlideConfig,
    /// Hover debounce timing.
    pub hover: HoverConfig,
}

impl NavConfig {
    /// Default timings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slide configuration.
    #[must_use]
    pub const fn with_slide(mut self, slide: SlideConfig) -> Self {
        self.slide = slide;
        self
    }

    /// Set the hover configuration.
    #[must_use]
    pub const fn with_hover(mut self, hover: HoverConfig) -> Self {
        self.hover = hover;
        self
    }
}

/// The navigation store.
#[derive(Debug)]
pub struct NavModel {
    template: MenuTemplate,
    builder_config: BuilderConfig,
    tree: MenuTree,
    access_generation: u64,
    active: LocationKey,
    open: OpenPath,
    panels: PanelSet,
    timers: CloseTimers,
    returning_from_content: bool,
    cascade: Cascade,
    guard: TransitionGuard,
    detector: ChangeDetector,
    last_tick: Option<Instant>,
    config: NavConfig,
}

impl NavModel {
    /// Create a model with an empty tree; call [`NavModel::sync_access`]
    /// once the permission snapshot resolves.
    #[must_use]
    pub fn new(template: MenuTemplate, config: NavConfig) -> Self {
        Self {
            template,
            builder_config: BuilderConfig::new(),
            tree: MenuTree::empty(),
            access_generation: 0,
            active: LocationKey::root(),
            open: OpenPath::new(),
            panels: PanelSet::new(),
            timers: CloseTimers::new(),
            returning_from_content: false,
            cascade: Cascade::empty(),
            guard: TransitionGuard::new(),
            detector: ChangeDetector::new(),
            last_tick: None,
            config,
        }
    }

    /// Replace the transition guard (exception lists, prior dirty state).
    #[must_use]
    pub fn with_guard(mut self, guard: TransitionGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Replace the menu builder configuration.
    #[must_use]
    pub fn with_builder_config(mut self, builder_config: BuilderConfig) -> Self {
        self.builder_config = builder_config;
        self
    }

    /// The pruned menu tree.
    #[must_use]
    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    /// The active location.
    #[must_use]
    pub fn active(&self) -> &LocationKey {
        &self.active
    }

    /// The open-path chain.
    #[must_use]
    pub fn open_path(&self) -> &OpenPath {
        &self.open
    }

    /// The panel set.
    #[must_use]
    pub fn panels(&self) -> &PanelSet {
        &self.panels
    }

    /// The transition guard.
    #[must_use]
    pub fn guard(&self) -> &TransitionGuard {
        &self.guard
    }

    /// Whether a cascade is still running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.cascade.is_done()
    }

    /// Earliest armed debounce deadline, for hosts that schedule wakeups.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Rebuild the menu tree if the access cell moved since the last sync.
    ///
    /// Returns whether a rebuild happened. The active location and open
    /// path are re-reconciled against the new tree so a shrunken menu
    /// cannot leave a stale branch open.
    pub fn sync_access(&mut self, cell: &AccessCell, flags: &dyn FlagSource) -> bool {
        let generation = cell.generation();
        if generation == self.access_generation {
            return false;
        }
        let snapshot = cell.load();
        self.tree = build_menu(
            &self.template,
            snapshot.as_deref(),
            flags,
            &self.builder_config,
        );
        self.access_generation = generation;

        let plan = sync::plan(&LocationKey::root(), &self.active, &OpenPath::new(), &self.tree);
        self.open.clear();
        let cascade = sync::apply(&plan, &mut self.open);
        self.cascade = cascade;
        self.pump_cascade();
        true
    }

    /// Report a screen's form state; updates the dirty map through the
    /// change detector and surfaces a dirty-changed event when it flips.
    pub fn note_form_state(
        &mut self,
        form: Option<&FormSnapshot>,
        flags: &TableFlags,
        tab: OperationTab,
        rows: &MultiRowBuffer,
        massive: &MassiveMarker,
    ) -> NavCmd {
        let dirty = self.detector.is_dirty(form, flags, tab, rows, massive);
        let panel_id = panel_id_for(&self.active);
        if self.guard.set_dirty(&panel_id, dirty) {
            NavCmd::emit(HostEvent::DirtyChanged { panel_id, dirty })
        } else {
            NavCmd::none()
        }
    }

    /// Feed one message through the state machine.
    pub fn update(&mut self, msg: NavMsg, now: Instant) -> NavCmd {
        let delta = match self.last_tick {
            Some(prev) => now.saturating_duration_since(prev),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now);
        match msg {
            NavMsg::PointerEnterPanel(level) => self.pointer_enter_panel(level),
            NavMsg::PointerLeavePanel(level) => self.pointer_leave_panel(level, now),
            NavMsg::PointerEnterContent => self.pointer_enter_content(),
            NavMsg::PointerLeaveContent => {
                self.timers.cancel_all();
                self.returning_from_content = true;
                NavCmd::none()
            }
            NavMsg::Navigate(to) => self.navigate(to),
            NavMsg::ConfirmLeave => self.confirm_leave(),
            NavMsg::CancelLeave => {
                self.guard.cancel();
                NavCmd::none()
            }
            NavMsg::SlideFinished(level) => {
                self.finish_slide(level);
                NavCmd::none()
            }
            NavMsg::Tick => self.tick(delta, now),
        }
    }

    fn pointer_enter_panel(&mut self, level: PanelLevel) -> NavCmd {
        self.timers.cancel(level);
        self.panels.get_mut(level).hovered = true;

        if self.returning_from_content {
            // Re-entering navigation after a content excursion restores the
            // full drilled depth at once instead of level-by-level hovers.
            self.returning_from_content = false;
            for implied in self.implied_levels() {
                self.panels.get_mut(implied).slide.force_expanded();
            }
            self.panels.get_mut(level).slide.force_expanded();
        } else {
            self.panels.get_mut(level).slide.expand(&self.config.slide);
        }
        NavCmd::none()
    }

    fn pointer_leave_panel(&mut self, level: PanelLevel, now: Instant) -> NavCmd {
        self.panels.get_mut(level).hovered = false;
        self.timers.arm(level, now, &self.config.hover);
        NavCmd::none()
    }

    fn pointer_enter_content(&mut self) -> NavCmd {
        self.timers.cancel_all();
        self.returning_from_content = true;
        if !self.panels.any_hovered() {
            // Full collapse, no debounce.
            self.start_collapse_sweep();
        }
        NavCmd::none()
    }

    fn navigate(&mut self, to: LocationKey) -> NavCmd {
        let panel_id = panel_id_for(&self.active);
        let from = self.active.clone();
        match self.guard.request(&from, &to, &panel_id) {
            GuardDecision::Applied(target) => self.apply_location(target),
            GuardDecision::Deferred => {
                NavCmd::emit(HostEvent::ConfirmRequested { from, to })
            }
            GuardDecision::Ignored => NavCmd::none(),
        }
    }

    fn confirm_leave(&mut self) -> NavCmd {
        let Some(pending) = self.guard.confirm() else {
            return NavCmd::none();
        };
        NavCmd::batch(vec![
            NavCmd::emit(HostEvent::DirtyChanged {
                panel_id: pending.panel_id.clone(),
                dirty: false,
            }),
            self.apply_location(pending.to),
        ])
    }

    /// Commit a location, reconcile the open path, and start the cascade.
    fn apply_location(&mut self, to: LocationKey) -> NavCmd {
        let plan = sync::plan(&self.active, &to, &self.open, &self.tree);
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "wayline::shell", from = %self.active, to = %to, "location applied");
        self.active = to.clone();
        if !plan.is_noop() {
            let cascade = sync::apply(&plan, &mut self.open);
            self.cascade = cascade;
            self.pump_cascade();
        }
        NavCmd::emit(HostEvent::LocationChanged(to))
    }

    fn tick(&mut self, delta: Duration, now: Instant) -> NavCmd {
        // Advance every in-flight slide; retire cascade steps that landed.
        for level in PanelLevel::ALL {
            if self.panels.get_mut(level).slide.tick(delta, &self.config.slide) {
                self.finish_slide(level);
            }
        }

        // Debounce deadlines: a fired timer collapses everything only if
        // no level is hovered by the time it fires.
        let fired = self.timers.due(now);
        if !fired.is_empty() && !self.panels.any_hovered() {
            self.start_collapse_sweep();
        }

        self.pump_cascade();
        NavCmd::none()
    }

    fn finish_slide(&mut self, level: PanelLevel) {
        if self.cascade.finish(level) {
            self.pump_cascade();
        }
    }

    /// Start queued cascade steps until one actually animates.
    ///
    /// Steps that complete instantly (already in the target phase, or an
    /// instant slide config) retire immediately so the cascade cannot
    /// stall waiting for a transition that will never tick.
    fn pump_cascade(&mut self) {
        while let Some(step) = self.cascade.begin_next() {
            let slide = &mut self.panels.get_mut(step.level).slide;
            match step.kind {
                StepKind::Open => slide.expand(&self.config.slide),
                StepKind::Close => slide.collapse(&self.config.slide),
            };
            if self.panels.get(step.level).slide.phase().is_animating() {
                break;
            }
            self.cascade.finish(step.level);
        }
    }

    /// Collapse every visible level, deepest first, leaving the open path
    /// untouched so a later hover can restore the drilled depth.
    fn start_collapse_sweep(&mut self) {
        if !self.cascade.is_done() {
            return;
        }
        let visible = self.panels.visible_levels();
        if visible.is_empty() {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "wayline::shell", levels = visible.len(), "collapse sweep");
        self.cascade = Cascade::collapse_sweep(&visible);
        self.pump_cascade();
    }

    /// Levels the open path implies should be expanded: the main panel
    /// plus one auxiliary panel per open prefix.
    fn implied_levels(&self) -> Vec<PanelLevel> {
        let mut levels = vec![PanelLevel::Main];
        for entry in self.open.entries() {
            if let Some(level) = PanelLevel::for_depth(entry.depth()) {
                levels.push(level);
            }
        }
        levels
    }
}
