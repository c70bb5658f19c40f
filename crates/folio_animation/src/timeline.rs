//! Timeline orchestration
//!
//! A [`Timeline`] is an ordered list of [`ScheduledStep`]s resolved from
//! [`AnimationStep`]s at build time: offsets become absolute start times and
//! staggered groups expand into one step per target. After `build()` the
//! step list never changes; only the playhead and play state move.
//!
//! # Example
//!
//! ```ignore
//! use folio_animation::{AnimationStep, Easing, Offset, Timeline};
//! use folio_core::VisualState;
//!
//! let hidden = VisualState::new().opacity(0.0).y(50.0);
//! let shown = VisualState::new().opacity(1.0).y(0.0);
//!
//! let timeline = Timeline::builder()
//!     .delay(0.5)
//!     .add(AnimationStep::from_to([headline], hidden.clone(), shown.clone()).duration(1.2))
//!     .add(
//!         AnimationStep::from_to([subtitle], hidden, shown)
//!             .duration(1.0)
//!             .offset(Offset::Overlap(0.8)),
//!     )
//!     .build()?;
//! ```

use crate::easing::Easing;
use crate::error::TimelineError;
use crate::values::Interpolate;
use folio_core::{ElementId, ElementTree, VisualProperty, VisualState};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Duration of a step that doesn't set one
pub const DEFAULT_STEP_DURATION: f32 = 0.5;

// ============================================================================
// Offsets
// ============================================================================

/// Where a step starts relative to the sequence
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Offset {
    /// Right after the previous step ends
    #[default]
    After,
    /// At an absolute time (seconds from the start of the sequence)
    At(f32),
    /// This many seconds before the previous step ends (`"-=0.8"`)
    Overlap(f32),
    /// This many seconds after the previous step ends (`"+=0.5"`)
    Gap(f32),
}

impl Offset {
    /// Resolve to an absolute start time given the previous step's end
    pub fn resolve(&self, previous_end: f32) -> f32 {
        let start = match *self {
            Offset::After => previous_end,
            Offset::At(t) => t,
            Offset::Overlap(x) => previous_end - x,
            Offset::Gap(x) => previous_end + x,
        };
        start.max(0.0)
    }
}

impl FromStr for Offset {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || TimelineError::InvalidOffset(s.to_string());
        let parse = |v: &str| -> Result<f32, TimelineError> {
            let value: f32 = v.trim().parse().map_err(|_| invalid())?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(invalid())
            }
        };

        if s.is_empty() || s == ">" {
            Ok(Offset::After)
        } else if let Some(rest) = s.strip_prefix("-=") {
            parse(rest).map(Offset::Overlap)
        } else if let Some(rest) = s.strip_prefix("+=") {
            parse(rest).map(Offset::Gap)
        } else {
            parse(s).map(Offset::At)
        }
    }
}

// ============================================================================
// Steps
// ============================================================================

/// One declared transition, possibly over several targets
#[derive(Clone, Debug)]
pub struct AnimationStep {
    pub targets: SmallVec<[ElementId; 4]>,
    /// Explicit start values; `None` captures them from the document when
    /// the step first activates
    pub from: Option<VisualState>,
    pub to: VisualState,
    /// Seconds
    pub duration: f32,
    pub easing: Easing,
    pub offset: Offset,
    /// Seconds between consecutive targets' starts
    pub stagger: f32,
}

impl AnimationStep {
    /// Animate from whatever the targets currently show
    pub fn to(targets: impl IntoIterator<Item = ElementId>, to: VisualState) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            from: None,
            to,
            duration: DEFAULT_STEP_DURATION,
            easing: Easing::default(),
            offset: Offset::After,
            stagger: 0.0,
        }
    }

    /// Animate between two explicit states
    pub fn from_to(
        targets: impl IntoIterator<Item = ElementId>,
        from: VisualState,
        to: VisualState,
    ) -> Self {
        Self {
            from: Some(from),
            ..Self::to(targets, to)
        }
    }

    pub fn duration(mut self, secs: f32) -> Self {
        self.duration = secs;
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    pub fn stagger(mut self, secs: f32) -> Self {
        self.stagger = secs.max(0.0);
        self
    }

    fn validate(&self, index: usize) -> Result<(), TimelineError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(TimelineError::InvalidDuration {
                step: index,
                duration: self.duration,
            });
        }
        if self.to.is_empty() {
            return Err(TimelineError::EmptyStep { step: index });
        }
        if let Some(from) = &self.from {
            if !from.same_keys(&self.to) {
                return Err(TimelineError::MismatchedProperties { step: index });
            }
        }
        Ok(())
    }
}

/// A step resolved to one target and an absolute start time
#[derive(Clone, Debug)]
pub struct ScheduledStep {
    pub target: ElementId,
    pub from: Option<VisualState>,
    pub to: VisualState,
    /// Seconds from the start of the sequence
    pub start: f32,
    pub duration: f32,
    pub easing: Easing,
    /// Index of the declared [`AnimationStep`] this came from
    pub group: usize,
    captured: Option<VisualState>,
}

impl ScheduledStep {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Linear progress of this step at sequence time `t`, in [0, 1]
    pub fn progress_at(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            if t >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            ((t - self.start) / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Start values in effect (explicit or captured)
    pub fn start_values(&self) -> Option<&VisualState> {
        self.from.as_ref().or(self.captured.as_ref())
    }
}

// ============================================================================
// Playback state
// ============================================================================

/// Playback state of a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    /// Built but never started
    Idle,
    Playing,
    Reversing,
    Paused,
    /// Resting at either end
    Finished,
    /// Terminal; never plays again
    Cancelled,
}

/// Where a cancelled timeline leaves its targets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Settle on the post-animation state
    #[default]
    JumpToEnd,
    /// Restore the pre-animation state
    JumpToStart,
}

pub type UpdateCallback = Rc<dyn Fn(f32)>;
pub type CompleteCallback = Rc<dyn Fn()>;

/// A callback produced by [`Timeline::tick`], to be run once no borrows are held
pub enum PendingCallback {
    Update(UpdateCallback, f32),
    Complete(CompleteCallback),
    ReverseComplete(CompleteCallback),
}

impl PendingCallback {
    pub fn run(self) {
        match self {
            PendingCallback::Update(f, progress) => f(progress),
            PendingCallback::Complete(f) | PendingCallback::ReverseComplete(f) => f(),
        }
    }
}

impl fmt::Debug for PendingCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingCallback::Update(_, p) => write!(f, "Update({p})"),
            PendingCallback::Complete(_) => f.write_str("Complete"),
            PendingCallback::ReverseComplete(_) => f.write_str("ReverseComplete"),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Append-only timeline construction
#[derive(Default)]
pub struct TimelineBuilder {
    label: String,
    steps: Vec<ScheduledStep>,
    declared: usize,
    last_end: f32,
    delay: f32,
    repeat: u32,
    yoyo: bool,
    on_update: Option<UpdateCallback>,
    on_complete: Option<CompleteCallback>,
    on_reverse_complete: Option<CompleteCallback>,
    error: Option<TimelineError>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used in logs
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Seconds to wait after `play()` before the first step; not part of progress
    pub fn delay(mut self, secs: f32) -> Self {
        self.delay = secs.max(0.0);
        self
    }

    /// Extra iterations after the first
    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat = count;
        self
    }

    /// Alternate direction on every other iteration
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Called on every tick that moves the playhead, with aggregate progress
    pub fn on_update(mut self, f: impl Fn(f32) + 'static) -> Self {
        self.on_update = Some(Rc::new(f));
        self
    }

    /// Called each time forward playback reaches the end
    pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }

    /// Called each time reversed playback reaches the start
    pub fn on_reverse_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.on_reverse_complete = Some(Rc::new(f));
        self
    }

    pub fn add(mut self, step: AnimationStep) -> Self {
        self.push(step);
        self
    }

    /// Append a step in place (for loops)
    pub fn push(&mut self, step: AnimationStep) {
        let index = self.declared;
        self.declared += 1;

        if let Err(err) = step.validate(index) {
            // First error wins; reported by build()
            self.error.get_or_insert(err);
            return;
        }

        let base = step.offset.resolve(self.last_end);
        let mut group_end = base + step.duration;
        for (i, target) in step.targets.iter().enumerate() {
            let scheduled = ScheduledStep {
                target: *target,
                from: step.from.clone(),
                to: step.to.clone(),
                start: base + step.stagger * i as f32,
                duration: step.duration,
                easing: step.easing,
                group: index,
                captured: None,
            };
            group_end = group_end.max(scheduled.end());
            self.steps.push(scheduled);
        }
        self.last_end = group_end;
    }

    pub fn build(self) -> Result<Timeline, TimelineError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let iteration = self
            .steps
            .iter()
            .map(ScheduledStep::end)
            .fold(0.0_f32, f32::max)
            .max(self.last_end);

        Ok(Timeline {
            label: self.label,
            steps: self.steps,
            iteration,
            delay: self.delay,
            repeat: self.repeat,
            yoyo: self.yoyo,
            time: 0.0,
            delay_remaining: self.delay,
            state: PlayState::Idle,
            paused_reversed: false,
            ended: false,
            on_update: self.on_update,
            on_complete: self.on_complete,
            on_reverse_complete: self.on_reverse_complete,
        })
    }
}

// ============================================================================
// Timeline
// ============================================================================

/// A built sequence of steps plus its playhead
pub struct Timeline {
    label: String,
    steps: Vec<ScheduledStep>,
    /// Length of one iteration (seconds)
    iteration: f32,
    delay: f32,
    repeat: u32,
    yoyo: bool,
    /// Playhead over the whole run, in [0, total_duration]
    time: f32,
    delay_remaining: f32,
    state: PlayState,
    paused_reversed: bool,
    /// Whether the last completed pass ended at the end (vs. the start)
    ended: bool,
    on_update: Option<UpdateCallback>,
    on_complete: Option<CompleteCallback>,
    on_reverse_complete: Option<CompleteCallback>,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    /// Build a timeline from an ordered list of steps
    pub fn build(
        steps: impl IntoIterator<Item = AnimationStep>,
    ) -> Result<Timeline, TimelineError> {
        let mut builder = TimelineBuilder::new();
        for step in steps {
            builder.push(step);
        }
        builder.build()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn steps(&self) -> &[ScheduledStep] {
        &self.steps
    }

    /// Distinct targets, in first-use order
    pub fn targets(&self) -> Vec<ElementId> {
        let mut targets: Vec<ElementId> = Vec::new();
        for step in &self.steps {
            if !targets.contains(&step.target) {
                targets.push(step.target);
            }
        }
        targets
    }

    /// Length of one iteration in seconds
    pub fn duration(&self) -> f32 {
        self.iteration
    }

    /// Length of the whole run (all repeats), excluding the delay
    pub fn total_duration(&self) -> f32 {
        self.iteration * (self.repeat + 1) as f32
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PlayState::Playing | PlayState::Reversing)
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == PlayState::Cancelled
    }

    /// Aggregate progress in [0, 1]
    pub fn progress(&self) -> f32 {
        let total = self.total_duration();
        if total <= 0.0 {
            return if self.ended { 1.0 } else { 0.0 };
        }
        (self.time / total).clamp(0.0, 1.0)
    }

    /// Progress of a single scheduled step in [0, 1]
    pub fn step_progress(&self, index: usize) -> Option<f32> {
        let local = self.local_time(self.time);
        self.steps.get(index).map(|s| s.progress_at(local))
    }

    // =========================================================================
    // Playback control
    // =========================================================================

    /// Play forward from the playhead
    ///
    /// Returns false if cancelled or already resting at the end.
    pub fn play(&mut self) -> bool {
        match self.state {
            PlayState::Cancelled => false,
            PlayState::Playing => true,
            PlayState::Finished if self.at_end() => false,
            PlayState::Idle => {
                self.delay_remaining = self.delay;
                self.state = PlayState::Playing;
                true
            }
            _ => {
                self.delay_remaining = 0.0;
                self.state = PlayState::Playing;
                true
            }
        }
    }

    /// Play backward from the playhead toward the start
    ///
    /// Returns false if cancelled or already at the start.
    pub fn reverse(&mut self) -> bool {
        if self.state == PlayState::Cancelled || self.time <= 0.0 {
            return false;
        }
        self.delay_remaining = 0.0;
        self.state = PlayState::Reversing;
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.paused_reversed = self.state == PlayState::Reversing;
        self.state = PlayState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != PlayState::Paused {
            return false;
        }
        self.state = if self.paused_reversed {
            PlayState::Reversing
        } else {
            PlayState::Playing
        };
        true
    }

    /// Jump to the start and play forward again (honouring the delay)
    pub fn restart(&mut self, tree: &mut ElementTree) -> bool {
        if self.state == PlayState::Cancelled {
            return false;
        }
        self.time = 0.0;
        self.ended = false;
        self.render(tree);
        self.delay_remaining = self.delay;
        self.state = PlayState::Playing;
        true
    }

    /// Jump to the start and stop there
    pub fn reset(&mut self, tree: &mut ElementTree) -> bool {
        if self.state == PlayState::Cancelled {
            return false;
        }
        self.time = 0.0;
        self.ended = false;
        self.render(tree);
        self.state = PlayState::Idle;
        true
    }

    /// Jump to the end and stop there (no callbacks)
    pub fn complete(&mut self, tree: &mut ElementTree) -> bool {
        if self.state == PlayState::Cancelled {
            return false;
        }
        self.time = self.total_duration();
        self.ended = true;
        self.render(tree);
        self.state = PlayState::Finished;
        true
    }

    /// Stop for good, leaving every target on a fully specified state
    ///
    /// Idempotent: cancelling a finished or cancelled timeline writes
    /// nothing and returns false. A finished timeline is still marked
    /// cancelled so it never plays again.
    pub fn cancel(&mut self, policy: CancelPolicy, tree: &mut ElementTree) -> bool {
        match self.state {
            PlayState::Cancelled => return false,
            PlayState::Finished => {
                self.state = PlayState::Cancelled;
                return false;
            }
            _ => {}
        }
        match policy {
            CancelPolicy::JumpToEnd => {
                self.time = self.total_duration();
                self.ended = true;
            }
            CancelPolicy::JumpToStart => {
                self.time = 0.0;
                self.ended = false;
            }
        }
        self.render(tree);
        self.state = PlayState::Cancelled;
        tracing::trace!("timeline '{}' cancelled ({:?})", self.label, policy);
        true
    }

    /// Render the start state so targets rest hidden until playback begins
    pub fn prime(&mut self, tree: &mut ElementTree) {
        if self.state == PlayState::Idle {
            self.render(tree);
        }
    }

    /// Advance by `dt` seconds and render
    ///
    /// Returns the callbacks to run once the caller has released its borrows.
    pub fn tick(&mut self, dt: f32, tree: &mut ElementTree) -> Vec<PendingCallback> {
        let mut pending = Vec::new();
        if !self.is_active() {
            return pending;
        }

        let mut dt = dt.max(0.0);
        if self.state == PlayState::Playing && self.delay_remaining > 0.0 {
            let consumed = dt.min(self.delay_remaining);
            self.delay_remaining -= consumed;
            dt -= consumed;
            if self.delay_remaining > 0.0 {
                return pending;
            }
        }

        let total = self.total_duration();
        let forward = self.state == PlayState::Playing;
        self.time = if forward {
            (self.time + dt).min(total)
        } else {
            (self.time - dt).max(0.0)
        };

        if forward && self.time >= total {
            self.ended = true;
        }
        self.render(tree);

        if let Some(f) = &self.on_update {
            pending.push(PendingCallback::Update(Rc::clone(f), self.progress()));
        }

        if forward && self.time >= total {
            self.state = PlayState::Finished;
            tracing::trace!("timeline '{}' complete", self.label);
            if let Some(f) = &self.on_complete {
                pending.push(PendingCallback::Complete(Rc::clone(f)));
            }
        } else if !forward && self.time <= 0.0 {
            self.state = PlayState::Finished;
            self.ended = false;
            if let Some(f) = &self.on_reverse_complete {
                pending.push(PendingCallback::ReverseComplete(Rc::clone(f)));
            }
        }
        pending
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn at_end(&self) -> bool {
        self.ended && self.time >= self.total_duration()
    }

    /// Map the run playhead onto one iteration (applying yoyo)
    fn local_time(&self, time: f32) -> f32 {
        let d = self.iteration;
        if d <= 0.0 {
            return if self.ended { d } else { 0.0 };
        }
        let (index, local) = if time >= self.total_duration() {
            (self.repeat, d)
        } else {
            let index = (time / d).floor();
            (index as u32, time - index * d)
        };
        if self.yoyo && index % 2 == 1 {
            d - local
        } else {
            local
        }
    }

    /// Write the state at the current playhead into the tree
    ///
    /// For each (target, property) the latest-declared step that has started
    /// wins; before any step on it has started, the first-declared step with
    /// known start values holds it. Absent targets are skipped.
    fn render(&mut self, tree: &mut ElementTree) {
        let t = self.local_time(self.time);
        let mut resolved: FxHashMap<(ElementId, VisualProperty), (bool, f32)> =
            FxHashMap::default();

        for step in self.steps.iter_mut() {
            if !tree.contains(step.target) {
                continue;
            }
            let started = t >= step.start;

            if step.from.is_none() && step.captured.is_none() && started {
                let captured: VisualState = step
                    .to
                    .keys()
                    .map(|prop| {
                        let current = resolved
                            .get(&(step.target, prop))
                            .map(|(_, v)| *v)
                            .or_else(|| tree.property(step.target, prop))
                            .unwrap_or_else(|| prop.resting_value());
                        (prop, current)
                    })
                    .collect();
                step.captured = Some(captured);
            }

            let Some(from) = step.start_values() else {
                continue;
            };
            let state = if started {
                from.lerp(&step.to, step.easing.apply(step.progress_at(t)))
            } else {
                from.clone()
            };

            for (prop, value) in state.iter() {
                let key = (step.target, prop);
                if started || !resolved.contains_key(&key) {
                    resolved.insert(key, (started, value));
                }
            }
        }

        for ((target, prop), (_, value)) in resolved {
            tree.set_property(target, prop, value);
        }
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("label", &self.label)
            .field("steps", &self.steps.len())
            .field("duration", &self.iteration)
            .field("time", &self.time)
            .field("state", &self.state)
            .finish()
    }
}
