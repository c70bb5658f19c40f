//! Lifecycle triggers
//!
//! A trigger is armed against a condition (mount, a scroll line crossing,
//! pointer enter/leave) and fires a callback when the condition occurs.
//! [`arm`] returns a [`TriggerHandle`]; disarming it removes every listener
//! it installed and guarantees that late events are no-ops.
//!
//! The `bind_*` helpers wire a trigger to exactly one timeline (or, for
//! hover, one timeline per pointer phase).

use crate::context::PageContext;
use crate::error::{MotionError, Result};
use crate::observers::{ObserverId, ScrollObserverRegistry};
use crate::plugin::is_scroll_plugin_registered;
use folio_animation::{CancelPolicy, SchedulerHandle, Timeline, TimelineError, TimelineId};
use folio_core::{
    ElementId, EventTarget, EventType, ListenerId, Rect, Viewport, WeakEventDispatcher,
};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

// ============================================================================
// Scroll lines
// ============================================================================

/// Which edge of the trigger element is tested against the viewport line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollEdge {
    Top,
    Center,
    Bottom,
}

impl ScrollEdge {
    fn of(self, bounds: Rect) -> f32 {
        match self {
            ScrollEdge::Top => bounds.top(),
            ScrollEdge::Center => bounds.top() + bounds.height * 0.5,
            ScrollEdge::Bottom => bounds.bottom(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            ScrollEdge::Top => "top",
            ScrollEdge::Center => "center",
            ScrollEdge::Bottom => "bottom",
        }
    }
}

/// "Element edge meets a line at a fraction of the viewport height"
///
/// Parsed from strings like `"top 70%"` or `"bottom center"`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScrollLine {
    pub edge: ScrollEdge,
    /// 0.0 is the top of the window, 1.0 the bottom
    pub viewport: f32,
}

impl ScrollLine {
    pub const fn new(edge: ScrollEdge, viewport: f32) -> Self {
        Self { edge, viewport }
    }

    /// Whether the element edge has reached (or passed above) the line
    pub fn is_crossed(&self, bounds: Rect, viewport: Viewport) -> bool {
        self.edge.of(bounds) <= viewport.line_at(self.viewport)
    }
}

impl FromStr for ScrollLine {
    type Err = MotionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidScrollLine(s.to_string());
        let mut parts = s.split_whitespace();
        let (Some(edge), Some(line), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let edge = match edge.to_ascii_lowercase().as_str() {
            "top" => ScrollEdge::Top,
            "center" => ScrollEdge::Center,
            "bottom" => ScrollEdge::Bottom,
            _ => return Err(invalid()),
        };
        let viewport = match line.to_ascii_lowercase().as_str() {
            "top" => 0.0,
            "center" => 0.5,
            "bottom" => 1.0,
            other => {
                let pct = other.strip_suffix('%').ok_or_else(invalid)?;
                let pct: f32 = pct.parse().map_err(|_| invalid())?;
                if !pct.is_finite() {
                    return Err(invalid());
                }
                pct / 100.0
            }
        };
        Ok(ScrollLine { edge, viewport })
    }
}

impl TryFrom<String> for ScrollLine {
    type Error = MotionError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScrollLine> for String {
    fn from(line: ScrollLine) -> Self {
        line.to_string()
    }
}

impl fmt::Display for ScrollLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = (self.viewport * 10_000.0).round() / 100.0;
        write!(f, "{} {}%", self.edge.name(), pct)
    }
}

// ============================================================================
// Toggle actions
// ============================================================================

/// What a scroll-bound timeline does when its trigger fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl ToggleAction {
    fn name(self) -> &'static str {
        match self {
            ToggleAction::Play => "play",
            ToggleAction::Pause => "pause",
            ToggleAction::Resume => "resume",
            ToggleAction::Reverse => "reverse",
            ToggleAction::Restart => "restart",
            ToggleAction::Reset => "reset",
            ToggleAction::Complete => "complete",
            ToggleAction::None => "none",
        }
    }

    /// Apply to a registered timeline; returns whether anything changed
    pub fn apply(self, scheduler: &SchedulerHandle, id: TimelineId) -> bool {
        match self {
            ToggleAction::Play => scheduler.play(id),
            ToggleAction::Pause => scheduler.pause(id),
            ToggleAction::Resume => scheduler.resume(id),
            ToggleAction::Reverse => scheduler.reverse(id),
            ToggleAction::Restart => scheduler.restart(id),
            ToggleAction::Reset => scheduler.reset(id),
            ToggleAction::Complete => scheduler.complete(id),
            ToggleAction::None => false,
        }
    }
}

impl FromStr for ToggleAction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "play" => ToggleAction::Play,
            "pause" => ToggleAction::Pause,
            "resume" => ToggleAction::Resume,
            "reverse" => ToggleAction::Reverse,
            "restart" => ToggleAction::Restart,
            "reset" => ToggleAction::Reset,
            "complete" => ToggleAction::Complete,
            "none" => ToggleAction::None,
            _ => return Err(()),
        })
    }
}

/// Actions for enter, leave, enter-back, leave-back (`"play none none reverse"`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    /// Play on enter, reverse when scrolled back above the start line
    pub const PLAY_REVERSE: ToggleActions = ToggleActions {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::None,
        on_leave_back: ToggleAction::Reverse,
    };

    pub fn for_fire(&self, fire: TriggerFire) -> ToggleAction {
        match fire {
            TriggerFire::ScrollEnter => self.on_enter,
            TriggerFire::ScrollLeave => self.on_leave,
            TriggerFire::ScrollEnterBack => self.on_enter_back,
            TriggerFire::ScrollLeaveBack => self.on_leave_back,
            _ => ToggleAction::None,
        }
    }
}

impl Default for ToggleActions {
    fn default() -> Self {
        ToggleActions {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = MotionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidToggleActions(s.to_string());
        let actions: SmallVec<[ToggleAction; 4]> = s
            .split_whitespace()
            .map(|a| a.to_ascii_lowercase().parse().map_err(|_| invalid()))
            .collect::<std::result::Result<_, _>>()?;
        match actions.as_slice() {
            [on_enter, on_leave, on_enter_back, on_leave_back] => Ok(ToggleActions {
                on_enter: *on_enter,
                on_leave: *on_leave,
                on_enter_back: *on_enter_back,
                on_leave_back: *on_leave_back,
            }),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = MotionError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(actions: ToggleActions) -> Self {
        actions.to_string()
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter.name(),
            self.on_leave.name(),
            self.on_enter_back.name(),
            self.on_leave_back.name()
        )
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// Where the trigger element sits relative to its scroll lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPhase {
    Before,
    Active,
    After,
}

/// Scroll trigger parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTriggerConfig {
    pub element: ElementId,
    pub start: ScrollLine,
    /// Without an end line the trigger never reaches `After`
    pub end: Option<ScrollLine>,
    pub toggle_actions: ToggleActions,
}

impl ScrollTriggerConfig {
    pub fn new(element: ElementId, start: ScrollLine) -> Self {
        Self {
            element,
            start,
            end: None,
            toggle_actions: ToggleActions::default(),
        }
    }

    pub fn end(mut self, end: ScrollLine) -> Self {
        self.end = Some(end);
        self
    }

    pub fn toggle_actions(mut self, actions: ToggleActions) -> Self {
        self.toggle_actions = actions;
        self
    }

    pub fn phase(&self, bounds: Rect, viewport: Viewport) -> ScrollPhase {
        if !self.start.is_crossed(bounds, viewport) {
            ScrollPhase::Before
        } else if self.end.is_some_and(|end| end.is_crossed(bounds, viewport)) {
            ScrollPhase::After
        } else {
            ScrollPhase::Active
        }
    }
}

/// Fires produced by moving from one scroll phase to another
///
/// A jump across both lines in one event yields both fires, in order.
pub fn scroll_transitions(from: ScrollPhase, to: ScrollPhase) -> SmallVec<[TriggerFire; 2]> {
    use ScrollPhase::*;
    match (from, to) {
        (Before, Active) => smallvec![TriggerFire::ScrollEnter],
        (Before, After) => smallvec![TriggerFire::ScrollEnter, TriggerFire::ScrollLeave],
        (Active, After) => smallvec![TriggerFire::ScrollLeave],
        (After, Active) => smallvec![TriggerFire::ScrollEnterBack],
        (After, Before) => smallvec![TriggerFire::ScrollEnterBack, TriggerFire::ScrollLeaveBack],
        (Active, Before) => smallvec![TriggerFire::ScrollLeaveBack],
        _ => SmallVec::new(),
    }
}

/// What a trigger waits for
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerCondition {
    /// Fires once, synchronously, while arming
    Mount,
    Scroll(ScrollTriggerConfig),
    Pointer { element: ElementId },
}

impl TriggerCondition {
    fn kind(&self) -> &'static str {
        match self {
            TriggerCondition::Mount => "mount",
            TriggerCondition::Scroll(_) => "scroll",
            TriggerCondition::Pointer { .. } => "pointer",
        }
    }
}

/// A single occurrence of a trigger condition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerFire {
    Mount,
    ScrollEnter,
    ScrollLeave,
    ScrollEnterBack,
    ScrollLeaveBack,
    PointerEnter,
    PointerLeave,
}

// ============================================================================
// Handle
// ============================================================================

/// Owned handle to an armed trigger
pub struct TriggerHandle {
    kind: &'static str,
    alive: Rc<Cell<bool>>,
    fires: Rc<Cell<u32>>,
    listeners: SmallVec<[ListenerId; 2]>,
    events: WeakEventDispatcher,
    observer: Option<(ScrollObserverRegistry, ObserverId)>,
    on_disarm: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl TriggerHandle {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_armed(&self) -> bool {
        self.alive.get()
    }

    /// How many times the trigger has fired
    pub fn fire_count(&self) -> u32 {
        self.fires.get()
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Stop listening for good
    ///
    /// Idempotent; returns true only for the call that disarmed it.
    pub fn disarm(&self) -> bool {
        if !self.alive.replace(false) {
            return false;
        }
        if let Some(events) = self.events.upgrade() {
            for id in &self.listeners {
                events.remove_listener(*id);
            }
        }
        if let Some((registry, id)) = &self.observer {
            registry.deregister(*id);
        }
        let hook = self.on_disarm.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        tracing::trace!("{} trigger disarmed", self.kind);
        true
    }

    fn set_on_disarm(&self, hook: impl FnOnce() + 'static) {
        *self.on_disarm.borrow_mut() = Some(Box::new(hook));
    }
}

impl fmt::Debug for TriggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerHandle")
            .field("kind", &self.kind)
            .field("armed", &self.alive.get())
            .field("fires", &self.fires.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ============================================================================
// Arming
// ============================================================================

/// Arm a trigger
///
/// Mount triggers fire inside this call. Scroll triggers don't evaluate
/// here; the first Scroll or Resize event after arming does, and fires if
/// the element is already past its start line.
pub fn arm<F>(ctx: &PageContext, condition: TriggerCondition, on_fire: F) -> Result<TriggerHandle>
where
    F: FnMut(TriggerFire) + 'static,
{
    if matches!(condition, TriggerCondition::Scroll(_)) && !is_scroll_plugin_registered() {
        return Err(MotionError::ScrollPluginNotRegistered);
    }

    let alive = Rc::new(Cell::new(true));
    let fires = Rc::new(Cell::new(0u32));
    let on_fire = Rc::new(RefCell::new(on_fire));

    // Guarded call: liveness checked, re-entrant fires dropped
    let fire = {
        let alive = Rc::clone(&alive);
        let fires = Rc::clone(&fires);
        move |event: TriggerFire| {
            if !alive.get() {
                return;
            }
            fires.set(fires.get() + 1);
            match on_fire.try_borrow_mut() {
                Ok(mut f) => (*f)(event),
                Err(_) => tracing::trace!("re-entrant {:?} fire dropped", event),
            }
        }
    };

    let mut listeners: SmallVec<[ListenerId; 2]> = SmallVec::new();
    let mut observer = None;

    match condition {
        TriggerCondition::Mount => fire(TriggerFire::Mount),
        TriggerCondition::Scroll(config) => {
            let document = ctx.document.downgrade();
            let phase = Rc::new(Cell::new(ScrollPhase::Before));
            let fire = Rc::new(fire);
            let evaluate = Rc::new(move || {
                let Some(document) = document.upgrade() else {
                    return;
                };
                let next = document.read(|tree| {
                    tree.bounds(config.element)
                        .map(|bounds| config.phase(bounds, tree.viewport()))
                });
                let Some(next) = next else {
                    tracing::trace!("scroll trigger element is gone; skipping");
                    return;
                };
                let previous = phase.replace(next);
                for event in scroll_transitions(previous, next) {
                    fire(event);
                }
            });

            for event_type in [EventType::Scroll, EventType::Resize] {
                let evaluate = Rc::clone(&evaluate);
                listeners.push(ctx.events.add_listener(
                    EventTarget::Window,
                    event_type,
                    move |_| evaluate(),
                ));
            }

            let owner = ctx
                .document
                .read(|tree| tree.label(config.element).map(str::to_string))
                .unwrap_or_else(|| "scroll".to_string());
            let id = ctx.scroll_observers.register(owner, listeners.iter().copied());
            observer = Some((ctx.scroll_observers.clone(), id));
        }
        TriggerCondition::Pointer { element } => {
            let fire = Rc::new(fire);
            for (event_type, event) in [
                (EventType::PointerEnter, TriggerFire::PointerEnter),
                (EventType::PointerLeave, TriggerFire::PointerLeave),
            ] {
                let fire = Rc::clone(&fire);
                listeners.push(ctx.events.add_listener(
                    EventTarget::Element(element),
                    event_type,
                    move |_| fire(event),
                ));
            }
        }
    }

    tracing::debug!("armed {} trigger", condition.kind());
    Ok(TriggerHandle {
        kind: condition.kind(),
        alive,
        fires,
        listeners,
        events: ctx.events.downgrade(),
        observer,
        on_disarm: RefCell::new(None),
    })
}

// ============================================================================
// Timeline bindings
// ============================================================================

/// A trigger together with the timeline it drives
#[derive(Debug)]
pub struct TimelineBinding {
    pub trigger: TriggerHandle,
    pub timeline: TimelineId,
}

/// Register `timeline` and play it once, on mount
pub fn bind_mount(ctx: &PageContext, timeline: Timeline) -> Result<TimelineBinding> {
    let id = ctx
        .scheduler
        .register(timeline)
        .ok_or(MotionError::SchedulerGone)?;
    let scheduler = ctx.scheduler.clone();
    let trigger = arm(ctx, TriggerCondition::Mount, move |_| {
        scheduler.play(id);
    })?;
    Ok(TimelineBinding {
        trigger,
        timeline: id,
    })
}

/// Register one primed timeline and drive it from scroll fires
///
/// Crossing back and forth plays and reverses the same timeline, so
/// oscillating never stacks timelines on the same targets.
pub fn bind_scroll(
    ctx: &PageContext,
    config: ScrollTriggerConfig,
    timeline: Timeline,
) -> Result<TimelineBinding> {
    if !is_scroll_plugin_registered() {
        return Err(MotionError::ScrollPluginNotRegistered);
    }
    let id = ctx
        .scheduler
        .register(timeline)
        .ok_or(MotionError::SchedulerGone)?;

    let scheduler = ctx.scheduler.clone();
    let actions = config.toggle_actions;
    let trigger = arm(ctx, TriggerCondition::Scroll(config), move |fire| {
        let action = actions.for_fire(fire);
        tracing::trace!("scroll {:?} -> {:?}", fire, action);
        action.apply(&scheduler, id);
    });

    match trigger {
        Ok(trigger) => Ok(TimelineBinding {
            trigger,
            timeline: id,
        }),
        Err(err) => {
            ctx.scheduler.remove(id);
            Err(err)
        }
    }
}

/// Pointer phase a hover timeline is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverPhase {
    Enter,
    Leave,
}

/// How a pointer event treats an in-flight hover timeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverPolicy {
    /// Cancel (settle) the in-flight timeline and start the new one
    #[default]
    CancelAndRestart,
    /// Drop events of the phase already in flight, and enters while a
    /// leave is settling. Leave still interrupts an in-flight enter.
    IgnoreWhileActive,
}

type HoverSlot = Rc<RefCell<Option<(HoverPhase, TimelineId)>>>;

/// Build a fresh timeline per pointer phase on `element`
///
/// Disarming the returned trigger cancels whatever hover timeline is still
/// registered, using the page's cancel policy.
pub fn bind_hover<F>(
    ctx: &PageContext,
    element: ElementId,
    policy: HoverPolicy,
    factory: F,
) -> Result<TriggerHandle>
where
    F: Fn(HoverPhase) -> std::result::Result<Timeline, TimelineError> + 'static,
{
    let slot: HoverSlot = Rc::new(RefCell::new(None));
    let scheduler = ctx.scheduler.clone();

    let trigger = {
        let slot = Rc::clone(&slot);
        arm(ctx, TriggerCondition::Pointer { element }, move |fire| {
            let phase = match fire {
                TriggerFire::PointerEnter => HoverPhase::Enter,
                TriggerFire::PointerLeave => HoverPhase::Leave,
                _ => return,
            };
            on_hover(&scheduler, &slot, policy, phase, &factory);
        })?
    };

    let scheduler = ctx.scheduler.clone();
    let cancel_policy = ctx.settings.cancel_policy;
    trigger.set_on_disarm(move || {
        let active = slot.borrow_mut().take();
        if let Some((_, id)) = active {
            scheduler.cancel_and_remove(id, cancel_policy);
        }
    });
    Ok(trigger)
}

fn on_hover<F>(
    scheduler: &SchedulerHandle,
    slot: &RefCell<Option<(HoverPhase, TimelineId)>>,
    policy: HoverPolicy,
    phase: HoverPhase,
    factory: &F,
) where
    F: Fn(HoverPhase) -> std::result::Result<Timeline, TimelineError>,
{
    let current = *slot.borrow();
    if let Some((active_phase, id)) = current {
        let in_flight = scheduler.is_playing(id);
        if in_flight && policy == HoverPolicy::IgnoreWhileActive {
            let ignore = active_phase == phase
                || (active_phase == HoverPhase::Leave && phase == HoverPhase::Enter);
            if ignore {
                tracing::trace!("hover {:?} ignored while {:?} in flight", phase, active_phase);
                return;
            }
        }
        // Settle the outgoing timeline so the new one starts from a defined state
        scheduler.cancel_and_remove(id, CancelPolicy::JumpToEnd);
        *slot.borrow_mut() = None;
    }

    match factory(phase) {
        Ok(timeline) => {
            if let Some(id) = scheduler.register_and_play(timeline) {
                *slot.borrow_mut() = Some((phase, id));
            }
        }
        Err(err) => tracing::warn!("hover {:?} timeline rejected: {}", phase, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{page, run};
    use crate::plugin::register_scroll_plugin;
    use folio_animation::{AnimationStep, Easing, PlayState};
    use folio_core::{Event, VisualProperty, VisualState};

    fn scroll_to(ctx: &PageContext, y: f32) {
        ctx.document.write(|tree| tree.viewport_mut().scroll_y = y);
        ctx.events.dispatch(&Event::scroll(y));
    }

    fn section(ctx: &PageContext) -> ElementId {
        ctx.document
            .write(|tree| tree.insert("about", Rect::new(0.0, 1000.0, 1280.0, 500.0), None))
    }

    #[test]
    fn test_scroll_line_parse() {
        let line: ScrollLine = "top 70%".parse().unwrap();
        assert_eq!(line.edge, ScrollEdge::Top);
        assert!((line.viewport - 0.7).abs() < 1e-6);
        assert_eq!(line.to_string(), "top 70%");

        let line: ScrollLine = "bottom center".parse().unwrap();
        assert_eq!(line, ScrollLine::new(ScrollEdge::Bottom, 0.5));

        assert!("top".parse::<ScrollLine>().is_err());
        assert!("middle 20%".parse::<ScrollLine>().is_err());
        assert!("top seventy".parse::<ScrollLine>().is_err());
    }

    #[test]
    fn test_toggle_actions_parse() {
        let actions: ToggleActions = "play none none reverse".parse().unwrap();
        assert_eq!(actions, ToggleActions::PLAY_REVERSE);
        assert_eq!(actions.to_string(), "play none none reverse");
        assert!("play none".parse::<ToggleActions>().is_err());
        assert!("play none none jump".parse::<ToggleActions>().is_err());
    }

    #[test]
    fn test_transitions() {
        use ScrollPhase::*;
        assert_eq!(scroll_transitions(Before, Active).as_slice(), &[TriggerFire::ScrollEnter]);
        assert_eq!(
            scroll_transitions(After, Before).as_slice(),
            &[TriggerFire::ScrollEnterBack, TriggerFire::ScrollLeaveBack]
        );
        assert!(scroll_transitions(Active, Active).is_empty());
    }

    #[test]
    fn test_mount_fires_synchronously_once() {
        let (ctx, _scheduler) = page();
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        let handle = arm(&ctx, TriggerCondition::Mount, move |fire| {
            assert_eq!(fire, TriggerFire::Mount);
            f.set(f.get() + 1);
        })
        .unwrap();

        assert_eq!(fired.get(), 1);
        assert_eq!(handle.fire_count(), 1);
        assert!(handle.listeners().is_empty());
        scroll_to(&ctx, 100.0);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_scroll_phases() {
        register_scroll_plugin();
        let (ctx, _scheduler) = page();
        let element = section(&ctx);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let config = ScrollTriggerConfig::new(element, "top 70%".parse().unwrap())
            .end("bottom 30%".parse().unwrap());
        let handle = arm(&ctx, TriggerCondition::Scroll(config), move |fire| {
            s.borrow_mut().push(fire)
        })
        .unwrap();

        assert!(seen.borrow().is_empty());
        assert_eq!(ctx.scroll_observers.count_for("about"), 1);

        scroll_to(&ctx, 0.0);
        scroll_to(&ctx, 500.0);
        scroll_to(&ctx, 1300.0);
        scroll_to(&ctx, 900.0);
        scroll_to(&ctx, 100.0);
        assert_eq!(
            *seen.borrow(),
            vec![
                TriggerFire::ScrollEnter,
                TriggerFire::ScrollLeave,
                TriggerFire::ScrollEnterBack,
                TriggerFire::ScrollLeaveBack,
            ]
        );

        assert!(handle.disarm());
        assert!(!handle.disarm());
        assert!(ctx.scroll_observers.is_empty());
        assert_eq!(ctx.events.listener_count(), 0);
        scroll_to(&ctx, 600.0);
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn test_first_evaluation_fires_when_already_past() {
        register_scroll_plugin();
        let (ctx, _scheduler) = page();
        let element = section(&ctx);
        ctx.document.write(|tree| tree.viewport_mut().scroll_y = 800.0);
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        let config = ScrollTriggerConfig::new(element, "top 70%".parse().unwrap());
        let _handle = arm(&ctx, TriggerCondition::Scroll(config), move |_| f.set(f.get() + 1))
            .unwrap();

        assert_eq!(fired.get(), 0);
        ctx.events.dispatch(&Event::resize(1280.0, 800.0));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_pointer_disarm_drops_late_events() {
        let (ctx, _scheduler) = page();
        let card = section(&ctx);
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        let handle = arm(&ctx, TriggerCondition::Pointer { element: card }, move |_| {
            f.set(f.get() + 1)
        })
        .unwrap();

        ctx.events.dispatch(&Event::pointer(EventType::PointerEnter, card));
        handle.disarm();
        ctx.events.dispatch(&Event::pointer(EventType::PointerLeave, card));
        assert_eq!(fired.get(), 1);
    }

    fn fade(element: ElementId) -> Timeline {
        Timeline::build([AnimationStep::from_to(
            [element],
            VisualState::new().opacity(0.0),
            VisualState::new().opacity(1.0),
        )
        .duration(1.0)])
        .unwrap()
    }

    #[test]
    fn test_bind_scroll_oscillation_reuses_timeline() {
        register_scroll_plugin();
        let (ctx, scheduler) = page();
        let element = section(&ctx);
        let config = ScrollTriggerConfig::new(element, "top 70%".parse().unwrap())
            .toggle_actions(ToggleActions::PLAY_REVERSE);
        let binding = bind_scroll(&ctx, config, fade(element)).unwrap();

        assert_eq!(ctx.document.property(element, VisualProperty::Opacity), Some(0.0));
        for _ in 0..5 {
            scroll_to(&ctx, 600.0);
            run(&scheduler, 0.2);
            scroll_to(&ctx, 0.0);
            run(&scheduler, 0.1);
        }
        assert_eq!(scheduler.timeline_count(), 1);
        assert_eq!(ctx.scheduler.state(binding.timeline), Some(PlayState::Reversing));

        scroll_to(&ctx, 600.0);
        run(&scheduler, 2.0);
        assert_eq!(ctx.document.property(element, VisualProperty::Opacity), Some(1.0));
    }

    #[test]
    fn test_bind_mount_plays_immediately() {
        let (ctx, scheduler) = page();
        let element = section(&ctx);
        let binding = bind_mount(&ctx, fade(element)).unwrap();
        assert!(ctx.scheduler.is_playing(binding.timeline));
        run(&scheduler, 1.1);
        assert_eq!(ctx.scheduler.progress(binding.timeline), Some(1.0));
        assert_eq!(binding.trigger.fire_count(), 1);
    }

    fn hover_factory(
        element: ElementId,
    ) -> impl Fn(HoverPhase) -> std::result::Result<Timeline, TimelineError> {
        move |phase| {
            let scale = match phase {
                HoverPhase::Enter => 1.05,
                HoverPhase::Leave => 1.0,
            };
            Timeline::build([AnimationStep::to([element], VisualState::new().scale(scale))
                .duration(0.3)
                .ease(Easing::Power2Out)])
        }
    }

    #[test]
    fn test_hover_cancel_and_restart() {
        let (ctx, scheduler) = page();
        let card = section(&ctx);
        let _hover =
            bind_hover(&ctx, card, HoverPolicy::CancelAndRestart, hover_factory(card)).unwrap();

        for _ in 0..10 {
            ctx.events.dispatch(&Event::pointer(EventType::PointerEnter, card));
            run(&scheduler, 0.05);
            ctx.events.dispatch(&Event::pointer(EventType::PointerLeave, card));
            run(&scheduler, 0.05);
        }
        assert_eq!(scheduler.timeline_count(), 1);
        run(&scheduler, 0.5);
        assert!((ctx.document.property(card, VisualProperty::Scale).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hover_ignore_while_active() {
        let (ctx, scheduler) = page();
        let card = section(&ctx);
        let _hover =
            bind_hover(&ctx, card, HoverPolicy::IgnoreWhileActive, hover_factory(card)).unwrap();

        ctx.events.dispatch(&Event::pointer(EventType::PointerEnter, card));
        run(&scheduler, 0.1);
        // Duplicate enter is ignored; the first timeline keeps running
        ctx.events.dispatch(&Event::pointer(EventType::PointerEnter, card));
        assert_eq!(scheduler.timeline_count(), 1);

        // Leave interrupts the enter, settling it first
        ctx.events.dispatch(&Event::pointer(EventType::PointerLeave, card));
        assert_eq!(scheduler.timeline_count(), 1);
        assert!((ctx.document.property(card, VisualProperty::Scale).unwrap() - 1.05).abs() < 1e-5);

        // Enter while the leave is settling is ignored
        run(&scheduler, 0.1);
        ctx.events.dispatch(&Event::pointer(EventType::PointerEnter, card));
        run(&scheduler, 0.5);
        assert!((ctx.document.property(card, VisualProperty::Scale).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hover_disarm_settles_in_flight() {
        let (ctx, scheduler) = page();
        let card = section(&ctx);
        let hover =
            bind_hover(&ctx, card, HoverPolicy::CancelAndRestart, hover_factory(card)).unwrap();
        ctx.events.dispatch(&Event::pointer(EventType::PointerEnter, card));
        run(&scheduler, 0.1);

        hover.disarm();
        assert_eq!(scheduler.timeline_count(), 0);
        assert!((ctx.document.property(card, VisualProperty::Scale).unwrap() - 1.05).abs() < 1e-5);
    }
}
