//! Contact section: scroll-revealed form, live draft, submit pulse

use super::{RegionBase, TriggerSettings};
use crate::context::PageContext;
use crate::error::Result;
use crate::form::{FormDraft, FormField, FormSubmission, SubmissionSink};
use crate::region::Region;
use crate::registrar::CleanupRegistrar;
use crate::trigger::{bind_scroll, ScrollTriggerConfig};
use folio_animation::{AnimationStep, CancelPolicy, Easing, Timeline, TimelineId};
use folio_core::{ElementId, EventData, EventTarget, EventType, Rect, VisualState};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct ContactState {
    draft: FormDraft,
    button: Option<ElementId>,
    pulse: Option<TimelineId>,
    submitted: u32,
}

pub struct Contact {
    base: RegionBase,
    triggers: TriggerSettings,
    sink: Option<Rc<dyn SubmissionSink>>,
    state: Rc<RefCell<ContactState>>,
    form: Option<ElementId>,
    fields: Vec<(FormField, ElementId)>,
    timeline: Option<TimelineId>,
}

impl Contact {
    pub fn new(triggers: TriggerSettings) -> Self {
        Self {
            base: RegionBase::new("contact"),
            triggers,
            sink: None,
            state: Rc::new(RefCell::new(ContactState::default())),
            form: None,
            fields: Vec::new(),
            timeline: None,
        }
    }

    /// Where submissions are delivered; without one they are only logged
    pub fn with_sink(mut self, sink: Rc<dyn SubmissionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn draft(&self) -> FormDraft {
        self.state.borrow().draft.clone()
    }

    /// Number of submissions handled so far
    pub fn submitted(&self) -> u32 {
        self.state.borrow().submitted
    }

    pub fn form(&self) -> Option<ElementId> {
        self.form
    }

    pub fn field(&self, field: FormField) -> Option<ElementId> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, id)| *id)
    }

    pub fn submit_button(&self) -> Option<ElementId> {
        self.state.borrow().button
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        self.state.borrow_mut().draft.set(field, value);
    }

    /// Submit the current draft
    ///
    /// Never fails: sink errors are logged and the draft is cleared either way.
    pub fn submit(&self, ctx: &PageContext) -> FormSubmission {
        submit(ctx, &self.state, self.sink.as_deref())
    }

    fn build(&mut self, ctx: &PageContext, root: ElementId, area: Rect) -> Result<()> {
        let form = self.base.child(
            ctx,
            root,
            "form",
            Rect::new(area.x + 40.0, area.y + 160.0, area.width * 0.5, 560.0),
        );
        let mut y = area.y + 180.0;
        let mut inputs = Vec::new();
        for field in FormField::ALL {
            let height = if field == FormField::Message { 200.0 } else { 56.0 };
            let id = self.base.child(
                ctx,
                form,
                field.name(),
                Rect::new(area.x + 60.0, y, area.width * 0.5 - 40.0, height),
            );
            y += height + 24.0;
            self.fields.push((field, id));
            inputs.push(id);
        }
        let button = self.base.child(
            ctx,
            form,
            "submit",
            Rect::new(area.x + 60.0, y, 200.0, 56.0),
        );
        inputs.push(button);
        self.state.borrow_mut().button = Some(button);
        self.form = Some(form);

        let timeline = Timeline::builder()
            .label("contact")
            .add(
                AnimationStep::from_to(
                    inputs,
                    VisualState::new().opacity(0.0).x(-50.0).blur(10.0),
                    VisualState::new().opacity(1.0).x(0.0).blur(0.0),
                )
                .duration(0.8)
                .stagger(0.1)
                .ease(Easing::Power2Out),
            )
            .build()?;
        let config = ScrollTriggerConfig::new(root, self.triggers.contact_start)
            .toggle_actions(self.triggers.reveal_actions);
        let binding = bind_scroll(ctx, config, timeline)?;
        self.timeline = Some(self.base.registrar_mut().add_binding(binding));

        for (field, element) in self.fields.clone() {
            let state = Rc::downgrade(&self.state);
            let listener = ctx.events.add_listener(
                EventTarget::Element(element),
                EventType::Input,
                move |event| {
                    let EventData::Input { value, .. } = &event.data else {
                        return;
                    };
                    if let Some(state) = state.upgrade() {
                        state.borrow_mut().draft.set(field, value.clone());
                    }
                },
            );
            self.base.registrar_mut().add_listener(listener);
        }

        let weak_ctx = ctx.downgrade();
        let state = Rc::downgrade(&self.state);
        let sink = self.sink.clone();
        let listener = ctx.events.add_listener(
            EventTarget::Element(form),
            EventType::Submit,
            move |_| {
                if let (Some(ctx), Some(state)) = (weak_ctx.upgrade(), state.upgrade()) {
                    submit(&ctx, &state, sink.as_deref());
                }
            },
        );
        self.base.registrar_mut().add_listener(listener);
        Ok(())
    }
}

fn submit(
    ctx: &PageContext,
    state: &Rc<RefCell<ContactState>>,
    sink: Option<&dyn SubmissionSink>,
) -> FormSubmission {
    let (submission, button, previous) = {
        let mut state = state.borrow_mut();
        state.submitted += 1;
        (state.draft.take(), state.button, state.pulse.take())
    };

    if let Some(id) = previous {
        ctx.scheduler.cancel_and_remove(id, CancelPolicy::JumpToEnd);
    }
    if let Some(button) = button {
        let pulse = Timeline::builder()
            .label("contact.pulse")
            .repeat(1)
            .yoyo(true)
            .add(
                AnimationStep::to([button], VisualState::new().scale(0.95))
                    .duration(0.1)
                    .ease(Easing::Power2InOut),
            )
            .build();
        match pulse {
            Ok(pulse) => state.borrow_mut().pulse = ctx.scheduler.register_and_play(pulse),
            Err(err) => tracing::warn!("submit pulse rejected: {}", err),
        }
    }

    match sink {
        Some(sink) => match sink.submit(&submission) {
            Ok(()) => tracing::debug!("contact form delivered for '{}'", submission.email),
            Err(err) => tracing::warn!("contact form delivery failed: {}", err),
        },
        None => tracing::debug!(
            "no submission sink; contact form from '{}' dropped",
            submission.email
        ),
    }
    submission
}

impl Region for Contact {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn mount(&mut self, ctx: &PageContext, area: Rect) -> Result<()> {
        let root = self.base.begin_mount(ctx, area)?;
        if let Err(err) = self.build(ctx, root, area) {
            self.unmount(ctx);
            return Err(err);
        }
        Ok(())
    }

    fn unmount(&mut self, ctx: &PageContext) {
        let pulse = self.state.borrow_mut().pulse.take();
        if let Some(id) = pulse {
            ctx.scheduler.cancel_and_remove(id, ctx.settings.cancel_policy);
        }
        self.base.unmount(ctx);
        *self.state.borrow_mut() = ContactState::default();
        self.form = None;
        self.fields.clear();
        self.timeline = None;
    }

    fn is_mounted(&self) -> bool {
        self.base.is_mounted()
    }

    fn root(&self) -> Option<ElementId> {
        self.base.root()
    }

    fn registrar(&self) -> &CleanupRegistrar {
        self.base.registrar()
    }
}
