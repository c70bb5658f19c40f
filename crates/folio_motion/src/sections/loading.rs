//! Full-screen loading overlay with a progress counter

use super::RegionBase;
use crate::context::PageContext;
use crate::error::Result;
use crate::region::Region;
use crate::registrar::CleanupRegistrar;
use crate::trigger::bind_mount;
use folio_animation::{
    AnimationStep, Easing, Offset, ProgressPhase, ProgressReporter, Timeline, TimelineId,
};
use folio_core::{ElementId, Rect, VisualProperty, VisualState};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Reveal, fill the bar, fade out, then tell the host it's done
pub struct LoadingScreen {
    base: RegionBase,
    on_complete: Option<Rc<dyn Fn()>>,
    reporter: Rc<RefCell<ProgressReporter>>,
    percent: Rc<Cell<u8>>,
    bar: Option<ElementId>,
    timeline: Option<TimelineId>,
}

impl LoadingScreen {
    pub fn new() -> Self {
        Self {
            base: RegionBase::new("loading"),
            on_complete: None,
            reporter: Rc::new(RefCell::new(ProgressReporter::new())),
            percent: Rc::new(Cell::new(0)),
            bar: None,
            timeline: None,
        }
    }

    /// Host callback, invoked once per mount after the counter reaches 100
    pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }

    /// Last published percentage
    pub fn percent(&self) -> u8 {
        self.percent.get()
    }

    pub fn phase(&self) -> ProgressPhase {
        self.reporter.borrow().phase()
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == ProgressPhase::Complete
    }

    pub fn bar(&self) -> Option<ElementId> {
        self.bar
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    fn build(&mut self, ctx: &PageContext, root: ElementId, area: Rect) -> Result<()> {
        let center = area.y + area.height * 0.5;
        let text = self.base.child(
            ctx,
            root,
            "text",
            Rect::new(area.x + area.width * 0.5 - 200.0, center - 120.0, 400.0, 100.0),
        );
        let bar = self.base.child(
            ctx,
            root,
            "bar",
            Rect::new(area.x + area.width * 0.5 - 160.0, center + 20.0, 320.0, 4.0),
        );
        // The bar starts collapsed; the timeline grows it
        ctx.document
            .write(|tree| tree.set_property(bar, VisualProperty::ScaleX, 0.0));
        self.bar = Some(bar);

        let percent = Rc::clone(&self.percent);
        let mut reporter = ProgressReporter::new().on_percent(move |p| percent.set(p));
        if let Some(host) = self.on_complete.clone() {
            reporter = reporter.on_complete(move || host());
        }
        reporter.start();
        self.reporter = Rc::new(RefCell::new(reporter));

        let sample: Weak<RefCell<ProgressReporter>> = Rc::downgrade(&self.reporter);
        let finish = sample.clone();
        let timeline = Timeline::builder()
            .label("loading")
            .add(
                AnimationStep::from_to(
                    [text, bar],
                    VisualState::new().opacity(0.0).y(30.0),
                    VisualState::new().opacity(1.0).y(0.0),
                )
                .duration(0.8)
                .stagger(0.2)
                .ease(Easing::Power2Out),
            )
            .add(
                AnimationStep::to([bar], VisualState::new().scale_x(1.0))
                    .duration(2.5)
                    .ease(Easing::Power2InOut),
            )
            .add(
                AnimationStep::to([root], VisualState::new().opacity(0.0).scale(0.9))
                    .duration(0.8)
                    .ease(Easing::Power2InOut)
                    .offset(Offset::Gap(0.5)),
            )
            .on_update(move |progress| {
                if let Some(reporter) = sample.upgrade() {
                    reporter.borrow_mut().sample(progress);
                }
            })
            .on_complete(move || {
                if let Some(reporter) = finish.upgrade() {
                    reporter.borrow_mut().complete();
                }
            })
            .build()?;

        let binding = bind_mount(ctx, timeline)?;
        self.timeline = Some(self.base.registrar_mut().add_binding(binding));
        Ok(())
    }
}

impl Default for LoadingScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Region for LoadingScreen {
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
        self.base.unmount(ctx);
        self.bar = None;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{page, run};

    #[test]
    fn test_counts_to_100_then_completes_once() {
        let (ctx, scheduler) = page();
        let done = Rc::new(Cell::new(0));
        let d = Rc::clone(&done);
        let mut loading = LoadingScreen::new().on_complete(move || d.set(d.get() + 1));
        loading
            .mount(&ctx, Rect::new(0.0, 0.0, 1280.0, 800.0))
            .unwrap();

        let bar = loading.bar().unwrap();
        assert_eq!(ctx.document.property(bar, VisualProperty::ScaleX), Some(0.0));
        assert_eq!(ctx.document.property(bar, VisualProperty::Opacity), Some(0.0));

        let mut last = 0;
        for _ in 0..(5 * 60) {
            scheduler.tick(1.0 / 60.0);
            assert!(loading.percent() >= last);
            last = loading.percent();
        }
        assert_eq!(loading.percent(), 100);
        assert_eq!(done.get(), 1);
        assert!(loading.is_complete());

        run(&scheduler, 1.0);
        assert_eq!(done.get(), 1);
        loading.unmount(&ctx);
        assert!(ctx.document.read(|tree| tree.is_empty()));
    }

    #[test]
    fn test_remount_notifies_host_again() {
        let (ctx, scheduler) = page();
        let done = Rc::new(Cell::new(0));
        let d = Rc::clone(&done);
        let mut loading = LoadingScreen::new().on_complete(move || d.set(d.get() + 1));
        let area = Rect::new(0.0, 0.0, 1280.0, 800.0);

        loading.mount(&ctx, area).unwrap();
        run(&scheduler, 5.0);
        assert_eq!(done.get(), 1);
        loading.unmount(&ctx);

        loading.mount(&ctx, area).unwrap();
        assert_eq!(loading.percent(), 0);
        assert!(!loading.is_complete());
        run(&scheduler, 5.0);
        assert_eq!(loading.percent(), 100);
        assert_eq!(done.get(), 2);
        loading.unmount(&ctx);
    }

    #[test]
    fn test_unmount_mid_load_never_completes() {
        let (ctx, scheduler) = page();
        let done = Rc::new(Cell::new(false));
        let d = Rc::clone(&done);
        let mut loading = LoadingScreen::new().on_complete(move || d.set(true));
        loading
            .mount(&ctx, Rect::new(0.0, 0.0, 1280.0, 800.0))
            .unwrap();
        run(&scheduler, 1.0);
        loading.unmount(&ctx);
        run(&scheduler, 5.0);

        assert!(!done.get());
        assert_eq!(scheduler.timeline_count(), 0);
        assert!(loading.percent() < 100);
    }
}
