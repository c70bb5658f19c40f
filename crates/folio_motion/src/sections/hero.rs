//! Landing section: staggered headline reveal and a hover-scaled call to action

use super::{blurred_below, hover_tween, settled_y, RegionBase};
use crate::context::PageContext;
use crate::error::Result;
use crate::region::Region;
use crate::registrar::CleanupRegistrar;
use crate::trigger::{bind_hover, bind_mount};
use folio_animation::{AnimationStep, Easing, Offset, Timeline, TimelineId};
use folio_core::{ElementId, Rect, VisualState};

#[derive(Clone, Copy, Debug)]
struct HeroElements {
    headline: ElementId,
    subtitle: ElementId,
    cta: ElementId,
    visual: ElementId,
}

pub struct Hero {
    base: RegionBase,
    elements: Option<HeroElements>,
    timeline: Option<TimelineId>,
}

impl Hero {
    pub fn new() -> Self {
        Self {
            base: RegionBase::new("hero"),
            elements: None,
            timeline: None,
        }
    }

    pub fn cta(&self) -> Option<ElementId> {
        self.elements.map(|e| e.cta)
    }

    pub fn headline(&self) -> Option<ElementId> {
        self.elements.map(|e| e.headline)
    }

    pub fn visual(&self) -> Option<ElementId> {
        self.elements.map(|e| e.visual)
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    fn build(&mut self, ctx: &PageContext, root: ElementId, area: Rect) -> Result<()> {
        let half = area.width * 0.5;
        let column = Rect::new(area.x + 40.0, area.y, half - 80.0, area.height);
        let elements = HeroElements {
            headline: self.base.child(
                ctx,
                root,
                "headline",
                Rect::new(column.x, column.y + 200.0, column.width, 160.0),
            ),
            subtitle: self.base.child(
                ctx,
                root,
                "subtitle",
                Rect::new(column.x, column.y + 380.0, column.width, 80.0),
            ),
            cta: self.base.child(
                ctx,
                root,
                "cta",
                Rect::new(column.x, column.y + 500.0, 200.0, 56.0),
            ),
            visual: self.base.child(
                ctx,
                root,
                "visual",
                Rect::new(area.x + half, area.y + 80.0, half - 40.0, area.height - 160.0),
            ),
        };
        self.elements = Some(elements);

        let timeline = Timeline::builder()
            .label("hero")
            .delay(0.5)
            .add(
                AnimationStep::from_to([elements.headline], blurred_below(50.0), settled_y())
                    .duration(1.2)
                    .ease(Easing::Power2Out),
            )
            .add(
                AnimationStep::from_to([elements.subtitle], blurred_below(50.0), settled_y())
                    .duration(1.0)
                    .ease(Easing::Power2Out)
                    .offset(Offset::Overlap(0.8)),
            )
            .add(
                AnimationStep::from_to([elements.cta], blurred_below(50.0), settled_y())
                    .duration(1.0)
                    .ease(Easing::Power2Out)
                    .offset(Offset::Overlap(0.6)),
            )
            .add(
                AnimationStep::from_to(
                    [elements.visual],
                    VisualState::new().opacity(0.0).x(100.0),
                    VisualState::new().opacity(1.0).x(0.0),
                )
                .duration(1.5)
                .ease(Easing::Power2Out)
                .offset(Offset::Overlap(1.0)),
            )
            .build()?;
        let binding = bind_mount(ctx, timeline)?;
        self.timeline = Some(self.base.registrar_mut().add_binding(binding));

        let hover = bind_hover(
            ctx,
            elements.cta,
            ctx.settings.hover_policy,
            hover_tween(
                elements.cta,
                VisualState::new().scale(1.05),
                VisualState::new().scale(1.0),
                0.3,
            ),
        )?;
        self.base.registrar_mut().add_trigger(hover);
        Ok(())
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self::new()
    }
}

impl Region for Hero {
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
        self.elements = None;
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
    use folio_animation::PlayState;
    use folio_core::{Event, EventType, VisualProperty};

    #[test]
    fn test_mount_sequence() {
        let (ctx, scheduler) = page();
        let mut hero = Hero::new();
        hero.mount(&ctx, Rect::new(0.0, 0.0, 1280.0, 800.0)).unwrap();
        let headline = hero.headline().unwrap();
        let visual = hero.visual().unwrap();

        assert_eq!(ctx.document.property(headline, VisualProperty::Blur), Some(10.0));
        assert_eq!(ctx.document.property(visual, VisualProperty::X), Some(100.0));

        let tid = hero.timeline().unwrap();
        let duration = ctx.scheduler.with_timeline(tid, |t| t.duration()).unwrap();
        assert!((duration - 2.3).abs() < 1e-4);

        run(&scheduler, 3.0);
        assert_eq!(ctx.scheduler.state(tid), Some(PlayState::Finished));
        assert_eq!(ctx.document.property(headline, VisualProperty::Opacity), Some(1.0));
        assert_eq!(ctx.document.property(visual, VisualProperty::X), Some(0.0));
    }

    #[test]
    fn test_rerender_does_not_restart() {
        let (ctx, scheduler) = page();
        let mut hero = Hero::new();
        hero.mount(&ctx, Rect::new(0.0, 0.0, 1280.0, 800.0)).unwrap();
        run(&scheduler, 3.0);

        for _ in 0..3 {
            hero.rerender(&ctx);
        }
        let tid = hero.timeline().unwrap();
        assert_eq!(ctx.scheduler.state(tid), Some(PlayState::Finished));
        assert_eq!(hero.registrar().triggers()[0].fire_count(), 1);
    }

    #[test]
    fn test_cta_hover() {
        let (ctx, scheduler) = page();
        let mut hero = Hero::new();
        hero.mount(&ctx, Rect::new(0.0, 0.0, 1280.0, 800.0)).unwrap();
        let cta = hero.cta().unwrap();

        ctx.events.dispatch(&Event::pointer(EventType::PointerEnter, cta));
        run(&scheduler, 0.5);
        let scale = ctx.document.property(cta, VisualProperty::Scale).unwrap();
        assert!((scale - 1.05).abs() < 1e-5);

        hero.unmount(&ctx);
        assert_eq!(ctx.events.listener_count(), 0);
        assert_eq!(scheduler.timeline_count(), 0);
    }
}
