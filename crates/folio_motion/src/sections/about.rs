//! About section: scroll-revealed image, bio and skill cards

use super::{grid, hover_tween, RegionBase, TriggerSettings};
use crate::context::PageContext;
use crate::error::Result;
use crate::region::Region;
use crate::registrar::CleanupRegistrar;
use crate::trigger::{bind_hover, bind_scroll, ScrollTriggerConfig};
use folio_animation::{AnimationStep, Easing, Offset, Timeline, TimelineId};
use folio_core::{ElementId, Rect, VisualState};

pub const SKILLS: [&str; 6] = [
    "frontend",
    "backend",
    "ui_ux",
    "web3",
    "performance",
    "collaboration",
];

pub struct About {
    base: RegionBase,
    triggers: TriggerSettings,
    image: Option<ElementId>,
    content: Option<ElementId>,
    skills: Vec<ElementId>,
    timeline: Option<TimelineId>,
}

impl About {
    pub fn new(triggers: TriggerSettings) -> Self {
        Self {
            base: RegionBase::new("about"),
            triggers,
            image: None,
            content: None,
            skills: Vec::new(),
            timeline: None,
        }
    }

    pub fn image(&self) -> Option<ElementId> {
        self.image
    }

    pub fn content(&self) -> Option<ElementId> {
        self.content
    }

    pub fn skills(&self) -> &[ElementId] {
        &self.skills
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    fn build(&mut self, ctx: &PageContext, root: ElementId, area: Rect) -> Result<()> {
        let half = area.width * 0.5;
        let image = self.base.child(
            ctx,
            root,
            "image",
            Rect::new(area.x + 40.0, area.y + 120.0, half - 80.0, 420.0),
        );
        let content = self.base.child(
            ctx,
            root,
            "content",
            Rect::new(area.x + half, area.y + 120.0, half - 40.0, 300.0),
        );
        let skills: Vec<ElementId> = grid(area, 580.0, SKILLS.len(), 3, 120.0, 24.0)
            .into_iter()
            .zip(SKILLS)
            .map(|(bounds, skill)| self.base.child(ctx, root, &format!("skill.{skill}"), bounds))
            .collect();

        let timeline = Timeline::builder()
            .label("about")
            .add(
                AnimationStep::from_to(
                    [image],
                    VisualState::new().opacity(0.0).x(-100.0).blur(10.0),
                    VisualState::new().opacity(1.0).x(0.0).blur(0.0),
                )
                .duration(1.2)
                .ease(Easing::Power2Out),
            )
            .add(
                AnimationStep::from_to(
                    [content],
                    VisualState::new().opacity(0.0).y(50.0).blur(10.0),
                    VisualState::new().opacity(1.0).y(0.0).blur(0.0),
                )
                .duration(1.0)
                .ease(Easing::Power2Out)
                .offset(Offset::Overlap(0.8)),
            )
            .add(
                AnimationStep::from_to(
                    skills.iter().copied(),
                    VisualState::new().opacity(0.0).y(30.0).scale(0.8),
                    VisualState::new().opacity(1.0).y(0.0).scale(1.0),
                )
                .duration(0.6)
                .stagger(0.1)
                .ease(Easing::BackOut(1.7))
                .offset(Offset::Overlap(0.5)),
            )
            .build()?;

        let config = ScrollTriggerConfig::new(root, self.triggers.about_start)
            .end(self.triggers.about_end)
            .toggle_actions(self.triggers.reveal_actions);
        let binding = bind_scroll(ctx, config, timeline)?;
        self.timeline = Some(self.base.registrar_mut().add_binding(binding));

        let hover = bind_hover(
            ctx,
            image,
            ctx.settings.hover_policy,
            hover_tween(
                image,
                VisualState::new().scale(1.05).rotate_y(5.0),
                VisualState::new().scale(1.0).rotate_y(0.0),
                0.5,
            ),
        )?;
        self.base.registrar_mut().add_trigger(hover);

        self.image = Some(image);
        self.content = Some(content);
        self.skills = skills;
        Ok(())
    }
}

impl Region for About {
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
        self.image = None;
        self.content = None;
        self.skills.clear();
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
    use crate::plugin::register_scroll_plugin;
    use folio_animation::PlayState;
    use folio_core::{Event, VisualProperty};

    fn scroll_to(ctx: &PageContext, y: f32) {
        ctx.document.write(|tree| tree.viewport_mut().scroll_y = y);
        ctx.events.dispatch(&Event::scroll(y));
    }

    #[test]
    fn test_skill_stagger_layout() {
        register_scroll_plugin();
        let (ctx, _scheduler) = page();
        let mut about = About::new(TriggerSettings::default());
        about.mount(&ctx, Rect::new(0.0, 800.0, 1280.0, 900.0)).unwrap();

        assert_eq!(about.skills().len(), 6);
        let tid = about.timeline().unwrap();
        let starts: Vec<f32> = ctx
            .scheduler
            .with_timeline(tid, |t| {
                t.steps().iter().filter(|s| s.group == 2).map(|s| s.start).collect()
            })
            .unwrap();
        // image 0..1.2, content 0.4..1.4, skills from 0.9 every 0.1s
        for (i, start) in starts.iter().enumerate() {
            assert!((start - (0.9 + 0.1 * i as f32)).abs() < 1e-4, "{starts:?}");
        }
    }

    #[test]
    fn test_plays_and_reverses_with_scroll() {
        register_scroll_plugin();
        let (ctx, scheduler) = page();
        let mut about = About::new(TriggerSettings::default());
        about.mount(&ctx, Rect::new(0.0, 800.0, 1280.0, 900.0)).unwrap();
        let image = about.image().unwrap();
        let tid = about.timeline().unwrap();

        assert_eq!(ctx.document.property(image, VisualProperty::X), Some(-100.0));
        scroll_to(&ctx, 400.0);
        assert_eq!(ctx.scheduler.state(tid), Some(PlayState::Playing));
        run(&scheduler, 2.5);
        assert_eq!(ctx.document.property(image, VisualProperty::X), Some(0.0));

        // Leaving past the end line does nothing; scrolling back above the start reverses
        scroll_to(&ctx, 1600.0);
        assert_eq!(ctx.scheduler.state(tid), Some(PlayState::Finished));
        scroll_to(&ctx, 0.0);
        assert_eq!(ctx.scheduler.state(tid), Some(PlayState::Reversing));
        run(&scheduler, 2.5);
        assert_eq!(ctx.document.property(image, VisualProperty::X), Some(-100.0));
    }
}
