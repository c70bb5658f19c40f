//! Projects gallery: staggered card reveal plus per-card hover lift

use super::{grid, hover_tween, RegionBase, TriggerSettings};
use crate::context::PageContext;
use crate::error::Result;
use crate::region::Region;
use crate::registrar::CleanupRegistrar;
use crate::trigger::{bind_hover, bind_scroll, ScrollTriggerConfig};
use folio_animation::{AnimationStep, Easing, Timeline, TimelineId};
use folio_core::{ElementId, Rect, VisualState};

pub const PROJECT_COUNT: usize = 6;

pub struct Projects {
    base: RegionBase,
    triggers: TriggerSettings,
    cards: Vec<ElementId>,
    timeline: Option<TimelineId>,
}

impl Projects {
    pub fn new(triggers: TriggerSettings) -> Self {
        Self {
            base: RegionBase::new("projects"),
            triggers,
            cards: Vec::new(),
            timeline: None,
        }
    }

    pub fn cards(&self) -> &[ElementId] {
        &self.cards
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    fn build(&mut self, ctx: &PageContext, root: ElementId, area: Rect) -> Result<()> {
        let cards: Vec<ElementId> = grid(area, 200.0, PROJECT_COUNT, 3, 420.0, 32.0)
            .into_iter()
            .enumerate()
            .map(|(i, bounds)| self.base.child(ctx, root, &format!("card.{i}"), bounds))
            .collect();

        let timeline = Timeline::builder()
            .label("projects")
            .add(
                AnimationStep::from_to(
                    cards.iter().copied(),
                    VisualState::new().opacity(0.0).y(100.0).scale(0.8),
                    VisualState::new().opacity(1.0).y(0.0).scale(1.0),
                )
                .duration(1.0)
                .stagger(0.2)
                .ease(Easing::Power2Out),
            )
            .build()?;
        let config = ScrollTriggerConfig::new(root, self.triggers.projects_start)
            .toggle_actions(self.triggers.reveal_actions);
        let binding = bind_scroll(ctx, config, timeline)?;
        self.timeline = Some(self.base.registrar_mut().add_binding(binding));

        for card in &cards {
            let hover = bind_hover(
                ctx,
                *card,
                ctx.settings.hover_policy,
                hover_tween(
                    *card,
                    VisualState::new().y(-10.0).scale(1.02),
                    VisualState::new().y(0.0).scale(1.0),
                    0.3,
                ),
            )?;
            self.base.registrar_mut().add_trigger(hover);
        }

        self.cards = cards;
        Ok(())
    }
}

impl Region for Projects {
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
        self.cards.clear();
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
