//! Footer with a single scroll reveal

use super::{blurred_below, settled_y, RegionBase, TriggerSettings};
use crate::context::PageContext;
use crate::error::Result;
use crate::region::Region;
use crate::registrar::CleanupRegistrar;
use crate::trigger::{bind_scroll, ScrollTriggerConfig};
use folio_animation::{AnimationStep, Easing, Timeline, TimelineId};
use folio_core::{ElementId, Rect};

pub struct Footer {
    base: RegionBase,
    triggers: TriggerSettings,
    timeline: Option<TimelineId>,
}

impl Footer {
    pub fn new(triggers: TriggerSettings) -> Self {
        Self {
            base: RegionBase::new("footer"),
            triggers,
            timeline: None,
        }
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }
}

impl Region for Footer {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn mount(&mut self, ctx: &PageContext, area: Rect) -> Result<()> {
        let root = self.base.begin_mount(ctx, area)?;
        let timeline = Timeline::builder()
            .label("footer")
            .add(
                AnimationStep::from_to([root], blurred_below(60.0), settled_y())
                    .duration(1.0)
                    .ease(Easing::Power2Out),
            )
            .build();
        let config = ScrollTriggerConfig::new(root, self.triggers.footer_start)
            .toggle_actions(self.triggers.reveal_actions);

        match timeline
            .map_err(Into::into)
            .and_then(|timeline| bind_scroll(ctx, config, timeline))
        {
            Ok(binding) => {
                self.timeline = Some(self.base.registrar_mut().add_binding(binding));
                Ok(())
            }
            Err(err) => {
                self.unmount(ctx);
                Err(err)
            }
        }
    }

    fn unmount(&mut self, ctx: &PageContext) {
        self.base.unmount(ctx);
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
