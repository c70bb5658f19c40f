//! Fixed navigation bar with a scroll-state flag and a mobile menu

use super::RegionBase;
use crate::context::PageContext;
use crate::error::Result;
use crate::region::Region;
use crate::registrar::CleanupRegistrar;
use crate::trigger::bind_mount;
use folio_animation::{AnimationStep, Easing, Timeline, TimelineId};
use folio_core::{ElementId, EventData, EventTarget, EventType, ListenerId, Rect, VisualState};
use std::cell::RefCell;
use std::rc::Rc;

/// Page sections the bar links to
pub const NAV_LINKS: [&str; 4] = ["home", "about", "projects", "contact"];

const BAR_HEIGHT: f32 = 80.0;
/// Scroll offset past which the bar switches to its compact look
const SCROLLED_THRESHOLD: f32 = 50.0;

#[derive(Debug)]
struct OpenMenu {
    element: ElementId,
    timeline: Option<TimelineId>,
    listeners: Vec<ListenerId>,
}

#[derive(Debug, Default)]
struct NavState {
    root: Option<ElementId>,
    is_scrolled: bool,
    menu: Option<OpenMenu>,
}

pub struct Navigation {
    base: RegionBase,
    state: Rc<RefCell<NavState>>,
    menu_button: Option<ElementId>,
    timeline: Option<TimelineId>,
}

impl Navigation {
    pub fn new() -> Self {
        Self {
            base: RegionBase::new("nav"),
            state: Rc::new(RefCell::new(NavState::default())),
            menu_button: None,
            timeline: None,
        }
    }

    /// Whether the window has scrolled past the threshold
    pub fn is_scrolled(&self) -> bool {
        self.state.borrow().is_scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.state.borrow().menu.is_some()
    }

    pub fn menu(&self) -> Option<ElementId> {
        self.state.borrow().menu.as_ref().map(|m| m.element)
    }

    pub fn menu_button(&self) -> Option<ElementId> {
        self.menu_button
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    pub fn toggle_menu(&self, ctx: &PageContext) {
        toggle_menu(ctx, &self.state);
    }

    pub fn close_menu(&self, ctx: &PageContext) {
        close_menu(ctx, &self.state);
    }

    fn build(&mut self, ctx: &PageContext, root: ElementId, area: Rect) -> Result<()> {
        self.state.borrow_mut().root = Some(root);

        let link_width = 120.0;
        for (i, link) in NAV_LINKS.iter().enumerate() {
            let x = area.right() - 40.0 - (NAV_LINKS.len() - i) as f32 * link_width;
            self.base.child(
                ctx,
                root,
                &format!("link.{link}"),
                Rect::new(x, area.y + 20.0, link_width, 40.0),
            );
        }
        let button = self.base.child(
            ctx,
            root,
            "menu_button",
            Rect::new(area.right() - 64.0, area.y + 20.0, 40.0, 40.0),
        );
        self.menu_button = Some(button);

        let timeline = Timeline::builder()
            .label("nav")
            .delay(2.5)
            .add(
                AnimationStep::from_to(
                    [root],
                    VisualState::new().opacity(0.0).y(-50.0),
                    VisualState::new().opacity(1.0).y(0.0),
                )
                .duration(1.0)
                .ease(Easing::Power2Out),
            )
            .build()?;
        let binding = bind_mount(ctx, timeline)?;
        self.timeline = Some(self.base.registrar_mut().add_binding(binding));

        let state = Rc::downgrade(&self.state);
        let scroll = ctx
            .events
            .add_listener(EventTarget::Window, EventType::Scroll, move |event| {
                let EventData::Scroll { scroll_y } = event.data else {
                    return;
                };
                if let Some(state) = state.upgrade() {
                    state.borrow_mut().is_scrolled = scroll_y > SCROLLED_THRESHOLD;
                }
            });
        self.base.registrar_mut().add_listener(scroll);

        let weak_ctx = ctx.downgrade();
        let state = Rc::downgrade(&self.state);
        let click = ctx.events.add_listener(
            EventTarget::Element(button),
            EventType::Click,
            move |_| {
                if let (Some(ctx), Some(state)) = (weak_ctx.upgrade(), state.upgrade()) {
                    toggle_menu(&ctx, &state);
                }
            },
        );
        self.base.registrar_mut().add_listener(click);
        Ok(())
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

fn toggle_menu(ctx: &PageContext, state: &Rc<RefCell<NavState>>) {
    let open = state.borrow().menu.is_some();
    if open {
        close_menu(ctx, state);
    } else {
        open_menu(ctx, state);
    }
}

fn open_menu(ctx: &PageContext, state: &Rc<RefCell<NavState>>) {
    let Some(root) = state.borrow().root else {
        return;
    };
    let Some(bar) = ctx.document.read(|tree| tree.bounds(root)) else {
        return;
    };

    let menu_bounds = Rect::new(bar.x, bar.bottom(), bar.width, 60.0 * NAV_LINKS.len() as f32);
    let (menu, links) = ctx.document.write(|tree| {
        let menu = tree.insert("nav.menu", menu_bounds, Some(root));
        let links: Vec<ElementId> = NAV_LINKS
            .iter()
            .enumerate()
            .map(|(i, link)| {
                tree.insert(
                    format!("nav.menu.{link}"),
                    Rect::new(menu_bounds.x + 24.0, menu_bounds.y + 60.0 * i as f32, 200.0, 48.0),
                    Some(menu),
                )
            })
            .collect();
        (menu, links)
    });

    let timeline = Timeline::builder()
        .label("nav.menu")
        .add(
            AnimationStep::from_to(
                [menu],
                VisualState::new().opacity(0.0).scale(0.9),
                VisualState::new().opacity(1.0).scale(1.0),
            )
            .duration(0.3)
            .ease(Easing::Power2Out),
        )
        .build();
    let timeline = match timeline {
        Ok(timeline) => ctx.scheduler.register_and_play(timeline),
        Err(err) => {
            tracing::warn!("menu timeline rejected: {}", err);
            None
        }
    };

    // Picking a link closes the menu
    let listeners = links
        .into_iter()
        .map(|link| {
            let weak_ctx = ctx.downgrade();
            let state = Rc::downgrade(state);
            ctx.events.add_listener(
                EventTarget::Element(link),
                EventType::Click,
                move |_| {
                    if let (Some(ctx), Some(state)) = (weak_ctx.upgrade(), state.upgrade()) {
                        close_menu(&ctx, &state);
                    }
                },
            )
        })
        .collect();

    state.borrow_mut().menu = Some(OpenMenu {
        element: menu,
        timeline,
        listeners,
    });
    tracing::debug!("menu opened");
}

fn close_menu(ctx: &PageContext, state: &Rc<RefCell<NavState>>) {
    let Some(menu) = state.borrow_mut().menu.take() else {
        return;
    };
    if let Some(id) = menu.timeline {
        ctx.scheduler
            .cancel_and_remove(id, ctx.settings.cancel_policy);
    }
    for id in menu.listeners {
        ctx.events.remove_listener(id);
    }
    ctx.document.write(|tree| tree.remove(menu.element));
    tracing::debug!("menu closed");
}

impl Region for Navigation {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn mount(&mut self, ctx: &PageContext, area: Rect) -> Result<()> {
        let area = Rect::new(area.x, area.y, area.width, BAR_HEIGHT);
        let root = self.base.begin_mount(ctx, area)?;
        if let Err(err) = self.build(ctx, root, area) {
            self.unmount(ctx);
            return Err(err);
        }
        Ok(())
    }

    fn unmount(&mut self, ctx: &PageContext) {
        close_menu(ctx, &self.state);
        self.base.unmount(ctx);
        *self.state.borrow_mut() = NavState::default();
        self.menu_button = None;
        self.timeline = None;
    }

    fn is_mounted(&self) -> bool {
        self.base.is_mounted()
    }

    fn rerender(&mut self, ctx: &PageContext) {
        let scroll_y = ctx.document.viewport().scroll_y;
        self.state.borrow_mut().is_scrolled = scroll_y > SCROLLED_THRESHOLD;
    }

    fn root(&self) -> Option<ElementId> {
        self.base.root()
    }

    fn registrar(&self) -> &CleanupRegistrar {
        self.base.registrar()
    }
}
