//! The portfolio page
//!
//! [`Page`] owns the document, dispatcher and scheduler for one session and
//! lays the regions out top to bottom. The loading screen runs first; when it
//! reports completion the page unmounts it and mounts the content regions.
//!
//! Input is synthetic: callers advance frames, scroll, hover, click and type
//! through the page, which turns each action into a dispatched event.

use crate::config::PageConfig;
use crate::error::{FolioError, Result};
use folio_animation::AnimationScheduler;
use folio_core::{
    Document, ElementId, Event, EventData, EventDispatcher, EventTarget, EventType, Rect,
};
use folio_motion::sections::{About, Contact, Footer, Hero, LoadingScreen, Navigation, Projects};
use folio_motion::{
    register_scroll_plugin, FormDraft, FormField, PageContext, Region, SubmissionSink,
};
use serde::Serialize;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Page-space rectangles for the content regions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    pub navigation: Rect,
    pub hero: Rect,
    pub about: Rect,
    pub projects: Rect,
    pub contact: Rect,
    pub footer: Rect,
}

impl PageLayout {
    pub fn from_config(config: &PageConfig) -> Self {
        let width = config.viewport.width;
        let heights = config.layout;
        let mut y = 0.0;
        let mut next = |height: f32| {
            let rect = Rect::new(0.0, y, width, height);
            y += height;
            rect
        };
        let hero = next(heights.hero);
        let about = next(heights.about);
        let projects = next(heights.projects);
        let contact = next(heights.contact);
        let footer = next(heights.footer);
        Self {
            // Fixed to the top of the window
            navigation: Rect::new(0.0, 0.0, width, config.viewport.height),
            hero,
            about,
            projects,
            contact,
            footer,
        }
    }

    /// Areas in the order of `Page::content_regions_mut`
    fn content_areas(&self) -> [Rect; 6] {
        [
            self.navigation,
            self.hero,
            self.about,
            self.projects,
            self.contact,
            self.footer,
        ]
    }

    /// Bottom of the last section
    pub fn height(&self) -> f32 {
        self.footer.bottom()
    }
}

/// One headless page session
pub struct Page {
    config: PageConfig,
    layout: PageLayout,
    scheduler: AnimationScheduler,
    ctx: PageContext,
    loading: LoadingScreen,
    loading_done: Rc<Cell<bool>>,
    navigation: Navigation,
    hero: Hero,
    about: About,
    projects: Projects,
    contact: Contact,
    footer: Footer,
    content_mounted: bool,
    elapsed: f32,
    frames: u64,
    closed: bool,
}

impl Page {
    /// Create an unmounted page
    ///
    /// This is the session's startup hook: the scroll plugin is registered
    /// here and nowhere else.
    pub fn new(config: PageConfig) -> Result<Self> {
        config.validate()?;
        if register_scroll_plugin() {
            debug!("scroll plugin registered at page startup");
        }

        let document = Document::new(config.viewport.width, config.viewport.height);
        let scheduler = AnimationScheduler::new(document.clone());
        let ctx = PageContext::new(document, EventDispatcher::new(), &scheduler, config.motion);

        let loading_done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&loading_done);
        let loading = LoadingScreen::new().on_complete(move || flag.set(true));

        let triggers = config.triggers;
        Ok(Self {
            layout: PageLayout::from_config(&config),
            config,
            scheduler,
            ctx,
            loading,
            loading_done,
            navigation: Navigation::new(),
            hero: Hero::new(),
            about: About::new(triggers),
            projects: Projects::new(triggers),
            contact: Contact::new(triggers),
            footer: Footer::new(triggers),
            content_mounted: false,
            elapsed: 0.0,
            frames: 0,
            closed: false,
        })
    }

    /// Deliver contact submissions to `sink`
    ///
    /// Only takes effect before the contact section is mounted.
    pub fn with_sink(mut self, sink: Rc<dyn SubmissionSink>) -> Self {
        if self.contact.is_mounted() {
            warn!("submission sink set after the contact section mounted; ignoring");
            return self;
        }
        self.contact = Contact::new(self.config.triggers).with_sink(sink);
        self
    }

    /// Start the session
    ///
    /// Shows the loading screen, or mounts the content directly when the
    /// loading screen is disabled. Fails with [`FolioError::AlreadyMounted`]
    /// once either is showing.
    pub fn mount(&mut self) -> Result<()> {
        if self.closed {
            return Err(FolioError::Closed);
        }
        if self.content_mounted || self.loading.is_mounted() {
            return Err(FolioError::AlreadyMounted);
        }
        if self.config.loading.enabled {
            let area = self.ctx.document.viewport().visible_rect();
            self.loading.mount(&self.ctx, area)?;
            debug!("loading screen mounted");
            Ok(())
        } else {
            self.mount_content()
        }
    }

    fn mount_content(&mut self) -> Result<()> {
        if self.content_mounted {
            return Err(FolioError::AlreadyMounted);
        }
        let ctx = self.ctx.clone();
        let areas = self.layout.content_areas();

        let mut mounted = 0;
        let mut failure = None;
        for (region, area) in self.content_regions_mut().into_iter().zip(areas) {
            if let Err(err) = region.mount(&ctx, area) {
                failure = Some(err);
                break;
            }
            mounted += 1;
        }
        if let Some(err) = failure {
            // Roll back only what this attempt mounted
            for region in self.content_regions_mut().into_iter().take(mounted) {
                region.unmount(&ctx);
            }
            return Err(err.into());
        }

        self.content_mounted = true;
        debug!(height = self.layout.height(), "page content mounted");
        // Short pages: let scroll triggers see where their elements already are
        self.refresh();
        Ok(())
    }

    fn unmount_content(&mut self) {
        let ctx = self.ctx.clone();
        for region in self.content_regions_mut() {
            region.unmount(&ctx);
        }
        self.content_mounted = false;
    }

    fn content_regions_mut(&mut self) -> [&mut dyn Region; 6] {
        [
            &mut self.navigation,
            &mut self.hero,
            &mut self.about,
            &mut self.projects,
            &mut self.contact,
            &mut self.footer,
        ]
    }

    /// Every region, loading screen first
    pub fn regions(&self) -> [&dyn Region; 7] {
        [
            &self.loading,
            &self.navigation,
            &self.hero,
            &self.about,
            &self.projects,
            &self.contact,
            &self.footer,
        ]
    }

    /// Advance one frame of `dt` seconds
    ///
    /// Returns whether anything is still animating.
    pub fn tick(&mut self, dt: f32) -> Result<bool> {
        if self.closed {
            return Err(FolioError::Closed);
        }
        self.ctx.events.dispatch(&Event::new(
            EventType::Frame,
            EventTarget::Window,
            EventData::Frame { dt },
        ));
        let active = self.scheduler.tick(dt);
        self.elapsed += dt;
        self.frames += 1;
        trace!(frame = self.frames, active, "page frame");

        if self.loading_done.get() && self.loading.is_mounted() && !self.content_mounted {
            debug!(elapsed = self.elapsed, "loading finished; revealing page");
            self.loading.unmount(&self.ctx);
            self.mount_content()?;
            return Ok(true);
        }
        Ok(active)
    }

    /// Advance one frame at the configured frame rate
    pub fn tick_frame(&mut self) -> Result<bool> {
        self.tick(self.config.frame_dt())
    }

    /// Advance `seconds` worth of frames
    pub fn advance(&mut self, seconds: f32) -> Result<()> {
        let frames = (seconds.max(0.0) * self.config.frame_rate as f32).ceil() as u64;
        for _ in 0..frames {
            self.tick_frame()?;
        }
        Ok(())
    }

    /// Scroll the window to `y`, clamped to the page
    ///
    /// Returns the applied scroll offset.
    pub fn scroll_to(&mut self, y: f32) -> f32 {
        let max = (self.layout.height() - self.config.viewport.height).max(0.0);
        let y = if y.is_finite() { y.clamp(0.0, max) } else { 0.0 };
        self.ctx.document.write(|tree| tree.viewport_mut().scroll_y = y);
        let invoked = self.ctx.events.dispatch(&Event::scroll(y));
        trace!(scroll_y = y, invoked, "scrolled");
        y
    }

    /// Resize the window and re-evaluate scroll triggers
    pub fn resize(&mut self, width: f32, height: f32) -> usize {
        self.ctx.document.write(|tree| {
            let viewport = tree.viewport_mut();
            viewport.width = width;
            viewport.height = height;
        });
        self.ctx.events.dispatch(&Event::resize(width, height))
    }

    /// Dispatch a synthetic resize so scroll triggers re-measure
    ///
    /// Call after content changes height.
    pub fn refresh(&self) -> usize {
        let viewport = self.ctx.document.viewport();
        self.ctx
            .events
            .dispatch(&Event::resize(viewport.width, viewport.height))
    }

    pub fn pointer_enter(&self, element: ElementId) -> usize {
        self.ctx
            .events
            .dispatch(&Event::pointer(EventType::PointerEnter, element))
    }

    pub fn pointer_leave(&self, element: ElementId) -> usize {
        self.ctx
            .events
            .dispatch(&Event::pointer(EventType::PointerLeave, element))
    }

    pub fn click(&self, element: ElementId) -> usize {
        self.ctx.events.dispatch(&Event::new(
            EventType::Click,
            EventTarget::Element(element),
            EventData::None,
        ))
    }

    /// Type `value` into a contact form field
    pub fn input(&self, field: FormField, value: &str) -> usize {
        match self.contact.field(field) {
            Some(element) => self
                .ctx
                .events
                .dispatch(&Event::input(element, field.name(), value)),
            None => 0,
        }
    }

    /// Submit the contact form
    pub fn submit(&self) -> usize {
        match self.contact.form() {
            Some(form) => self.ctx.events.dispatch(&Event::new(
                EventType::Submit,
                EventTarget::Element(form),
                EventData::None,
            )),
            None => 0,
        }
    }

    /// Re-render every mounted region
    pub fn rerender(&mut self) {
        let ctx = self.ctx.clone();
        for region in self.content_regions_mut() {
            if region.is_mounted() {
                region.rerender(&ctx);
            }
        }
        if self.loading.is_mounted() {
            self.loading.rerender(&ctx);
        }
    }

    /// Leave the page: unmount everything and drain leftover scroll observers
    ///
    /// Returns the number of observers that had leaked past their region's
    /// teardown. Idempotent.
    pub fn navigate_away(&mut self) -> usize {
        if self.closed {
            return 0;
        }
        self.loading.unmount(&self.ctx);
        self.unmount_content();
        let leaked = self.ctx.scroll_observers.drain(&self.ctx.events);
        if leaked > 0 {
            warn!(leaked, "scroll observers outlived their regions");
        }
        self.closed = true;
        debug!(
            listeners = self.ctx.events.listener_count(),
            timelines = self.scheduler.timeline_count(),
            "navigated away"
        );
        leaked
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    pub fn document(&self) -> &Document {
        &self.ctx.document
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.ctx.events
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn loading(&self) -> &LoadingScreen {
        &self.loading
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn about(&self) -> &About {
        &self.about
    }

    pub fn projects(&self) -> &Projects {
        &self.projects
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn is_content_mounted(&self) -> bool {
        self.content_mounted
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Serializable view of the page's current state
    pub fn snapshot(&self) -> PageSnapshot {
        let regions = self
            .regions()
            .iter()
            .map(|region| RegionSnapshot {
                name: region.name().to_string(),
                mounted: region.is_mounted(),
                resources: region.registrar().len(),
                elements: region
                    .root()
                    .map(|root| self.element_snapshots(root))
                    .unwrap_or_default(),
            })
            .collect();

        PageSnapshot {
            elapsed: self.elapsed,
            frames: self.frames,
            scroll_y: self.ctx.document.viewport().scroll_y,
            loading_percent: self.loading.percent(),
            loading_complete: self.loading_done.get(),
            nav_scrolled: self.navigation.is_scrolled(),
            menu_open: self.navigation.is_menu_open(),
            draft: self.contact.draft(),
            submitted: self.contact.submitted(),
            timelines: self.scheduler.timeline_count(),
            active_timelines: self.scheduler.active_count(),
            listeners: self.ctx.events.listener_count(),
            scroll_observers: self.ctx.scroll_observers.len(),
            regions,
        }
    }

    fn element_snapshots(&self, root: ElementId) -> Vec<ElementSnapshot> {
        self.ctx.document.read(|tree| {
            let mut out = Vec::new();
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                let Some(node) = tree.get(id) else { continue };
                let visual = tree
                    .visual(id)
                    .map(|state| {
                        state
                            .iter()
                            .filter(|(prop, value)| (value - prop.resting_value()).abs() > 1e-4)
                            .map(|(prop, value)| (prop.name(), value))
                            .collect()
                    })
                    .unwrap_or_default();
                out.push(ElementSnapshot {
                    label: node.label.clone(),
                    bounds: node.bounds,
                    visual,
                });
                stack.extend(tree.children(id).into_iter().rev());
            }
            out
        })
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.navigate_away();
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PageSnapshot {
    pub elapsed: f32,
    pub frames: u64,
    pub scroll_y: f32,
    pub loading_percent: u8,
    pub loading_complete: bool,
    pub nav_scrolled: bool,
    pub menu_open: bool,
    pub draft: FormDraft,
    pub submitted: u32,
    pub timelines: usize,
    pub active_timelines: usize,
    pub listeners: usize,
    pub scroll_observers: usize,
    pub regions: Vec<RegionSnapshot>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegionSnapshot {
    pub name: String,
    pub mounted: bool,
    /// Triggers, timelines and listeners held by the region's registrar
    pub resources: usize,
    pub elements: Vec<ElementSnapshot>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ElementSnapshot {
    pub label: String,
    pub bounds: Rect,
    /// Properties away from their resting value
    pub visual: BTreeMap<&'static str, f32>,
}
