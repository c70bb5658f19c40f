//! Loading progress reporting
//!
//! Turns timeline progress into a published percentage that only ever goes
//! up, and fires a completion callback exactly once after 100 is published.

use std::fmt;

/// Lifecycle of a [`ProgressReporter`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressPhase {
    #[default]
    Idle,
    Running,
    /// Inert; further samples are ignored
    Complete,
}

/// Monotonic percentage publisher with a one-shot completion
#[derive(Default)]
pub struct ProgressReporter {
    phase: ProgressPhase,
    published: Option<u8>,
    on_percent: Option<Box<dyn FnMut(u8)>>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with every newly published percentage
    pub fn on_percent(mut self, f: impl FnMut(u8) + 'static) -> Self {
        self.on_percent = Some(Box::new(f));
        self
    }

    /// Called once, after 100 has been published
    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn phase(&self) -> ProgressPhase {
        self.phase
    }

    /// Last published percentage (0 before anything is published)
    pub fn percent(&self) -> u8 {
        self.published.unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == ProgressPhase::Complete
    }

    /// Enter Running and publish 0
    pub fn start(&mut self) {
        if self.phase != ProgressPhase::Idle {
            return;
        }
        self.phase = ProgressPhase::Running;
        self.publish(0);
    }

    /// Publish `round(progress * 100)`, never below the last published value
    ///
    /// Returns the newly published percentage, if it changed.
    pub fn sample(&mut self, progress: f32) -> Option<u8> {
        if self.phase != ProgressPhase::Running {
            return None;
        }
        let percent = if progress.is_nan() {
            0
        } else {
            (progress * 100.0).round().clamp(0.0, 100.0) as u8
        };
        if self.published.is_some_and(|last| percent <= last) {
            return None;
        }
        self.publish(percent);
        Some(percent)
    }

    /// Publish 100 if needed, then fire the completion callback once
    ///
    /// Completing an idle reporter starts it first. Later calls are no-ops.
    pub fn complete(&mut self) {
        match self.phase {
            ProgressPhase::Complete => return,
            ProgressPhase::Idle => self.start(),
            ProgressPhase::Running => {}
        }
        if self.published != Some(100) {
            self.publish(100);
        }
        self.phase = ProgressPhase::Complete;
        tracing::debug!("progress complete");
        if let Some(f) = self.on_complete.take() {
            f();
        }
    }

    fn publish(&mut self, percent: u8) {
        self.published = Some(percent);
        tracing::trace!("progress {}%", percent);
        if let Some(f) = self.on_percent.as_mut() {
            f(percent);
        }
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("phase", &self.phase)
            .field("published", &self.published)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn recording() -> (ProgressReporter, Rc<RefCell<Vec<u8>>>, Rc<Cell<u32>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let done = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let d = Rc::clone(&done);
        let reporter = ProgressReporter::new()
            .on_percent(move |p| s.borrow_mut().push(p))
            .on_complete(move || d.set(d.get() + 1));
        (reporter, seen, done)
    }

    #[test]
    fn test_samples_are_monotonic() {
        let (mut reporter, seen, _) = recording();
        reporter.start();
        for p in [0.1, 0.5, 0.4, 0.5, 0.92, 2.0] {
            reporter.sample(p);
        }
        assert_eq!(*seen.borrow(), vec![0, 10, 50, 92, 100]);
        assert_eq!(reporter.percent(), 100);
    }

    #[test]
    fn test_complete_publishes_100_then_fires_once() {
        let (mut reporter, seen, done) = recording();
        reporter.start();
        reporter.sample(0.97);
        reporter.complete();
        reporter.complete();

        assert_eq!(*seen.borrow(), vec![0, 97, 100]);
        assert_eq!(done.get(), 1);
        assert_eq!(reporter.phase(), ProgressPhase::Complete);

        // Inert after completion
        assert_eq!(reporter.sample(0.5), None);
    }

    #[test]
    fn test_complete_without_duplicate_100() {
        let (mut reporter, seen, done) = recording();
        reporter.start();
        reporter.sample(1.0);
        reporter.complete();
        assert_eq!(*seen.borrow(), vec![0, 100]);
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn test_idle_ignores_samples() {
        let (mut reporter, seen, _) = recording();
        assert_eq!(reporter.sample(0.3), None);
        assert!(seen.borrow().is_empty());
        assert_eq!(reporter.phase(), ProgressPhase::Idle);
    }

    #[test]
    fn test_nan_is_zero() {
        let mut reporter = ProgressReporter::new();
        reporter.start();
        assert_eq!(reporter.sample(f32::NAN), None);
        assert_eq!(reporter.percent(), 0);
    }
}
