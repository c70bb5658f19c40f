//! Process-wide scroll plugin registration
//!
//! Scroll triggers can only be armed once the plugin is registered. The page
//! registers it from its single startup hook; extra calls are harmless.

use std::sync::atomic::{AtomicBool, Ordering};

static SCROLL_PLUGIN: AtomicBool = AtomicBool::new(false);

/// Register the scroll plugin
///
/// Returns true only for the call that actually registered it.
pub fn register_scroll_plugin() -> bool {
    let first = !SCROLL_PLUGIN.swap(true, Ordering::SeqCst);
    if first {
        tracing::debug!("scroll plugin registered");
    }
    first
}

pub fn is_scroll_plugin_registered() -> bool {
    SCROLL_PLUGIN.load(Ordering::SeqCst)
}
