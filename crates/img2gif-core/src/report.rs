use std::path::Path;

use tracing::info;

/// Receives human-readable notifications from the converter. Nothing in the
/// pipeline depends on what a reporter does with them.
pub trait Reporter {
    fn gif_created(&self, path: &Path);
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn gif_created(&self, path: &Path) {
        info!(?path, "GIF created successfully");
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn gif_created(&self, _path: &Path) {}
}
