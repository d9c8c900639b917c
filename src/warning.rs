/// Receives user-facing notices that don't stop resolution, like use of a renamed option.
pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards warnings to the `log` facade.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogWarnings;

impl WarningSink for LogWarnings {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}
