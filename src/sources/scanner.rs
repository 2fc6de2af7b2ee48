use crate::types::Program;

/// A catalog source that can be enumerated in one synchronous pass.
pub trait ProgramScanner {
    /// Stable identifier used in log events.
    fn id(&self) -> &'static str;

    /// Per-entry failures are logged and skipped inside; `Err` means the whole source failed.
    fn scan(&self) -> anyhow::Result<Vec<Program>>;
}
