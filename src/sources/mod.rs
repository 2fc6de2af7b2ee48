// Catalog sources

pub mod installed_programs;
pub mod scanner;
pub mod search_index;
pub mod settings;
pub mod start_menu;
pub mod uwp;

use crate::sources::scanner::ProgramScanner;
use crate::types::Program;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Runs one scanner; errors and panics are logged and yield an empty list.
pub fn run_isolated(scanner: &dyn ProgramScanner) -> Vec<Program> {
    let start = Instant::now();
    let id = scanner.id();
    tracing::debug!(event = "scanner_started", component = "catalog", scanner = id);

    let outcome = catch_unwind(AssertUnwindSafe(|| scanner.scan()));
    let programs = match outcome {
        Ok(Ok(programs)) => programs,
        Ok(Err(e)) => {
            tracing::error!(event = "scanner_failed", component = "catalog", scanner = id, error = %e);
            Vec::new()
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(event = "scanner_panicked", component = "catalog", scanner = id, panic = %message);
            Vec::new()
        }
    };

    let with_icon = programs.iter().filter(|p| p.has_icon()).count();
    tracing::info!(
        event = "scanner_finished",
        component = "catalog",
        scanner = id,
        count = programs.len(),
        with_icon,
        elapsed_ms = start.elapsed().as_millis() as u64
    );
    programs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Kind, Source};

    struct Fixed(Vec<Program>);
    struct Failing;
    struct Panicking;

    impl ProgramScanner for Fixed {
        fn id(&self) -> &'static str {
            "fixed"
        }
        fn scan(&self) -> anyhow::Result<Vec<Program>> {
            Ok(self.0.clone())
        }
    }

    impl ProgramScanner for Failing {
        fn id(&self) -> &'static str {
            "failing"
        }
        fn scan(&self) -> anyhow::Result<Vec<Program>> {
            anyhow::bail!("registry unavailable")
        }
    }

    impl ProgramScanner for Panicking {
        fn id(&self) -> &'static str {
            "panicking"
        }
        fn scan(&self) -> anyhow::Result<Vec<Program>> {
            panic!("walker exploded")
        }
    }

    #[test]
    fn failures_become_empty_lists() {
        let one = Program::new("A", r"C:\a.exe", Source::StartMenuUser, Kind::Link);
        assert_eq!(run_isolated(&Fixed(vec![one.clone()])), vec![one]);
        assert!(run_isolated(&Failing).is_empty());
        assert!(run_isolated(&Panicking).is_empty());
    }
}
