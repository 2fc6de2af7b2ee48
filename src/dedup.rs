// Duplicate removal across sources

use crate::path::file_name;
use crate::types::Program;
use std::collections::HashSet;

/// Keeps the preferred copy of each program.
///
/// Candidates are ordered by source rank, entries with icon data first within a rank.
/// A candidate is dropped when its `(file name, arguments)` key or its
/// `(file name, display name)` key was already taken by an earlier one.
pub fn dedupe(mut programs: Vec<Program>) -> Vec<Program> {
    let total = programs.len();
    programs.sort_by_key(|p| (p.source.rank(), !p.has_icon()));

    let mut by_arguments: HashSet<(String, String)> = HashSet::new();
    let mut by_name: HashSet<(String, String)> = HashSet::new();
    let mut kept = Vec::with_capacity(programs.len());

    for program in programs {
        let file = file_name(&program.executable_path).to_lowercase();
        if file.is_empty() {
            tracing::trace!(event = "dedup_dropped", component = "deduplicator", name = %program.name, reason = "no_file_name");
            continue;
        }
        let argument_key = (file.clone(), program.arguments.clone());
        let name_key = (file, program.name.to_lowercase());
        if by_arguments.contains(&argument_key) || by_name.contains(&name_key) {
            tracing::trace!(event = "dedup_dropped", component = "deduplicator", name = %program.name, source = %program.source);
            continue;
        }
        by_arguments.insert(argument_key);
        by_name.insert(name_key);
        kept.push(program);
    }

    tracing::debug!(event = "dedup_finished", component = "deduplicator", input = total, kept = kept.len());
    kept
}
