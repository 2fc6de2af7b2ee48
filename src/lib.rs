// Module declarations

pub mod catalog;
pub mod cmdline;
#[cfg(target_os = "windows")]
pub mod com;
pub mod commands;
pub mod config;
pub mod dedup;
pub mod extractor;
pub mod extractors;
pub mod logging;
pub mod path;
pub mod shell;
pub mod shortcut;
pub mod sources;
pub mod types;

#[cfg(test)]
mod testing;

pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use types::{Kind, Program, ProgramRecord, Source};
