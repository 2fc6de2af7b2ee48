// Boundary commands

use crate::catalog::Catalog;
use crate::cmdline::join_arguments;
use crate::types::{Program, ProgramRecord};
use anyhow::bail;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Search { term: String },
    Open { path: String, arguments: String },
}

impl Command {
    /// Parses the arguments after the program name.
    pub fn parse(args: &[String]) -> anyhow::Result<Command> {
        match args {
            [verb] if verb == "list" => Ok(Command::List),
            [verb] if verb == "search" => Ok(Command::Search { term: String::new() }),
            [verb, term @ ..] if verb == "search" => Ok(Command::Search { term: term.join(" ") }),
            [verb, path, rest @ ..] if verb == "open" => Ok(Command::Open {
                path: path.clone(),
                arguments: join_arguments(rest),
            }),
            [] => bail!("missing command; expected list, search <term> or open <path> [args]"),
            [verb, ..] => bail!("unknown or incomplete command: {verb}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenResult {
    pub opened: bool,
    pub path: String,
}

pub fn records(programs: &[Program]) -> Vec<ProgramRecord> {
    programs.iter().map(ProgramRecord::from).collect()
}

pub fn get_all_programs(catalog: &Catalog) -> Vec<ProgramRecord> {
    records(&catalog.get_all_programs())
}

pub fn search_windows_index(catalog: &Catalog, term: &str) -> Vec<ProgramRecord> {
    records(&catalog.search_windows_index(term))
}

pub fn open_item(catalog: &Catalog, path: &str, arguments: &str) -> OpenResult {
    OpenResult {
        opened: catalog.open_item(path, arguments),
        path: path.to_string(),
    }
}

/// Runs a command and renders its result as JSON.
pub fn execute(catalog: &Catalog, command: &Command) -> anyhow::Result<String> {
    let json = match command {
        Command::List => serde_json::to_string_pretty(&get_all_programs(catalog))?,
        Command::Search { term } => serde_json::to_string_pretty(&search_windows_index(catalog, term))?,
        Command::Open { path, arguments } => serde_json::to_string_pretty(&open_item(catalog, path, arguments))?,
    };
    Ok(json)
}
