// Live queries against the Windows content index

use crate::extractor::{icon_or_none, IconProvider};
use crate::path::{extension, normalize_path, HostPaths};
use crate::shortcut::ShortcutResolver;
use crate::types::{Kind, Program, Source};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Instant;

const COMPONENT: &str = "search_index";

/// One raw hit as the index reports it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IndexRow {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Path", default)]
    pub path: Option<String>,
    /// A string, an array of strings, or null.
    #[serde(rename = "Kind", default)]
    pub kind: serde_json::Value,
    #[serde(rename = "Comment", default)]
    pub comment: Option<String>,
}

impl IndexRow {
    pub fn kind(&self) -> Kind {
        let first = match &self.kind {
            serde_json::Value::String(kind) => Some(kind.as_str()),
            serde_json::Value::Array(kinds) => kinds.first().and_then(|k| k.as_str()),
            _ => None,
        };
        first.map(Kind::from_index_kind).unwrap_or(Kind::Unknown)
    }
}

pub trait IndexBackend {
    fn run(&self, sql: &str) -> anyhow::Result<Vec<IndexRow>>;
}

/// Single quotes doubled for a SQL string literal.
pub fn escape_sql(term: &str) -> String {
    term.replace('\'', "''")
}

/// Term for a `CONTAINS` phrase: double quotes removed, then SQL-escaped.
pub fn contains_phrase(term: &str) -> String {
    escape_sql(term.replace('"', "").trim())
}

pub fn build_query(term: &str) -> String {
    let escaped = escape_sql(term);
    let phrase = contains_phrase(term);
    let mut sql = String::from(
        "SELECT System.ItemName, System.ItemPathDisplay, System.Kind, System.Comment FROM SYSTEMINDEX WHERE ",
    );
    if !phrase.is_empty() {
        sql.push_str(&format!(
            "(CONTAINS(System.ItemName,'\"{phrase}*\"', 1033) OR System.ItemPathDisplay LIKE '%{escaped}%') AND "
        ));
    } else if !escaped.is_empty() {
        sql.push_str(&format!("System.ItemPathDisplay LIKE '%{escaped}%' AND "));
    }
    sql.push_str("(System.Kind='program' OR System.Kind='link')");
    sql
}

/// Unique hits by case-insensitive path, later rows replacing earlier ones.
/// Rows missing a name or path are dropped.
pub fn collapse_rows(rows: Vec<IndexRow>) -> Vec<IndexRow> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<IndexRow> = Vec::new();
    for row in rows {
        let (Some(path), Some(name)) = (row.path.as_deref(), row.name.as_deref()) else {
            continue;
        };
        if path.is_empty() || name.is_empty() {
            continue;
        }
        match positions.get(&path.to_lowercase()) {
            Some(&at) => unique[at] = row,
            None => {
                positions.insert(path.to_lowercase(), unique.len());
                unique.push(row);
            }
        }
    }
    unique
}

pub struct SearchIndexQuerier<'a> {
    backend: &'a dyn IndexBackend,
    resolver: ShortcutResolver<'a>,
    host: &'a dyn HostPaths,
    icons: &'a dyn IconProvider,
}

impl<'a> SearchIndexQuerier<'a> {
    pub fn new(
        backend: &'a dyn IndexBackend,
        resolver: ShortcutResolver<'a>,
        host: &'a dyn HostPaths,
        icons: &'a dyn IconProvider,
    ) -> Self {
        SearchIndexQuerier { backend, resolver, host, icons }
    }

    pub fn query(&self, term: &str) -> anyhow::Result<Vec<Program>> {
        let start = Instant::now();
        let sql = build_query(term);
        tracing::debug!(event = "index_query_started", component = COMPONENT, sql = %sql);

        let rows = self.backend.run(&sql)?;
        let raw = rows.len();
        let unique = collapse_rows(rows);
        let programs: Vec<Program> = unique.iter().filter_map(|row| self.resolve_row(row)).collect();

        tracing::info!(
            event = "index_query_finished",
            component = COMPONENT,
            raw,
            unique = unique.len(),
            kept = programs.len(),
            elapsed_ms = start.elapsed().as_millis() as u64
        );
        Ok(programs)
    }

    fn resolve_row(&self, row: &IndexRow) -> Option<Program> {
        let item_path = row.path.as_deref().unwrap_or_default();
        let name = row.name.as_deref().unwrap_or_default();

        let mut program = Program::new(name, String::new(), Source::SearchIndex, row.kind());
        program.description = row.comment.clone().filter(|c| !c.is_empty());

        if extension(item_path) == ".lnk" {
            let info = match self.resolver.resolve(item_path) {
                Ok(info) => info,
                Err(e) => {
                    tracing::debug!(event = "index_hit_skipped", component = COMPONENT, path = item_path, error = %e);
                    return None;
                }
            };
            program.executable_path = if info.is_fallback_path {
                normalize_path(self.host, item_path)
            } else {
                info.resolved_target_path
            };
            program.arguments = info.arguments;
            program.icon_path = info.icon_path;
            program.icon_index = info.icon_index;
            if !info.description.is_empty() {
                program.description = Some(info.description);
            }
        } else {
            let Some(existing) = self.existing_form(item_path) else {
                tracing::debug!(event = "index_hit_skipped", component = COMPONENT, path = item_path, reason = "missing");
                return None;
            };
            program.executable_path = normalize_path(self.host, &existing);
            program.icon_path = program.executable_path.clone();
        }

        if program.executable_path.is_empty() {
            return None;
        }
        if program.icon_path.is_empty() {
            program.icon_path = program.executable_path.clone();
            program.icon_index = 0;
        }
        program.icon_index = program.icon_index.max(0);
        program.icon_data = icon_or_none(self.icons, &program.icon_path, program.icon_index);
        Some(program)
    }

    /// Canonical form when it exists, else the raw path when that exists.
    fn existing_form(&self, path: &str) -> Option<String> {
        if let Some(full) = self.host.full_path(path) {
            if self.host.exists(&full) {
                return Some(full);
            }
        }
        self.host.exists(path).then(|| path.to_string())
    }
}

#[cfg(target_os = "windows")]
pub use native::PowerShellIndex;

#[cfg(target_os = "windows")]
mod native {
    use super::{IndexBackend, IndexRow};
    use anyhow::{bail, Context};
    use std::os::windows::process::CommandExt;
    use std::process::Command;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    const SQL_VARIABLE: &str = "LAUNCH_CATALOG_INDEX_SQL";

    const SCRIPT: &str = r#"
[Console]::OutputEncoding = [System.Text.Encoding]::UTF8
$ErrorActionPreference = 'Stop'
$conn = New-Object System.Data.OleDb.OleDbConnection "Provider=Search.CollatorDSO;Extended Properties='Application=Windows';"
$conn.Open()
try {
    $cmd = $conn.CreateCommand()
    $cmd.CommandText = $env:LAUNCH_CATALOG_INDEX_SQL
    $reader = $cmd.ExecuteReader()
    $rows = New-Object System.Collections.ArrayList
    function Field($i) { if ($reader.IsDBNull($i)) { $null } else { $reader.GetValue($i) } }
    while ($reader.Read()) {
        [void]$rows.Add([pscustomobject]@{ Name = Field 0; Path = Field 1; Kind = Field 2; Comment = Field 3 })
    }
    $reader.Close()
    ConvertTo-Json -InputObject @($rows) -Compress -Depth 3
} finally {
    $conn.Close()
}
"#;

    /// Runs the query through the OLE DB search provider in a hidden PowerShell.
    pub struct PowerShellIndex;

    impl IndexBackend for PowerShellIndex {
        fn run(&self, sql: &str) -> anyhow::Result<Vec<IndexRow>> {
            let output = Command::new("powershell")
                .args(["-NoProfile", "-NonInteractive", "-ExecutionPolicy", "Bypass", "-Command", SCRIPT])
                .env(SQL_VARIABLE, sql)
                .creation_flags(CREATE_NO_WINDOW)
                .output()
                .context("failed to start powershell")?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                bail!("index query failed ({}): {}", output.status, stderr.trim());
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            let text = stdout.trim();
            if text.is_empty() {
                return Ok(Vec::new());
            }
            let value: serde_json::Value = serde_json::from_str(text).context("index output is not JSON")?;
            let rows = match value {
                serde_json::Value::Array(_) => serde_json::from_value(value)?,
                serde_json::Value::Null => Vec::new(),
                single => vec![serde_json::from_value(single)?],
            };
            Ok(rows)
        }
    }
}
