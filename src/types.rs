// Catalog data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a [`Program`] was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    StartMenuUser,
    StartMenuCommon,
    RegistryUser,
    RegistryMachine,
    SearchIndex,
    Settings,
    PackagedApp,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::StartMenuUser => "Start Menu (User)",
            Source::StartMenuCommon => "Start Menu (Common)",
            Source::RegistryUser => "Registry (HKCU) Uninstall",
            Source::RegistryMachine => "Registry (HKLM) Uninstall",
            Source::SearchIndex => "Windows Search Index",
            Source::Settings => "Microsoft",
            Source::PackagedApp => "UWP",
        }
    }

    /// Dedup preference, lower wins. Sources outside the ranked set share the last slot.
    pub fn rank(self) -> u8 {
        match self {
            Source::StartMenuUser => 0,
            Source::StartMenuCommon => 1,
            Source::RegistryUser => 2,
            Source::RegistryMachine => 3,
            _ => 4,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Program,
    Link,
    Setting,
    Unknown,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Program => "program",
            Kind::Link => "link",
            Kind::Setting => "setting",
            Kind::Unknown => "unknown",
        }
    }

    /// Maps a content-index kind string; anything unrecognised is `Unknown`.
    pub fn from_index_kind(kind: &str) -> Kind {
        match kind.to_ascii_lowercase().as_str() {
            "program" => Kind::Program,
            "link" => Kind::Link,
            "setting" => Kind::Setting,
            _ => Kind::Unknown,
        }
    }
}

/// One launchable catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    pub executable_path: String,
    pub arguments: String,
    pub icon_path: String,
    pub icon_index: i32,
    /// Base64 PNG.
    pub icon_data: Option<String>,
    pub source: Source,
    pub kind: Kind,
    pub description: Option<String>,
}

impl Program {
    pub fn new(name: impl Into<String>, executable_path: impl Into<String>, source: Source, kind: Kind) -> Self {
        Program {
            name: name.into(),
            executable_path: executable_path.into(),
            arguments: String::new(),
            icon_path: String::new(),
            icon_index: 0,
            icon_data: None,
            source,
            kind,
            description: None,
        }
    }

    pub fn has_icon(&self) -> bool {
        self.icon_data.as_deref().is_some_and(|data| !data.is_empty())
    }

    pub fn to_record(&self) -> ProgramRecord {
        ProgramRecord::from(self)
    }
}

/// Output of the shortcut resolver, consumed right away by the scanner that asked for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortcutInfo {
    pub resolved_target_path: String,
    pub arguments: String,
    pub description: String,
    pub icon_path: String,
    pub icon_index: i32,
    pub icon_data: Option<String>,
    /// The target exists but is not a verified executable; launch the shortcut file instead.
    pub is_fallback_path: bool,
}

/// Flat record handed across the application boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub name: String,
    pub path: String,
    pub args: String,
    pub kind: String,
    pub desc: String,
    pub icon: String,
}

impl From<&Program> for ProgramRecord {
    fn from(program: &Program) -> Self {
        ProgramRecord {
            name: program.name.clone(),
            path: program.executable_path.clone(),
            args: program.arguments.clone(),
            kind: program.kind.as_str().to_string(),
            desc: program.description.clone().unwrap_or_default(),
            icon: program.icon_data.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_sources_rank_below_start_menu() {
        assert!(Source::StartMenuUser.rank() < Source::StartMenuCommon.rank());
        assert!(Source::StartMenuCommon.rank() < Source::RegistryUser.rank());
        assert!(Source::RegistryUser.rank() < Source::RegistryMachine.rank());
        assert_eq!(Source::SearchIndex.rank(), Source::Settings.rank());
    }

    #[test]
    fn record_flattens_optional_fields() {
        let mut program = Program::new("Foo", r"C:\Prog\foo.exe", Source::RegistryMachine, Kind::Program);
        program.arguments = "/S".into();
        let record = program.to_record();
        assert_eq!(record.kind, "program");
        assert_eq!(record.desc, "");
        assert_eq!(record.icon, "");
        assert_eq!(record.args, "/S");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["path"], r"C:\Prog\foo.exe");
    }

    #[test]
    fn index_kind_mapping() {
        assert_eq!(Kind::from_index_kind("Program"), Kind::Program);
        assert_eq!(Kind::from_index_kind("link"), Kind::Link);
        assert_eq!(Kind::from_index_kind("document"), Kind::Unknown);
    }
}
