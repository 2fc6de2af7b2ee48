// Installed programs from the uninstall registry

use crate::cmdline::split_uninstall_command;
use crate::extractor::{icon_or_none, IconProvider};
use crate::path::{normalize_path, HostPaths};
use crate::sources::scanner::ProgramScanner;
use crate::types::{Kind, Program, Source};
use std::collections::HashMap;
use std::time::Instant;

const COMPONENT: &str = "registry_scanner";

pub const UNINSTALL_KEY: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
}

impl Hive {
    pub fn source(self) -> Source {
        match self {
            Hive::LocalMachine => Source::RegistryMachine,
            Hive::CurrentUser => Source::RegistryUser,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryView {
    Native64,
    Wow32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegValue {
    String(String),
    Dword(u32),
}

/// One subkey of an uninstall key with the values the scanner cares about.
///
/// Value names are matched ignoring ASCII case, like the registry does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UninstallEntry {
    pub key_name: String,
    values: HashMap<String, RegValue>,
}

impl UninstallEntry {
    pub fn new(key_name: impl Into<String>) -> Self {
        UninstallEntry {
            key_name: key_name.into(),
            values: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, value: RegValue) {
        self.values.insert(name.to_ascii_lowercase(), value);
    }

    pub fn with_string(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, RegValue::String(value.into()));
        self
    }

    pub fn with_dword(mut self, name: &str, value: u32) -> Self {
        self.insert(name, RegValue::Dword(value));
        self
    }

    fn value(&self, name: &str) -> Option<&RegValue> {
        self.values.get(&name.to_ascii_lowercase())
    }

    /// Non-empty string value.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.value(name) {
            Some(RegValue::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn dword(&self, name: &str) -> Option<u32> {
        match self.value(name) {
            Some(RegValue::Dword(v)) => Some(*v),
            _ => None,
        }
    }
}

pub trait UninstallRegistry {
    /// Every subkey under the uninstall key of `hive` seen through `view`.
    /// A missing key is an empty list, not an error.
    fn entries(&self, hive: Hive, view: RegistryView) -> anyhow::Result<Vec<UninstallEntry>>;
}

pub const REGISTRY_LOCATIONS: [(Hive, RegistryView); 4] = [
    (Hive::LocalMachine, RegistryView::Native64),
    (Hive::LocalMachine, RegistryView::Wow32),
    (Hive::CurrentUser, RegistryView::Native64),
    (Hive::CurrentUser, RegistryView::Wow32),
];

pub struct RegistryScanner<'a> {
    registry: &'a dyn UninstallRegistry,
    host: &'a dyn HostPaths,
    icons: &'a dyn IconProvider,
}

impl<'a> RegistryScanner<'a> {
    pub fn new(registry: &'a dyn UninstallRegistry, host: &'a dyn HostPaths, icons: &'a dyn IconProvider) -> Self {
        RegistryScanner { registry, host, icons }
    }

    fn program_from_entry(&self, entry: &UninstallEntry, source: Source) -> Option<Program> {
        let name = entry.string("DisplayName").unwrap_or(&entry.key_name).to_string();
        if let Some(reason) = skip_reason(&name, entry) {
            tracing::trace!(event = "registry_entry_skipped", component = COMPONENT, key = %entry.key_name, reason);
            return None;
        }

        let Some(command) = entry
            .string("QuietUninstallString")
            .or_else(|| entry.string("UninstallString"))
        else {
            let reason = if entry.dword("WindowsInstaller") == Some(1) {
                "installer_entry_without_uninstall_string"
            } else {
                "no_uninstall_string"
            };
            tracing::trace!(event = "registry_entry_skipped", component = COMPONENT, name = %name, reason);
            return None;
        };

        let (executable, arguments) = split_uninstall_command(self.host, command);
        let executable_path = normalize_path(self.host, &executable);
        if executable_path.is_empty() {
            tracing::debug!(event = "registry_entry_skipped", component = COMPONENT, name = %name, reason = "empty_executable");
            return None;
        }

        let (icon_path, icon_index) = match self.display_icon(entry) {
            Some((path, index)) => (normalize_path(self.host, &path), index),
            None => (executable_path.clone(), 0),
        };
        let icon_data = icon_or_none(self.icons, &icon_path, icon_index);

        let mut program = Program::new(name, executable_path, source, Kind::Program);
        program.arguments = arguments;
        program.icon_path = icon_path;
        program.icon_index = icon_index;
        program.icon_data = icon_data;
        program.description = entry.string("Comments").map(str::to_string);
        Some(program)
    }

    /// `DisplayIcon` expanded and split; `None` when absent or pointing nowhere.
    fn display_icon(&self, entry: &UninstallEntry) -> Option<(String, i32)> {
        let raw = entry.string("DisplayIcon")?;
        let expanded = self.host.expand_env(raw);
        let (path, index) = parse_icon_location(&expanded);
        if path.is_empty() || !self.host.exists(&path) {
            return None;
        }
        Some((path, index.max(0)))
    }
}

impl ProgramScanner for RegistryScanner<'_> {
    fn id(&self) -> &'static str {
        "installed_programs"
    }

    fn scan(&self) -> anyhow::Result<Vec<Program>> {
        let start = Instant::now();
        let mut programs = Vec::new();
        let mut skipped = 0usize;

        for (hive, view) in REGISTRY_LOCATIONS {
            let entries = match self.registry.entries(hive, view) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(event = "registry_key_unreadable", component = COMPONENT, ?hive, ?view, error = %e);
                    continue;
                }
            };
            for entry in &entries {
                match self.program_from_entry(entry, hive.source()) {
                    Some(program) => programs.push(program),
                    None => skipped += 1,
                }
            }
        }

        tracing::info!(
            event = "registry_scan_finished",
            component = COMPONENT,
            kept = programs.len(),
            skipped,
            elapsed_ms = start.elapsed().as_millis() as u64
        );
        Ok(programs)
    }
}

fn skip_reason(name: &str, entry: &UninstallEntry) -> Option<&'static str> {
    if name.is_empty() {
        return Some("empty_name");
    }
    if entry.dword("SystemComponent") == Some(1) {
        return Some("system_component");
    }
    if is_update_name(name) {
        return Some("update");
    }
    None
}

/// Hotfix and update naming patterns.
pub fn is_update_name(name: &str) -> bool {
    name.starts_with("KB") || name.contains("Security Update") || name.contains("Update for Microsoft")
}

/// Splits `path,index`, stripping surrounding quotes. A missing or
/// non-numeric suffix leaves the text as the path with index 0.
pub fn parse_icon_location(location: &str) -> (String, i32) {
    let trimmed = location.trim();
    if let Some(comma) = trimmed.rfind(',') {
        let index_part = trimmed[comma + 1..].trim();
        if let Ok(index) = index_part.parse::<i32>() {
            let path = trimmed[..comma].trim().trim_matches('"');
            return (path.to_string(), index);
        }
    }
    (trimmed.trim_matches('"').to_string(), 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValueKind {
    String,
    Dword,
}

/// Decodes raw value bytes: UTF-16LE up to the first nul, or a little-endian DWORD.
pub fn decode_value(kind: RawValueKind, bytes: &[u8]) -> Option<RegValue> {
    match kind {
        RawValueKind::String => {
            let wide: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .take_while(|&unit| unit != 0)
                .collect();
            Some(RegValue::String(String::from_utf16_lossy(&wide)))
        }
        RawValueKind::Dword => {
            let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
            Some(RegValue::Dword(u32::from_le_bytes(raw)))
        }
    }
}

#[cfg(target_os = "windows")]
pub use native::NativeRegistry;

#[cfg(target_os = "windows")]
mod native {
    use super::{decode_value, Hive, RawValueKind, RegValue, RegistryView, UninstallEntry, UninstallRegistry, UNINSTALL_KEY};
    use crate::com::to_wide;
    use anyhow::bail;
    use windows::core::{PCWSTR, PWSTR};
    use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS};
    use windows::Win32::System::Registry::{
        RegCloseKey, RegEnumKeyExW, RegEnumValueW, RegOpenKeyExW, HKEY, HKEY_CURRENT_USER,
        HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_32KEY, KEY_WOW64_64KEY, REG_DWORD, REG_EXPAND_SZ,
        REG_SAM_FLAGS, REG_SZ,
    };

    /// Longest value name the registry allows, plus the terminator.
    const MAX_VALUE_NAME: usize = 16384;

    /// Registry key closed on drop.
    struct RegKey(HKEY);

    impl RegKey {
        /// `Ok(None)` when the key does not exist.
        fn open(parent: HKEY, path: &str, access: REG_SAM_FLAGS) -> anyhow::Result<Option<RegKey>> {
            let wide = to_wide(path);
            let mut key = HKEY::default();
            let status = unsafe { RegOpenKeyExW(parent, PCWSTR(wide.as_ptr()), Some(0), access, &mut key) };
            if status == ERROR_FILE_NOT_FOUND {
                return Ok(None);
            }
            if status != ERROR_SUCCESS {
                bail!("RegOpenKeyExW({path}) failed: {:?}", status);
            }
            Ok(Some(RegKey(key)))
        }

        fn subkey_names(&self) -> Vec<String> {
            let mut names = Vec::new();
            let mut index = 0u32;
            loop {
                let mut buffer = [0u16; 256];
                let mut len = buffer.len() as u32;
                let status = unsafe {
                    RegEnumKeyExW(self.0, index, Some(PWSTR(buffer.as_mut_ptr())), &mut len, None, None, None, None)
                };
                index += 1;
                if status == ERROR_NO_MORE_ITEMS {
                    break;
                }
                if status != ERROR_SUCCESS {
                    continue;
                }
                names.push(String::from_utf16_lossy(&buffer[..len as usize]));
            }
            names
        }

        fn values(&self) -> Vec<(String, RegValue)> {
            let mut values = Vec::new();
            let mut name = vec![0u16; MAX_VALUE_NAME];
            let mut data = vec![0u8; 8192];
            let mut index = 0u32;
            loop {
                let mut name_len = name.len() as u32;
                let mut data_len = data.len() as u32;
                let mut value_type = 0u32;
                let status = unsafe {
                    RegEnumValueW(
                        self.0,
                        index,
                        Some(PWSTR(name.as_mut_ptr())),
                        &mut name_len,
                        None,
                        Some(&mut value_type as *mut u32),
                        Some(data.as_mut_ptr()),
                        Some(&mut data_len as *mut u32),
                    )
                };
                if status == ERROR_MORE_DATA && data_len as usize > data.len() {
                    // Same index again with room for the value.
                    data.resize(data_len as usize, 0);
                    continue;
                }
                index += 1;
                if status == ERROR_NO_MORE_ITEMS {
                    break;
                }
                if status != ERROR_SUCCESS {
                    tracing::debug!(event = "registry_value_unreadable", component = "registry_scanner", index = index - 1, status = ?status);
                    continue;
                }
                let value_name = String::from_utf16_lossy(&name[..name_len as usize]);
                let kind = if value_type == REG_SZ.0 || value_type == REG_EXPAND_SZ.0 {
                    RawValueKind::String
                } else if value_type == REG_DWORD.0 {
                    RawValueKind::Dword
                } else {
                    continue;
                };
                if let Some(value) = decode_value(kind, &data[..data_len as usize]) {
                    values.push((value_name, value));
                }
            }
            values
        }
    }

    impl Drop for RegKey {
        fn drop(&mut self) {
            unsafe {
                let _ = RegCloseKey(self.0);
            }
        }
    }

    pub struct NativeRegistry;

    impl UninstallRegistry for NativeRegistry {
        fn entries(&self, hive: Hive, view: RegistryView) -> anyhow::Result<Vec<UninstallEntry>> {
            let root = match hive {
                Hive::LocalMachine => HKEY_LOCAL_MACHINE,
                Hive::CurrentUser => HKEY_CURRENT_USER,
            };
            let access = KEY_READ
                | match view {
                    RegistryView::Native64 => KEY_WOW64_64KEY,
                    RegistryView::Wow32 => KEY_WOW64_32KEY,
                };

            let Some(uninstall) = RegKey::open(root, UNINSTALL_KEY, access)? else {
                return Ok(Vec::new());
            };

            let mut entries = Vec::new();
            for name in uninstall.subkey_names() {
                let app = match RegKey::open(uninstall.0, &name, access) {
                    Ok(Some(app)) => app,
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::debug!(event = "registry_subkey_unreadable", component = "registry_scanner", key = %name, error = %e);
                        continue;
                    }
                };
                let mut entry = UninstallEntry::new(name);
                for (value_name, value) in app.values() {
                    entry.insert(&value_name, value);
                }
                entries.push(entry);
            }
            Ok(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHost, FakeIcons, FakeRegistry};

    fn scan(registry: &FakeRegistry, host: &FakeHost) -> Vec<Program> {
        RegistryScanner::new(registry, host, &FakeIcons).scan().unwrap()
    }

    #[test]
    fn quoted_uninstall_string_with_switch() {
        let host = FakeHost::default().with_file(r"C:\Prog\unins.exe");
        let registry = FakeRegistry::default().with(
            Hive::LocalMachine,
            RegistryView::Native64,
            UninstallEntry::new("Foo_is1")
                .with_string("DisplayName", "Foo")
                .with_string("UninstallString", r#""C:\Prog\unins.exe" /S"#),
        );
        let programs = scan(&registry, &host);
        assert_eq!(programs.len(), 1);
        let foo = &programs[0];
        assert_eq!(foo.name, "Foo");
        assert_eq!(foo.executable_path, r"C:\Prog\unins.exe");
        assert_eq!(foo.arguments, "/S");
        assert_eq!(foo.kind, Kind::Program);
        assert_eq!(foo.source, Source::RegistryMachine);
        assert_eq!(foo.icon_path, r"C:\Prog\unins.exe");
        assert_eq!(foo.icon_index, 0);
        assert!(foo.has_icon());
    }

    #[test]
    fn value_names_ignore_case() {
        let host = FakeHost::default().with_file(r"C:\Prog\unins.exe");
        let registry = FakeRegistry::default().with(
            Hive::CurrentUser,
            RegistryView::Native64,
            UninstallEntry::new("Foo")
                .with_string("Displayname", "Foo")
                .with_string("uninstallString", r#""C:\Prog\unins.exe" /S"#)
                .with_dword("systemcomponent", 0),
        );
        let programs = scan(&registry, &host);
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].name, "Foo");
        assert_eq!(programs[0].arguments, "/S");

        let hidden = UninstallEntry::new("x").with_dword("SYSTEMCOMPONENT", 1);
        assert_eq!(hidden.dword("SystemComponent"), Some(1));
    }

    #[test]
    fn filters_and_fallbacks() {
        let host = FakeHost::default()
            .with_file(r"C:\Prog\a.exe")
            .with_file(r"C:\Prog\app.ico")
            .with_env("ProgramFiles", r"C:\Prog");
        let uninstall = r#""C:\Prog\a.exe" /x"#;
        let registry = FakeRegistry::default()
            .with(Hive::CurrentUser, RegistryView::Native64,
                UninstallEntry::new("{KEY-NAME}").with_string("UninstallString", uninstall))
            .with(Hive::CurrentUser, RegistryView::Native64,
                UninstallEntry::new("sys").with_string("DisplayName", "Driver").with_dword("SystemComponent", 1).with_string("UninstallString", uninstall))
            .with(Hive::CurrentUser, RegistryView::Native64,
                UninstallEntry::new("kb").with_string("DisplayName", "KB5005565").with_string("UninstallString", uninstall))
            .with(Hive::CurrentUser, RegistryView::Wow32,
                UninstallEntry::new("sec").with_string("DisplayName", "Security Update for Office").with_string("UninstallString", uninstall))
            .with(Hive::CurrentUser, RegistryView::Wow32,
                UninstallEntry::new("msi").with_string("DisplayName", "Msi Thing").with_dword("WindowsInstaller", 1))
            .with(Hive::CurrentUser, RegistryView::Wow32,
                UninstallEntry::new("plain").with_string("DisplayName", "No Command"))
            .with(Hive::LocalMachine, RegistryView::Wow32,
                UninstallEntry::new("quiet")
                    .with_string("DisplayName", "Quiet")
                    .with_string("QuietUninstallString", r#""C:\Prog\a.exe" /quiet"#)
                    .with_string("UninstallString", uninstall)
                    .with_string("DisplayIcon", r"%ProgramFiles%\app.ico,-2")
                    .with_string("Comments", "Quiet one"));

        let programs = scan(&registry, &host);
        let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Quiet", "{KEY-NAME}"]);

        let quiet = &programs[0];
        assert_eq!(quiet.arguments, "/quiet");
        assert_eq!(quiet.icon_path, r"C:\Prog\app.ico");
        assert_eq!(quiet.icon_index, 0);
        assert_eq!(quiet.description.as_deref(), Some("Quiet one"));
        assert_eq!(programs[1].source, Source::RegistryUser);
    }

    #[test]
    fn missing_display_icon_falls_back_to_executable() {
        let host = FakeHost::default().with_file(r"C:\Prog\a.exe");
        let registry = FakeRegistry::default().with(
            Hive::LocalMachine,
            RegistryView::Native64,
            UninstallEntry::new("a")
                .with_string("DisplayName", "A")
                .with_string("UninstallString", r"C:\Prog\a.exe")
                .with_string("DisplayIcon", r"C:\Gone\a.ico,3"),
        );
        let programs = scan(&registry, &host);
        assert_eq!(programs[0].icon_path, r"C:\Prog\a.exe");
        assert_eq!(programs[0].icon_index, 0);
        assert_eq!(programs[0].arguments, "");
    }

    #[test]
    fn unreadable_location_does_not_stop_the_scan() {
        let host = FakeHost::default().with_file(r"C:\Prog\a.exe");
        let registry = FakeRegistry::default()
            .failing(Hive::LocalMachine, RegistryView::Native64)
            .with(
                Hive::CurrentUser,
                RegistryView::Native64,
                UninstallEntry::new("a")
                    .with_string("DisplayName", "A")
                    .with_string("UninstallString", r"C:\Prog\a.exe"),
            );
        assert_eq!(scan(&registry, &host).len(), 1);
    }

    #[test]
    fn icon_location_parsing() {
        assert_eq!(parse_icon_location(r#""C:\P Q\app.exe",2"#), (r"C:\P Q\app.exe".to_string(), 2));
        assert_eq!(parse_icon_location(r"C:\a,b\app.ico"), (r"C:\a,b\app.ico".to_string(), 0));
        assert_eq!(parse_icon_location(r"C:\app.dll,-101"), (r"C:\app.dll".to_string(), -101));
    }

    #[test]
    fn long_string_values_decode_whole() {
        let text = "C:\\Very Long\\".repeat(700);
        let mut bytes: Vec<u8> = text.encode_utf16().chain([0]).flat_map(u16::to_le_bytes).collect();
        bytes.extend([0, 0]);
        assert!(bytes.len() > 8192);
        assert_eq!(decode_value(RawValueKind::String, &bytes), Some(RegValue::String(text)));

        assert_eq!(decode_value(RawValueKind::Dword, &[1, 0, 0, 0]), Some(RegValue::Dword(1)));
        assert_eq!(decode_value(RawValueKind::Dword, &[1, 0]), None);
    }

    #[test]
    fn update_names() {
        assert!(is_update_name("KB123456"));
        assert!(is_update_name("Update for Microsoft Office 2016"));
        assert!(!is_update_name("Keyboard Tool"));
    }
}
