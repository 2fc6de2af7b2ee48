// Path probing and known folders

#[cfg(target_os = "windows")]
use crate::com::{from_wide, to_wide};
#[cfg(target_os = "windows")]
use std::path::PathBuf;
#[cfg(target_os = "windows")]
use windows::{
    core::{GUID, PCWSTR},
    Win32::Foundation::HANDLE,
    Win32::Storage::FileSystem::{GetFullPathNameW, SearchPathW},
    Win32::System::Com::CoTaskMemFree,
    Win32::System::Environment::ExpandEnvironmentStringsW,
    Win32::UI::Shell::{FOLDERID_CommonPrograms, FOLDERID_Programs, SHGetKnownFolderPath, KF_FLAG_DEFAULT},
};

/// File-system questions the scanners need answered by the host OS.
pub trait HostPaths {
    fn exists(&self, path: &str) -> bool;

    /// System path search. `default_ext` is appended when `file` carries no extension.
    fn search_path(&self, file: &str, default_ext: Option<&str>) -> Option<String>;

    /// Expands `%VAR%` references. Unknown variables are left in place.
    fn expand_env(&self, text: &str) -> String;

    /// Lexically canonical absolute form; `None` when the host cannot produce one.
    fn full_path(&self, path: &str) -> Option<String>;
}

/// Canonicalizes when possible and otherwise returns the input untouched.
pub fn normalize_path(host: &dyn HostPaths, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    match host.full_path(path) {
        Some(full) if !full.is_empty() => full,
        _ => path.to_string(),
    }
}

pub fn file_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(pos) => &name[..pos],
    }
}

/// Lowercased extension including the dot, empty when there is none.
pub fn extension(path: &str) -> String {
    let name = file_name(path);
    match name.rfind('.') {
        Some(pos) if pos > 0 => name[pos..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

pub fn has_separator(path: &str) -> bool {
    path.contains(['\\', '/'])
}

#[cfg(target_os = "windows")]
pub struct NativeHost;

#[cfg(target_os = "windows")]
impl HostPaths for NativeHost {
    fn exists(&self, path: &str) -> bool {
        !path.is_empty() && std::path::Path::new(path).exists()
    }

    fn search_path(&self, file: &str, default_ext: Option<&str>) -> Option<String> {
        if file.is_empty() {
            return None;
        }
        let wide_file = to_wide(file);
        let wide_ext = default_ext.map(to_wide);
        let ext_ptr = wide_ext
            .as_ref()
            .map_or(PCWSTR::null(), |ext| PCWSTR(ext.as_ptr()));

        let mut buffer = vec![0u16; 1024];
        loop {
            let written = unsafe {
                SearchPathW(
                    PCWSTR::null(),
                    PCWSTR(wide_file.as_ptr()),
                    ext_ptr,
                    Some(&mut buffer),
                    None,
                )
            } as usize;
            if written == 0 {
                return None;
            }
            if written < buffer.len() {
                return Some(from_wide(&buffer[..written]));
            }
            buffer.resize(written + 1, 0);
        }
    }

    fn expand_env(&self, text: &str) -> String {
        if !text.contains('%') {
            return text.to_string();
        }
        let wide = to_wide(text);
        let needed = unsafe { ExpandEnvironmentStringsW(PCWSTR(wide.as_ptr()), None) } as usize;
        if needed == 0 {
            return text.to_string();
        }
        let mut buffer = vec![0u16; needed];
        let written = unsafe { ExpandEnvironmentStringsW(PCWSTR(wide.as_ptr()), Some(&mut buffer)) } as usize;
        if written == 0 || written > buffer.len() {
            return text.to_string();
        }
        from_wide(&buffer)
    }

    fn full_path(&self, path: &str) -> Option<String> {
        let wide = to_wide(path);
        let needed = unsafe { GetFullPathNameW(PCWSTR(wide.as_ptr()), None, None) } as usize;
        if needed == 0 {
            return None;
        }
        let mut buffer = vec![0u16; needed];
        let written = unsafe { GetFullPathNameW(PCWSTR(wide.as_ptr()), Some(&mut buffer), None) } as usize;
        if written == 0 || written >= buffer.len() {
            return None;
        }
        Some(from_wide(&buffer[..written]))
    }
}

#[cfg(target_os = "windows")]
fn known_folder_path(folder_id: &GUID) -> anyhow::Result<PathBuf> {
    unsafe {
        let raw = SHGetKnownFolderPath(folder_id, KF_FLAG_DEFAULT, Some(HANDLE::default()))?;
        let text = raw.to_string();
        CoTaskMemFree(Some(raw.as_ptr() as *const _));
        Ok(PathBuf::from(text?))
    }
}

#[cfg(target_os = "windows")]
pub fn start_menu_programs_path() -> anyhow::Result<PathBuf> {
    known_folder_path(&FOLDERID_Programs)
}

#[cfg(target_os = "windows")]
pub fn common_start_menu_programs_path() -> anyhow::Result<PathBuf> {
    known_folder_path(&FOLDERID_CommonPrograms)
}
