// Shortcut resolution

use crate::extractor::{icon_or_none, IconProvider};
use crate::path::{extension, file_stem, has_separator, normalize_path, HostPaths};
use crate::types::ShortcutInfo;
use anyhow::bail;

const COMPONENT: &str = "shortcut_resolver";

const EXECUTABLE_EXTENSIONS: [&str; 4] = [".exe", ".com", ".bat", ".cmd"];
const INSTALLER_EXTENSIONS: [&str; 2] = [".msi", ".msp"];

/// Metadata read straight out of a shortcut file, before any validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawShortcut {
    /// Packaged-app identity, empty for ordinary shortcuts.
    pub target_parsing_path: String,
    pub target: String,
    pub arguments: String,
    pub description: String,
    pub icon_location: String,
    pub icon_index: i32,
}

pub trait ShortcutReader {
    /// Fails only when the file cannot be loaded as a shortcut at all.
    fn load(&self, lnk_path: &str) -> anyhow::Result<RawShortcut>;
}

pub struct ShortcutResolver<'a> {
    reader: &'a dyn ShortcutReader,
    host: &'a dyn HostPaths,
    icons: &'a dyn IconProvider,
}

impl<'a> ShortcutResolver<'a> {
    pub fn new(reader: &'a dyn ShortcutReader, host: &'a dyn HostPaths, icons: &'a dyn IconProvider) -> Self {
        ShortcutResolver { reader, host, icons }
    }

    pub fn resolve(&self, lnk_path: &str) -> anyhow::Result<ShortcutInfo> {
        let raw = self.reader.load(lnk_path)?;

        let packaged = !raw.target_parsing_path.is_empty();
        let (target, is_fallback_path) = if packaged {
            (raw.target_parsing_path.clone(), false)
        } else {
            match select_target(self.host, &raw.target, file_stem(lnk_path)) {
                Some(found) => found,
                None => bail!("no usable target for {lnk_path} (raw target '{}')", raw.target),
            }
        };

        let resolved_target_path = if packaged && target.contains('!') {
            target
        } else {
            normalize_path(self.host, &target)
        };
        if resolved_target_path.is_empty() {
            bail!("target of {lnk_path} normalized to nothing");
        }

        let (icon_path, icon_index) = self.icon_reference(&raw, &resolved_target_path);
        let icon_data = if icon_path.is_empty() {
            None
        } else {
            icon_or_none(self.icons, &icon_path, icon_index)
        };

        tracing::debug!(
            event = "shortcut_resolved",
            component = COMPONENT,
            lnk = lnk_path,
            target = %resolved_target_path,
            packaged,
            fallback = is_fallback_path,
            icon = %icon_path,
            icon_index
        );

        Ok(ShortcutInfo {
            resolved_target_path,
            arguments: raw.arguments,
            description: raw.description,
            icon_path,
            icon_index,
            icon_data,
            is_fallback_path,
        })
    }

    fn icon_reference(&self, raw: &RawShortcut, resolved_target: &str) -> (String, i32) {
        let mut path = String::new();
        let mut index = raw.icon_index;

        if !raw.icon_location.is_empty() {
            let expanded = self.host.expand_env(&raw.icon_location);
            if self.host.exists(&expanded) || looks_like_packaged_resource(&expanded) {
                path = expanded;
            }
        }
        if path.is_empty() {
            path = resolved_target.to_string();
            index = 0;
        }
        if index < 0 {
            index = 0;
        }

        if keeps_raw_icon_path(&path) {
            (path, index)
        } else {
            (normalize_path(self.host, &path), index)
        }
    }
}

/// Target selection for ordinary shortcuts: executable, installer recovery, then fallback.
///
/// Returns the chosen path and whether it is only a fallback.
pub fn select_target(host: &dyn HostPaths, raw_target: &str, lnk_stem: &str) -> Option<(String, bool)> {
    if raw_target.is_empty() {
        return None;
    }
    let ext = extension(raw_target);

    if EXECUTABLE_EXTENSIONS.contains(&ext.as_str()) && host.exists(raw_target) {
        return Some((raw_target.to_string(), false));
    }

    if !lnk_stem.is_empty()
        && INSTALLER_EXTENSIONS.contains(&ext.as_str())
        && raw_target.contains(r"\Installer\")
    {
        let wanted = format!("{lnk_stem}.exe");
        if let Some(found) = host.search_path(&wanted, None) {
            if host.exists(&found) {
                tracing::debug!(event = "installer_target_recovered", component = COMPONENT, raw_target, found = %found);
                return Some((found, false));
            }
        }
    }

    if host.exists(raw_target) {
        return Some((raw_target.to_string(), true));
    }
    None
}

/// Icon locations trusted without an existence check.
///
/// Coarse pattern match that also admits ordinary missing `.png`/`.ico`
/// files, which then fail later at extraction time.
pub fn looks_like_packaged_resource(location: &str) -> bool {
    location.contains('!')
        || location.contains(r"\Assets\")
        || location.contains(r"\images\")
        || location.contains(".png")
        || location.contains(".ico")
        || location.starts_with("@{")
}

/// Packaged identities and resource references are stored as-is.
fn keeps_raw_icon_path(path: &str) -> bool {
    path.contains('!') || path.starts_with('@') || !has_separator(path)
}

#[cfg(target_os = "windows")]
pub use native::ShellLinkReader;

#[cfg(target_os = "windows")]
mod native {
    use super::{RawShortcut, ShortcutReader};
    use crate::com::{from_wide, to_wide};
    use anyhow::Context;
    use windows::{
        core::{Interface, BSTR, PCWSTR},
        Win32::Foundation::HWND,
        Win32::Storage::EnhancedStorage::PKEY_Link_TargetParsingPath,
        Win32::System::Com::{CoCreateInstance, IPersistFile, CLSCTX_INPROC_SERVER, STGM_READ},
        Win32::UI::Shell::PropertiesSystem::IPropertyStore,
        Win32::UI::Shell::{
            IShellLinkW, ShellLink, SLGP_UNCPRIORITY, SLR_NOLINKINFO, SLR_NOSEARCH, SLR_NOUPDATE,
            SLR_NO_UI,
        },
    };

    const INFOTIP_CHARS: usize = 1024;
    const PATH_CHARS: usize = 261;

    /// Reads `.lnk` files through the shell link object. Needs an entered COM apartment.
    pub struct ShellLinkReader;

    impl ShellLinkReader {
        fn target_parsing_path(link: &IShellLinkW) -> String {
            let Ok(store) = link.cast::<IPropertyStore>() else {
                return String::new();
            };
            match unsafe { store.GetValue(&PKEY_Link_TargetParsingPath) } {
                Ok(value) => BSTR::try_from(&value).map(|s| s.to_string()).unwrap_or_default(),
                Err(_) => String::new(),
            }
        }
    }

    impl ShortcutReader for ShellLinkReader {
        fn load(&self, lnk_path: &str) -> anyhow::Result<RawShortcut> {
            unsafe {
                let link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)
                    .context("CoCreateInstance(ShellLink) failed")?;
                let persist: IPersistFile = link.cast()?;
                let wide_path = to_wide(lnk_path);
                persist
                    .Load(PCWSTR(wide_path.as_ptr()), STGM_READ)
                    .with_context(|| format!("cannot load shortcut {lnk_path}"))?;

                let target_parsing_path = Self::target_parsing_path(&link);

                let mut target = String::new();
                if target_parsing_path.is_empty() {
                    // Best effort; a missing target still leaves GetPath usable.
                    let flags = SLR_NO_UI.0 | SLR_NOUPDATE.0 | SLR_NOSEARCH.0 | SLR_NOLINKINFO.0;
                    if let Err(e) = link.Resolve(HWND::default(), flags as u32) {
                        tracing::trace!(event = "shortcut_resolve_failed", component = "shortcut_resolver", lnk = lnk_path, error = %e);
                    }
                    let mut buffer = [0u16; PATH_CHARS];
                    if link
                        .GetPath(&mut buffer, std::ptr::null_mut(), SLGP_UNCPRIORITY.0 as u32)
                        .is_ok()
                    {
                        target = from_wide(&buffer);
                    }
                }

                let mut arguments = [0u16; INFOTIP_CHARS];
                let arguments = match link.GetArguments(&mut arguments) {
                    Ok(()) => from_wide(&arguments),
                    Err(_) => String::new(),
                };
                let mut description = [0u16; INFOTIP_CHARS];
                let description = match link.GetDescription(&mut description) {
                    Ok(()) => from_wide(&description),
                    Err(_) => String::new(),
                };

                let mut icon_buffer = [0u16; PATH_CHARS];
                let mut icon_index = 0i32;
                let icon_location = match link.GetIconLocation(&mut icon_buffer, &mut icon_index) {
                    Ok(()) => from_wide(&icon_buffer),
                    Err(_) => String::new(),
                };

                Ok(RawShortcut {
                    target_parsing_path,
                    target,
                    arguments,
                    description,
                    icon_location,
                    icon_index,
                })
            }
        }
    }
}
