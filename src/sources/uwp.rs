// Packaged (Store) apps from the shell AppsFolder

use crate::types::{Kind, Program, Source};
use anyhow::{anyhow, Context};

pub trait PackagedAppSource {
    fn packaged_apps(&self, logo_size: u32) -> anyhow::Result<Vec<Program>>;
}

/// Launch target for an application user model id.
pub fn apps_folder_path(aumid: &str) -> String {
    format!(r"shell:AppsFolder\{aumid}")
}

/// Catalog entry for one AppsFolder item. `logo` is base64 PNG.
pub fn packaged_program(display_name: &str, aumid: &str, logo: Option<String>) -> Program {
    let path = apps_folder_path(aumid);
    let mut program = Program::new(display_name, path.clone(), Source::PackagedApp, Kind::Program);
    program.icon_path = path;
    program.icon_data = logo.filter(|data| !data.is_empty());
    program
}

/// Runs `work` on a fresh thread that owns its own COM apartment and blocks until it finishes.
///
/// The caller's log dispatcher follows the work onto the worker.
pub fn run_on_sta_worker<T, F>(name: &str, work: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    let dispatch = tracing::dispatcher::get_default(|current| current.clone());
    let handle = std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                #[cfg(target_os = "windows")]
                let _apartment = crate::com::ComApartment::enter()?;
                work()
            })
        })
        .with_context(|| format!("failed to spawn {name}"))?;
    handle
        .join()
        .map_err(|_| anyhow!("{name} worker panicked"))?
}

#[cfg(target_os = "windows")]
pub use native::AppsFolderSource;

#[cfg(target_os = "windows")]
mod native {
    use super::{packaged_program, run_on_sta_worker, PackagedAppSource};
    use crate::extractors::shell_icon::shell_item_image_base64;
    use crate::types::Program;
    use anyhow::Context;
    use std::time::Instant;
    use windows::Win32::Foundation::S_OK;
    use windows::Win32::System::Com::CoTaskMemFree;
    use windows::Win32::UI::Shell::Common::{ITEMIDLIST, STRRET};
    use windows::Win32::UI::Shell::{
        FOLDERID_AppsFolder, IEnumIDList, IShellFolder, SHGetDesktopFolder, SHGetKnownFolderIDList,
        StrRetToStrW, KF_FLAG_DEFAULT, SHCONTF_FOLDERS, SHCONTF_INCLUDEHIDDEN, SHCONTF_NONFOLDERS,
        SHGDNF, SHGDN_FORPARSING, SHGDN_NORMAL,
    };

    const COMPONENT: &str = "packaged_apps";

    /// Item id list freed with `CoTaskMemFree` on drop.
    struct OwnedPidl(*mut ITEMIDLIST);

    impl Drop for OwnedPidl {
        fn drop(&mut self) {
            if !self.0.is_null() {
                unsafe { CoTaskMemFree(Some(self.0 as *const _)) };
            }
        }
    }

    fn display_name(folder: &IShellFolder, pidl: *const ITEMIDLIST, flags: SHGDNF) -> Option<String> {
        unsafe {
            let mut ret = STRRET::default();
            folder.GetDisplayNameOf(pidl, flags, &mut ret).ok()?;
            let text = StrRetToStrW(&mut ret, Some(pidl)).ok()?;
            let value = text.to_string().ok();
            CoTaskMemFree(Some(text.as_ptr() as *const _));
            value.filter(|v| !v.is_empty())
        }
    }

    /// `(display name, AUMID)` for every AppsFolder item. Needs an apartment on the calling thread.
    fn enumerate_apps_folder() -> anyhow::Result<Vec<(String, String)>> {
        let mut items = Vec::new();
        unsafe {
            let folder_pidl = OwnedPidl(
                SHGetKnownFolderIDList(&FOLDERID_AppsFolder, KF_FLAG_DEFAULT.0 as u32, None)
                    .context("AppsFolder id list unavailable")?,
            );
            let desktop: IShellFolder = SHGetDesktopFolder()?;
            let apps_folder: IShellFolder = desktop
                .BindToObject(folder_pidl.0, None)
                .context("failed to bind AppsFolder")?;

            let mut enumerator: Option<IEnumIDList> = None;
            let flags = SHCONTF_FOLDERS.0 | SHCONTF_NONFOLDERS.0 | SHCONTF_INCLUDEHIDDEN.0;
            apps_folder
                .EnumObjects(None, flags as u32, &mut enumerator)
                .ok()
                .context("AppsFolder enumeration failed")?;
            let Some(enumerator) = enumerator else {
                return Ok(items);
            };

            let mut batch: [*mut ITEMIDLIST; 1] = [std::ptr::null_mut()];
            let mut fetched = 0u32;
            while enumerator.Next(&mut batch, Some(&mut fetched)) == S_OK && fetched > 0 {
                let item = OwnedPidl(batch[0]);
                if item.0.is_null() {
                    continue;
                }
                let Some(aumid) = display_name(&apps_folder, item.0, SHGDN_FORPARSING) else {
                    continue;
                };
                let name = display_name(&apps_folder, item.0, SHGDN_NORMAL).unwrap_or_else(|| aumid.clone());
                items.push((name, aumid));
            }
        }
        Ok(items)
    }

    fn load(logo_size: u32) -> anyhow::Result<Vec<Program>> {
        let start = Instant::now();
        let items = enumerate_apps_folder()?;
        let programs: Vec<Program> = items
            .iter()
            .map(|(name, aumid)| {
                let logo = match shell_item_image_base64(&super::apps_folder_path(aumid), logo_size) {
                    Ok(logo) => Some(logo),
                    Err(e) => {
                        tracing::debug!(event = "packaged_logo_failed", component = COMPONENT, aumid = %aumid, error = %e);
                        None
                    }
                };
                packaged_program(name, aumid, logo)
            })
            .collect();
        tracing::info!(
            event = "packaged_apps_loaded",
            component = COMPONENT,
            count = programs.len(),
            elapsed_ms = start.elapsed().as_millis() as u64
        );
        Ok(programs)
    }

    pub struct AppsFolderSource;

    impl PackagedAppSource for AppsFolderSource {
        fn packaged_apps(&self, logo_size: u32) -> anyhow::Result<Vec<Program>> {
            run_on_sta_worker("packaged-apps", move || load(logo_size))
        }
    }
}
