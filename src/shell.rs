// Shell launch

pub trait ShellLauncher {
    /// Hands `path` to the shell's "open" verb. `arguments` is only passed when non-empty.
    fn launch(&self, path: &str, arguments: &str) -> anyhow::Result<()>;
}

/// `false` for an empty path or a failed launch. Failures are logged.
pub fn open_item(launcher: &dyn ShellLauncher, path: &str, arguments: &str) -> bool {
    if path.is_empty() {
        tracing::warn!(event = "open_rejected", component = "shell", reason = "empty_path");
        return false;
    }
    match launcher.launch(path, arguments) {
        Ok(()) => {
            tracing::info!(event = "open_succeeded", component = "shell", path, arguments);
            true
        }
        Err(e) => {
            tracing::error!(event = "open_failed", component = "shell", path, arguments, error = %e);
            false
        }
    }
}

#[cfg(target_os = "windows")]
pub use native::ShellExecuteLauncher;

#[cfg(target_os = "windows")]
mod native {
    use super::ShellLauncher;
    use crate::com::to_wide;
    use anyhow::Context;
    use windows::core::{w, PCWSTR};
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::UI::Shell::{
        ShellExecuteExW, SEE_MASK_FLAG_DDEWAIT, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW,
    };
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    struct ProcessHandle(HANDLE);

    impl Drop for ProcessHandle {
        fn drop(&mut self) {
            if !self.0.is_invalid() {
                unsafe {
                    let _ = CloseHandle(self.0);
                }
            }
        }
    }

    pub struct ShellExecuteLauncher;

    impl ShellLauncher for ShellExecuteLauncher {
        fn launch(&self, path: &str, arguments: &str) -> anyhow::Result<()> {
            let file = to_wide(path);
            let parameters = to_wide(arguments);
            let mut info = SHELLEXECUTEINFOW {
                cbSize: std::mem::size_of::<SHELLEXECUTEINFOW>() as u32,
                fMask: SEE_MASK_NOCLOSEPROCESS | SEE_MASK_FLAG_DDEWAIT,
                lpVerb: w!("open"),
                lpFile: PCWSTR(file.as_ptr()),
                lpParameters: if arguments.is_empty() {
                    PCWSTR::null()
                } else {
                    PCWSTR(parameters.as_ptr())
                },
                nShow: SW_SHOWNORMAL.0,
                ..Default::default()
            };
            unsafe { ShellExecuteExW(&mut info) }.with_context(|| format!("ShellExecuteExW failed for {path}"))?;
            drop(ProcessHandle(info.hProcess));
            Ok(())
        }
    }
}
