// Native icon sources

pub mod utils;

#[cfg(target_os = "windows")]
pub mod high_resolution;
#[cfg(target_os = "windows")]
pub mod raster;
#[cfg(target_os = "windows")]
pub mod shell_icon;

#[cfg(target_os = "windows")]
pub use native::{NativeIconSource, OwnedIcon};

#[cfg(target_os = "windows")]
mod native {
    use crate::extractor::{AssociatedSize, IconHandle, IconSource};
    use image::RgbaImage;
    use windows::Win32::UI::WindowsAndMessaging::{DestroyIcon, HICON};

    /// Icon handle destroyed on drop.
    pub struct OwnedIcon(HICON);

    impl OwnedIcon {
        /// `None` for null handles.
        pub fn new(icon: HICON) -> Option<Self> {
            if icon.is_invalid() {
                None
            } else {
                Some(OwnedIcon(icon))
            }
        }
    }

    impl Drop for OwnedIcon {
        fn drop(&mut self) {
            unsafe {
                let _ = DestroyIcon(self.0);
            }
        }
    }

    impl IconHandle for OwnedIcon {
        fn rasterize(&self) -> anyhow::Result<RgbaImage> {
            super::raster::rasterize_hicon(self.0)
        }
    }

    pub struct NativeIconSource;

    impl IconSource for NativeIconSource {
        type Handle = OwnedIcon;

        fn fixed_size(&self, path: &str, index: i32, size: u32) -> Option<OwnedIcon> {
            super::high_resolution::extract_fixed_size(path, index, size)
        }

        fn indexed(&self, path: &str, index: i32) -> Option<OwnedIcon> {
            super::shell_icon::extract_indexed(path, index)
        }

        fn associated(&self, path: &str, size: AssociatedSize) -> Option<OwnedIcon> {
            super::shell_icon::extract_associated(path, size)
        }
    }
}
