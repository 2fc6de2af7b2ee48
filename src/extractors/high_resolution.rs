// Fixed-size icon lookup via PrivateExtractIconsW

use super::OwnedIcon;
use crate::com::to_wide;
use windows::{core::PCWSTR, Win32::UI::WindowsAndMessaging::HICON};

#[link(name = "user32")]
extern "system" {
    fn PrivateExtractIconsW(
        szFileName: PCWSTR,
        nIconIndex: i32,
        cxIcon: i32,
        cyIcon: i32,
        phicon: *mut HICON,
        piconid: *mut u32,
        nIcons: u32,
        flags: u32,
    ) -> u32;
}

/// Asks the resource for an icon rendered at `size`x`size`.
pub fn extract_fixed_size(file_path: &str, icon_index: i32, size: u32) -> Option<OwnedIcon> {
    let wide_path = to_wide(file_path);
    let mut icons = [HICON::default(); 1];
    let mut icon_ids = [0u32; 1];

    let count = unsafe {
        PrivateExtractIconsW(
            PCWSTR(wide_path.as_ptr()),
            icon_index,
            size as i32,
            size as i32,
            icons.as_mut_ptr(),
            icon_ids.as_mut_ptr(),
            1,
            0,
        )
    };

    // 0xFFFFFFFF signals a missing file.
    if count == 0 || count == u32::MAX {
        return None;
    }
    OwnedIcon::new(icons[0])
}
