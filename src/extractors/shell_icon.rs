// Shell icon lookups: indexed resources, file-type icons and shell item images

use super::raster::{rasterize_hbitmap, GdiObject};
use super::utils::encode_png_base64;
use super::OwnedIcon;
use crate::com::to_wide;
use crate::extractor::AssociatedSize;
use anyhow::{bail, Context};
use windows::{
    core::{Interface, PCWSTR},
    Win32::Foundation::SIZE,
    Win32::Storage::FileSystem::FILE_ATTRIBUTE_NORMAL,
    Win32::UI::Shell::{
        ExtractIconExW, IShellItem, IShellItemImageFactory, SHCreateItemFromParsingName,
        SHGetFileInfoW, SHFILEINFOW, SHGFI_ICON, SHGFI_LARGEICON, SHGFI_SMALLICON,
        SHGFI_USEFILEATTRIBUTES, SIIGBF_BIGGERSIZEOK, SIIGBF_ICONONLY,
    },
    Win32::UI::WindowsAndMessaging::HICON,
};

/// The Nth icon of a file. The small sibling is released as soon as the large one is taken.
pub fn extract_indexed(file_path: &str, icon_index: i32) -> Option<OwnedIcon> {
    let wide_path = to_wide(file_path);
    let mut large = HICON::default();
    let mut small = HICON::default();

    let count = unsafe {
        ExtractIconExW(
            PCWSTR(wide_path.as_ptr()),
            icon_index,
            Some(&mut large),
            Some(&mut small),
            1,
        )
    };
    let large = OwnedIcon::new(large);
    let small = OwnedIcon::new(small);
    if count == 0 || count == u32::MAX {
        return None;
    }

    match large {
        Some(icon) => {
            drop(small);
            Some(icon)
        }
        None => small,
    }
}

/// Generic icon for the file's type. Works for paths that no longer exist.
pub fn extract_associated(file_path: &str, size: AssociatedSize) -> Option<OwnedIcon> {
    let wide_path = to_wide(file_path);
    let size_flag = match size {
        AssociatedSize::Large => SHGFI_LARGEICON,
        AssociatedSize::Small => SHGFI_SMALLICON,
    };

    let mut info = SHFILEINFOW::default();
    let result = unsafe {
        SHGetFileInfoW(
            PCWSTR(wide_path.as_ptr()),
            FILE_ATTRIBUTE_NORMAL,
            Some(&mut info),
            std::mem::size_of::<SHFILEINFOW>() as u32,
            SHGFI_ICON | SHGFI_USEFILEATTRIBUTES | size_flag,
        )
    };
    if result == 0 {
        return None;
    }
    OwnedIcon::new(info.hIcon)
}

/// Renders a shell item (e.g. `shell:AppsFolder\<AUMID>`) at `size` and encodes it.
pub fn shell_item_image_base64(parsing_name: &str, size: u32) -> anyhow::Result<String> {
    let wide_name = to_wide(parsing_name);
    let bitmap = unsafe {
        let item: IShellItem = SHCreateItemFromParsingName(PCWSTR(wide_name.as_ptr()), None)
            .with_context(|| format!("no shell item for {parsing_name}"))?;
        let factory: IShellItemImageFactory = item.cast()?;
        factory.GetImage(
            SIZE {
                cx: size as i32,
                cy: size as i32,
            },
            SIIGBF_ICONONLY | SIIGBF_BIGGERSIZEOK,
        )?
    };
    if bitmap.is_invalid() {
        bail!("shell item image is empty for {parsing_name}");
    }
    let _owned = GdiObject(bitmap.into());
    let canvas = rasterize_hbitmap(bitmap)?;
    encode_png_base64(&canvas)
}
