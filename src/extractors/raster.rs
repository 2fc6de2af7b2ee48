// GDI rasterization of icon and bitmap handles

use super::utils::{canvas_from_bgra, canvas_from_bgra_masked};
use anyhow::{bail, Context};
use image::RgbaImage;
use std::mem::size_of;
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GdiFlush, GetDC, GetDIBits,
    GetObjectW, ReleaseDC, SelectObject, BITMAP, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ,
};
use windows::Win32::UI::WindowsAndMessaging::{DrawIconEx, GetIconInfo, DI_NORMAL, HICON, ICONINFO};

/// Deletes a GDI object on drop. Null handles are ignored.
pub struct GdiObject(pub HGDIOBJ);

impl Drop for GdiObject {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            unsafe {
                let _ = DeleteObject(self.0);
            }
        }
    }
}

struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> anyhow::Result<Self> {
        let dc = unsafe { GetDC(None) };
        if dc.is_invalid() {
            bail!("GetDC failed");
        }
        Ok(ScreenDc(dc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(None, self.0);
        }
    }
}

struct MemoryDc(HDC);

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteDC(self.0);
        }
    }
}

/// Restores the previously selected object when dropped.
struct Selection {
    dc: HDC,
    previous: HGDIOBJ,
}

impl Selection {
    fn select(dc: HDC, object: HGDIOBJ) -> Self {
        let previous = unsafe { SelectObject(dc, object) };
        Selection { dc, previous }
    }
}

impl Drop for Selection {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.dc, self.previous);
        }
    }
}

fn top_down_info(width: i32, height: i32) -> BITMAPINFO {
    BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn bitmap_size(bitmap: HBITMAP) -> anyhow::Result<(i32, i32)> {
    let mut info = BITMAP::default();
    let read = unsafe {
        GetObjectW(
            bitmap.into(),
            size_of::<BITMAP>() as i32,
            Some(&mut info as *mut _ as *mut _),
        )
    };
    if read == 0 {
        bail!("GetObjectW failed for bitmap");
    }
    Ok((info.bmWidth, info.bmHeight))
}

/// Draws onto a zeroed 32bpp DIB and returns its top-down BGRA pixels.
fn draw_on_canvas(
    width: i32,
    height: i32,
    draw: impl FnOnce(HDC) -> anyhow::Result<()>,
) -> anyhow::Result<Vec<u8>> {
    if width <= 0 || height <= 0 {
        bail!("icon canvas is empty ({width}x{height})");
    }
    let len = width as usize * height as usize * 4;

    let screen = ScreenDc::acquire()?;
    let memory = MemoryDc(unsafe { CreateCompatibleDC(Some(screen.0)) });
    if memory.0.is_invalid() {
        bail!("CreateCompatibleDC failed");
    }

    let info = top_down_info(width, height);
    let mut bits: *mut std::ffi::c_void = std::ptr::null_mut();
    let dib = unsafe { CreateDIBSection(Some(memory.0), &info, DIB_RGB_COLORS, &mut bits, None, 0) }
        .context("CreateDIBSection failed")?;
    let dib = GdiObject(dib.into());
    if bits.is_null() {
        bail!("CreateDIBSection returned no pixel buffer");
    }

    unsafe { std::ptr::write_bytes(bits as *mut u8, 0, len) };
    {
        let _selected = Selection::select(memory.0, dib.0);
        draw(memory.0)?;
        unsafe {
            let _ = GdiFlush();
        }
    }

    Ok(unsafe { std::slice::from_raw_parts(bits as *const u8, len) }.to_vec())
}

/// Top-down 32bpp BGRA copy of `bitmap`.
fn bitmap_bits(bitmap: HBITMAP) -> anyhow::Result<(i32, i32, Vec<u8>)> {
    let (width, height) = bitmap_size(bitmap)?;
    let height = height.abs();
    if width <= 0 || height <= 0 {
        bail!("bitmap is empty ({width}x{height})");
    }

    let screen = ScreenDc::acquire()?;
    let mut info = top_down_info(width, height);
    let mut pixels = vec![0u8; width as usize * height as usize * 4];
    let lines = unsafe {
        GetDIBits(
            screen.0,
            bitmap,
            0,
            height as u32,
            Some(pixels.as_mut_ptr() as *mut _),
            &mut info,
            DIB_RGB_COLORS,
        )
    };
    if lines == 0 {
        bail!("GetDIBits failed");
    }
    Ok((width, height, pixels))
}

pub fn rasterize_hicon(icon: HICON) -> anyhow::Result<RgbaImage> {
    let mut info = ICONINFO::default();
    unsafe { GetIconInfo(icon, &mut info) }.context("GetIconInfo failed")?;
    let _color = GdiObject(info.hbmColor.into());
    let _mask = GdiObject(info.hbmMask.into());

    let (width, height) = if !info.hbmColor.is_invalid() {
        bitmap_size(info.hbmColor)?
    } else {
        // Monochrome icons stack AND and XOR masks vertically.
        let (w, h) = bitmap_size(info.hbmMask)?;
        (w, h / 2)
    };

    let pixels = draw_on_canvas(width, height, |dc| {
        unsafe { DrawIconEx(dc, 0, 0, icon, width, height, 0, None, DI_NORMAL) }
            .context("DrawIconEx failed")
    })?;

    // AND mask rows come first, so the top `height` rows cover the icon.
    let len = pixels.len();
    let mask = match bitmap_bits(info.hbmMask) {
        Ok((mask_width, _, mut bits)) if mask_width == width && bits.len() >= len => {
            bits.truncate(len);
            Some(bits)
        }
        _ => None,
    };
    canvas_from_bgra_masked(width as u32, height as u32, pixels, mask.as_deref())
}

pub fn rasterize_hbitmap(bitmap: HBITMAP) -> anyhow::Result<RgbaImage> {
    let (width, height, pixels) = bitmap_bits(bitmap)?;
    canvas_from_bgra(width as u32, height as u32, pixels)
}
