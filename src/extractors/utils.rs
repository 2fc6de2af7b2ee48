// Pixel conversion and PNG/base64 encoding

use anyhow::{anyhow, bail, Context};
use base64::prelude::*;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Converts a top-down BGRA buffer into an RGBA canvas.
///
/// Legacy icons with an all-zero alpha channel become opaque. Buffers that
/// look premultiplied (no channel above its alpha) are unpremultiplied.
pub fn canvas_from_bgra(width: u32, height: u32, pixels: Vec<u8>) -> anyhow::Result<RgbaImage> {
    canvas_from_bgra_masked(width, height, pixels, None)
}

/// Like [`canvas_from_bgra`], but a legacy icon takes its alpha from `mask`,
/// the AND mask rendered as 32bpp BGRA with the same layout as `pixels`.
pub fn canvas_from_bgra_masked(
    width: u32,
    height: u32,
    mut pixels: Vec<u8>,
    mask: Option<&[u8]>,
) -> anyhow::Result<RgbaImage> {
    if width == 0 || height == 0 {
        bail!("icon canvas is empty ({width}x{height})");
    }
    bgra_to_rgba(&mut pixels, mask);
    RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))
}

/// Swaps BGRA to RGBA in place. When no pixel carries alpha, a set bit in
/// `mask` marks the pixel transparent and everything else becomes opaque.
pub fn bgra_to_rgba(pixels: &mut [u8], mask: Option<&[u8]>) {
    let mut all_alpha_zero = true;
    let mut has_partial_alpha = false;
    let mut definitely_straight = false;
    let mut looks_premultiplied = false;

    for px in pixels.chunks_exact(4) {
        let a = px[3];
        if a == 0 {
            continue;
        }
        all_alpha_zero = false;
        if a < 255 {
            has_partial_alpha = true;
            let (b, g, r) = (px[0], px[1], px[2]);
            if r > a || g > a || b > a {
                definitely_straight = true;
            } else if r < a || g < a || b < a {
                looks_premultiplied = true;
            }
        }
    }

    let unpremultiply = looks_premultiplied && !definitely_straight && has_partial_alpha;
    let mask = mask.filter(|m| m.len() == pixels.len());

    for (i, px) in pixels.chunks_exact_mut(4).enumerate() {
        let (mut b, mut g, mut r, mut a) = (px[0], px[1], px[2], px[3]);
        if all_alpha_zero {
            a = match mask {
                Some(m) if m[i * 4] != 0 => 0,
                _ => 255,
            };
        } else if unpremultiply && a > 0 && a < 255 {
            let alpha = a as f32 / 255.0;
            r = (r as f32 / alpha).min(255.0) as u8;
            g = (g as f32 / alpha).min(255.0) as u8;
            b = (b as f32 / alpha).min(255.0) as u8;
        }
        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = a;
    }
}

pub fn encode_png_base64(canvas: &RgbaImage) -> anyhow::Result<String> {
    if canvas.width() == 0 || canvas.height() == 0 {
        bail!("refusing to encode an empty canvas");
    }
    let mut png = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("png encoding failed")?;
    Ok(BASE64_STANDARD.encode(&png))
}
