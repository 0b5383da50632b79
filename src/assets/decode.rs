use std::io::Cursor;

use crate::assets::asset::MaskSource;
use crate::config::AssetConfig;
use crate::foundation::core::Frame;
use crate::foundation::error::{CoifError, CoifResult};
use crate::foundation::math::unit_to_u8;

/// Decode an encoded camera frame (PNG, JPEG, WebP...) into straight RGBA8.
pub fn decode_frame(bytes: &[u8]) -> CoifResult<Frame> {
    if bytes.is_empty() {
        return Err(CoifError::decode("empty frame payload"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CoifError::decode(format!("decode frame: {e}")))?;
    let frame = Frame::from_rgba_image(dyn_img.to_rgba8());
    if frame.is_empty() {
        return Err(CoifError::decode("decoded frame has zero area"));
    }
    Ok(frame)
}

/// Encode a frame as JPEG, dropping alpha.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> CoifResult<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(frame.clone().into_rgba_image()?).to_rgb8();
    let mut buf = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder
        .encode_image(&rgb)
        .map_err(|e| CoifError::Other(anyhow::anyhow!("encode jpeg: {e}")))?;
    Ok(buf)
}

/// Encode a frame as PNG.
pub fn encode_png(frame: &Frame) -> CoifResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(frame.clone().into_rgba_image()?)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CoifError::Other(anyhow::anyhow!("encode png: {e}")))?;
    Ok(buf)
}

/// Decoded raster asset: dimensions, premultiplied RGBA8 and where its alpha came from.
pub(crate) struct DecodedAsset {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Vec<u8>,
    pub(crate) mask: MaskSource,
}

/// Decode a raster hairstyle image. Images without an alpha channel get a mask inferred from
/// their background colour.
pub(crate) fn decode_raster_asset(bytes: &[u8], cfg: &AssetConfig) -> CoifResult<DecodedAsset> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CoifError::asset(format!("decode asset image: {e}")))?;
    let has_alpha = dyn_img.color().has_alpha();
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CoifError::asset("asset image has zero area"));
    }
    let mut rgba8 = rgba.into_raw();

    let mask = if has_alpha {
        MaskSource::Alpha
    } else {
        infer_background_mask(&mut rgba8, width, height, cfg.mask_tolerance, cfg.mask_softness);
        MaskSource::Inferred
    };
    if cfg.feather_alpha {
        feather_alpha(&mut rgba8, width, height);
    }
    premultiply_rgba8_in_place(&mut rgba8);

    Ok(DecodedAsset {
        width,
        height,
        rgba8_premul: rgba8,
        mask,
    })
}

/// Replace alpha using the distance of each pixel from the mean colour of the four corners.
///
/// Pixels within `tolerance` of the background go fully transparent, then alpha ramps linearly to
/// opaque over `softness`.
pub(crate) fn infer_background_mask(
    rgba: &mut [u8],
    width: u32,
    height: u32,
    tolerance: f32,
    softness: f32,
) {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 || rgba.len() < w * h * 4 {
        return;
    }
    let corners = [0, w - 1, (h - 1) * w, (h - 1) * w + (w - 1)];
    let mut bg = [0f32; 3];
    for &c in &corners {
        for (ch, acc) in bg.iter_mut().enumerate() {
            *acc += f32::from(rgba[c * 4 + ch]) / 4.0;
        }
    }

    for px in rgba.chunks_exact_mut(4) {
        let d = (0..3)
            .map(|ch| {
                let v = f32::from(px[ch]) - bg[ch];
                v * v
            })
            .sum::<f32>()
            .sqrt();
        px[3] = if d <= tolerance {
            0
        } else if softness <= 0.0 {
            255
        } else {
            unit_to_u8((d - tolerance) / softness)
        };
    }
}

/// Soften the alpha channel of straight RGBA8 pixels with a 3x3 Gaussian (`[1 2 1]` separable).
pub(crate) fn feather_alpha(rgba: &mut [u8], width: u32, height: u32) {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 || rgba.len() < w * h * 4 {
        return;
    }
    let alpha: Vec<u16> = rgba.chunks_exact(4).map(|px| u16::from(px[3])).collect();

    let mut horiz = vec![0u16; w * h];
    for y in 0..h {
        let row = &alpha[y * w..(y + 1) * w];
        for x in 0..w {
            let l = row[x.saturating_sub(1)];
            let r = row[(x + 1).min(w - 1)];
            horiz[y * w + x] = l + 2 * row[x] + r;
        }
    }

    for y in 0..h {
        let up = y.saturating_sub(1);
        let down = (y + 1).min(h - 1);
        for x in 0..w {
            let sum = u32::from(horiz[up * w + x])
                + 2 * u32::from(horiz[y * w + x])
                + u32::from(horiz[down * w + x]);
            rgba[(y * w + x) * 4 + 3] = ((sum + 8) / 16) as u8;
        }
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
