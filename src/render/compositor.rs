use std::ops::Range;

use rayon::prelude::*;

use crate::assets::asset::HairstyleAsset;
use crate::config::CompositeConfig;
use crate::effects::composite::{
    PremulRgba8, over_straight_in_place, scale_color, unpremultiply,
};
use crate::foundation::core::{Affine, Frame, Point, Rect, rgba8_len};
use crate::foundation::error::{CoifError, CoifResult};
use crate::foundation::math::luma;
use crate::placement::planner::Placement;

/// Below this scale bilinear sampling reads from a downsampled level of the asset.
const MIP_BELOW: f64 = 0.5;

/// Warps a hairstyle asset through a [`Placement`] and blends it onto a frame.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    cfg: CompositeConfig,
}

/// Composite with default settings.
pub fn composite_onto(
    frame: &mut Frame,
    asset: &HairstyleAsset,
    placement: Option<&Placement>,
) -> CoifResult<()> {
    Compositor::default().composite(frame, asset, placement)
}

impl Compositor {
    /// Compositor with the given blending options.
    pub fn new(cfg: CompositeConfig) -> Self {
        Self { cfg }
    }

    /// Blending options in use.
    pub fn config(&self) -> &CompositeConfig {
        &self.cfg
    }

    /// Blend `asset` onto `frame` in place. With no placement the frame is left untouched.
    ///
    /// Only pixels inside the transformed asset's bounding box (clipped to the frame) are
    /// visited; each one is inverse-mapped into asset space and sampled bilinearly.
    pub fn composite(
        &self,
        frame: &mut Frame,
        asset: &HairstyleAsset,
        placement: Option<&Placement>,
    ) -> CoifResult<()> {
        let Some(placement) = placement else {
            return Ok(());
        };
        let expected = rgba8_len(frame.width, frame.height)?;
        if frame.data.len() != expected {
            return Err(CoifError::validation(format!(
                "frame buffer has {} bytes, expected {expected}",
                frame.data.len()
            )));
        }
        if frame.is_empty() {
            return Ok(());
        }

        let (src, affine) = match asset.mip(mip_level(placement.scale.abs())) {
            Some(mip) => (
                Source::new(mip.width, mip.height, &mip.rgba8_premul),
                placement.affine
                    * Affine::scale_non_uniform(
                        f64::from(asset.width) / f64::from(mip.width),
                        f64::from(asset.height) / f64::from(mip.height),
                    ),
            ),
            None => (
                Source::new(asset.width, asset.height, &asset.rgba8_premul),
                placement.affine,
            ),
        };

        let fp = affine
            .transform_rect_bbox(Rect::new(0.0, 0.0, src.width as f64, src.height as f64))
            .intersect(frame.bounds());
        if !(fp.width() > 0.0 && fp.height() > 0.0) {
            return Ok(());
        }
        let xs = (fp.x0.floor() as usize)..(fp.x1.ceil() as usize).min(frame.width as usize);
        let ys = (fp.y0.floor() as usize)..(fp.y1.ceil() as usize).min(frame.height as usize);

        let inv = affine.inverse();
        let gain = self.luminance_gain(frame, &src, inv, &xs, &ys);

        let row_bytes = frame.width as usize * 4;
        let rows = &mut frame.data[ys.start * row_bytes..ys.end * row_bytes];
        let blend_row = |(i, row): (usize, &mut [u8])| {
            let y = (ys.start + i) as f64 + 0.5;
            for x in xs.clone() {
                let p = inv * Point::new(x as f64 + 0.5, y);
                let s = src.sample(p);
                if s[3] == 0 {
                    continue;
                }
                over_straight_in_place(&mut row[x * 4..x * 4 + 4], scale_color(s, gain));
            }
        };
        if self.cfg.parallel {
            rows.par_chunks_mut(row_bytes)
                .enumerate()
                .for_each(blend_row);
        } else {
            rows.chunks_mut(row_bytes).enumerate().for_each(blend_row);
        }
        Ok(())
    }

    /// Colour gain pulling the asset's mean luma toward the frame's mean luma under it.
    fn luminance_gain(
        &self,
        frame: &Frame,
        src: &Source<'_>,
        inv: Affine,
        xs: &Range<usize>,
        ys: &Range<usize>,
    ) -> f32 {
        let strength = f64::from(self.cfg.luminance_match.clamp(0.0, 1.0));
        if strength <= 0.0 {
            return 1.0;
        }

        let (mut base, mut hair, mut weight) = (0f64, 0f64, 0f64);
        for y in ys.clone() {
            for x in xs.clone() {
                let s = src.sample(inv * Point::new(x as f64 + 0.5, y as f64 + 0.5));
                if s[3] == 0 {
                    continue;
                }
                let a = f64::from(s[3]) / 255.0;
                let h = unpremultiply(s);
                let i = (y * frame.width as usize + x) * 4;
                let b = &frame.data[i..i + 3];
                base += a * f64::from(luma(b[0], b[1], b[2]));
                hair += a * f64::from(luma(h[0], h[1], h[2]));
                weight += a;
            }
        }
        if weight <= 0.0 || hair <= 1e-3 {
            return 1.0;
        }
        let ratio = base / hair;
        let gain = 1.0 + strength * (ratio - 1.0);
        tracing::trace!(ratio, gain, "luminance match");
        gain as f32
    }
}

/// Mip level that keeps the effective sampling scale in `[0.5, 1)`.
fn mip_level(scale: f64) -> usize {
    if !(scale > 0.0 && scale < MIP_BELOW) {
        return 0;
    }
    (1.0 / scale).log2().floor() as usize
}

/// Premultiplied RGBA8 image sampled with pixel centres at half-integer coordinates.
struct Source<'a> {
    width: usize,
    height: usize,
    px: &'a [u8],
}

impl<'a> Source<'a> {
    fn new(width: u32, height: u32, px: &'a [u8]) -> Self {
        Self {
            width: width as usize,
            height: height as usize,
            px,
        }
    }

    fn fetch(&self, x: i64, y: i64) -> [f32; 4] {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return [0.0; 4];
        }
        let i = (y as usize * self.width + x as usize) * 4;
        [
            f32::from(self.px[i]),
            f32::from(self.px[i + 1]),
            f32::from(self.px[i + 2]),
            f32::from(self.px[i + 3]),
        ]
    }

    /// Bilinear sample; everything outside the image is transparent.
    fn sample(&self, p: Point) -> PremulRgba8 {
        let (w, h) = (self.width as f64, self.height as f64);
        if !(p.x > -0.5 && p.y > -0.5 && p.x < w + 0.5 && p.y < h + 0.5) {
            return [0; 4];
        }
        let (x, y) = (p.x - 0.5, p.y - 0.5);
        let (fx0, fy0) = (x.floor(), y.floor());
        let (tx, ty) = ((x - fx0) as f32, (y - fy0) as f32);
        let (x0, y0) = (fx0 as i64, fy0 as i64);

        let p00 = self.fetch(x0, y0);
        let p10 = self.fetch(x0 + 1, y0);
        let p01 = self.fetch(x0, y0 + 1);
        let p11 = self.fetch(x0 + 1, y0 + 1);

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = p00[c] + (p10[c] - p00[c]) * tx;
            let bottom = p01[c] + (p11[c] - p01[c]) * tx;
            out[c] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
        }
        for c in 0..3 {
            out[c] = out[c].min(out[3]);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
