use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, rgba8_len};
use crate::foundation::error::{CoifError, CoifResult};

/// Canonical anchor metadata of a hairstyle asset.
///
/// `anchor` is the asset pixel meant to sit on the head's vertical anchor (top of forehead).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetAnchor {
    /// Anchor point in asset pixels.
    pub anchor: Point,
    /// Asset width in pixels.
    pub native_width: f64,
    /// Asset height in pixels.
    pub native_height: f64,
}

impl AssetAnchor {
    /// Anchor at the centre of a `width x height` asset.
    pub fn centered(width: f64, height: f64) -> Self {
        Self::from_fraction([0.5, 0.5], width, height)
    }

    /// Anchor at `[u, v]` fractions of the asset's width and height.
    pub fn from_fraction(uv: [f64; 2], width: f64, height: f64) -> Self {
        Self {
            anchor: Point::new(uv[0] * width, uv[1] * height),
            native_width: width,
            native_height: height,
        }
    }
}

/// Where an asset's alpha came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskSource {
    /// The source image carried an alpha channel.
    Alpha,
    /// No alpha in the source; a background-colour heuristic produced the mask.
    Inferred,
    /// Rasterized from a vector source.
    Vector,
}

/// Deepest half-resolution level kept per asset.
const MAX_MIP_LEVELS: usize = 12;

/// One level of an asset's half-resolution chain, premultiplied RGBA8.
#[derive(Debug)]
pub(crate) struct MipLevel {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Vec<u8>,
}

/// A prepared hairstyle image: premultiplied RGBA8 plus anchor metadata. Immutable once built.
///
/// Downsampled copies for small on-screen sizes are built on first use and shared by clones.
#[derive(Clone, Debug)]
pub struct HairstyleAsset {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Anchor metadata.
    pub anchor: AssetAnchor,
    /// Origin of the alpha channel.
    pub mask: MaskSource,
    mips: Arc<OnceLock<Vec<MipLevel>>>,
}

impl HairstyleAsset {
    /// Wrap premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
        anchor: AssetAnchor,
        mask: MaskSource,
    ) -> CoifResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoifError::asset("hairstyle asset has zero area"));
        }
        let expected = rgba8_len(width, height)?;
        if rgba8_premul.len() != expected {
            return Err(CoifError::asset(format!(
                "hairstyle asset has {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            anchor,
            mask,
            mips: Arc::new(OnceLock::new()),
        })
    }

    /// Premultiply straight RGBA8 pixels and wrap them.
    pub fn from_straight_rgba8(
        width: u32,
        height: u32,
        mut rgba8: Vec<u8>,
        anchor: AssetAnchor,
    ) -> CoifResult<Self> {
        crate::assets::decode::premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul_rgba8(width, height, rgba8, anchor, MaskSource::Alpha)
    }

    /// A single-colour asset anchored at its centre.
    pub fn solid(width: u32, height: u32, straight_rgba: [u8; 4]) -> CoifResult<Self> {
        let n = (width as usize) * (height as usize);
        Self::from_straight_rgba8(
            width,
            height,
            straight_rgba.repeat(n),
            AssetAnchor::centered(f64::from(width), f64::from(height)),
        )
    }

    /// Replace the anchor point, keeping the native size.
    pub fn with_anchor_point(mut self, anchor: Point) -> Self {
        self.anchor.anchor = anchor;
        self
    }

    /// Level `level` of the half-resolution chain (level 1 is half size), clamped to the
    /// deepest level available. `None` for level 0 and for 1x1 assets.
    pub(crate) fn mip(&self, level: usize) -> Option<&MipLevel> {
        if level == 0 {
            return None;
        }
        let levels = self.mips.get_or_init(|| {
            let levels = build_mips(self.width, self.height, &self.rgba8_premul);
            tracing::debug!(
                width = self.width,
                height = self.height,
                levels = levels.len(),
                "built hairstyle mip chain"
            );
            levels
        });
        levels.get(level.min(levels.len()).checked_sub(1)?)
    }
}

fn build_mips(width: u32, height: u32, rgba8_premul: &[u8]) -> Vec<MipLevel> {
    let mut levels: Vec<MipLevel> = Vec::new();
    let (mut w, mut h) = (width, height);
    while (w > 1 || h > 1) && levels.len() < MAX_MIP_LEVELS {
        let prev = match levels.last() {
            Some(l) => image::RgbaImage::from_raw(l.width, l.height, l.rgba8_premul.clone()),
            None => image::RgbaImage::from_raw(w, h, rgba8_premul.to_vec()),
        };
        let Some(prev) = prev else {
            break;
        };
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        let small = image::imageops::resize(&prev, w, h, image::imageops::FilterType::Triangle);
        levels.push(MipLevel {
            width: w,
            height: h,
            rgba8_premul: small.into_raw(),
        });
    }
    levels
}

#[cfg(test)]
#[path = "../../tests/unit/assets/asset.rs"]
mod tests;
