//! Engine configuration.
//!
//! Every tuning constant of the engine lives here: landmark indices, the face-width to asset-width
//! ratio, numeric guard rails, session bounds and asset loading policy. All sections default to
//! values tuned for the 468/478-point MediaPipe face mesh, so an empty JSON object is a valid
//! configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CoifError, CoifResult};

/// Top-level engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Landmark indices and pose guard rails.
    pub pose: PoseConfig,
    /// Asset scaling policy and placement guard rails.
    pub placement: PlacementConfig,
    /// Blending and encoding options.
    pub composite: CompositeConfig,
    /// Session bounds.
    pub session: SessionConfig,
    /// Hairstyle asset loading.
    pub assets: AssetConfig,
}

/// Landmark indices used by the pose estimator, plus sanity bounds on the derived face width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Landmarks spanning the face at its widest stable point (left/right temple).
    pub face_width_pair: [usize; 2],
    /// Horizontal reference pair for roll (outer eye corners).
    pub roll_pair: [usize; 2],
    /// Landmarks averaged into the vertical placement anchor (hairline/forehead top).
    pub anchor_indices: Vec<usize>,
    /// Nose tip, used for yaw/pitch asymmetry.
    pub nose_tip: usize,
    /// Point between the eyebrows, used for pitch.
    pub brow_center: usize,
    /// Chin, used for pitch.
    pub chin: usize,
    /// Top of forehead, used for depth-based pitch.
    pub forehead_top: usize,
    /// Ratio `|brow - nose| / |nose - chin|` of a face looking straight at the camera.
    pub neutral_pitch_ratio: f64,
    /// Yaw and pitch are clamped to `±max_abs_turn_deg`.
    pub max_abs_turn_deg: f64,
    /// Face widths below this many pixels are treated as degenerate.
    pub min_face_width_px: f64,
    /// Face widths above this many pixels are treated as degenerate.
    pub max_face_width_px: f64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            face_width_pair: [234, 454],
            roll_pair: [33, 263],
            anchor_indices: vec![10],
            nose_tip: 1,
            brow_center: 8,
            chin: 152,
            forehead_top: 10,
            neutral_pitch_ratio: 0.75,
            max_abs_turn_deg: 60.0,
            min_face_width_px: 8.0,
            max_face_width_px: 16_384.0,
        }
    }
}

impl PoseConfig {
    /// Smallest landmark set length that covers every configured index.
    pub fn required_landmarks(&self) -> usize {
        self.indices().max().map_or(0, |m| m + 1)
    }

    fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.face_width_pair
            .iter()
            .chain(self.roll_pair.iter())
            .chain(self.anchor_indices.iter())
            .copied()
            .chain([self.nose_tip, self.brow_center, self.chin, self.forehead_top])
    }
}

/// How a pose becomes an asset scale and anchor position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Asset width in pixels is `face_width * width_ratio` before the user scale.
    pub width_ratio: f64,
    /// Lower bound on the pose-derived scale; below it the frame passes through.
    pub min_base_scale: f64,
    /// Upper bound on the pose-derived scale; above it the frame passes through.
    pub max_base_scale: f64,
    /// Horizontal anchor shift per unit `sin(yaw)`, in face widths.
    pub yaw_anchor_shift: f64,
    /// Vertical anchor shift per unit `sin(pitch)`, in face widths.
    pub pitch_anchor_shift: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            width_ratio: 2.0,
            min_base_scale: 0.005,
            max_base_scale: 64.0,
            yaw_anchor_shift: 0.15,
            pitch_anchor_shift: 0.1,
        }
    }
}

/// Compositing and output encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Blend footprint rows on the rayon pool.
    pub parallel: bool,
    /// Strength in `[0, 1]` of pulling the hairstyle's luminance toward the underlying frame.
    pub luminance_match: f32,
    /// JPEG quality for encoded output frames.
    pub jpeg_quality: u8,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            luminance_match: 0.0,
            jpeg_quality: 85,
        }
    }
}

/// Bounds for the in-memory session store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Least-recently-used sessions are evicted past this count.
    pub max_sessions: usize,
    /// Sessions idle for longer than this are removed by the sweeper.
    pub idle_ttl_secs: u64,
    /// How often the background sweeper runs.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1024,
            idle_ttl_secs: 30 * 60,
            sweep_interval_secs: 60,
        }
    }
}

impl SessionConfig {
    /// Idle time-to-live as a [`Duration`].
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    /// Sweep period as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Hairstyle asset lookup and preparation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory asset references are resolved against.
    pub root: PathBuf,
    /// Directories (relative to `root`) searched by file name when a reference is not found.
    pub fallback_dirs: Vec<String>,
    /// Anchor used when an asset has no sidecar, as fractions of its width and height.
    pub default_anchor: [f64; 2],
    /// RGB distance from the inferred background colour below which a pixel is transparent.
    pub mask_tolerance: f32,
    /// Width of the linear ramp from transparent to opaque past `mask_tolerance`.
    pub mask_softness: f32,
    /// Soften the alpha edge with a 3x3 Gaussian after loading.
    pub feather_alpha: bool,
    /// Longest side of a rasterized SVG asset.
    pub svg_max_dim: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            fallback_dirs: vec!["custom".to_string()],
            default_anchor: [0.5, 0.5],
            mask_tolerance: 40.0,
            mask_softness: 24.0,
            feather_alpha: true,
            svg_max_dim: 1024,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CoifResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CoifError::serde(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> CoifResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CoifResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CoifError::validation(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> CoifResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoifError::serde(e.to_string()))
    }

    /// Reject values that would make the engine produce garbage.
    pub fn validate(&self) -> CoifResult<()> {
        let pose = &self.pose;
        if pose.face_width_pair[0] == pose.face_width_pair[1] {
            return Err(CoifError::validation(
                "pose.face_width_pair must name two distinct landmarks",
            ));
        }
        if pose.roll_pair[0] == pose.roll_pair[1] {
            return Err(CoifError::validation(
                "pose.roll_pair must name two distinct landmarks",
            ));
        }
        if pose.anchor_indices.is_empty() {
            return Err(CoifError::validation(
                "pose.anchor_indices must not be empty",
            ));
        }
        if !(pose.neutral_pitch_ratio.is_finite() && pose.neutral_pitch_ratio > 0.0) {
            return Err(CoifError::validation(
                "pose.neutral_pitch_ratio must be finite and > 0",
            ));
        }
        if !(0.0..=90.0).contains(&pose.max_abs_turn_deg) {
            return Err(CoifError::validation(
                "pose.max_abs_turn_deg must be within [0, 90]",
            ));
        }
        check_range(
            "pose face width",
            pose.min_face_width_px,
            pose.max_face_width_px,
        )?;

        let placement = &self.placement;
        if !(placement.width_ratio.is_finite() && placement.width_ratio > 0.0) {
            return Err(CoifError::validation(
                "placement.width_ratio must be finite and > 0",
            ));
        }
        check_range(
            "placement base scale",
            placement.min_base_scale,
            placement.max_base_scale,
        )?;
        if !placement.yaw_anchor_shift.is_finite() || !placement.pitch_anchor_shift.is_finite() {
            return Err(CoifError::validation(
                "placement anchor shifts must be finite",
            ));
        }

        if !(0.0..=1.0).contains(&self.composite.luminance_match) {
            return Err(CoifError::validation(
                "composite.luminance_match must be within [0, 1]",
            ));
        }
        if !(1..=100).contains(&self.composite.jpeg_quality) {
            return Err(CoifError::validation(
                "composite.jpeg_quality must be within [1, 100]",
            ));
        }

        if self.session.max_sessions == 0 {
            return Err(CoifError::validation(
                "session.max_sessions must be > 0",
            ));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(CoifError::validation(
                "session.sweep_interval_secs must be > 0",
            ));
        }

        let assets = &self.assets;
        if !assets.default_anchor.iter().all(|v| v.is_finite()) {
            return Err(CoifError::validation(
                "assets.default_anchor must be finite",
            ));
        }
        if !(assets.mask_tolerance >= 0.0 && assets.mask_softness >= 0.0) {
            return Err(CoifError::validation(
                "assets mask tolerance and softness must be >= 0",
            ));
        }
        if assets.svg_max_dim == 0 {
            return Err(CoifError::validation("assets.svg_max_dim must be > 0"));
        }
        Ok(())
    }
}

fn check_range(what: &str, min: f64, max: f64) -> CoifResult<()> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
        return Err(CoifError::validation(format!(
            "{what} bounds must satisfy 0 < min < max (got {min}..{max})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
