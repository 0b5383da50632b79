//! Synthetic face landmarks.
//!
//! Produces a complete landmark set whose key points sit where a [`PoseConfig`] expects them, for
//! a face of known width, position, roll and yaw. Used for dry runs of asset placement without a
//! detector, and throughout the tests.

use crate::config::PoseConfig;
use crate::foundation::core::{Point, Vec2};
use crate::landmarks::set::{Landmark, LandmarkSet};

/// Parameters of a synthetic frontal-ish face, in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntheticFace {
    /// Midpoint between the temples.
    pub center: Point,
    /// Temple-to-temple distance of the face seen head-on.
    pub face_width: f64,
    /// Head tilt, positive counter-clockwise on screen (radians).
    pub roll: f64,
    /// Head turn, positive toward the frame's right (radians).
    pub yaw: f64,
    /// Emit depth for every landmark.
    pub depth: bool,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self {
            center: Point::new(320.0, 240.0),
            face_width: 100.0,
            roll: 0.0,
            yaw: 0.0,
            depth: false,
        }
    }
}

// Key point offsets in face widths, relative to `center`, y down.
const EYE_X: f64 = 0.35;
const EYE_Y: f64 = -0.05;
const FOREHEAD_Y: f64 = -0.6;
const BROW_Y: f64 = -0.15;
const NOSE_Y: f64 = 0.1;

impl SyntheticFace {
    /// Landmarks laid out for the indices of `cfg` (at least 468 points).
    pub fn landmarks(&self, cfg: &PoseConfig) -> Vec<Landmark> {
        let n = cfg.required_landmarks().max(468);
        let w = self.face_width;
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let half = 0.5 * w * cos_yaw;

        // Everything not explicitly placed goes on an ellipse around the face.
        let mut local: Vec<(Vec2, f64)> = (0..n)
            .map(|i| {
                let t = std::f64::consts::TAU * (i as f64) / (n as f64);
                (Vec2::new(half * t.cos(), 0.65 * w * t.sin()), 0.0)
            })
            .collect();

        let nose_to_chin = (NOSE_Y - BROW_Y) / cfg.neutral_pitch_ratio;
        let mut put = |i: usize, x: f64, y: f64, z: f64| {
            if let Some(slot) = local.get_mut(i) {
                *slot = (Vec2::new(x, y), z);
            }
        };

        put(cfg.face_width_pair[0], -half, 0.0, -0.5 * w * sin_yaw);
        put(cfg.face_width_pair[1], half, 0.0, 0.5 * w * sin_yaw);
        put(cfg.roll_pair[0], -EYE_X * w * cos_yaw, EYE_Y * w, 0.0);
        put(cfg.roll_pair[1], EYE_X * w * cos_yaw, EYE_Y * w, 0.0);
        put(cfg.brow_center, 0.0, BROW_Y * w, 0.0);
        put(cfg.forehead_top, 0.0, FOREHEAD_Y * w, 0.0);
        for &i in &cfg.anchor_indices {
            put(i, 0.0, FOREHEAD_Y * w, 0.0);
        }
        put(cfg.chin, 0.0, (NOSE_Y + nose_to_chin) * w, 0.0);
        put(cfg.nose_tip, half * sin_yaw, NOSE_Y * w, -0.3 * w);

        let (s, c) = self.roll.sin_cos();
        local
            .into_iter()
            .map(|(v, z)| {
                // Counter-clockwise on screen with y pointing down.
                let x = self.center.x + v.x * c + v.y * s;
                let y = self.center.y - v.x * s + v.y * c;
                if self.depth {
                    Landmark::with_depth(x, y, z)
                } else {
                    Landmark::new(x, y)
                }
            })
            .collect()
    }

    /// The same landmarks wrapped as a pixel-space [`LandmarkSet`].
    pub fn landmark_set(&self, cfg: &PoseConfig) -> LandmarkSet {
        LandmarkSet::from_pixels(self.landmarks(cfg))
    }

    /// The landmarks normalized to a `width x height` frame.
    pub fn normalized_landmarks(&self, cfg: &PoseConfig, width: u32, height: u32) -> Vec<Landmark> {
        let w = f64::from(width);
        let h = f64::from(height);
        self.landmarks(cfg)
            .into_iter()
            .map(|p| Landmark {
                x: p.x / w,
                y: p.y / h,
                z: p.z.map(|z| z / w),
            })
            .collect()
    }
}
