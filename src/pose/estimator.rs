use serde::Serialize;

use crate::config::PoseConfig;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{CoifError, CoifResult};
use crate::foundation::math::dist;
use crate::landmarks::set::{LandmarkSet, mean_point};

/// Orientation, scale and anchor summary of the primary face in one frame.
///
/// Angles are radians. `roll` and `yaw` are positive for a counter-clockwise tilt and a turn toward
/// the frame's right as seen on screen; `pitch` is positive when the head nods down.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeadPose {
    /// Left/right head turn.
    pub yaw: f64,
    /// Up/down nod.
    pub pitch: f64,
    /// In-plane tilt.
    pub roll: f64,
    /// Mean of all landmarks.
    pub center: Point,
    /// Distance between the face-width landmarks, in pixels.
    pub face_width: f64,
    /// Default placement origin near the hairline, in pixels.
    pub anchor: Point,
}

/// Derives a [`HeadPose`] from landmarks. Pure and deterministic.
#[derive(Clone, Debug, Default)]
pub struct PoseEstimator {
    cfg: PoseConfig,
}

impl PoseEstimator {
    /// Build an estimator for the landmark layout described by `cfg`.
    pub fn new(cfg: PoseConfig) -> Self {
        Self { cfg }
    }

    /// The landmark layout in use.
    pub fn config(&self) -> &PoseConfig {
        &self.cfg
    }

    /// Estimate the head pose.
    ///
    /// Returns `Ok(None)` for an empty set and for degenerate geometry (non-finite coordinates,
    /// face width outside the configured bounds). A non-empty set too short for the configured
    /// indices breaks the detector contract and is an error.
    pub fn estimate(&self, landmarks: &LandmarkSet) -> CoifResult<Option<HeadPose>> {
        if landmarks.is_empty() {
            return Ok(None);
        }
        let required = self.cfg.required_landmarks();
        if landmarks.len() < required {
            return Err(CoifError::detection(format!(
                "landmark set has {} points, expected at least {required}",
                landmarks.len()
            )));
        }
        if !landmarks.is_finite() {
            tracing::debug!("non-finite landmark coordinates; treating as no pose");
            return Ok(None);
        }

        let pt = |i: usize| landmarks.get(i).map(|l| l.point()).unwrap_or_default();
        let depth = |i: usize| landmarks.get(i).and_then(|l| l.z);

        let [wa, wb] = self.cfg.face_width_pair;
        let face_width = dist(pt(wa), pt(wb));
        if !(self.cfg.min_face_width_px..=self.cfg.max_face_width_px).contains(&face_width) {
            tracing::debug!(face_width, "face width outside sane bounds; treating as no pose");
            return Ok(None);
        }

        let [ra, rb] = self.cfg.roll_pair;
        let eye_axis = rightward(pt(rb) - pt(ra));
        if eye_axis.hypot() < 1e-9 {
            tracing::debug!("coincident roll landmarks; treating as no pose");
            return Ok(None);
        }
        // y grows downward, so a counter-clockwise tilt has a negative dy.
        let roll = (-eye_axis.y).atan2(eye_axis.x);

        let (left, right) = ordered_pair(pt(wa), pt(wb), depth(wa), depth(wb));
        let across = (right.0 - left.0) / face_width;
        let down = Vec2::new(-across.y, across.x);

        let max_turn = self.cfg.max_abs_turn_deg.to_radians();
        let yaw = match (left.1, right.1) {
            (Some(zl), Some(zr)) => (zr - zl).atan2(face_width),
            _ => {
                let mid = left.0.midpoint(right.0);
                let offset = (pt(self.cfg.nose_tip) - mid).dot(across);
                (2.0 * offset / face_width).clamp(-1.0, 1.0).asin()
            }
        }
        .clamp(-max_turn, max_turn);

        let pitch = match (depth(self.cfg.forehead_top), depth(self.cfg.chin)) {
            (Some(zf), Some(zc)) => {
                let span = (pt(self.cfg.chin) - pt(self.cfg.forehead_top)).dot(down);
                (zc - zf).atan2(span.max(1e-9))
            }
            _ => {
                let nose = pt(self.cfg.nose_tip);
                let upper = (nose - pt(self.cfg.brow_center)).dot(down);
                let lower = (pt(self.cfg.chin) - nose).dot(down);
                if lower <= 1e-9 {
                    0.0
                } else {
                    let r = upper / lower;
                    let n = self.cfg.neutral_pitch_ratio;
                    ((r - n) / (r + n)).clamp(-1.0, 1.0).asin()
                }
            }
        }
        .clamp(-max_turn, max_turn);

        let anchor = mean_point(self.cfg.anchor_indices.iter().map(|&i| pt(i)));
        let center = landmarks.centroid();
        let (Some(anchor), Some(center)) = (anchor, center) else {
            return Ok(None);
        };

        let pose = HeadPose {
            yaw,
            pitch,
            roll,
            center,
            face_width,
            anchor,
        };
        if !pose.is_finite() {
            tracing::debug!(?pose, "non-finite pose; treating as no pose");
            return Ok(None);
        }
        Ok(Some(pose))
    }
}

impl HeadPose {
    /// Whether every field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.yaw,
            self.pitch,
            self.roll,
            self.center.x,
            self.center.y,
            self.face_width,
            self.anchor.x,
            self.anchor.y,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Flip `v` so it points toward +x; a mirrored camera must not turn the asset upside down.
fn rightward(v: Vec2) -> Vec2 {
    if v.x < 0.0 { -v } else { v }
}

type Located = (Point, Option<f64>);

fn ordered_pair(a: Point, b: Point, za: Option<f64>, zb: Option<f64>) -> (Located, Located) {
    if b.x < a.x {
        ((b, zb), (a, za))
    } else {
        ((a, za), (b, zb))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pose/estimator.rs"]
mod tests;
