use crate::assets::asset::AssetAnchor;
use crate::config::PlacementConfig;
use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::placement::adjustment::Adjustment;
use crate::pose::estimator::HeadPose;

/// Where and how a hairstyle asset lands in the frame.
///
/// `affine` maps asset pixel coordinates to frame pixel coordinates. It is built as
/// `T(target) * R(rotation) * S(scale) * T(-asset_anchor)`, so scale and rotation pivot on the
/// asset anchor, which ends up exactly on `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Asset-to-frame transform.
    pub affine: Affine,
    /// Pose-derived scale, before the user multiplier.
    pub base_scale: f64,
    /// Total uniform scale.
    pub scale: f64,
    /// Total rotation in radians, clockwise on screen.
    pub rotation_rad: f64,
    /// Frame position of the asset anchor.
    pub target: Point,
}

impl Placement {
    /// Total rotation in degrees, clockwise on screen.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_rad.to_degrees()
    }

    /// Map an asset pixel coordinate into the frame.
    pub fn map(&self, p: Point) -> Point {
        self.affine * p
    }

    /// Bounding box in the frame of a `width x height` asset placed by this transform.
    pub fn footprint(&self, width: f64, height: f64) -> Rect {
        self.affine
            .transform_rect_bbox(Rect::new(0.0, 0.0, width, height))
    }
}

/// Turns a head pose, asset anchor metadata and user adjustment into a [`Placement`].
#[derive(Clone, Debug, Default)]
pub struct PlacementPlanner {
    cfg: PlacementConfig,
}

impl PlacementPlanner {
    /// Build a planner with the given scaling policy.
    pub fn new(cfg: PlacementConfig) -> Self {
        Self { cfg }
    }

    /// The scaling policy in use.
    pub fn config(&self) -> &PlacementConfig {
        &self.cfg
    }

    /// Placement with no user adjustment.
    pub fn baseline(&self, pose: Option<&HeadPose>, anchor: &AssetAnchor) -> Option<Placement> {
        self.plan(pose, anchor, &Adjustment::IDENTITY)
    }

    /// Plan the asset transform, or `None` when there is no pose or the result would be
    /// degenerate (pose-derived scale outside its bounds, singular or non-finite transform).
    pub fn plan(
        &self,
        pose: Option<&HeadPose>,
        anchor: &AssetAnchor,
        adjustment: &Adjustment,
    ) -> Option<Placement> {
        let pose = pose?;
        if !(anchor.native_width.is_finite() && anchor.native_width > 0.0) {
            tracing::debug!(native_width = anchor.native_width, "asset has no usable width");
            return None;
        }

        let base_scale = pose.face_width * self.cfg.width_ratio / anchor.native_width;
        if !(self.cfg.min_base_scale..=self.cfg.max_base_scale).contains(&base_scale) {
            tracing::debug!(base_scale, "pose-derived scale outside sane bounds");
            return None;
        }
        let scale = base_scale * adjustment.scale;
        let rotation_rad = -pose.roll + adjustment.rotation_deg.to_radians();

        // Head-aligned axes: `across` runs temple to temple, `down` runs brow to chin.
        let (s, c) = pose.roll.sin_cos();
        let across = Vec2::new(c, -s);
        let down = Vec2::new(s, c);
        let turn = across * (pose.yaw.sin() * self.cfg.yaw_anchor_shift * pose.face_width)
            + down * (pose.pitch.sin() * self.cfg.pitch_anchor_shift * pose.face_width);
        let target =
            pose.anchor + turn + Vec2::new(adjustment.offset_x, adjustment.offset_y);

        let affine = Affine::translate(target.to_vec2())
            * Affine::rotate(rotation_rad)
            * Affine::scale(scale)
            * Affine::translate(-anchor.anchor.to_vec2());

        let det = affine.determinant();
        if !affine.as_coeffs().iter().all(|v| v.is_finite()) || det.abs() < 1e-12 {
            tracing::debug!(det, "degenerate placement transform");
            return None;
        }

        Some(Placement {
            affine,
            base_scale,
            scale,
            rotation_rad,
            target,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/planner.rs"]
mod tests;
