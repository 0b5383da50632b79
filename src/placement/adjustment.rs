use serde::{Deserialize, Serialize};

/// Manual placement tweaks a user applies on top of the pose-derived baseline.
///
/// Values are deliberately not range-checked here: an extreme scale or rotation just produces an
/// extreme placement. The legacy `x`/`y`/`rotation` keys are accepted when deserializing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustment {
    /// Horizontal shift in frame pixels.
    #[serde(alias = "x")]
    pub offset_x: f64,
    /// Vertical shift in frame pixels (positive is down).
    #[serde(alias = "y")]
    pub offset_y: f64,
    /// Multiplier on the pose-derived scale.
    pub scale: f64,
    /// Extra rotation in degrees, clockwise on screen.
    #[serde(alias = "rotation")]
    pub rotation_deg: f64,
}

impl Default for Adjustment {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Adjustment {
    /// No offset, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
        rotation_deg: 0.0,
    };

    /// Whether this adjustment leaves the baseline untouched.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}
