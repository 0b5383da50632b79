use serde::{Deserialize, Serialize};

use crate::foundation::core::Point;

/// One facial keypoint.
///
/// Inside a [`LandmarkSet`] coordinates are always pixels of the current frame. Depth, when the
/// detector provides it, uses the same pixel scale as `x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Landmark {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
    /// Optional relative depth (smaller is closer to the camera).
    pub z: Option<f64>,
}

impl Landmark {
    /// A 2D landmark.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// A landmark with depth.
    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// The 2D position.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_none_or(f64::is_finite)
    }
}

impl<'de> Deserialize<'de> for Landmark {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Obj {
                x: f64,
                y: f64,
                #[serde(default)]
                z: Option<f64>,
            },
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Obj { x, y, z } => Ok(Self { x, y, z }),
            Repr::Arr(v) => match v.as_slice() {
                [x, y] => Ok(Self::new(*x, *y)),
                [x, y, z] => Ok(Self::with_depth(*x, *y, *z)),
                _ => Err(serde::de::Error::custom(
                    "landmark array must be [x, y] or [x, y, z]",
                )),
            },
        }
    }
}

/// Coordinate convention of a detector's raw output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// `x` and `y` in `[0, 1]` of the frame width/height; `z` scaled like `x`.
    #[default]
    Normalized,
    /// Already in frame pixels.
    Pixel,
}

/// Landmarks of the primary face in one frame, in pixel space.
///
/// Either empty (no face) or complete, with index `i` naming the same anatomical point in every
/// frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// The "no face" set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap landmarks that are already in frame pixels.
    pub fn from_pixels(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Convert normalized detector output into pixels of a `width x height` frame.
    pub fn from_normalized(points: Vec<Landmark>, width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        Self {
            points: points
                .into_iter()
                .map(|p| Landmark {
                    x: p.x * w,
                    y: p.y * h,
                    z: p.z.map(|z| z * w),
                })
                .collect(),
        }
    }

    /// Bring raw detector output into the canonical pixel space.
    pub fn ingest(points: Vec<Landmark>, space: CoordinateSpace, width: u32, height: u32) -> Self {
        match space {
            CoordinateSpace::Normalized => Self::from_normalized(points, width, height),
            CoordinateSpace::Pixel => Self::from_pixels(points),
        }
    }

    /// Whether no face was found.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of landmarks.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// All landmarks in index order.
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Landmark `i`, if present.
    pub fn get(&self, i: usize) -> Option<&Landmark> {
        self.points.get(i)
    }

    /// Whether every landmark carries depth.
    pub fn has_depth(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.z.is_some())
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Landmark::is_finite)
    }

    /// Mean position of all landmarks.
    pub fn centroid(&self) -> Option<Point> {
        mean_point(self.points.iter().map(Landmark::point))
    }

    /// Uniformly zoom every coordinate (depth included) about the origin.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Landmark {
                    x: p.x * factor,
                    y: p.y * factor,
                    z: p.z.map(|z| z * factor),
                })
                .collect(),
        }
    }
}

pub(crate) fn mean_point(points: impl Iterator<Item = Point>) -> Option<Point> {
    let mut n = 0usize;
    let mut sx = 0.0;
    let mut sy = 0.0;
    for p in points {
        sx += p.x;
        sy += p.y;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(Point::new(sx / n as f64, sy / n as f64))
}

#[cfg(test)]
#[path = "../../tests/unit/landmarks/set.rs"]
mod tests;
