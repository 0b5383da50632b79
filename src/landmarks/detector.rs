use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::foundation::core::Frame;
use crate::foundation::error::{CoifError, CoifResult};
use crate::landmarks::set::{CoordinateSpace, Landmark};

/// The external facial landmark detector.
///
/// `detect` returns the landmarks of the primary face in index order, or an empty vector when no
/// face is found. It may block; the pipeline calls it without holding any session lock.
pub trait LandmarkDetector: Send + Sync {
    /// Coordinate convention of the returned landmarks.
    fn coordinate_space(&self) -> CoordinateSpace;

    /// Detect landmarks in `frame`.
    fn detect(&self, frame: &Frame) -> CoifResult<Vec<Landmark>>;
}

/// Detector that never finds a face.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFaceDetector;

impl LandmarkDetector for NoFaceDetector {
    fn coordinate_space(&self) -> CoordinateSpace {
        CoordinateSpace::Pixel
    }

    fn detect(&self, _frame: &Frame) -> CoifResult<Vec<Landmark>> {
        Ok(Vec::new())
    }
}

/// Detector that replays one fixed set of landmarks for every frame.
///
/// Useful for offline runs where landmarks were produced by another process, and for tests.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticDetector {
    space: CoordinateSpace,
    landmarks: Vec<Landmark>,
}

#[derive(Deserialize)]
struct LandmarkFile {
    #[serde(default)]
    space: CoordinateSpace,
    landmarks: Vec<Landmark>,
}

impl StaticDetector {
    /// Replay `landmarks`, interpreted in `space`.
    pub fn new(space: CoordinateSpace, landmarks: Vec<Landmark>) -> Self {
        Self { space, landmarks }
    }

    /// Parse `{"space": "normalized" | "pixel", "landmarks": [[x, y(, z)], ...]}`.
    pub fn from_reader<R: std::io::Read>(r: R) -> CoifResult<Self> {
        let file: LandmarkFile = serde_json::from_reader(r)
            .map_err(|e| CoifError::serde(format!("parse landmark JSON: {e}")))?;
        Ok(Self::new(file.space, file.landmarks))
    }

    /// Load a landmark JSON file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> CoifResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CoifError::detection(format!("open landmark file '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// The replayed landmarks.
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}

impl LandmarkDetector for StaticDetector {
    fn coordinate_space(&self) -> CoordinateSpace {
        self.space
    }

    fn detect(&self, _frame: &Frame) -> CoifResult<Vec<Landmark>> {
        Ok(self.landmarks.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/landmarks/detector.rs"]
mod tests;
