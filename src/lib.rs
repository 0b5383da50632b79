//! coif overlays a 2D hairstyle image onto live video frames so it tracks the wearer's head.
//!
//! Per frame, facial landmarks from an external detector are turned into a [`HeadPose`], the
//! pose plus the session's [`Adjustment`] become a [`Placement`] (one affine transform), and the
//! selected [`HairstyleAsset`] is warped and alpha-blended onto the frame:
//!
//! - Build a [`FramePipeline`] from an [`EngineConfig`], a [`LandmarkDetector`] and an
//!   [`AssetProvider`]
//! - Drive sessions through [`FramePipeline::select_asset`] and [`FramePipeline::set_adjustment`]
//! - Feed frames to [`FramePipeline::process_frame`] or [`FramePipeline::process_encoded`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod config;
mod effects;
mod foundation;
mod landmarks;
mod placement;
mod pose;
mod render;
mod session;

pub use crate::foundation::core::{Affine, Frame, Point, Rect, Vec2};
pub use crate::foundation::error::{CoifError, CoifResult};

pub use crate::config::{
    AssetConfig, CompositeConfig, EngineConfig, PlacementConfig, PoseConfig, SessionConfig,
};

pub use crate::landmarks::detector::{LandmarkDetector, NoFaceDetector, StaticDetector};
pub use crate::landmarks::set::{CoordinateSpace, Landmark, LandmarkSet};
pub use crate::landmarks::synthetic::SyntheticFace;

pub use crate::pose::estimator::{HeadPose, PoseEstimator};

pub use crate::placement::adjustment::Adjustment;
pub use crate::placement::planner::{Placement, PlacementPlanner};

pub use crate::assets::asset::{AssetAnchor, HairstyleAsset, MaskSource};
pub use crate::assets::decode::{decode_frame, encode_jpeg, encode_png};
pub use crate::assets::store::{AssetProvider, DirAssetProvider, MemoryAssetProvider};

pub use crate::render::compositor::{Compositor, composite_onto};
pub use crate::render::pipeline::{CompositeResult, EncodedResult, FramePipeline};

pub use crate::session::store::{SessionState, SessionStore};
pub use crate::session::sweeper::SessionSweeper;
