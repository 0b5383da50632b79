use std::sync::Arc;

use crate::assets::decode::{decode_frame, encode_jpeg};
use crate::assets::store::{AssetProvider, DirAssetProvider, normalize_rel_path};
use crate::config::EngineConfig;
use crate::foundation::core::{Frame, rgba8_len};
use crate::foundation::error::{CoifError, CoifResult};
use crate::landmarks::detector::LandmarkDetector;
use crate::landmarks::set::LandmarkSet;
use crate::placement::adjustment::Adjustment;
use crate::placement::planner::{Placement, PlacementPlanner};
use crate::pose::estimator::{HeadPose, PoseEstimator};
use crate::render::compositor::Compositor;
use crate::session::store::{SessionState, SessionStore};
use crate::session::sweeper::SessionSweeper;

/// Output of [`FramePipeline::process_frame`].
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeResult {
    /// The composited frame; same dimensions as the input.
    pub frame: Frame,
    /// Whether a usable face was found: landmarks present, pose not degenerate and, with a
    /// hairstyle selected, a valid placement. Always equals `pose.is_some()`.
    pub face_detected: bool,
    /// Estimated head pose, when the landmarks (and placement) were usable.
    pub pose: Option<HeadPose>,
    /// Asset transform that was applied, if any.
    pub placement: Option<Placement>,
}

/// Output of [`FramePipeline::process_encoded`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedResult {
    /// JPEG bytes of the composited frame.
    pub jpeg: Vec<u8>,
    /// Whether a usable face was found.
    pub face_detected: bool,
}

/// Per-frame try-on pipeline: detect, estimate pose, plan placement, composite.
///
/// `Send + Sync`; frames from any number of threads may be processed concurrently. The only
/// cross-frame state is the session store and the asset provider's cache.
pub struct FramePipeline {
    cfg: EngineConfig,
    detector: Arc<dyn LandmarkDetector>,
    assets: Arc<dyn AssetProvider>,
    sessions: Arc<SessionStore>,
    estimator: PoseEstimator,
    planner: PlacementPlanner,
    compositor: Compositor,
}

impl std::fmt::Debug for FramePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePipeline")
            .field("cfg", &self.cfg)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl FramePipeline {
    /// Build a pipeline after validating `cfg`.
    pub fn new(
        cfg: EngineConfig,
        detector: Arc<dyn LandmarkDetector>,
        assets: Arc<dyn AssetProvider>,
    ) -> CoifResult<Self> {
        cfg.validate()?;
        Ok(Self {
            estimator: PoseEstimator::new(cfg.pose.clone()),
            planner: PlacementPlanner::new(cfg.placement.clone()),
            compositor: Compositor::new(cfg.composite.clone()),
            sessions: Arc::new(SessionStore::new(cfg.session.clone())),
            detector,
            assets,
            cfg,
        })
    }

    /// Pipeline reading hairstyles from `cfg.assets.root`.
    pub fn with_dir_assets(
        cfg: EngineConfig,
        detector: Arc<dyn LandmarkDetector>,
    ) -> CoifResult<Self> {
        let assets = Arc::new(DirAssetProvider::new(cfg.assets.clone()));
        Self::new(cfg, detector, assets)
    }

    /// Engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// The shared session store.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Start a background thread expiring idle sessions of this pipeline.
    pub fn spawn_sweeper(&self) -> CoifResult<SessionSweeper> {
        SessionSweeper::spawn(Arc::clone(&self.sessions))
    }

    /// Composite the session's hairstyle onto one decoded frame.
    ///
    /// No face, degenerate geometry and "no hairstyle selected" all pass the frame through
    /// unchanged; a selected hairstyle that cannot be loaded is an error.
    #[tracing::instrument(
        skip_all,
        fields(session_id = session_id, width = frame.width, height = frame.height)
    )]
    pub fn process_frame(&self, frame: &Frame, session_id: &str) -> CoifResult<CompositeResult> {
        if frame.data.len() != rgba8_len(frame.width, frame.height)? || frame.is_empty() {
            return Err(CoifError::validation(
                "frame buffer does not match its dimensions",
            ));
        }

        let session = self.sessions.snapshot(session_id)?;
        let asset = session
            .asset
            .as_deref()
            .map(|reference| self.assets.load(reference))
            .transpose()?;

        let raw = self.detector.detect(frame)?;
        let landmarks = LandmarkSet::ingest(
            raw,
            self.detector.coordinate_space(),
            frame.width,
            frame.height,
        );
        let mut pose = self.estimator.estimate(&landmarks)?;

        let mut out = frame.clone();
        let placement = match &asset {
            Some(asset) => {
                let placement =
                    self.planner
                        .plan(pose.as_ref(), &asset.anchor, &session.adjustment);
                if placement.is_none() && pose.is_some() {
                    // Unplaceable pose counts as degenerate geometry.
                    tracing::debug!("placement rejected; treating as no pose");
                    pose = None;
                }
                self.compositor
                    .composite(&mut out, asset, placement.as_ref())?;
                placement
            }
            None => None,
        };
        let face_detected = pose.is_some();

        tracing::debug!(
            face_detected,
            placed = placement.is_some(),
            "frame processed"
        );
        Ok(CompositeResult {
            frame: out,
            face_detected,
            pose,
            placement,
        })
    }

    /// Decode an encoded frame, composite it and encode the result as JPEG.
    pub fn process_encoded(&self, bytes: &[u8], session_id: &str) -> CoifResult<EncodedResult> {
        let frame = decode_frame(bytes)?;
        let result = self.process_frame(&frame, session_id)?;
        Ok(EncodedResult {
            jpeg: encode_jpeg(&result.frame, self.cfg.composite.jpeg_quality)?,
            face_detected: result.face_detected,
        })
    }

    /// Store a new adjustment for the session.
    pub fn set_adjustment(
        &self,
        session_id: &str,
        adjustment: Adjustment,
    ) -> CoifResult<SessionState> {
        self.sessions.set_adjustment(session_id, adjustment)
    }

    /// Select the session's hairstyle by reference (e.g. `"female/bob.png"`).
    pub fn select_asset(&self, session_id: &str, reference: &str) -> CoifResult<SessionState> {
        let reference = normalize_rel_path(reference)?;
        self.sessions.select_asset(session_id, Some(reference))
    }

    /// Deselect the session's hairstyle.
    pub fn clear_asset(&self, session_id: &str) -> CoifResult<SessionState> {
        self.sessions.select_asset(session_id, None)
    }

    /// Forget the session's settings. Returns whether the session existed.
    pub fn reset_session(&self, session_id: &str) -> bool {
        self.sessions.reset(session_id)
    }

    /// Current settings of a session, without creating it.
    pub fn session(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.get(session_id)
    }
}
