use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::Context;
use serde::Deserialize;

use crate::assets::asset::{AssetAnchor, HairstyleAsset, MaskSource};
use crate::assets::decode::decode_raster_asset;
use crate::config::AssetConfig;
use crate::foundation::error::{CoifError, CoifResult};

/// Source of prepared hairstyle assets, keyed by a relative reference such as `"male/fade.png"`.
///
/// Implementations are shared across frame threads.
pub trait AssetProvider: Send + Sync {
    /// Load (or fetch from cache) the asset named by `reference`.
    fn load(&self, reference: &str) -> CoifResult<Arc<HairstyleAsset>>;
}

const ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

/// Normalize an asset reference to a `/`-separated relative path.
///
/// Rejects absolute paths, drive prefixes and `..` segments; drops empty and `.` segments.
pub(crate) fn normalize_rel_path(reference: &str) -> CoifResult<String> {
    let s = reference.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(CoifError::validation("asset reference must be non-empty"));
    }
    if s.starts_with('/') || s.contains(':') {
        return Err(CoifError::validation(format!(
            "asset reference '{reference}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CoifError::validation(format!(
                "asset reference '{reference}' must not contain '..'"
            )));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(CoifError::validation(format!(
            "asset reference '{reference}' has no file name"
        )));
    }
    Ok(out.join("/"))
}

fn has_asset_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ASSET_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

#[derive(Deserialize)]
struct AnchorSidecar {
    anchor: [f64; 2],
}

/// Read `<stem>.anchor.json` next to `path`, if present.
fn read_anchor_sidecar(path: &Path) -> CoifResult<Option<[f64; 2]>> {
    let sidecar = path.with_extension("anchor.json");
    if !sidecar.is_file() {
        return Ok(None);
    }
    let f = File::open(&sidecar)
        .with_context(|| format!("open anchor sidecar '{}'", sidecar.display()))?;
    let parsed: AnchorSidecar = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
        CoifError::asset(format!("parse anchor sidecar '{}': {e}", sidecar.display()))
    })?;
    if !parsed.anchor.iter().all(|v| v.is_finite()) {
        return Err(CoifError::asset(format!(
            "anchor sidecar '{}' must hold finite values",
            sidecar.display()
        )));
    }
    Ok(Some(parsed.anchor))
}

/// Filesystem-backed asset provider with an in-memory cache.
///
/// References resolve to `root/<ref>`; when that file is missing each configured fallback
/// directory is tried with the reference's file name (`root/custom/<name>` by default).
#[derive(Debug)]
pub struct DirAssetProvider {
    cfg: AssetConfig,
    cache: RwLock<HashMap<String, Arc<HairstyleAsset>>>,
}

impl DirAssetProvider {
    /// Build a provider from asset configuration.
    pub fn new(cfg: AssetConfig) -> Self {
        Self {
            cfg,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Provider rooted at `root` with default settings.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(AssetConfig {
            root: root.into(),
            ..AssetConfig::default()
        })
    }

    /// The asset root directory.
    pub fn root(&self) -> &Path {
        &self.cfg.root
    }

    /// Number of cached assets.
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Drop every cached asset; the next `load` re-reads from disk.
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Resolve a reference to an existing file, applying fallback directories.
    pub fn resolve(&self, reference: &str) -> CoifResult<PathBuf> {
        let rel = normalize_rel_path(reference)?;
        let direct = self.cfg.root.join(&rel);
        if direct.is_file() {
            return Ok(direct);
        }

        let name = rel.rsplit('/').next().unwrap_or(rel.as_str());
        for dir in &self.cfg.fallback_dirs {
            let candidate = self.cfg.root.join(dir).join(name);
            if candidate.is_file() {
                tracing::warn!(
                    reference = rel.as_str(),
                    fallback = %candidate.display(),
                    "asset found in fallback directory"
                );
                return Ok(candidate);
            }
        }
        Err(CoifError::asset(format!("hairstyle asset '{rel}' not found")))
    }

    /// Sorted file names of the hairstyle images in `root/<category>`.
    pub fn list(&self, category: &str) -> CoifResult<Vec<String>> {
        let rel = normalize_rel_path(category)?;
        let dir = self.cfg.root.join(&rel);
        if !dir.is_dir() {
            return Err(CoifError::asset(format!(
                "asset category '{rel}' not found"
            )));
        }

        let mut names = Vec::new();
        for entry in
            std::fs::read_dir(&dir).with_context(|| format!("read dir '{}'", dir.display()))?
        {
            let path = entry
                .with_context(|| format!("read entry in '{}'", dir.display()))?
                .path();
            if path.is_file() && has_asset_extension(&path) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    fn prepare(&self, path: &Path) -> CoifResult<HairstyleAsset> {
        let bytes = std::fs::read(path)
            .map_err(|e| CoifError::asset(format!("read asset '{}': {e}", path.display())))?;

        let (width, height, rgba8_premul, mask) = if is_svg(path) {
            self.rasterize(&bytes)?
        } else {
            let decoded = decode_raster_asset(&bytes, &self.cfg)?;
            if decoded.mask == MaskSource::Inferred {
                tracing::warn!("asset has no alpha channel; inferred mask from background colour");
            }
            (
                decoded.width,
                decoded.height,
                decoded.rgba8_premul,
                decoded.mask,
            )
        };

        let uv = read_anchor_sidecar(path)?.unwrap_or(self.cfg.default_anchor);
        let anchor = AssetAnchor::from_fraction(uv, f64::from(width), f64::from(height));
        HairstyleAsset::from_premul_rgba8(width, height, rgba8_premul, anchor, mask)
    }

    #[cfg(feature = "svg")]
    fn rasterize(&self, bytes: &[u8]) -> CoifResult<(u32, u32, Vec<u8>, MaskSource)> {
        let (w, h, px) = crate::assets::svg_raster::rasterize_svg(bytes, self.cfg.svg_max_dim)?;
        Ok((w, h, px, MaskSource::Vector))
    }

    #[cfg(not(feature = "svg"))]
    fn rasterize(&self, _bytes: &[u8]) -> CoifResult<(u32, u32, Vec<u8>, MaskSource)> {
        Err(CoifError::asset(
            "svg assets require the `svg` feature",
        ))
    }
}

impl AssetProvider for DirAssetProvider {
    fn load(&self, reference: &str) -> CoifResult<Arc<HairstyleAsset>> {
        let key = normalize_rel_path(reference)?;
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        let path = self.resolve(&key)?;
        let asset = Arc::new(self.prepare(&path)?);
        tracing::info!(
            reference = key.as_str(),
            width = asset.width,
            height = asset.height,
            "loaded hairstyle asset"
        );

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        Ok(Arc::clone(cache.entry(key).or_insert(asset)))
    }
}

/// In-memory provider for embedders that prepare assets themselves.
#[derive(Debug, Default)]
pub struct MemoryAssetProvider {
    assets: RwLock<HashMap<String, Arc<HairstyleAsset>>>,
}

impl MemoryAssetProvider {
    /// An empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `asset` under `reference`, replacing any previous entry.
    pub fn insert(&self, reference: &str, asset: HairstyleAsset) -> CoifResult<()> {
        let key = normalize_rel_path(reference)?;
        self.assets
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, Arc::new(asset));
        Ok(())
    }
}

impl AssetProvider for MemoryAssetProvider {
    fn load(&self, reference: &str) -> CoifResult<Arc<HairstyleAsset>> {
        let key = normalize_rel_path(reference)?;
        self.assets
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
            .ok_or_else(|| CoifError::asset(format!("hairstyle asset '{key}' not found")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
