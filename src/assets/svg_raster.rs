use crate::foundation::error::{CoifError, CoifResult};

/// Raster size for an SVG whose longest side becomes `max_dim` pixels.
///
/// Hairstyles are drawn at many scales, so vectors are rasterized once, large, and scaled down
/// by the compositor like any other asset.
pub fn svg_raster_size(tree: &usvg::Tree, max_dim: u32) -> CoifResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(CoifError::asset("svg has invalid width/height"));
    }
    let scale = (max_dim as f32) / w.max(h);
    let to_px = |v: f32| ((v * scale).round() as u32).clamp(1, max_dim);
    Ok((to_px(w), to_px(h)))
}

/// Parse and rasterize an SVG document into premultiplied RGBA8.
pub fn rasterize_svg(bytes: &[u8], max_dim: u32) -> CoifResult<(u32, u32, Vec<u8>)> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| CoifError::asset(format!("parse svg tree: {e}")))?;
    let (width, height) = svg_raster_size(&tree, max_dim)?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CoifError::asset("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Ok((width, height, pixmap.data().to_vec()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
