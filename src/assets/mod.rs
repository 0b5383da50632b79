pub(crate) mod asset;
pub(crate) mod decode;
pub(crate) mod store;
#[cfg(feature = "svg")]
pub(crate) mod svg_raster;
