pub(crate) mod caption;
pub(crate) mod font;
pub(crate) mod measure;
pub(crate) mod raster;
pub(crate) mod wrap;
