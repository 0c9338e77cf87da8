pub(crate) mod attr;
pub(crate) mod color;
pub mod json;
pub mod options;
pub(crate) mod smil;
pub mod svg;
