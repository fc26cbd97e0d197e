//! Arbormap Geo - Projection, distance, and pixel-space lookup
//!
//! This crate maps geographic positions onto the map image and back,
//! measures great-circle distances between map pixels, and indexes rendered
//! points for hit testing.

pub mod distance;
pub mod index;
pub mod projection;

pub use distance::DistanceCalculator;
pub use index::PixelIndex;
pub use projection::MercatorProjection;
