//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

use async_trait::async_trait;

use crate::error::Result;
use crate::loader::RawRow;
use crate::models::{GeoPosition, Pixel};

/// Invertible mapping between geographic positions and map pixels
pub trait Projection: Send + Sync {
    /// Geographic position to pixel position on the map image
    fn project(&self, position: GeoPosition) -> Pixel;

    /// Pixel position on the map image back to a geographic position
    fn unproject(&self, pixel: Pixel) -> GeoPosition;
}

/// Source of raw tabular rows
#[async_trait]
pub trait DataLoader: Send + Sync {
    /// Read every row of the source, in order
    async fn load(&self) -> Result<Vec<RawRow>>;

    /// Human-readable description of where rows come from
    fn source_name(&self) -> String;
}
