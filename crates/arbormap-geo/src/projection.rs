//! Spherical Mercator projection onto a fixed map image
//!
//! The projection is fixed at startup by a geographic center, a scale factor
//! and the pixel position of that center (normally the middle of the image).
//! Longitude maps linearly to `x`; latitude maps through the Mercator
//! stretch to `y`, which grows downward.

use arbormap_core::config::MapSettings;
use arbormap_core::models::{GeoPosition, Pixel};
use arbormap_core::ports::Projection;
use geo::Rect;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Mercator projection centered on a fixed coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MercatorProjection {
    center: GeoPosition,
    scale: f64,
    translate: Pixel,
    // Mercator y of the center latitude, cached
    center_y: f64,
}

fn mercator_y(latitude_rad: f64) -> f64 {
    (FRAC_PI_4 + latitude_rad / 2.0).tan().ln()
}

fn inverse_mercator_y(y: f64) -> f64 {
    2.0 * y.exp().atan() - FRAC_PI_2
}

impl MercatorProjection {
    pub fn new(center: GeoPosition, scale: f64, translate: Pixel) -> Self {
        Self { center, scale, translate, center_y: mercator_y(center.latitude.to_radians()) }
    }

    /// Projection configured from resolved map settings
    pub fn from_settings(settings: &MapSettings) -> Self {
        let (tx, ty) = settings.translate();
        Self::new(settings.center, settings.scale, Pixel::new(tx, ty))
    }

    pub fn center(&self) -> GeoPosition {
        self.center
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Pixel {
        self.translate
    }

    /// Geographic extent covered by an image of the given size
    ///
    /// The rectangle uses `geo` axis order: x is longitude, y is latitude.
    pub fn bounds(&self, width: f64, height: f64) -> Rect<f64> {
        let top_left = self.unproject(Pixel::new(0.0, 0.0));
        let bottom_right = self.unproject(Pixel::new(width, height));
        Rect::new(top_left.to_coord(), bottom_right.to_coord())
    }
}

impl Projection for MercatorProjection {
    fn project(&self, position: GeoPosition) -> Pixel {
        let dx = position.longitude.to_radians() - self.center.longitude.to_radians();
        let dy = mercator_y(position.latitude.to_radians()) - self.center_y;
        Pixel::new(self.translate.x + self.scale * dx, self.translate.y - self.scale * dy)
    }

    fn unproject(&self, pixel: Pixel) -> GeoPosition {
        let lambda = (pixel.x - self.translate.x) / self.scale + self.center.longitude.to_radians();
        let y = (self.translate.y - pixel.y) / self.scale + self.center_y;
        GeoPosition::new(inverse_mercator_y(y).to_degrees(), lambda.to_degrees())
    }
}
