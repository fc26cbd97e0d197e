//! Geographic and pixel positions, plus real-world distances.
//!
//! Geographic positions bridge to the `geo` crate with longitude as `x` and
//! latitude as `y`. Pixel positions are measured from the top-left corner of
//! the map image.

use serde::{Deserialize, Serialize};

/// Latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// As a `geo` coordinate (x = longitude, y = latitude)
    pub fn to_coord(self) -> geo::Coord<f64> {
        geo::Coord { x: self.longitude, y: self.latitude }
    }
}

impl From<geo::Coord<f64>> for GeoPosition {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self { latitude: coord.y, longitude: coord.x }
    }
}

impl From<GeoPosition> for geo::Point<f64> {
    fn from(position: GeoPosition) -> Self {
        geo::Point::new(position.longitude, position.latitude)
    }
}

/// Position on the map image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Squared euclidean distance in pixel space
    pub fn distance_squared(&self, other: &Pixel) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<[f64; 2]> for Pixel {
    fn from(xy: [f64; 2]) -> Self {
        Self { x: xy[0], y: xy[1] }
    }
}

/// Distance units for radius filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    #[default]
    Miles,
    Feet,
}

impl DistanceUnit {
    /// Convert a distance value to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            DistanceUnit::Meters => value,
            DistanceUnit::Kilometers => value * 1000.0,
            DistanceUnit::Miles => value * 1609.344,
            DistanceUnit::Feet => value * 0.3048,
        }
    }
}

/// Distance with unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    pub fn miles(value: f64) -> Self {
        Self::new(value, DistanceUnit::Miles)
    }

    pub fn meters(value: f64) -> Self {
        Self::new(value, DistanceUnit::Meters)
    }

    pub fn to_meters(&self) -> f64 {
        self.unit.to_meters(self.value)
    }

    /// Unit-independent `<=` comparison
    pub fn within(&self, limit: &Distance) -> bool {
        self.to_meters() <= limit.to_meters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_coord_axis_order() {
        let position = GeoPosition::new(37.77, -122.43);
        let coord = position.to_coord();
        assert_eq!(coord.x, -122.43);
        assert_eq!(coord.y, 37.77);
        assert_eq!(GeoPosition::from(coord), position);
    }

    #[test]
    fn test_distance_conversion() {
        let one_mile = Distance::miles(1.0);
        assert!((one_mile.to_meters() - 1609.344).abs() < 1e-9);

        assert!((Distance::new(1.0, DistanceUnit::Kilometers).to_meters() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_within_across_units() {
        let limit = Distance::miles(1.0);
        assert!(Distance::meters(1609.0).within(&limit));
        assert!(!Distance::meters(1610.0).within(&limit));
        assert!(Distance::miles(1.0).within(&limit));
    }

    #[test]
    fn test_pixel_distance_squared() {
        let a = Pixel::new(0.0, 0.0);
        let b = Pixel::new(3.0, 4.0);
        assert_eq!(a.distance_squared(&b), 25.0);
    }
}
