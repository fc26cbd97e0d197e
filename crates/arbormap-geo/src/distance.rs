//! Great-circle distance between map pixels

use arbormap_core::models::{Distance, DistanceUnit, GeoPosition, Pixel};
use arbormap_core::ports::Projection;
use geo::{Distance as _, HaversineMeasure, Point};
use std::f64::consts::TAU;

/// Earth's circumference in miles
pub const EARTH_CIRCUMFERENCE_MILES: f64 = 24_901.0;

/// Sphere whose circumference is [`EARTH_CIRCUMFERENCE_MILES`], radius in miles
fn earth_in_miles() -> HaversineMeasure {
    HaversineMeasure::new(EARTH_CIRCUMFERENCE_MILES / TAU)
}

/// Real-world distance between two geographic positions
pub fn great_circle_distance(a: GeoPosition, b: GeoPosition) -> Distance {
    let miles = earth_in_miles().distance(Point::from(a), Point::from(b));
    Distance::new(miles, DistanceUnit::Miles)
}

/// Measures real-world distances between pixels of a projected map
#[derive(Clone, Copy)]
pub struct DistanceCalculator<'a> {
    projection: &'a dyn Projection,
}

impl<'a> DistanceCalculator<'a> {
    pub fn new(projection: &'a dyn Projection) -> Self {
        Self { projection }
    }

    /// Distance between two pixel positions, in miles
    pub fn distance(&self, a: Pixel, b: Pixel) -> Distance {
        great_circle_distance(self.projection.unproject(a), self.projection.unproject(b))
    }

    /// Distance from a pixel position to a geographic position, in miles
    ///
    /// The position is projected first so both ends go through the same
    /// pixel round trip.
    pub fn distance_to(&self, pixel: Pixel, position: GeoPosition) -> Distance {
        self.distance(pixel, self.projection.project(position))
    }
}
