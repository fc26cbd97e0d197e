use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::position::{Distance, GeoPosition, Pixel};
use crate::error::ArborError;
use crate::ports::Projection;

/// Identity of a point of interest
///
/// The set is fixed: a point never changes which slot it represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PoiId {
    A,
    B,
}

impl PoiId {
    pub const ALL: [PoiId; 2] = [PoiId::A, PoiId::B];
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoiId::A => write!(f, "A"),
            PoiId::B => write!(f, "B"),
        }
    }
}

impl FromStr for PoiId {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(PoiId::A),
            "B" => Ok(PoiId::B),
            _ => Err(ArborError::UnknownPoi { id: s.to_string() }),
        }
    }
}

/// A user-relocatable reference point for radius filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: PoiId,

    /// Initial geographic position
    pub position: GeoPosition,

    /// Pixel position set by the most recent completed drag
    pub dragged_to: Option<Pixel>,

    /// Display color
    pub color: String,

    /// Records farther than this are excluded when POI filtering is on
    pub max_distance: Distance,
}

impl PointOfInterest {
    pub fn new(
        id: PoiId,
        position: GeoPosition,
        color: impl Into<String>,
        max_distance: Distance,
    ) -> Self {
        Self { id, position, dragged_to: None, color: color.into(), max_distance }
    }

    /// The two reference points placed at startup
    pub fn defaults(max_distance: Distance) -> Vec<PointOfInterest> {
        vec![
            PointOfInterest::new(
                PoiId::A,
                GeoPosition::new(37.7722386113234, -122.419630895813),
                "red",
                max_distance,
            ),
            PointOfInterest::new(
                PoiId::B,
                GeoPosition::new(37.7723771523117, -122.423530217156),
                "blue",
                max_distance,
            ),
        ]
    }

    /// The authoritative pixel position: the last drag if any, otherwise the
    /// projected geographic position
    pub fn pixel_position(&self, projection: &dyn Projection) -> Pixel {
        self.dragged_to.unwrap_or_else(|| projection.project(self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl Projection for Identity {
        fn project(&self, position: GeoPosition) -> Pixel {
            Pixel::new(position.longitude, position.latitude)
        }

        fn unproject(&self, pixel: Pixel) -> GeoPosition {
            GeoPosition::new(pixel.y, pixel.x)
        }
    }

    #[test]
    fn test_parse_poi_id() {
        assert_eq!("a".parse::<PoiId>().unwrap(), PoiId::A);
        assert_eq!(" B ".parse::<PoiId>().unwrap(), PoiId::B);
        assert!("C".parse::<PoiId>().is_err());
    }

    #[test]
    fn test_drag_overrides_projection() {
        let mut poi = PointOfInterest::new(
            PoiId::A,
            GeoPosition::new(2.0, 1.0),
            "red",
            Distance::miles(1.0),
        );
        assert_eq!(poi.pixel_position(&Identity), Pixel::new(1.0, 2.0));

        poi.dragged_to = Some(Pixel::new(40.0, 50.0));
        assert_eq!(poi.pixel_position(&Identity), Pixel::new(40.0, 50.0));
    }

    #[test]
    fn test_defaults_are_distinct() {
        let pois = PointOfInterest::defaults(Distance::miles(2.1));
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].id, PoiId::A);
        assert_eq!(pois[1].id, PoiId::B);
        assert_ne!(pois[0].position, pois[1].position);
    }
}
