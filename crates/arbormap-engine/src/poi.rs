//! Point-of-interest store and drag state machine
//!
//! A drag moves through `Idle -> Dragging -> Idle`. While dragging, only the
//! live pixel is updated; the authoritative position is committed when the
//! drag ends. Whether the end of a drag recomputes the filter is decided by
//! the caller.

use arbormap_core::models::{Distance, Pixel, PoiId, PointOfInterest};
use arbormap_core::ports::Projection;
use arbormap_core::{ArborError, Result};

use crate::presenter::{RenderInstruction, POI_RADIUS};

/// Current drag interaction
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        id: PoiId,
        /// Pointer position, not yet committed
        live: Option<Pixel>,
    },
}

/// The fixed set of points of interest
#[derive(Debug, Clone)]
pub struct PoiStore {
    points: Vec<PointOfInterest>,
    drag: DragState,
}

impl PoiStore {
    pub fn new(points: Vec<PointOfInterest>) -> Self {
        Self { points, drag: DragState::Idle }
    }

    /// Store holding the two default points
    pub fn with_defaults(max_distance: Distance) -> Self {
        Self::new(PointOfInterest::defaults(max_distance))
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn get(&self, id: PoiId) -> Result<&PointOfInterest> {
        self.points
            .iter()
            .find(|poi| poi.id == id)
            .ok_or_else(|| ArborError::UnknownPoi { id: id.to_string() })
    }

    fn get_mut(&mut self, id: PoiId) -> Result<&mut PointOfInterest> {
        self.points
            .iter_mut()
            .find(|poi| poi.id == id)
            .ok_or_else(|| ArborError::UnknownPoi { id: id.to_string() })
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Where a point should be drawn right now
    ///
    /// During a drag this is the live pointer position; otherwise the
    /// authoritative position.
    fn display_position(&self, poi: &PointOfInterest, projection: &dyn Projection) -> Pixel {
        match self.drag {
            DragState::Dragging { id, live: Some(live) } if id == poi.id => live,
            _ => poi.pixel_position(projection),
        }
    }

    /// Handles for every point, at their display positions
    pub fn placements(&self, projection: &dyn Projection) -> Vec<RenderInstruction> {
        self.points
            .iter()
            .map(|poi| RenderInstruction::PlacePoi {
                id: poi.id,
                pixel: self.display_position(poi, projection),
                radius: POI_RADIUS,
                color: poi.color.clone(),
            })
            .collect()
    }

    /// Begin dragging a point
    ///
    /// Starting a new drag abandons any drag in progress without committing
    /// it.
    pub fn start_drag(&mut self, id: PoiId) -> Result<RenderInstruction> {
        self.get(id)?;
        if let DragState::Dragging { id: previous, .. } = self.drag {
            tracing::debug!("Abandoning drag of POI {} for POI {}", previous, id);
        }
        self.drag = DragState::Dragging { id, live: None };
        Ok(RenderInstruction::RaisePoi { id })
    }

    /// Follow the pointer
    ///
    /// Returns `None` when `id` is not the point being dragged.
    pub fn update_drag_position(&mut self, id: PoiId, pixel: Pixel) -> Option<RenderInstruction> {
        match &mut self.drag {
            DragState::Dragging { id: dragging, live } if *dragging == id => {
                *live = Some(pixel);
                Some(RenderInstruction::MovePoi { id, pixel })
            }
            _ => None,
        }
    }

    /// Finish a drag, committing `pixel` as the point's position
    ///
    /// The position is committed even when no drag was registered for `id`.
    pub fn end_drag(&mut self, id: PoiId, pixel: Pixel) -> Result<RenderInstruction> {
        let poi = self.get_mut(id)?;
        poi.dragged_to = Some(pixel);

        match self.drag {
            DragState::Dragging { id: dragging, .. } if dragging == id => {
                self.drag = DragState::Idle;
            }
            DragState::Dragging { id: dragging, .. } => {
                tracing::debug!("POI {} released while POI {} is being dragged", id, dragging);
            }
            DragState::Idle => {
                tracing::debug!("POI {} released without a drag in progress", id);
            }
        }

        Ok(RenderInstruction::ReleasePoi { id, pixel })
    }

    /// Change the radius of one point; returns whether it changed
    pub fn set_max_distance(&mut self, id: PoiId, max_distance: Distance) -> Result<bool> {
        let poi = self.get_mut(id)?;
        if poi.max_distance == max_distance {
            return Ok(false);
        }
        poi.max_distance = max_distance;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbormap_core::models::GeoPosition;

    struct Identity;

    impl Projection for Identity {
        fn project(&self, position: GeoPosition) -> Pixel {
            Pixel::new(position.longitude, position.latitude)
        }

        fn unproject(&self, pixel: Pixel) -> GeoPosition {
            GeoPosition::new(pixel.y, pixel.x)
        }
    }

    fn store() -> PoiStore {
        PoiStore::with_defaults(Distance::miles(2.1))
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut pois = store();
        let original = pois.get(PoiId::A).unwrap().pixel_position(&Identity);

        assert_eq!(pois.start_drag(PoiId::A).unwrap(), RenderInstruction::RaisePoi { id: PoiId::A });
        assert!(pois.is_dragging());

        let live = Pixel::new(100.0, 120.0);
        assert!(pois.update_drag_position(PoiId::A, live).is_some());
        // Live position shows while dragging; authoritative one is unchanged
        match &pois.placements(&Identity)[0] {
            RenderInstruction::PlacePoi { pixel, .. } => assert_eq!(*pixel, live),
            other => panic!("unexpected instruction {:?}", other),
        }
        assert_eq!(pois.get(PoiId::A).unwrap().pixel_position(&Identity), original);

        let end = Pixel::new(110.0, 130.0);
        pois.end_drag(PoiId::A, end).unwrap();
        assert_eq!(pois.drag_state(), DragState::Idle);
        assert_eq!(pois.get(PoiId::A).unwrap().pixel_position(&Identity), end);
    }

    #[test]
    fn test_update_ignored_for_other_point() {
        let mut pois = store();
        assert!(pois.update_drag_position(PoiId::A, Pixel::new(1.0, 1.0)).is_none());

        pois.start_drag(PoiId::B).unwrap();
        assert!(pois.update_drag_position(PoiId::A, Pixel::new(1.0, 1.0)).is_none());
        assert_eq!(pois.drag_state(), DragState::Dragging { id: PoiId::B, live: None });
    }

    #[test]
    fn test_end_without_start_still_commits() {
        let mut pois = store();
        pois.end_drag(PoiId::B, Pixel::new(5.0, 6.0)).unwrap();
        assert_eq!(pois.get(PoiId::B).unwrap().dragged_to, Some(Pixel::new(5.0, 6.0)));
    }

    #[test]
    fn test_set_max_distance_is_per_point() {
        let mut pois = store();
        assert!(pois.set_max_distance(PoiId::B, Distance::miles(0.5)).unwrap());
        assert!(!pois.set_max_distance(PoiId::B, Distance::miles(0.5)).unwrap());

        assert_eq!(pois.get(PoiId::A).unwrap().max_distance, Distance::miles(2.1));
        assert_eq!(pois.get(PoiId::B).unwrap().max_distance, Distance::miles(0.5));
    }

    #[test]
    fn test_unknown_point() {
        let mut pois = PoiStore::new(Vec::new());
        assert!(matches!(pois.start_drag(PoiId::A), Err(ArborError::UnknownPoi { .. })));
        assert!(pois.end_drag(PoiId::A, Pixel::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_placements() {
        let placements = store().placements(&Identity);
        assert_eq!(placements.len(), 2);
        match &placements[0] {
            RenderInstruction::PlacePoi { id, radius, color, .. } => {
                assert_eq!(*id, PoiId::A);
                assert_eq!(*radius, 20.0);
                assert_eq!(color, "red");
            }
            other => panic!("unexpected instruction {:?}", other),
        }
    }
}
