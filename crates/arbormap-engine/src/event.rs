use arbormap_core::models::{DiameterBound, PoiId, RecordId, TreeRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::reconcile::RenderSummary;

/// A user interaction, as delivered by whatever surface hosts the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Raw text typed into one of the range inputs
    RangeInput { bound: DiameterBound, value: String },

    /// Both ends of the range slider
    RangeSlider { min: f64, max: f64 },

    /// The POI filter checkbox changed
    SetPoiFilter { enabled: bool },

    /// Flip the POI filter
    TogglePois,

    /// New radius for one point, in the configured unit
    SetMaxDistance { poi: PoiId, value: f64 },

    DragStart { poi: PoiId },
    DragMove { poi: PoiId, x: f64, y: f64 },
    DragEnd { poi: PoiId, x: f64, y: f64 },

    /// Select a record by id
    Click { id: i64 },

    /// Select whatever record is under a pixel
    ClickAt { x: f64, y: f64 },
}

/// What handling an event did
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// State changed and the visible set was recomputed
    Rendered(RenderSummary),

    /// State changed without a recomputation
    Updated,

    /// The event was rejected and nothing changed
    Ignored,

    /// A record was selected
    Selected(Arc<TreeRecord>),

    /// The click did not land on a visible record
    NothingSelected,
}

impl EventOutcome {
    pub fn summary(&self) -> Option<RenderSummary> {
        match self {
            EventOutcome::Rendered(summary) => Some(*summary),
            _ => None,
        }
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        match self {
            EventOutcome::Selected(record) => Some(record.id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_json() {
        let event: UiEvent =
            serde_json::from_str(r#"{"type":"range_input","bound":"min","value":"12"}"#).unwrap();
        assert_eq!(
            event,
            UiEvent::RangeInput { bound: DiameterBound::Min, value: "12".to_string() }
        );

        let event: UiEvent =
            serde_json::from_str(r#"{"type":"drag_end","poi":"B","x":300.0,"y":410.5}"#).unwrap();
        assert_eq!(event, UiEvent::DragEnd { poi: PoiId::B, x: 300.0, y: 410.5 });

        let event: UiEvent = serde_json::from_str(r#"{"type":"toggle_pois"}"#).unwrap();
        assert_eq!(event, UiEvent::TogglePois);
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(serde_json::from_str::<UiEvent>(r#"{"type":"zoom","level":3}"#).is_err());
    }
}
