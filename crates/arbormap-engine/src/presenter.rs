//! Presentation boundary
//!
//! The engine never draws. It emits [`RenderInstruction`]s and lets a
//! [`Presenter`] map them onto whatever surface is in use.

use arbormap_core::models::{Pixel, PoiId, RecordId, TreeRecord};
use serde::{Deserialize, Serialize};

/// Radius of a record mark, in pixels
pub const POINT_RADIUS: f64 = 4.0;

/// Fill color of a record mark
pub const POINT_FILL: &str = "steelblue";

/// Radius of a point-of-interest handle, in pixels
pub const POI_RADIUS: f64 = 20.0;

/// A declarative change to the rendered map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderInstruction {
    /// Draw a record that was not visible before
    AddPoint { id: RecordId, pixel: Pixel, radius: f64, fill: String },

    /// Remove a record that is no longer visible
    RemovePoint { id: RecordId },

    /// Draw a point-of-interest handle
    PlacePoi { id: PoiId, pixel: Pixel, radius: f64, color: String },

    /// Highlight a handle while it is being dragged
    RaisePoi { id: PoiId },

    /// Move a handle to follow the pointer
    MovePoi { id: PoiId, pixel: Pixel },

    /// Drop a handle at its final position
    ReleasePoi { id: PoiId, pixel: Pixel },
}

/// Receives render instructions and user-facing notifications
pub trait Presenter {
    /// Apply one batch of instructions, in order
    fn apply(&mut self, instructions: &[RenderInstruction]);

    /// A record was selected by the user
    fn record_selected(&mut self, record: &TreeRecord);
}

/// Presenter that reports everything through `tracing`
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn apply(&mut self, instructions: &[RenderInstruction]) {
        for instruction in instructions {
            tracing::trace!(?instruction, "render");
        }
        tracing::debug!("Applied {} render instructions", instructions.len());
    }

    fn record_selected(&mut self, record: &TreeRecord) {
        tracing::info!(
            id = %record.id,
            species = %record.species,
            address = %record.address,
            "Selected tree"
        );
    }
}

/// Presenter that keeps every batch in memory
///
/// Used by tests and by the replay command to inspect what the engine
/// asked for.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub batches: Vec<Vec<RenderInstruction>>,
    pub selected: Vec<RecordId>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_batch(&self) -> Option<&[RenderInstruction]> {
        self.batches.last().map(Vec::as_slice)
    }

    pub fn instructions(&self) -> impl Iterator<Item = &RenderInstruction> {
        self.batches.iter().flatten()
    }

    pub fn clear(&mut self) {
        self.batches.clear();
        self.selected.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn apply(&mut self, instructions: &[RenderInstruction]) {
        self.batches.push(instructions.to_vec());
    }

    fn record_selected(&mut self, record: &TreeRecord) {
        self.selected.push(record.id);
    }
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn apply(&mut self, instructions: &[RenderInstruction]) {
        (**self).apply(instructions)
    }

    fn record_selected(&mut self, record: &TreeRecord) {
        (**self).record_selected(record)
    }
}
