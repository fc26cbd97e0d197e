//! Keyed diff between the filtered subset and what is on screen
//!
//! Records are keyed by identity. A reconciliation pass only produces
//! instructions for records that entered or left the visible set; records
//! present on both sides are left alone.

use arbormap_core::models::{Pixel, RecordId, TreeRecord};
use arbormap_core::ports::Projection;
use arbormap_geo::PixelIndex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::presenter::{RenderInstruction, POINT_FILL, POINT_RADIUS};

/// A record mark currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPoint {
    pub record: Arc<TreeRecord>,
    pub pixel: Pixel,
}

/// Counts describing one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub visible: usize,
}

/// Tracks the rendered set and diffs it against new filter results
#[derive(Debug, Default)]
pub struct RenderReconciler {
    rendered: BTreeMap<RecordId, RenderedPoint>,
    index: PixelIndex,
}

impl RenderReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `filtered` against the rendered set and update it
    ///
    /// Adds follow the order of `filtered`; removals are emitted in
    /// ascending id order, before any add.
    pub fn reconcile(
        &mut self,
        filtered: &[Arc<TreeRecord>],
        projection: &dyn Projection,
    ) -> (Vec<RenderInstruction>, RenderSummary) {
        let wanted: HashSet<RecordId> = filtered.iter().map(|record| record.id).collect();

        let to_remove: Vec<RecordId> =
            self.rendered.keys().filter(|id| !wanted.contains(id)).copied().collect();

        let mut instructions = Vec::new();
        for id in &to_remove {
            if let Some(point) = self.rendered.remove(id) {
                self.index.remove(*id, point.pixel);
                instructions.push(RenderInstruction::RemovePoint { id: *id });
            }
        }

        let mut added = 0;
        for record in filtered {
            if self.rendered.contains_key(&record.id) {
                continue;
            }
            let pixel = projection.project(record.position);
            self.index.insert(record.id, pixel);
            self.rendered.insert(record.id, RenderedPoint { record: Arc::clone(record), pixel });
            instructions.push(RenderInstruction::AddPoint {
                id: record.id,
                pixel,
                radius: POINT_RADIUS,
                fill: POINT_FILL.to_string(),
            });
            added += 1;
        }

        let summary = RenderSummary {
            added,
            removed: to_remove.len(),
            unchanged: self.rendered.len() - added,
            visible: self.rendered.len(),
        };
        tracing::debug!(
            added = summary.added,
            removed = summary.removed,
            unchanged = summary.unchanged,
            "Reconciled rendered set"
        );

        (instructions, summary)
    }

    /// The rendered record under `pixel`, if any
    pub fn hit_test(&self, pixel: Pixel) -> Option<&Arc<TreeRecord>> {
        let id = self.index.nearest_within(pixel, POINT_RADIUS)?;
        self.rendered.get(&id).map(|point| &point.record)
    }

    pub fn get(&self, id: RecordId) -> Option<&RenderedPoint> {
        self.rendered.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.rendered.contains_key(&id)
    }

    /// Rendered ids in ascending order
    pub fn rendered_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.rendered.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
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

    fn record(id: i64) -> Arc<TreeRecord> {
        Arc::new(TreeRecord {
            id: RecordId(id),
            position: GeoPosition::new(10.0, 10.0 * id as f64),
            diameter: 8.0,
            species: "Acer rubrum :: Red Maple".to_string(),
            address: "1 Main St".to_string(),
            plot_size: "3x3".to_string(),
        })
    }

    fn added(instructions: &[RenderInstruction]) -> Vec<i64> {
        instructions
            .iter()
            .filter_map(|i| match i {
                RenderInstruction::AddPoint { id, .. } => Some(id.0),
                _ => None,
            })
            .collect()
    }

    fn removed(instructions: &[RenderInstruction]) -> Vec<i64> {
        instructions
            .iter()
            .filter_map(|i| match i {
                RenderInstruction::RemovePoint { id } => Some(id.0),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_first_pass_adds_everything() {
        let mut reconciler = RenderReconciler::new();
        let (instructions, summary) =
            reconciler.reconcile(&[record(1), record(2), record(3)], &Identity);

        assert_eq!(added(&instructions), vec![1, 2, 3]);
        assert!(removed(&instructions).is_empty());
        assert_eq!(summary, RenderSummary { added: 3, removed: 0, unchanged: 0, visible: 3 });
    }

    #[test]
    fn test_minimal_diff() {
        let mut reconciler = RenderReconciler::new();
        reconciler.reconcile(&[record(1), record(2), record(3)], &Identity);

        let (instructions, summary) =
            reconciler.reconcile(&[record(2), record(3), record(4)], &Identity);

        assert_eq!(removed(&instructions), vec![1]);
        assert_eq!(added(&instructions), vec![4]);
        assert_eq!(instructions.len(), 2);
        assert_eq!(summary.unchanged, 2);
        assert_eq!(reconciler.rendered_ids().map(|id| id.0).collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_same_set_is_noop() {
        let mut reconciler = RenderReconciler::new();
        let set = [record(1), record(2)];
        reconciler.reconcile(&set, &Identity);

        let (instructions, summary) = reconciler.reconcile(&set, &Identity);
        assert!(instructions.is_empty());
        assert_eq!(summary.visible, 2);
    }

    #[test]
    fn test_add_instruction_style() {
        let mut reconciler = RenderReconciler::new();
        let (instructions, _) = reconciler.reconcile(&[record(2)], &Identity);

        assert_eq!(
            instructions[0],
            RenderInstruction::AddPoint {
                id: RecordId(2),
                pixel: Pixel::new(20.0, 10.0),
                radius: 4.0,
                fill: "steelblue".to_string(),
            }
        );
    }

    #[test]
    fn test_hit_test_tracks_rendered_set() {
        let mut reconciler = RenderReconciler::new();
        reconciler.reconcile(&[record(1), record(2)], &Identity);

        let hit = reconciler.hit_test(Pixel::new(11.0, 11.0)).map(|r| r.id);
        assert_eq!(hit, Some(RecordId(1)));

        reconciler.reconcile(&[record(2)], &Identity);
        assert!(reconciler.hit_test(Pixel::new(11.0, 11.0)).is_none());
        assert!(reconciler.hit_test(Pixel::new(20.0, 10.0)).is_some());
    }
}
