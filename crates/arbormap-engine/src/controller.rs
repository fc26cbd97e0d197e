//! Map controller
//!
//! Owns the complete dataset, the filter parameters, the points of interest
//! and the rendered set. Every state change that affects visibility runs the
//! same cycle: filter the complete dataset, reconcile against the rendered
//! set, hand the instructions to the presenter.
//!
//! All mutation goes through `&mut self`, so interactions are applied one at
//! a time and a recomputation always sees a consistent snapshot. Hosts that
//! deliver events from several threads wrap the controller in a mutex.

use arbormap_core::config::MapSettings;
use arbormap_core::loader::load_dataset;
use arbormap_core::models::{
    BoundInput, Dataset, DiameterBound, Distance, DistanceUnit, FilterParameters, Pixel, PoiId,
    RecordId, TreeRecord,
};
use arbormap_core::ports::{DataLoader, Projection};
use arbormap_core::Result;
use arbormap_geo::MercatorProjection;
use std::sync::Arc;

use crate::event::{EventOutcome, UiEvent};
use crate::filter::apply_filters;
use crate::poi::PoiStore;
use crate::presenter::{Presenter, RenderInstruction};
use crate::reconcile::{RenderReconciler, RenderSummary};

pub struct MapController<P: Presenter> {
    projection: Box<dyn Projection>,
    distance_unit: DistanceUnit,
    dataset: Option<Dataset>,
    params: FilterParameters,
    pois: PoiStore,
    reconciler: RenderReconciler,
    presenter: P,
}

impl<P: Presenter> MapController<P> {
    /// Controller for the configured map, with the default points placed
    pub fn new(settings: &MapSettings, presenter: P) -> Self {
        Self::with_projection(
            Box::new(MercatorProjection::from_settings(settings)),
            PoiStore::with_defaults(settings.poi_max_distance),
            presenter,
        )
    }

    pub fn with_projection(projection: Box<dyn Projection>, pois: PoiStore, mut presenter: P) -> Self {
        let placements = pois.placements(projection.as_ref());
        presenter.apply(&placements);

        let distance_unit = pois.points().first().map(|poi| poi.max_distance.unit).unwrap_or_default();

        Self {
            projection,
            distance_unit,
            dataset: None,
            params: FilterParameters::default(),
            pois,
            reconciler: RenderReconciler::new(),
            presenter,
        }
    }

    /// Load the dataset and perform the first render
    ///
    /// On failure the controller stays unloaded; parameter changes are still
    /// recorded but nothing is drawn.
    pub async fn load(&mut self, loader: &dyn DataLoader) -> Result<RenderSummary> {
        let dataset = load_dataset(loader).await?;
        Ok(self.install_dataset(dataset))
    }

    /// Replace the dataset and redraw from scratch
    pub fn install_dataset(&mut self, dataset: Dataset) -> RenderSummary {
        if let Some((min, max)) = dataset.diameter_extent() {
            tracing::info!("Diameter extent {}..{} across {} records", min, max, dataset.len());
        }

        let (mut instructions, cleared) = self.reconciler.reconcile(&[], self.projection.as_ref());
        self.dataset = Some(dataset);

        let (filtered, mut summary) = self.recompute();
        instructions.extend(filtered);
        self.present(&instructions);

        summary.removed += cleared.removed;
        summary
    }

    fn recompute(&mut self) -> (Vec<RenderInstruction>, RenderSummary) {
        let Some(dataset) = self.dataset.as_ref() else {
            return (Vec::new(), RenderSummary::default());
        };
        let projection = self.projection.as_ref();
        let filtered = apply_filters(dataset, &self.params, self.pois.points(), projection);
        self.reconciler.reconcile(&filtered, projection)
    }

    fn present(&mut self, instructions: &[RenderInstruction]) {
        if !instructions.is_empty() {
            self.presenter.apply(instructions);
        }
    }

    fn render(&mut self) -> EventOutcome {
        if self.dataset.is_none() {
            tracing::debug!("Dataset not loaded; deferring render");
            return EventOutcome::Updated;
        }
        let (instructions, summary) = self.recompute();
        self.present(&instructions);
        EventOutcome::Rendered(summary)
    }

    /// Apply raw text typed into a range input
    ///
    /// Empty text clears the bound; text that is not a number is ignored.
    pub fn set_range_bound(&mut self, bound: DiameterBound, raw: &str) -> EventOutcome {
        let value = match BoundInput::parse(raw) {
            BoundInput::Invalid => {
                tracing::debug!("Ignoring non-numeric {:?} bound {:?}", bound, raw);
                return EventOutcome::Ignored;
            }
            BoundInput::Clear => None,
            BoundInput::Value(value) => Some(value),
        };
        self.params.set_bound(bound, value);
        self.render()
    }

    /// Set both bounds at once, as the range slider does
    pub fn set_diameter_range(&mut self, min: f64, max: f64) -> EventOutcome {
        if min.is_nan() || max.is_nan() {
            return EventOutcome::Ignored;
        }
        self.params.diameter_min = Some(min);
        self.params.diameter_max = Some(max);
        self.render()
    }

    pub fn set_filter_by_pois(&mut self, enabled: bool) -> EventOutcome {
        self.params.filter_by_pois = enabled;
        self.render()
    }

    pub fn toggle_filter_by_pois(&mut self) -> EventOutcome {
        self.set_filter_by_pois(!self.params.filter_by_pois)
    }

    /// Change one point's radius
    ///
    /// Only recomputes when the POI filter is active.
    pub fn set_max_distance(&mut self, id: PoiId, max_distance: Distance) -> Result<EventOutcome> {
        if !max_distance.value.is_finite() || max_distance.value < 0.0 {
            return Ok(EventOutcome::Ignored);
        }
        if !self.pois.set_max_distance(id, max_distance)? {
            return Ok(EventOutcome::Updated);
        }
        if self.params.filter_by_pois {
            Ok(self.render())
        } else {
            Ok(EventOutcome::Updated)
        }
    }

    pub fn start_drag(&mut self, id: PoiId) -> Result<EventOutcome> {
        let instruction = self.pois.start_drag(id)?;
        self.presenter.apply(&[instruction]);
        Ok(EventOutcome::Updated)
    }

    /// Move the dragged handle; never recomputes the filter
    pub fn update_drag(&mut self, id: PoiId, pixel: Pixel) -> EventOutcome {
        match self.pois.update_drag_position(id, pixel) {
            Some(instruction) => {
                self.presenter.apply(&[instruction]);
                EventOutcome::Updated
            }
            None => EventOutcome::Ignored,
        }
    }

    /// Drop the handle at `pixel` and commit its position
    ///
    /// Recomputes when the POI filter is active.
    pub fn end_drag(&mut self, id: PoiId, pixel: Pixel) -> Result<EventOutcome> {
        let instruction = self.pois.end_drag(id, pixel)?;
        self.presenter.apply(&[instruction]);
        if self.params.filter_by_pois {
            Ok(self.render())
        } else {
            Ok(EventOutcome::Updated)
        }
    }

    /// Select a visible record by id
    pub fn click(&mut self, id: RecordId) -> EventOutcome {
        let Some(point) = self.reconciler.get(id) else {
            return EventOutcome::NothingSelected;
        };
        let record = Arc::clone(&point.record);
        self.presenter.record_selected(&record);
        EventOutcome::Selected(record)
    }

    /// Select the visible record under a pixel
    pub fn click_at(&mut self, pixel: Pixel) -> EventOutcome {
        match self.reconciler.hit_test(pixel).map(|record| record.id) {
            Some(id) => self.click(id),
            None => EventOutcome::NothingSelected,
        }
    }

    pub fn handle(&mut self, event: UiEvent) -> Result<EventOutcome> {
        tracing::trace!(?event, "Handling event");
        let outcome = match event {
            UiEvent::RangeInput { bound, value } => self.set_range_bound(bound, &value),
            UiEvent::RangeSlider { min, max } => self.set_diameter_range(min, max),
            UiEvent::SetPoiFilter { enabled } => self.set_filter_by_pois(enabled),
            UiEvent::TogglePois => self.toggle_filter_by_pois(),
            UiEvent::SetMaxDistance { poi, value } => {
                self.set_max_distance(poi, Distance::new(value, self.distance_unit))?
            }
            UiEvent::DragStart { poi } => self.start_drag(poi)?,
            UiEvent::DragMove { poi, x, y } => self.update_drag(poi, Pixel::new(x, y)),
            UiEvent::DragEnd { poi, x, y } => self.end_drag(poi, Pixel::new(x, y))?,
            UiEvent::Click { id } => self.click(RecordId(id)),
            UiEvent::ClickAt { x, y } => self.click_at(Pixel::new(x, y)),
        };
        Ok(outcome)
    }

    /// The filtered subset for the current state, in dataset order
    pub fn filtered(&self) -> Vec<Arc<TreeRecord>> {
        match &self.dataset {
            Some(dataset) => {
                apply_filters(dataset, &self.params, self.pois.points(), self.projection.as_ref())
            }
            None => Vec::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Smallest and largest diameter, for initializing range controls
    pub fn diameter_extent(&self) -> Option<(f64, f64)> {
        self.dataset.as_ref().and_then(Dataset::diameter_extent)
    }

    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    pub fn pois(&self) -> &PoiStore {
        &self.pois
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    pub fn reconciler(&self) -> &RenderReconciler {
        &self.reconciler
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
