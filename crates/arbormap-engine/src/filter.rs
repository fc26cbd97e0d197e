//! Filter engine
//!
//! Filter parameters are compiled into a [`FilterPlan`]: a list of
//! [`RecordFilter`] predicates combined with logical AND. Evaluating the plan
//! never touches the source dataset; it returns a new collection of shared
//! record handles in source order.

use arbormap_core::models::{Dataset, Distance, FilterParameters, Pixel, PoiId, PointOfInterest, TreeRecord};
use arbormap_core::ports::Projection;
use arbormap_geo::DistanceCalculator;
use std::sync::Arc;

/// Radius constraint around one point of interest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoiRadius {
    pub id: PoiId,
    pub pixel: Pixel,
    pub max_distance: Distance,
}

/// A single predicate over tree records
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFilter {
    /// Keep records with `diameter >= min`
    DiameterMin(f64),
    /// Keep records with `diameter <= max`
    DiameterMax(f64),
    /// Keep records within range of every listed point
    WithinAllPois(Vec<PoiRadius>),
}

impl RecordFilter {
    fn matches(&self, record: &TreeRecord, calc: &DistanceCalculator<'_>) -> bool {
        match self {
            RecordFilter::DiameterMin(min) => record.diameter >= *min,
            RecordFilter::DiameterMax(max) => record.diameter <= *max,
            RecordFilter::WithinAllPois(radii) => radii.iter().all(|radius| {
                calc.distance_to(radius.pixel, record.position).within(&radius.max_distance)
            }),
        }
    }
}

/// Conjunction of record filters, ready to evaluate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPlan {
    filters: Vec<RecordFilter>,
}

impl FilterPlan {
    /// Compile the current parameters and point positions
    ///
    /// Diameter bounds come first; the radius check is last because it is
    /// the expensive one.
    pub fn from_parameters(
        params: &FilterParameters,
        pois: &[PointOfInterest],
        projection: &dyn Projection,
    ) -> Self {
        let mut filters = Vec::new();

        if let Some(min) = params.diameter_min {
            filters.push(RecordFilter::DiameterMin(min));
        }
        if let Some(max) = params.diameter_max {
            filters.push(RecordFilter::DiameterMax(max));
        }
        if params.filter_by_pois {
            let radii = pois
                .iter()
                .map(|poi| PoiRadius {
                    id: poi.id,
                    pixel: poi.pixel_position(projection),
                    max_distance: poi.max_distance,
                })
                .collect();
            filters.push(RecordFilter::WithinAllPois(radii));
        }

        Self { filters }
    }

    pub fn filters(&self) -> &[RecordFilter] {
        &self.filters
    }

    pub fn is_unrestricted(&self) -> bool {
        self.filters.is_empty()
    }

    /// Records passing every filter, in dataset order
    pub fn evaluate(&self, dataset: &Dataset, projection: &dyn Projection) -> Vec<Arc<TreeRecord>> {
        let calc = DistanceCalculator::new(projection);
        dataset
            .records()
            .iter()
            .filter(|record| self.filters.iter().all(|filter| filter.matches(record, &calc)))
            .cloned()
            .collect()
    }
}

/// Compute the filtered subset of the complete dataset
pub fn apply_filters(
    dataset: &Dataset,
    params: &FilterParameters,
    pois: &[PointOfInterest],
    projection: &dyn Projection,
) -> Vec<Arc<TreeRecord>> {
    let plan = FilterPlan::from_parameters(params, pois, projection);
    let filtered = plan.evaluate(dataset, projection);
    tracing::debug!(
        "Filtered {} of {} records with {} predicates",
        filtered.len(),
        dataset.len(),
        plan.filters().len()
    );
    filtered
}
