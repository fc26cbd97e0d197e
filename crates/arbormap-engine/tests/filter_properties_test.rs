//! Property tests for the filter engine and reconciler

use arbormap_core::config::MapSettings;
use arbormap_core::models::{Dataset, FilterParameters, GeoPosition, RecordId, TreeRecord};
use arbormap_engine::{apply_filters, RenderReconciler};
use arbormap_geo::MercatorProjection;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn dataset(diameters: &[f64]) -> Dataset {
    Dataset::new(
        diameters
            .iter()
            .enumerate()
            .map(|(i, diameter)| TreeRecord {
                id: RecordId(i as i64),
                position: GeoPosition::new(37.76 + i as f64 * 1e-4, -122.43),
                diameter: *diameter,
                species: "Acer rubrum :: Red Maple".to_string(),
                address: format!("{} Valencia St", i),
                plot_size: "3x3".to_string(),
            })
            .collect(),
    )
}

fn id_set(records: &[std::sync::Arc<TreeRecord>]) -> BTreeSet<RecordId> {
    records.iter().map(|r| r.id).collect()
}

fn bound() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(0.0f64..60.0)
}

proptest! {
    #[test]
    fn prop_filter_is_idempotent(
        diameters in prop::collection::vec(1.0f64..60.0, 0..40),
        min in bound(),
        max in bound(),
    ) {
        let projection = MercatorProjection::from_settings(&MapSettings::default());
        let data = dataset(&diameters);
        let params = FilterParameters { diameter_min: min, diameter_max: max, filter_by_pois: false };

        let once = apply_filters(&data, &params, &[], &projection);
        let twice = apply_filters(&data, &params, &[], &projection);
        prop_assert_eq!(id_set(&once), id_set(&twice));
    }

    #[test]
    fn prop_raising_min_never_adds(
        diameters in prop::collection::vec(1.0f64..60.0, 0..40),
        low in 0.0f64..30.0,
        step in 0.0f64..30.0,
    ) {
        let projection = MercatorProjection::from_settings(&MapSettings::default());
        let data = dataset(&diameters);

        let loose = FilterParameters { diameter_min: Some(low), ..Default::default() };
        let tight = FilterParameters { diameter_min: Some(low + step), ..Default::default() };

        let loose_ids = id_set(&apply_filters(&data, &loose, &[], &projection));
        let tight_ids = id_set(&apply_filters(&data, &tight, &[], &projection));
        prop_assert!(tight_ids.is_subset(&loose_ids));
    }

    #[test]
    fn prop_narrowing_range_never_adds(
        diameters in prop::collection::vec(1.0f64..60.0, 0..40),
        min in bound(),
        max in bound(),
        raise in 0.0f64..20.0,
        lower in 0.0f64..20.0,
    ) {
        let projection = MercatorProjection::from_settings(&MapSettings::default());
        let data = dataset(&diameters);

        // An absent bound narrows to a concrete one at the edge of the data
        let loose = FilterParameters { diameter_min: min, diameter_max: max, filter_by_pois: false };
        let tight = FilterParameters {
            diameter_min: Some(min.unwrap_or(0.0) + raise),
            diameter_max: Some(max.unwrap_or(60.0) - lower),
            filter_by_pois: false,
        };

        let loose_ids = id_set(&apply_filters(&data, &loose, &[], &projection));
        let tight_ids = id_set(&apply_filters(&data, &tight, &[], &projection));
        prop_assert!(tight_ids.is_subset(&loose_ids));
    }

    #[test]
    fn prop_rendered_set_matches_last_filter(
        diameters in prop::collection::vec(1.0f64..60.0, 0..40),
        steps in prop::collection::vec((bound(), bound()), 1..8),
    ) {
        let projection = MercatorProjection::from_settings(&MapSettings::default());
        let data = dataset(&diameters);
        let mut reconciler = RenderReconciler::new();

        for (min, max) in steps {
            let params = FilterParameters { diameter_min: min, diameter_max: max, filter_by_pois: false };
            let filtered = apply_filters(&data, &params, &[], &projection);
            reconciler.reconcile(&filtered, &projection);

            let rendered: BTreeSet<RecordId> = reconciler.rendered_ids().collect();
            prop_assert_eq!(rendered, id_set(&filtered));
        }
    }
}
