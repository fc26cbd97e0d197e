//! GeoJSON export of filtered trees

use anyhow::{Context, Result};
use arbormap_core::models::TreeRecord;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde_json::{Map, Value as JsonValue};
use std::path::Path;
use std::sync::Arc;

/// One point feature per tree, with the tree's attributes as properties
pub fn to_feature_collection(records: &[Arc<TreeRecord>]) -> FeatureCollection {
    let features = records
        .iter()
        .map(|record| {
            let mut properties = Map::new();
            properties.insert("tree_id".to_string(), JsonValue::from(record.id.0));
            properties.insert("dbh".to_string(), JsonValue::from(record.diameter));
            properties.insert("species".to_string(), JsonValue::from(record.species.clone()));
            properties.insert("address".to_string(), JsonValue::from(record.address.clone()));
            properties.insert("plot_size".to_string(), JsonValue::from(record.plot_size.clone()));

            let position = record.position;
            Feature {
                geometry: Some(Geometry::new(Value::Point(vec![
                    position.longitude,
                    position.latitude,
                ]))),
                properties: Some(properties),
                id: None,
                bbox: None,
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

/// Write the records to `path`; returns the number of features written
pub async fn write_geojson(path: &Path, records: &[Arc<TreeRecord>]) -> Result<usize> {
    let collection = to_feature_collection(records);
    let count = collection.features.len();
    let content = GeoJson::from(collection).to_string();

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write GeoJSON to {}", path.display()))?;

    tracing::info!("Wrote {} features to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbormap_core::models::{GeoPosition, RecordId};

    fn tree() -> Arc<TreeRecord> {
        Arc::new(TreeRecord {
            id: RecordId(42),
            position: GeoPosition::new(37.77, -122.42),
            diameter: 16.0,
            species: "Ginkgo biloba :: Maidenhair Tree".to_string(),
            address: "42 Page St".to_string(),
            plot_size: "3x3".to_string(),
        })
    }

    #[test]
    fn test_feature_uses_lon_lat_order() {
        let collection = to_feature_collection(&[tree()]);
        let feature = &collection.features[0];

        match &feature.geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords.as_slice(), &[-122.42, 37.77]),
            other => panic!("unexpected geometry {:?}", other),
        }
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["tree_id"], 42);
        assert_eq!(properties["species"], "Ginkgo biloba :: Maidenhair Tree");
    }

    #[tokio::test]
    async fn test_write_geojson_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trees.geojson");

        assert_eq!(write_geojson(&path, &[tree(), tree()]).await.unwrap(), 2);

        let parsed: GeoJson = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        match parsed {
            GeoJson::FeatureCollection(fc) => assert_eq!(fc.features.len(), 2),
            other => panic!("expected a feature collection, got {:?}", other),
        }
    }
}
