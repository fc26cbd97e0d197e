use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::position::GeoPosition;

/// Stable identity of a tree record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One cleaned row of the tree inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Unique identifier within the dataset
    pub id: RecordId,

    /// Where the tree stands
    pub position: GeoPosition,

    /// Diameter at breast height
    pub diameter: f64,

    /// Species code, `"<latin>::<common>"`
    pub species: String,

    /// Street address
    pub address: String,

    /// Plot size as recorded in the source
    pub plot_size: String,
}

/// The complete, immutable set of records loaded at startup
///
/// Records are shared behind `Arc` so that filtered snapshots never copy or
/// alias mutable state.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[Arc<TreeRecord>]>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self { records: Vec::new().into() }
    }
}

impl Dataset {
    /// Build a dataset, keeping the first occurrence of each identity
    pub fn new(records: Vec<TreeRecord>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let records: Vec<Arc<TreeRecord>> = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.id);
                if !fresh {
                    tracing::debug!("Dropping duplicate tree record {}", record.id);
                }
                fresh
            })
            .map(Arc::new)
            .collect();
        Self { records: records.into() }
    }

    pub fn records(&self) -> &[Arc<TreeRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Arc<TreeRecord>> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Smallest and largest diameter, used to seed range sliders
    pub fn diameter_extent(&self) -> Option<(f64, f64)> {
        self.records.iter().map(|record| record.diameter).fold(None, |extent, d| match extent {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, diameter: f64) -> TreeRecord {
        TreeRecord {
            id: RecordId(id),
            position: GeoPosition::new(37.77, -122.43),
            diameter,
            species: "Quercus agrifolia :: Coast Live Oak".to_string(),
            address: "100 Market St".to_string(),
            plot_size: "3x3".to_string(),
        }
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let dataset = Dataset::new(vec![record(1, 10.0), record(2, 4.0), record(1, 99.0)]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(RecordId(1)).unwrap().diameter, 10.0);
    }

    #[test]
    fn test_diameter_extent() {
        let dataset = Dataset::new(vec![record(1, 10.0), record(2, 4.0), record(3, 31.5)]);
        assert_eq!(dataset.diameter_extent(), Some((4.0, 31.5)));
        assert_eq!(Dataset::default().diameter_extent(), None);
    }

    #[test]
    fn test_order_preserved() {
        let dataset = Dataset::new(vec![record(5, 1.0), record(3, 1.0), record(4, 1.0)]);
        let ids: Vec<i64> = dataset.records().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![5, 3, 4]);
    }
}
