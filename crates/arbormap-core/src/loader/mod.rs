//! Raw-row contract for the tree inventory
//!
//! A loader produces [`RawRow`]s (field name to string). Only rows that pass
//! [`is_usable`] are kept, and each kept row is coerced into a
//! [`TreeRecord`] by [`clean`]. The resulting dataset keeps source order.

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Dataset, GeoPosition, RecordId, TreeRecord};
use crate::ports::DataLoader;

pub mod tabular;

pub use tabular::CsvLoader;

pub const FIELD_ID: &str = "TreeID";
pub const FIELD_LATITUDE: &str = "Latitude";
pub const FIELD_LONGITUDE: &str = "Longitude";
pub const FIELD_DIAMETER: &str = "DBH";
pub const FIELD_SPECIES: &str = "qSpecies";
pub const FIELD_ADDRESS: &str = "qAddress";
pub const FIELD_PLOT_SIZE: &str = "PlotSize";

/// Separator between the latin and common parts of a species code
const SPECIES_SEPARATOR: &str = "::";

/// One row of the source table, field name to raw string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Field present and non-empty
    fn has(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_empty())
    }
}

/// Whether a raw row carries everything a tree record needs
///
/// The species and zero-diameter checks run first; the presence check for
/// the remaining fields only runs when both pass.
pub fn is_usable(row: &RawRow) -> bool {
    let species = row.get(FIELD_SPECIES).unwrap_or_default();
    if species.split(SPECIES_SEPARATOR).nth(1) == Some("") {
        return false;
    }
    if row.get(FIELD_DIAMETER) == Some("0") {
        return false;
    }

    [
        FIELD_LATITUDE,
        FIELD_LONGITUDE,
        FIELD_SPECIES,
        FIELD_ADDRESS,
        FIELD_DIAMETER,
        FIELD_PLOT_SIZE,
    ]
    .iter()
    .all(|field| row.has(field))
}

/// Lenient numeric coercion: blank is zero, garbage is NaN
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn coerce_id(raw: &str) -> Option<RecordId> {
    let value = coerce_number(raw);
    // i64::MAX as f64 is 2^63, one past the largest id
    if value.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&value) {
        Some(RecordId(value as i64))
    } else {
        None
    }
}

/// Coerce a usable row into a record
///
/// Identity, diameter, latitude and longitude are converted to numbers;
/// species, address and plot size pass through. Returns `None` when the
/// identity is not an integer or the position or diameter is not a finite
/// number.
pub fn clean(row: &RawRow) -> Option<TreeRecord> {
    let id = coerce_id(row.get(FIELD_ID).unwrap_or_default())?;
    let diameter = coerce_number(row.get(FIELD_DIAMETER).unwrap_or_default());
    let position = GeoPosition::new(
        coerce_number(row.get(FIELD_LATITUDE).unwrap_or_default()),
        coerce_number(row.get(FIELD_LONGITUDE).unwrap_or_default()),
    );

    if !diameter.is_finite() || !position.is_finite() {
        return None;
    }

    Some(TreeRecord {
        id,
        position,
        diameter,
        species: row.get(FIELD_SPECIES).unwrap_or_default().to_string(),
        address: row.get(FIELD_ADDRESS).unwrap_or_default().to_string(),
        plot_size: row.get(FIELD_PLOT_SIZE).unwrap_or_default().to_string(),
    })
}

/// Apply the usability filter and cleaning to rows, in order
pub fn build_dataset(rows: &[RawRow]) -> Dataset {
    let mut rejected = 0usize;
    let records: Vec<TreeRecord> = rows
        .iter()
        .filter_map(|row| {
            let record = if is_usable(row) { clean(row) } else { None };
            if record.is_none() {
                rejected += 1;
                tracing::debug!(
                    "Skipping unusable row (TreeID={:?})",
                    row.get(FIELD_ID).unwrap_or_default()
                );
            }
            record
        })
        .collect();

    let dataset = Dataset::new(records);
    tracing::info!("Loaded {} tree records ({} rows rejected)", dataset.len(), rejected);
    dataset
}

/// Read all rows from a loader and build the complete dataset
pub async fn load_dataset(loader: &dyn DataLoader) -> Result<Dataset> {
    let rows = loader.load().await.inspect_err(|e| {
        tracing::warn!("Data load from {} failed: {}", loader.source_name(), e);
    })?;
    Ok(build_dataset(&rows))
}
