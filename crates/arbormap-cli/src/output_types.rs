use arbormap_core::models::{FilterParameters, TreeRecord};
use serde::Serialize;
use tabled::Tabled;

/// Output for the filter command
#[derive(Debug, Serialize)]
pub struct FilterOutput {
    pub source: String,
    pub total: usize,
    pub visible: usize,
    pub parameters: FilterParameters,
    pub diameter_extent: Option<(f64, f64)>,
    pub trees: Vec<TreeRow>,
    pub geojson: Option<String>,
}

/// One tree, as printed by the filter command
#[derive(Debug, Serialize, Tabled)]
pub struct TreeRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "DBH")]
    pub diameter: f64,
    #[tabled(rename = "Species")]
    pub species: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Latitude")]
    pub latitude: f64,
    #[tabled(rename = "Longitude")]
    pub longitude: f64,
}

impl From<&TreeRecord> for TreeRow {
    fn from(record: &TreeRecord) -> Self {
        Self {
            id: record.id.0,
            diameter: record.diameter,
            species: record.species.clone(),
            address: record.address.clone(),
            latitude: record.position.latitude,
            longitude: record.position.longitude,
        }
    }
}

/// Output for the replay command
#[derive(Debug, Serialize)]
pub struct ReplayOutput {
    pub script: String,
    pub initial_visible: usize,
    pub steps: Vec<ReplayStep>,
    pub final_visible: usize,
}

/// What one replayed event did
#[derive(Debug, Serialize, Tabled)]
pub struct ReplayStep {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Event")]
    pub event: String,
    #[tabled(rename = "Outcome")]
    pub outcome: String,
    #[tabled(rename = "Added")]
    pub added: usize,
    #[tabled(rename = "Removed")]
    pub removed: usize,
    #[tabled(rename = "Visible")]
    pub visible: usize,
    #[tabled(rename = "Selected", display_with = "display_selected")]
    pub selected: Option<i64>,
}

fn display_selected(selected: &Option<i64>) -> String {
    selected.map(|id| id.to_string()).unwrap_or_default()
}

/// Output for the config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub entries: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
