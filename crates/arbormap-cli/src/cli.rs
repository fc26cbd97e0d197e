use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Arbormap - Filter and explore a city tree inventory
#[derive(Parser, Debug)]
#[command(name = "arbormap")]
#[command(about = "Filter and explore a city tree inventory", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML); defaults to ./arbormap.toml when present
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tree inventory CSV, overriding the configured data path
    #[arg(long, global = true, value_name = "CSV")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the inventory and list the trees passing the filters
    Filter(FilterArgs),

    /// Feed a recorded script of map interactions through the controller
    Replay(ReplayArgs),

    /// Show the resolved configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// Minimum diameter at breast height (empty for no bound)
    #[arg(long, value_name = "DBH", allow_hyphen_values = true)]
    pub dbh_min: Option<String>,

    /// Maximum diameter at breast height (empty for no bound)
    #[arg(long, value_name = "DBH", allow_hyphen_values = true)]
    pub dbh_max: Option<String>,

    /// Keep only trees within range of every point of interest
    #[arg(long)]
    pub near_pois: bool,

    /// Radius around each point of interest, in the configured unit
    #[arg(long, value_name = "DISTANCE")]
    pub max_distance: Option<f64>,

    /// Distance unit (meters, kilometers, miles, feet)
    #[arg(long, value_name = "UNIT")]
    pub unit: Option<String>,

    /// Maximum number of rows to print
    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Also write the filtered trees as a GeoJSON FeatureCollection
    #[arg(long, value_name = "PATH")]
    pub geojson: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// JSON file holding an array of interaction events
    pub script: PathBuf,
}
