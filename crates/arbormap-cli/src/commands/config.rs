//! Config command implementation

use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use arbormap_core::config::CliConfigOverrides;
use std::path::{Path, PathBuf};

pub fn execute(config_path: Option<&Path>, data: Option<PathBuf>, output: &OutputWriter) -> Result<()> {
    let overrides = CliConfigOverrides { data_path: data, ..Default::default() };
    let config = load_config(config_path, overrides)?;

    let mut entries: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry { key, value, source: format!("{:?}", source) })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        output.result(ConfigOutput { entries })?;
    } else {
        output.section("Configuration Values");
        output.table(entries);
    }

    Ok(())
}
