//! Filter command implementation

use crate::cli::FilterArgs;
use crate::config_loader::load_config;
use crate::export::write_geojson;
use crate::output::OutputWriter;
use crate::output_types::{FilterOutput, TreeRow};
use anyhow::{Context, Result};
use arbormap_core::config::{parse_distance_unit, CliConfigOverrides};
use arbormap_core::loader::CsvLoader;
use arbormap_core::models::DiameterBound;
use arbormap_engine::{EventOutcome, LogPresenter, MapController};
use std::path::{Path, PathBuf};

pub async fn execute(
    args: FilterArgs,
    config_path: Option<&Path>,
    data: Option<PathBuf>,
    output: &OutputWriter,
) -> Result<()> {
    let distance_unit = args.unit.as_deref().map(parse_distance_unit).transpose()?;
    let overrides = CliConfigOverrides {
        data_path: data,
        max_distance: args.max_distance,
        distance_unit,
    };
    let settings = load_config(config_path, overrides)?.settings();

    let mut controller = MapController::new(&settings, LogPresenter);
    controller
        .load(&CsvLoader::new(&settings.data_path))
        .await
        .with_context(|| format!("Failed to load tree inventory {}", settings.data_path.display()))?;

    let bounds = [(DiameterBound::Min, &args.dbh_min), (DiameterBound::Max, &args.dbh_max)];
    for (bound, raw) in bounds {
        if let Some(raw) = raw {
            if controller.set_range_bound(bound, raw) == EventOutcome::Ignored {
                output.warning(format!("Ignoring non-numeric {:?} bound '{}'", bound, raw));
            }
        }
    }
    if args.near_pois {
        controller.set_filter_by_pois(true);
    }

    let filtered = controller.filtered();
    let total = controller.dataset().map_or(0, |dataset| dataset.len());

    let geojson = match &args.geojson {
        Some(path) => {
            write_geojson(path, &filtered).await?;
            Some(path.display().to_string())
        }
        None => None,
    };

    if output.is_json() {
        output.result(FilterOutput {
            source: settings.data_path.display().to_string(),
            total,
            visible: filtered.len(),
            parameters: controller.params().clone(),
            diameter_extent: controller.diameter_extent(),
            trees: filtered.iter().map(|record| TreeRow::from(record.as_ref())).collect(),
            geojson,
        })?;
        return Ok(());
    }

    output.section("Tree Inventory");
    output.kv("Source", settings.data_path.display());
    if let Some((min, max)) = controller.diameter_extent() {
        output.kv("DBH range", format!("{} - {}", min, max));
    }
    if args.near_pois {
        for poi in controller.pois().points() {
            output.kv(
                format!("Radius of POI {}", poi.id),
                format!("{} {:?}", poi.max_distance.value, poi.max_distance.unit),
            );
        }
    }
    output.kv("Matching", format!("{} of {}", filtered.len(), total));

    let rows: Vec<TreeRow> =
        filtered.iter().take(args.limit).map(|record| TreeRow::from(record.as_ref())).collect();
    output.table(rows);
    if filtered.len() > args.limit {
        output.info(format!("{} more not shown (use --limit)", filtered.len() - args.limit));
    }
    if let Some(path) = geojson {
        output.success(format!("Wrote {} trees to {}", filtered.len(), path));
    }

    Ok(())
}
