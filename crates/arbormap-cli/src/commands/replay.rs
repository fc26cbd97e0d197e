//! Replay command implementation

use crate::cli::ReplayArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{ReplayOutput, ReplayStep};
use anyhow::{Context, Result};
use arbormap_core::config::CliConfigOverrides;
use arbormap_core::loader::CsvLoader;
use arbormap_engine::{EventOutcome, MapController, RecordingPresenter, RenderInstruction, UiEvent};
use std::path::{Path, PathBuf};

pub async fn execute(
    args: ReplayArgs,
    config_path: Option<&Path>,
    data: Option<PathBuf>,
    output: &OutputWriter,
) -> Result<()> {
    let script = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let events: Vec<UiEvent> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid event script {}", args.script.display()))?;

    let overrides = CliConfigOverrides { data_path: data, ..Default::default() };
    let settings = load_config(config_path, overrides)?.settings();

    let mut controller = MapController::new(&settings, RecordingPresenter::new());
    let initial = controller
        .load(&CsvLoader::new(&settings.data_path))
        .await
        .with_context(|| format!("Failed to load tree inventory {}", settings.data_path.display()))?;

    let mut steps = Vec::with_capacity(events.len());
    for (index, event) in events.into_iter().enumerate() {
        let name = event_name(&event);
        let seen = controller.presenter().batches.len();

        let outcome = controller
            .handle(event)
            .with_context(|| format!("Event {} ({}) failed", index + 1, name))?;

        let (added, removed) = count_changes(&controller.presenter().batches[seen..]);
        steps.push(ReplayStep {
            index: index + 1,
            event: name,
            outcome: outcome_label(&outcome).to_string(),
            added,
            removed,
            visible: controller.reconciler().len(),
            selected: outcome.selected_id().map(|id| id.0),
        });
    }

    let result = ReplayOutput {
        script: args.script.display().to_string(),
        initial_visible: initial.visible,
        final_visible: controller.reconciler().len(),
        steps,
    };

    if output.is_json() {
        output.result(result)?;
    } else {
        output.section("Replay");
        output.kv("Script", &result.script);
        output.kv("Initially visible", result.initial_visible);
        let final_visible = result.final_visible;
        output.table(result.steps);
        output.kv("Finally visible", final_visible);
    }

    Ok(())
}

fn event_name(event: &UiEvent) -> String {
    serde_json::to_value(event)
        .ok()
        .and_then(|value| value.get("type").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

fn outcome_label(outcome: &EventOutcome) -> &'static str {
    match outcome {
        EventOutcome::Rendered(_) => "rendered",
        EventOutcome::Updated => "updated",
        EventOutcome::Ignored => "ignored",
        EventOutcome::Selected(_) => "selected",
        EventOutcome::NothingSelected => "nothing selected",
    }
}

fn count_changes(batches: &[Vec<RenderInstruction>]) -> (usize, usize) {
    batches.iter().flatten().fold((0, 0), |(added, removed), instruction| match instruction {
        RenderInstruction::AddPoint { .. } => (added + 1, removed),
        RenderInstruction::RemovePoint { .. } => (added, removed + 1),
        _ => (added, removed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbormap_core::models::{PoiId, RecordId};

    #[test]
    fn test_event_name() {
        assert_eq!(event_name(&UiEvent::TogglePois), "toggle_pois");
        assert_eq!(event_name(&UiEvent::DragStart { poi: PoiId::A }), "drag_start");
    }

    #[test]
    fn test_count_changes() {
        let batches = vec![
            vec![RenderInstruction::RemovePoint { id: RecordId(1) }],
            vec![RenderInstruction::RaisePoi { id: PoiId::B }],
        ];
        assert_eq!(count_changes(&batches), (0, 1));
    }
}
