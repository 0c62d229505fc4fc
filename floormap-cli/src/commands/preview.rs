//! `preview` command.
//!
//! Builds the composition against the headless view and control, prints the
//! base layers and the overlay entries shown on startup, then replays each
//! `--select` as if the user had picked that level.

use clap::Args;
use floormap::headless::{EntryKind, HeadlessLayerControl, HeadlessMapView};
use floormap::{BaseLayerChange, Pane, Renderable, Webmap, WebmapOptions};

use super::common::{self, MapArgs};
use crate::error::CliError;

type PreviewWebmap = Webmap<HeadlessMapView, HeadlessLayerControl>;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub inputs: MapArgs,

    /// Simulate selecting a level (repeatable, applied in order)
    #[arg(short, long = "select", value_name = "LEVEL")]
    pub select: Vec<String>,
}

/// Run the preview command.
pub fn run(args: PreviewArgs) -> Result<(), CliError> {
    let (config, description) = common::load_inputs(&args.inputs)?;
    let mut webmap = Webmap::build(WebmapOptions::new(
        HeadlessMapView::new(),
        HeadlessLayerControl::new(),
        config,
        description,
    ))?;

    for line in summary(&webmap) {
        println!("{}", line);
    }

    for level in &args.select {
        select(&mut webmap, level);
        println!();
        println!("Selected {}:", level);
        for line in control_state(&webmap) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Pick `level` in the control; names the control does not list are
/// delivered to the listeners as-is.
fn select(webmap: &mut PreviewWebmap, level: &str) {
    if !webmap.select_level(level) {
        webmap
            .view_mut()
            .emit_base_layer_change(&BaseLayerChange::new(level));
    }
}

/// Describe the composition right after initialization.
fn summary(webmap: &PreviewWebmap) -> Vec<String> {
    let mut lines = vec![
        format!("Map: {}", webmap.map_name()),
        format!("Strategy: {}", webmap.config().strategy()),
        format!("Resolver: {}", webmap.path_resolver().name()),
        String::new(),
        "Base layers:".to_string(),
    ];

    if let Some(base_layers) = webmap.base_layers() {
        for (level, base) in base_layers.iter() {
            lines.push(format!("  {} {}", level, base.id()));
            if let Some(group) = base.as_group() {
                lines.extend(group.layers().iter().map(|l| format!("    {}", describe(l))));
            }
        }
    }

    lines.push(String::new());
    lines.extend(control_state(webmap));
    lines
}

/// Active level, the base layer the view shows, and the overlay entries
/// the control currently lists.
fn control_state(webmap: &PreviewWebmap) -> Vec<String> {
    let control = webmap.control();
    let shown: Vec<&str> = control
        .entries()
        .iter()
        .filter(|e| e.kind == EntryKind::Base && webmap.view().has_layer(e.id))
        .map(|e| e.label.as_str())
        .collect();

    let mut lines = vec![
        format!(
            "Active level: {}",
            webmap.active_level().as_deref().unwrap_or("(none)")
        ),
        format!(
            "Base layer shown: {}",
            if shown.is_empty() {
                "(none)".to_string()
            } else {
                shown.join(", ")
            }
        ),
    ];

    let overlays = control.overlay_labels();
    if overlays.is_empty() {
        lines.push("Overlays: (none)".to_string());
    } else {
        lines.push("Overlays:".to_string());
        lines.extend(overlays.iter().map(|label| format!("  {}", label)));
    }
    lines
}

fn describe(layer: &Renderable) -> String {
    let pane = match layer.pane() {
        Pane::Underlay => " [underlay]",
        Pane::Default => "",
    };
    format!(
        "{} {} {}{}",
        layer.kind(),
        layer.id(),
        layer.location().unwrap_or("-"),
        pane
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use floormap::{MapConfig, MapDescription};

    const TILES_CONFIG: &str = "\
[layer_settings]
type = tiles

[layer.electrical]
display = Electrical
";

    fn webmap() -> PreviewWebmap {
        let description = MapDescription::from_json_str(
            r#"{
                "name": "hq",
                "bounds": [[0, 0], [100, 100]],
                "layers": ["floor", "electrical"],
                "levels": { "L1": {}, "L2": { "underlays": ["basement"] } },
                "mainLevel": "L1"
            }"#,
        )
        .unwrap();
        let config = MapConfig::from_ini_str(TILES_CONFIG).unwrap();

        Webmap::build(WebmapOptions::new(
            HeadlessMapView::new(),
            HeadlessLayerControl::new(),
            config,
            description,
        ))
        .unwrap()
    }

    #[test]
    fn test_summary_lists_levels_and_overlays() {
        let lines = summary(&webmap());

        assert_eq!(lines[0], "Map: hq");
        assert_eq!(lines[1], "Strategy: tiles (256px)");
        assert_eq!(lines[2], "Resolver: tiled");
        assert!(lines
            .iter()
            .any(|l| l.contains("maps/hq/basement/floor/{z}/{x}/{y}.png [underlay]")));
        assert!(lines.contains(&"Active level: L1".to_string()));
        assert!(lines.contains(&"  Electrical".to_string()));
    }

    #[test]
    fn test_control_state_after_selecting_level() {
        let mut webmap = webmap();
        select(&mut webmap, "L2");

        assert_eq!(
            control_state(&webmap),
            [
                "Active level: L2",
                "Base layer shown: L2",
                "Overlays:",
                "  Electrical"
            ]
        );
    }

    #[test]
    fn test_control_state_after_unknown_selection() {
        let mut webmap = webmap();
        select(&mut webmap, "roof");

        assert_eq!(
            control_state(&webmap),
            [
                "Active level: (none)",
                "Base layer shown: L1",
                "Overlays: (none)"
            ]
        );
    }
}
