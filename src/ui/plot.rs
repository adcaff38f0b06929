use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use squeeze_bench::Column;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Force vs gap plot (central panel)
// ---------------------------------------------------------------------------

/// Column on the x axis: gap, or displacement for labs that do not export
/// the gap when the fallback is enabled.
fn x_column(state: &AppState) -> Column {
    let has_gap = state
        .dataset
        .as_ref()
        .and_then(|ds| ds.iter().flat_map(|(_, _, recs)| recs).next())
        .map_or(true, |rec| rec.column(Column::Gap).is_some());
    if has_gap || !state.settings.gap_axis_fallback {
        Column::Gap
    } else {
        Column::Displacement
    }
}

/// Render the force-gap plot in the central panel.
pub fn force_gap_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder to view experiments  (File → Open folder…)");
        });
        return;
    }

    let x = x_column(state);

    Plot::new("force_gap_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(x.axis_label())
        .y_axis_label(Column::Force.axis_label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for visible in state.visible() {
                let Some(pairs) = visible.record.pairs(x, Column::Force) else {
                    continue;
                };

                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(visible.label))
                    .unwrap_or(Color32::LIGHT_BLUE);

                // One legend entry per material/configuration.
                let name = format!("{} {}", visible.material, visible.label);

                let points: PlotPoints = pairs.into_iter().collect();
                let line = Line::new(points).name(&name).color(color).width(1.5);

                plot_ui.line(line);
            }
        });
}
