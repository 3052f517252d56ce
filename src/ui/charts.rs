use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

// ---------------------------------------------------------------------------
// Bar chart helpers (aggregated series in, egui_plot calls out)
// ---------------------------------------------------------------------------

const CHART_HEIGHT: f32 = 280.0;

/// Vertical bar chart over labelled categories, one colour per bar.
pub fn category_bars(ui: &mut Ui, id: &str, series: &[(String, f64, Color32)], value_label: &str) {
    let labels: Vec<String> = series.iter().map(|(label, _, _)| label.clone()).collect();
    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, (label, value, color))| {
            Bar::new(i as f64, *value).name(label).fill(*color).width(0.6)
        })
        .collect();

    Plot::new(id.to_string())
        .y_axis_label(value_label)
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Bar chart of counts keyed by hour of day (0–23).
pub fn hourly_bars(ui: &mut Ui, id: &str, counts: &[(u32, usize)], color: Color32) {
    let bars: Vec<Bar> = counts
        .iter()
        .map(|&(hour, count)| {
            Bar::new(hour as f64, count as f64)
                .name(format!("{hour:02}:00"))
                .fill(color)
                .width(0.8)
        })
        .collect();

    Plot::new(id.to_string())
        .x_axis_label("Hour of Day (24-hour format)")
        .y_axis_label("Number of Journeys")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Horizontal bars over labelled categories, stacked by a second
/// categorical column (one chart per stack series, legend enabled).
pub fn stacked_horizontal_bars(
    ui: &mut Ui,
    id: &str,
    categories: &[String],
    series: &[(String, Vec<f64>, Color32)],
    value_label: &str,
) {
    let labels: Vec<String> = categories.to_vec();
    let mut charts: Vec<BarChart> = Vec::with_capacity(series.len());

    for (name, values, color) in series {
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, value)| Bar::new(i as f64, *value).width(0.6))
            .collect();
        let mut chart = BarChart::new(bars)
            .name(name)
            .color(*color)
            .horizontal();
        {
            let below: Vec<&BarChart> = charts.iter().collect();
            chart = chart.stack_on(&below);
        }
        charts.push(chart);
    }

    Plot::new(id.to_string())
        .legend(Legend::default())
        .x_axis_label(value_label)
        .y_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Label integer grid marks with their category name, everything else
/// stays blank.
fn axis_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 0.05 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
