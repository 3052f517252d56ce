use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{status_color, ColorMap};
use crate::data::aggregate::{count_by_group, sum_by_group, top_n_by_count};
use crate::data::filter::filtered_indices;
use crate::data::model::{Category, CleanedTable};
use crate::state::{AppState, Tab};
use crate::ui::charts;
use crate::ui::panels::{self, FilterRow};

const ACCENT: Color32 = Color32::from_rgb(0x4a, 0x90, 0xd9);

// ---------------------------------------------------------------------------
// View dispatch
// ---------------------------------------------------------------------------

/// Render the active tab. Every view re-derives its subset from the
/// shared cleaned table and its own criteria; nothing is cached between
/// interactions.
pub fn active_view(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = state.table.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data loaded  (File → Open…)");
        });
        return;
    };

    match state.active_tab {
        Tab::Dashboard => dashboard(ui, state, &table),
        Tab::Routes => routes(ui, state, &table),
        Tab::Revenue => revenue(ui, state, &table),
        Tab::Performance => performance(ui, state, &table),
        Tab::Customers => customers(ui, &table),
    }
}

// ---------------------------------------------------------------------------
// Tab 1: KPI dashboard
// ---------------------------------------------------------------------------

fn dashboard(ui: &mut Ui, state: &mut AppState, table: &CleanedTable) {
    ui.heading("Key Performance Indicators");
    ui.label("Use the filters to see how the main KPIs change per segment.");
    ui.add_space(4.0);

    panels::filter_row(
        ui,
        "kpi",
        table,
        &mut state.kpi_criteria,
        FilterRow {
            purchase_type: false,
            journey_status: true,
        },
    );
    ui.separator();

    let subset = filtered_indices(table, &state.kpi_criteria);
    let total_journeys = subset.len();
    let total_revenue: f64 = table.select(&subset).map(|r| r.price).sum();
    let avg_price = if subset.is_empty() {
        0.0
    } else {
        total_revenue / total_journeys as f64
    };

    ui.columns(3, |columns: &mut [Ui]| {
        kpi_card(&mut columns[0], "Total Journeys", &thousands(total_journeys as u64));
        kpi_card(
            &mut columns[1],
            "Total Revenue",
            &format!("£ {}", thousands(total_revenue as u64)),
        );
        kpi_card(&mut columns[2], "Average Price", &format!("£ {avg_price:.2}"));
    });

    ui.separator();
    ui.label("Data sample for the selected segment:");
    sample_table(ui, table, &subset);
}

fn kpi_card(ui: &mut Ui, title: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.label(RichText::new(title).strong());
        ui.heading(value);
    });
}

fn sample_table(ui: &mut Ui, table: &CleanedTable, subset: &[usize]) {
    const TITLES: [&str; 8] = [
        "Date of Journey",
        "Route",
        "Ticket Class",
        "Ticket Type",
        "Purchase Type",
        "Railcard",
        "Journey Status",
        "Price",
    ];
    let sample: Vec<usize> = subset.iter().copied().take(5).collect();

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true), TITLES.len())
        .header(20.0, |mut header| {
            for title in TITLES {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            body.rows(18.0, sample.len(), |mut row| {
                let rec = &table.records[sample[row.index()]];
                let cells = [
                    rec.journey_date.format("%Y-%m-%d").to_string(),
                    rec.route.clone(),
                    rec.ticket_class.clone(),
                    rec.ticket_type.clone(),
                    rec.purchase_type.clone(),
                    rec.railcard.clone(),
                    rec.journey_status.clone(),
                    format!("£{:.2}", rec.price),
                ];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Tab 2: popular routes & travel times
// ---------------------------------------------------------------------------

fn routes(ui: &mut Ui, state: &mut AppState, table: &CleanedTable) {
    ui.heading("Popular Routes & Travel Times");

    ui.strong("Top 10 Most Popular Routes");
    panels::filter_row(
        ui,
        "route",
        table,
        &mut state.route_criteria,
        FilterRow {
            purchase_type: true,
            journey_status: true,
        },
    );

    let subset = filtered_indices(table, &state.route_criteria);
    if subset.is_empty() {
        warning(ui, "No data available for the selected filters.");
    } else {
        let top_routes = top_n_by_count(table.select(&subset), |r| r.route.clone(), 10);
        stacked_by_class(
            ui,
            "top_routes",
            state.class_colors.as_ref(),
            table,
            &subset,
            &top_routes,
            |r| r.route.clone(),
            "Number of Journeys",
        );
        insight(
            ui,
            &format!(
                "The {} route is currently the most popular for this selection.",
                top_routes[0].0
            ),
        );
    }

    ui.separator();
    ui.strong("Journeys by Hour of Day");
    ui.label("Overall travel peaks across all journeys (ignores the filters above).");

    let by_hour = count_by_group(
        table.records.iter().filter(|r| r.departure_hour.is_some()),
        |r| r.departure_hour.unwrap(),
    );
    let counts: Vec<(u32, usize)> = by_hour.into_iter().collect();
    charts::hourly_bars(ui, "journeys_by_hour", &counts, ACCENT);
}

// ---------------------------------------------------------------------------
// Tab 3: revenue
// ---------------------------------------------------------------------------

fn revenue(ui: &mut Ui, state: &mut AppState, table: &CleanedTable) {
    ui.heading("Revenue Insights");

    ui.columns(2, |columns: &mut [Ui]| {
        let ui = &mut columns[0];
        ui.strong("Revenue by Ticket Type");
        let by_type = sum_by_group(table.records.iter(), |r| r.ticket_type.clone(), |r| r.price);
        let mut series: Vec<(String, f64, Color32)> = by_type
            .into_iter()
            .map(|(ticket_type, total)| (ticket_type, total, ACCENT))
            .collect();
        series.sort_by(|a, b| b.1.total_cmp(&a.1));
        charts::category_bars(ui, "revenue_by_type", &series, "Total Revenue (£)");

        let ui = &mut columns[1];
        ui.strong("Revenue by Ticket Class");
        let by_class = sum_by_group(table.records.iter(), |r| r.ticket_class.clone(), |r| r.price);
        let series: Vec<(String, f64, Color32)> = by_class
            .into_iter()
            .map(|(class, total)| {
                let color = state
                    .class_colors
                    .as_ref()
                    .map(|cm| cm.color_for(&class))
                    .unwrap_or(Color32::GRAY);
                (class, total, color)
            })
            .collect();
        charts::category_bars(ui, "revenue_by_class", &series, "Total Revenue (£)");
    });
}

// ---------------------------------------------------------------------------
// Tab 4: on-time performance
// ---------------------------------------------------------------------------

fn performance(ui: &mut Ui, state: &mut AppState, table: &CleanedTable) {
    ui.heading("Journey Performance");

    ui.strong("Journey Status Overview");
    let status_counts = count_by_group(table.records.iter(), |r| r.journey_status.clone());
    let series: Vec<(String, f64, Color32)> = status_counts
        .into_iter()
        .map(|(status, count)| {
            let color = status_color(&status).unwrap_or(Color32::GRAY);
            (status, count as f64, color)
        })
        .collect();
    charts::category_bars(ui, "status_distribution", &series, "Number of Journeys");

    ui.separator();
    ui.strong("Reasons for Delays");
    panels::filter_row(
        ui,
        "delay",
        table,
        &mut state.delay_criteria,
        FilterRow {
            purchase_type: true,
            journey_status: false,
        },
    );

    // The status criterion is pinned to Delayed here, so its combo box
    // is omitted from the row above.
    let subset: Vec<usize> = filtered_indices(table, &state.delay_criteria)
        .into_iter()
        .filter(|&i| table.records[i].journey_status == "Delayed")
        .collect();

    if subset.is_empty() {
        insight(ui, "No delayed journeys in the selected data to analyze.");
        return;
    }

    let top_reasons = top_n_by_count(table.select(&subset), |r| r.reason_for_delay.clone(), 10);
    stacked_by_class(
        ui,
        "delay_reasons",
        state.class_colors.as_ref(),
        table,
        &subset,
        &top_reasons,
        |r| r.reason_for_delay.clone(),
        "Number of Incidents",
    );
    insight(
        ui,
        &format!(
            "'{}' is the most common cause of delays for this selection.",
            top_reasons[0].0
        ),
    );
}

// ---------------------------------------------------------------------------
// Tab 5: purchase behavior
// ---------------------------------------------------------------------------

fn customers(ui: &mut Ui, table: &CleanedTable) {
    ui.heading("Purchase Behavior");

    ui.columns(2, |columns: &mut [Ui]| {
        distribution_chart(
            &mut columns[0],
            "purchase_distribution",
            "Purchase Type Distribution",
            table,
            Category::PurchaseType,
        );
        distribution_chart(
            &mut columns[1],
            "railcard_distribution",
            "Railcard Usage",
            table,
            Category::Railcard,
        );
    });
}

fn distribution_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    table: &CleanedTable,
    category: Category,
) {
    ui.strong(title);
    let colors = table.domain(category).map(ColorMap::new);
    let counts = count_by_group(table.records.iter(), |r| category.value(r).to_string());
    let series: Vec<(String, f64, Color32)> = counts
        .into_iter()
        .map(|(value, count)| {
            let color = colors
                .as_ref()
                .map(|cm| cm.color_for(&value))
                .unwrap_or(Color32::GRAY);
            (value, count as f64, color)
        })
        .collect();
    charts::category_bars(ui, id, &series, "Number of Tickets");
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Horizontal bars for a ranked column, stacked by ticket class.
fn stacked_by_class<F>(
    ui: &mut Ui,
    id: &str,
    class_colors: Option<&ColorMap>,
    table: &CleanedTable,
    subset: &[usize],
    ranked: &[(String, usize)],
    key: F,
    value_label: &str,
) where
    F: Fn(&crate::data::model::JourneyRecord) -> String,
{
    // Largest category at the top of the chart.
    let categories: Vec<String> = ranked.iter().rev().map(|(name, _)| name.clone()).collect();

    let classes: Vec<String> = table
        .domain(Category::TicketClass)
        .map(|d| d.iter().cloned().collect())
        .unwrap_or_default();

    let per_class = count_by_group(table.select(subset), |r| {
        (key(r), r.ticket_class.clone())
    });

    let mut series: Vec<(String, Vec<f64>, Color32)> = Vec::new();
    for class in classes {
        let values: Vec<f64> = categories
            .iter()
            .map(|cat| {
                per_class
                    .get(&(cat.clone(), class.clone()))
                    .copied()
                    .unwrap_or(0) as f64
            })
            .collect();
        if values.iter().any(|&v| v > 0.0) {
            let color = class_colors
                .map(|cm| cm.color_for(&class))
                .unwrap_or(Color32::GRAY);
            series.push((class, values, color));
        }
    }

    charts::stacked_horizontal_bars(ui, id, &categories, &series, value_label);
}

fn insight(ui: &mut Ui, text: &str) {
    ui.add_space(4.0);
    ui.label(RichText::new(text).italics().weak());
}

fn warning(ui: &mut Ui, text: &str) {
    ui.add_space(4.0);
    ui.label(RichText::new(text).color(Color32::from_rgb(0xd9, 0xa0, 0x21)));
}

/// Render an integer with thousands separators.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
