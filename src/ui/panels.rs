use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::FilterCriteria;
use crate::data::model::{Category, CleanedTable};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let (lower, upper) = table.price_bounds;
            ui.label(format!(
                "{} journeys loaded · price band £{lower:.2} – £{upper:.2}",
                table.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Render the tab strip below the menu bar.
pub fn tab_strip(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.title())
                .clicked()
            {
                state.active_tab = tab;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Filter row – one combo box per criterion
// ---------------------------------------------------------------------------

/// Which criteria a view exposes. Views that pre-filter on a column
/// (e.g. delay reasons on `Journey Status`) omit its combo box.
#[derive(Debug, Clone, Copy)]
pub struct FilterRow {
    pub purchase_type: bool,
    pub journey_status: bool,
}

/// Render a row of criterion combo boxes bound to `criteria`.
///
/// Every option list is the column's observed domain plus the "All"
/// sentinel, which maps to an unset criterion.
pub fn filter_row(
    ui: &mut Ui,
    id_prefix: &str,
    table: &CleanedTable,
    criteria: &mut FilterCriteria,
    row: FilterRow,
) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        criterion_combo(
            ui,
            format!("{id_prefix}_class"),
            Category::TicketClass,
            table.domain(Category::TicketClass),
            &mut criteria.ticket_class,
        );
        criterion_combo(
            ui,
            format!("{id_prefix}_type"),
            Category::TicketType,
            table.domain(Category::TicketType),
            &mut criteria.ticket_type,
        );
        if row.purchase_type {
            criterion_combo(
                ui,
                format!("{id_prefix}_purchase"),
                Category::PurchaseType,
                table.domain(Category::PurchaseType),
                &mut criteria.purchase_type,
            );
        }
        if row.journey_status {
            criterion_combo(
                ui,
                format!("{id_prefix}_status"),
                Category::JourneyStatus,
                table.domain(Category::JourneyStatus),
                &mut criteria.journey_status,
            );
        }
    });
}

fn criterion_combo(
    ui: &mut Ui,
    id: String,
    category: Category,
    domain: Option<&BTreeSet<String>>,
    selection: &mut Option<String>,
) {
    ui.label(category.to_string());
    let selected_text = selection.clone().unwrap_or_else(|| "All".to_string());
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(selection.is_none(), "All").clicked() {
                *selection = None;
            }
            let Some(values) = domain else {
                return;
            };
            for value in values {
                let is_selected = selection.as_deref() == Some(value.as_str());
                if ui.selectable_label(is_selected, value).clicked() {
                    *selection = Some(value.clone());
                }
            }
        });
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open journey data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.data_path = path;
        // A failed interactive load keeps the current table; the error
        // lands in the top bar.
        state.reload();
    }
}
