use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::FilterCriteria;
use crate::data::loader::TableCache;
use crate::data::model::{Category, CleanedTable};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Routes,
    Revenue,
    Performance,
    Customers,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Routes,
        Tab::Revenue,
        Tab::Performance,
        Tab::Customers,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Routes => "Route Analysis",
            Tab::Revenue => "Revenue Analysis",
            Tab::Performance => "Performance Analysis",
            Tab::Customers => "Customer Behavior",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Selection lives here as plain `FilterCriteria` values, one per tab
/// that filters, and is passed by reference into the pure filter and
/// aggregation functions. The core holds no selection state.
pub struct AppState {
    /// Memoizing loader; re-running it with unchanged file contents
    /// hands back the same table.
    pub cache: TableCache,

    /// Path of the currently loaded file.
    pub data_path: PathBuf,

    /// The cleaned table, shared and read-only after construction.
    pub table: Option<Arc<CleanedTable>>,

    pub active_tab: Tab,

    /// KPI segment selection (class, type, status).
    pub kpi_criteria: FilterCriteria,
    /// Route-analysis selection (all four columns).
    pub route_criteria: FilterCriteria,
    /// Delay-reason selection (status column excluded in the UI).
    pub delay_criteria: FilterCriteria,

    /// Colours for ticket-class chart series.
    pub class_colors: Option<ColorMap>,

    /// Load error shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            cache: TableCache::default(),
            data_path,
            table: None,
            active_tab: Tab::Dashboard,
            kpi_criteria: FilterCriteria::default(),
            route_criteria: FilterCriteria::default(),
            delay_criteria: FilterCriteria::default(),
            class_colors: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded table: reset selections, rebuild colours.
    pub fn set_table(&mut self, table: Arc<CleanedTable>) {
        self.kpi_criteria = FilterCriteria::default();
        self.route_criteria = FilterCriteria::default();
        self.delay_criteria = FilterCriteria::default();

        self.class_colors = table
            .domain(Category::TicketClass)
            .map(ColorMap::new);

        self.table = Some(table);
        self.status_message = None;
    }

    /// Load (or re-load) the table at `data_path` through the cache.
    pub fn reload(&mut self) {
        let path = self.data_path.clone();
        match self.cache.load(&path) {
            Ok(table) => {
                log::info!("loaded {} journeys from {}", table.len(), path.display());
                self.set_table(table);
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
