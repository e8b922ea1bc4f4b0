//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::export::csv::CsvOptions;
use crate::planner::SearchConfig;

/// Shared application state.
///
/// The catalogue sits behind a single lock: reads share it, inserts and
/// anything that may rebuild the route graph take it exclusively.
#[derive(Clone)]
pub struct AppState {
    /// Places and the derived route graph
    pub catalog: Arc<RwLock<Catalog>>,

    /// Route planner configuration
    pub config: Arc<SearchConfig>,

    /// Dialect for CSV downloads
    pub csv: Arc<CsvOptions>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(catalog: Catalog, config: SearchConfig, csv: CsvOptions) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            config: Arc::new(config),
            csv: Arc::new(csv),
        }
    }
}
