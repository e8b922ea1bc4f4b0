use std::error::Error;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tour_server::catalog::Catalog;
use tour_server::config::AppConfig;
use tour_server::export::csv::import_file;
use tour_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().inspect_err(|e| error!("{e}"))?;
    let mut catalog = Catalog::new(config.min_degree, config.graph.clone())?;

    // Load seed places. A missing file is fatal; bad data is not, the rows
    // read before it are kept.
    if let Some(path) = &config.seed_csv {
        info!(path = %path.display(), "loading seed places");
        match import_file(path, &config.csv, |entity| catalog.insert(entity)) {
            Ok(report) => info!(
                inserted = report.inserted,
                duplicates = report.duplicates.len(),
                "seed places loaded"
            ),
            Err(e) if e.is_io() => {
                error!("{e}");
                return Err(e.into());
            }
            Err(e) => warn!("seed import stopped early: {e}"),
        }
    }
    info!(places = catalog.index().len(), "catalogue ready");

    let state = AppState::new(catalog, config.search.clone(), config.csv.clone());
    let app = create_router(state);

    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Tour planner listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health             - Health check");
    info!("  GET  /places             - List places");
    info!("  POST /places             - Register a place");
    info!("  POST /places/:id/comments - Comment on a place");
    info!("  POST /routes/plan        - Plan routes");
    info!("  GET  /map                - Interactive map");
    info!("  GET  /index.dot          - Index structure (Graphviz)");
    info!("  GET  /places.csv         - Download places");

    axum::serve(listener, app).await?;
    Ok(())
}
