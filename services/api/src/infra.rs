use chrono::{DateTime, Utc};
use college_match::config::MatchConfig;
use college_match::error::AppError;
use college_match::matching::{ApplicantProfile, BracketedCatalog, CatalogImporter, MatchService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

/// Twelve-institution sample shipped with the binary for demos and local runs.
pub(crate) const BUNDLED_CATALOG: &str =
    include_str!("../../../crates/college-match/data/sample_catalog.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) started_at: DateTime<Utc>,
}

/// Import the configured catalog, falling back to the bundled sample.
pub(crate) fn load_catalog(
    path: Option<&Path>,
    earnings_ceiling: Option<f64>,
) -> Result<BracketedCatalog, AppError> {
    let importer = CatalogImporter::with_earnings_ceiling(earnings_ceiling);
    let catalog = match path {
        Some(path) => importer.import_bracketed_path(path)?,
        None => {
            info!("no catalog path configured; using the bundled sample catalog");
            importer.import_bracketed_reader(BUNDLED_CATALOG.as_bytes())?
        }
    };

    if !catalog.absent_columns().is_empty() {
        warn!(columns = ?catalog.absent_columns(), "catalog is missing indexed columns");
    }
    Ok(catalog)
}

/// Index the catalog (and any income brackets) behind a ranking service.
pub(crate) fn load_service(
    path: Option<&Path>,
    earnings_ceiling: Option<f64>,
    default_top_k: usize,
) -> Result<MatchService, AppError> {
    let catalog = load_catalog(path, earnings_ceiling)?;
    Ok(MatchService::from_bracketed(catalog, default_top_k))
}

pub(crate) fn load_configured_service(config: &MatchConfig) -> Result<MatchService, AppError> {
    load_service(
        config.catalog_path.as_deref(),
        config.earnings_ceiling,
        config.default_top_k,
    )
}

/// Parse an applicant profile document. Omitted fields take their defaults.
pub(crate) fn read_profile(path: &Path) -> Result<ApplicantProfile, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_profile(&raw)
}

pub(crate) fn parse_profile(raw: &str) -> Result<ApplicantProfile, AppError> {
    Ok(serde_json::from_str(raw)?)
}
