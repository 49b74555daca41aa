use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::BracketedCatalog;
use super::engine::{MatchEngine, MatchError, MatchOutcome};
use super::explain::{Explainer, HighlightExplainer};
use super::filter::{DistanceProvider, FilterReport, HaversineDistance};
use super::indices::{DataAvailabilityWarning, IndexedCatalog};
use super::profile::ApplicantProfile;
use super::ranker::ScoredCandidate;
use super::selectivity::SelectivityBucket;
use super::weights::WeightVector;

/// Body of a ranking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub profile: ApplicantProfile,
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Flattened view of a [`MatchOutcome`] for API and CLI consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResponse {
    pub no_matches: bool,
    /// Income bracket whose prices were ranked; `None` for the default catalog.
    pub earnings_ceiling: Option<f64>,
    pub candidates: Vec<ScoredCandidate>,
    pub weights: Option<WeightVector>,
    pub filter: FilterReport,
    pub guidance: Vec<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub institutions: usize,
    pub selectivity: BTreeMap<SelectivityBucket, usize>,
    pub warnings: Vec<DataAvailabilityWarning>,
}

/// Service sharing indexed catalogs across ranking requests.
pub struct MatchService<D = HaversineDistance> {
    catalog: Arc<IndexedCatalog>,
    brackets: Vec<(f64, Arc<IndexedCatalog>)>,
    engine: Arc<MatchEngine<D>>,
    explainer: HighlightExplainer,
    default_top_k: usize,
}

impl MatchService<HaversineDistance> {
    pub fn with_defaults(catalog: IndexedCatalog, default_top_k: usize) -> Self {
        Self::new(Arc::new(catalog), MatchEngine::default(), default_top_k)
    }

    /// Index the default catalog and every income bracket.
    pub fn from_bracketed(bracketed: BracketedCatalog, default_top_k: usize) -> Self {
        let brackets = bracketed
            .brackets
            .into_par_iter()
            .map(|(ceiling, catalog)| (ceiling, catalog.into_indexed()))
            .collect();
        Self::with_defaults(bracketed.catalog.into_indexed(), default_top_k).with_brackets(brackets)
    }
}

impl<D> MatchService<D>
where
    D: DistanceProvider + 'static,
{
    pub fn new(catalog: Arc<IndexedCatalog>, engine: MatchEngine<D>, default_top_k: usize) -> Self {
        Self {
            catalog,
            brackets: Vec::new(),
            engine: Arc::new(engine),
            explainer: HighlightExplainer,
            default_top_k: default_top_k.max(1),
        }
    }

    pub fn with_brackets(mut self, brackets: Vec<(f64, IndexedCatalog)>) -> Self {
        self.brackets = brackets
            .into_iter()
            .map(|(ceiling, catalog)| (ceiling, Arc::new(catalog)))
            .collect();
        self
    }

    pub fn catalog(&self) -> &IndexedCatalog {
        &self.catalog
    }

    pub fn brackets(&self) -> impl Iterator<Item = f64> + '_ {
        self.brackets.iter().map(|(ceiling, _)| *ceiling)
    }

    /// The applicant's income bracket when the catalog carries it, else the default catalog.
    pub fn catalog_for(&self, profile: &ApplicantProfile) -> (Option<f64>, &IndexedCatalog) {
        let bracket = profile.earnings_ceiling().and_then(|wanted| {
            self.brackets
                .iter()
                .find(|(ceiling, _)| *ceiling == wanted)
        });
        match bracket {
            Some((ceiling, catalog)) => (Some(*ceiling), &**catalog),
            None => (None, &*self.catalog),
        }
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    /// Rank the catalog for one profile; `top_k` falls back to the configured default.
    pub fn rank(&self, request: &MatchRequest) -> Result<MatchResponse, MatchError> {
        let top_k = request.top_k.unwrap_or(self.default_top_k);
        let (earnings_ceiling, catalog) = self.catalog_for(&request.profile);
        debug!(?earnings_ceiling, institutions = catalog.len(), "catalog selected");
        let outcome = self.engine.rank(catalog, &request.profile, top_k)?;

        let response = match outcome {
            MatchOutcome::Ranked {
                candidates,
                weights,
                filter,
            } => {
                let highlights = self.explainer.explain(&candidates, &request.profile);
                MatchResponse {
                    no_matches: false,
                    earnings_ceiling,
                    candidates,
                    weights: Some(weights),
                    filter,
                    guidance: Vec::new(),
                    highlights,
                }
            }
            MatchOutcome::NoMatches { filter, guidance } => MatchResponse {
                no_matches: true,
                earnings_ceiling,
                candidates: Vec::new(),
                weights: None,
                filter,
                guidance,
                highlights: Vec::new(),
            },
        };

        Ok(response)
    }

    pub fn catalog_summary(&self) -> CatalogSummary {
        CatalogSummary {
            institutions: self.catalog.len(),
            selectivity: self.catalog.selectivity_distribution(),
            warnings: self.catalog.warnings.clone(),
        }
    }
}
