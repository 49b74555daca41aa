use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::filter::{ConstraintFilter, DistanceProvider, FilterReport, HaversineDistance};
use super::indices::IndexedCatalog;
use super::personalize::Personalizer;
use super::profile::{ApplicantProfile, ProfileValidationError};
use super::ranker::{Ranker, ScoredCandidate};
use super::weights::{self, WeightValidationError, WeightVector};

/// Result of a ranking request. An empty pool is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchOutcome {
    Ranked {
        candidates: Vec<ScoredCandidate>,
        weights: WeightVector,
        filter: FilterReport,
    },
    NoMatches {
        filter: FilterReport,
        guidance: Vec<String>,
    },
}

impl MatchOutcome {
    pub fn candidates(&self) -> &[ScoredCandidate] {
        match self {
            MatchOutcome::Ranked { candidates, .. } => candidates,
            MatchOutcome::NoMatches { .. } => &[],
        }
    }

    pub fn filter(&self) -> &FilterReport {
        match self {
            MatchOutcome::Ranked { filter, .. } | MatchOutcome::NoMatches { filter, .. } => filter,
        }
    }

    pub fn is_no_matches(&self) -> bool {
        matches!(self, MatchOutcome::NoMatches { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("invalid applicant profile: {0}")]
    Profile(#[from] ProfileValidationError),
    #[error("invalid priority weights: {0}")]
    Weights(#[from] WeightValidationError),
    #[error("top_k must be at least 1")]
    InvalidTopK,
}

impl MatchError {
    /// Caller-supplied input was rejected before any scoring ran.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MatchError::Profile(_) | MatchError::Weights(_) | MatchError::InvalidTopK
        )
    }
}

/// Filter, personalize and rank one profile against an indexed catalog.
pub struct MatchEngine<D = HaversineDistance> {
    filter: ConstraintFilter<D>,
    ranker: Ranker,
}

impl Default for MatchEngine<HaversineDistance> {
    fn default() -> Self {
        Self::new(ConstraintFilter::default(), Ranker::default())
    }
}

impl<D> MatchEngine<D>
where
    D: DistanceProvider,
{
    pub fn new(filter: ConstraintFilter<D>, ranker: Ranker) -> Self {
        Self { filter, ranker }
    }

    pub fn with_personalizer(filter: ConstraintFilter<D>, personalizer: Personalizer) -> Self {
        Self::new(filter, Ranker::new(personalizer))
    }

    pub fn filter(&self) -> &ConstraintFilter<D> {
        &self.filter
    }

    pub fn rank(
        &self,
        catalog: &IndexedCatalog,
        profile: &ApplicantProfile,
        top_k: usize,
    ) -> Result<MatchOutcome, MatchError> {
        if top_k == 0 {
            return Err(MatchError::InvalidTopK);
        }
        profile.validate()?;
        let weights = weights::resolve(profile.priorities.as_ref())?;

        let outcome = self.filter.apply(&catalog.entries, profile);
        if outcome.survivors.is_empty() {
            let guidance = outcome.report.guidance();
            info!(
                pool = catalog.len(),
                survivors = 0,
                "no institutions matched the profile constraints"
            );
            return Ok(MatchOutcome::NoMatches {
                filter: outcome.report,
                guidance,
            });
        }

        let candidates = self
            .ranker
            .rank(&outcome.survivors, profile, &weights, top_k);
        info!(
            pool = catalog.len(),
            survivors = outcome.survivors.len(),
            returned = candidates.len(),
            "ranking complete"
        );

        Ok(MatchOutcome::Ranked {
            candidates,
            weights,
            filter: outcome.report,
        })
    }
}
