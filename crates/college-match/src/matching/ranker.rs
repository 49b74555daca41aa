use rayon::prelude::*;
use serde::Serialize;

use super::domain::Institution;
use super::filter::Candidate;
use super::personalize::{PersonalizedIndices, Personalizer};
use super::profile::ApplicantProfile;
use super::selectivity::SelectivityBucket;
use super::weights::WeightVector;

/// One ranked result. Built per request and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub rank: usize,
    pub institution: Institution,
    pub selectivity: SelectivityBucket,
    pub indices: PersonalizedIndices,
    pub composite: f64,
    pub distance_miles: Option<f64>,
    /// Catalog position used to break composite ties.
    pub catalog_position: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    personalizer: Personalizer,
}

impl Ranker {
    pub fn new(personalizer: Personalizer) -> Self {
        Self { personalizer }
    }

    pub fn personalizer(&self) -> &Personalizer {
        &self.personalizer
    }

    /// Score every candidate, sort by composite descending and keep the first `top_k`.
    ///
    /// Scoring runs in parallel; results come back in catalog order so the stable sort
    /// breaks ties by catalog position.
    pub fn rank(
        &self,
        candidates: &[Candidate<'_>],
        profile: &ApplicantProfile,
        weights: &WeightVector,
        top_k: usize,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<(&Candidate<'_>, PersonalizedIndices, f64)> = candidates
            .par_iter()
            .map(|candidate| {
                let indices = self.personalizer.personalize(candidate.entry, profile);
                let composite = indices.composite(weights);
                (candidate, indices, composite)
            })
            .collect();

        scored.sort_by(|(left, _, left_score), (right, _, right_score)| {
            right_score
                .total_cmp(left_score)
                .then_with(|| left.entry.position.cmp(&right.entry.position))
        });
        scored.truncate(top_k);

        scored
            .into_iter()
            .enumerate()
            .map(|(index, (candidate, indices, composite))| ScoredCandidate {
                rank: index + 1,
                institution: candidate.entry.institution.clone(),
                selectivity: candidate.entry.selectivity,
                indices,
                composite,
                distance_miles: candidate.distance_miles,
                catalog_position: candidate.entry.position,
            })
            .collect()
    }
}
