use super::profile::ApplicantProfile;
use super::ranker::ScoredCandidate;
use super::weights::IndexKind;

/// Turns ranked results into prose. Implementations read scores and never change them.
pub trait Explainer {
    fn explain(&self, candidates: &[ScoredCandidate], profile: &ApplicantProfile) -> Vec<String>;
}

/// Names each candidate's strongest and weakest index and its selectivity bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightExplainer;

impl Explainer for HighlightExplainer {
    fn explain(&self, candidates: &[ScoredCandidate], profile: &ApplicantProfile) -> Vec<String> {
        candidates
            .iter()
            .map(|candidate| {
                let (strongest, strongest_score) = extreme(candidate, |a, b| a > b);
                let (weakest, weakest_score) = extreme(candidate, |a, b| a < b);

                let mut line = format!(
                    "#{} {}: strongest on {} ({:.2}), weakest on {} ({:.2}); {} for your profile",
                    candidate.rank,
                    candidate.institution.name,
                    strongest.label(),
                    strongest_score,
                    weakest.label(),
                    weakest_score,
                    candidate.selectivity.label(),
                );

                if let Some(price) = candidate.institution.net_price {
                    if price > profile.annual_budget {
                        line.push_str(&format!(
                            "; net price ${:.0} exceeds your ${:.0} budget",
                            price, profile.annual_budget
                        ));
                    }
                }
                if let Some(miles) = candidate.distance_miles {
                    line.push_str(&format!("; {:.0} miles from home", miles));
                }
                line
            })
            .collect()
    }
}

/// First index in [`IndexKind::ALL`] order that wins `better` against all others.
fn extreme<F>(candidate: &ScoredCandidate, better: F) -> (IndexKind, f64)
where
    F: Fn(f64, f64) -> bool,
{
    IndexKind::ALL
        .iter()
        .map(|kind| (*kind, candidate.indices.get(*kind)))
        .fold(None, |best: Option<(IndexKind, f64)>, (kind, score)| match best {
            Some((_, best_score)) if !better(score, best_score) => best,
            _ => Some((kind, score)),
        })
        .unwrap_or((IndexKind::Roi, 0.0))
}
