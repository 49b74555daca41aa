//! Sequential, narrowing constraint passes over the indexed catalog.

pub mod distance;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::Control;
use super::indices::IndexedInstitution;
use super::profile::{ApplicantProfile, MsiInterest};

pub use distance::{DistanceProvider, HaversineDistance, EARTH_RADIUS_MILES};

/// Institutions priced up to this multiple of the budget survive the budget pass.
pub const BUDGET_TOLERANCE: f64 = 1.5;

/// Constraint passes in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPass {
    Budget,
    ForProfit,
    ControlType,
    State,
    Region,
    Radius,
    Selectivity,
    Size,
    Urbanization,
    Carnegie,
    MinorityServing,
    GraduationRate,
}

impl FilterPass {
    pub const ORDER: [FilterPass; 12] = [
        FilterPass::Budget,
        FilterPass::ForProfit,
        FilterPass::ControlType,
        FilterPass::State,
        FilterPass::Region,
        FilterPass::Radius,
        FilterPass::Selectivity,
        FilterPass::Size,
        FilterPass::Urbanization,
        FilterPass::Carnegie,
        FilterPass::MinorityServing,
        FilterPass::GraduationRate,
    ];

    /// What the applicant can relax when this pass removed candidates.
    pub const fn guidance(self) -> &'static str {
        match self {
            FilterPass::Budget => "Increase your annual budget",
            FilterPass::ForProfit => "Allow for-profit institutions",
            FilterPass::ControlType => "Consider both public and private nonprofit institutions",
            FilterPass::State => "Add preferred states or turn off in-state only",
            FilterPass::Region => "Add more preferred regions",
            FilterPass::Radius => "Increase the maximum distance from home",
            FilterPass::Selectivity => "Include more selectivity categories",
            FilterPass::Size => "Relax the campus size preference",
            FilterPass::Urbanization => "Relax the campus setting preference",
            FilterPass::Carnegie => "Broaden the institution type preference",
            FilterPass::MinorityServing => "Broaden the minority-serving institution preference",
            FilterPass::GraduationRate => "Lower the minimum graduation rate",
        }
    }
}

/// Passes switched off for a filter instance. All passes run by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterToggles {
    disabled: BTreeSet<FilterPass>,
}

impl FilterToggles {
    pub fn disable(mut self, pass: FilterPass) -> Self {
        self.disabled.insert(pass);
        self
    }

    pub fn enable(mut self, pass: FilterPass) -> Self {
        self.disabled.remove(&pass);
        self
    }

    pub fn is_enabled(&self, pass: FilterPass) -> bool {
        !self.disabled.contains(&pass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterStep {
    pub pass: FilterPass,
    pub before: usize,
    pub after: usize,
}

impl FilterStep {
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub initial: usize,
    pub remaining: usize,
    pub steps: Vec<FilterStep>,
}

impl FilterReport {
    /// Relaxation hints for the passes that removed candidates, in pass order.
    pub fn guidance(&self) -> Vec<String> {
        if self.initial == 0 {
            return vec!["The catalog has no institutions to match against".to_string()];
        }
        self.steps
            .iter()
            .filter(|step| step.removed() > 0)
            .map(|step| step.pass.guidance().to_string())
            .collect()
    }
}

/// A surviving institution with the distance the radius pass measured, if any.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub entry: &'a IndexedInstitution,
    pub distance_miles: Option<f64>,
}

#[derive(Debug)]
pub struct FilterOutcome<'a> {
    pub survivors: Vec<Candidate<'a>>,
    pub report: FilterReport,
}

pub struct ConstraintFilter<D = HaversineDistance> {
    distance: D,
    toggles: FilterToggles,
}

impl Default for ConstraintFilter<HaversineDistance> {
    fn default() -> Self {
        Self::new(HaversineDistance)
    }
}

impl<D> ConstraintFilter<D>
where
    D: DistanceProvider,
{
    pub fn new(distance: D) -> Self {
        Self {
            distance,
            toggles: FilterToggles::default(),
        }
    }

    pub fn with_toggles(mut self, toggles: FilterToggles) -> Self {
        self.toggles = toggles;
        self
    }

    pub fn toggles(&self) -> &FilterToggles {
        &self.toggles
    }

    pub fn apply<'a>(
        &self,
        entries: &'a [IndexedInstitution],
        profile: &ApplicantProfile,
    ) -> FilterOutcome<'a> {
        let mut survivors: Vec<Candidate<'a>> = entries
            .iter()
            .map(|entry| Candidate {
                entry,
                distance_miles: None,
            })
            .collect();
        let mut report = FilterReport {
            initial: survivors.len(),
            ..FilterReport::default()
        };

        for pass in FilterPass::ORDER {
            if !self.toggles.is_enabled(pass) {
                continue;
            }
            let before = survivors.len();
            if let Some(narrowed) = self.run_pass(pass, &survivors, profile) {
                survivors = narrowed;
                debug!(pass = ?pass, before, after = survivors.len(), "constraint pass applied");
                report.steps.push(FilterStep {
                    pass,
                    before,
                    after: survivors.len(),
                });
            }
        }

        report.remaining = survivors.len();
        FilterOutcome { survivors, report }
    }

    /// `None` when the profile leaves this pass inactive.
    fn run_pass<'a>(
        &self,
        pass: FilterPass,
        candidates: &[Candidate<'a>],
        profile: &ApplicantProfile,
    ) -> Option<Vec<Candidate<'a>>> {
        match pass {
            FilterPass::Budget => {
                let ceiling = profile.annual_budget * BUDGET_TOLERANCE;
                Some(keep(candidates, |entry| {
                    entry
                        .institution
                        .net_price
                        .map_or(true, |price| price <= ceiling)
                }))
            }
            FilterPass::ForProfit => profile.exclude_for_profit.then(|| {
                keep(candidates, |entry| {
                    entry.institution.control != Some(Control::ForProfit)
                })
            }),
            FilterPass::ControlType => profile.control_preference.required().map(|required| {
                keep(candidates, |entry| entry.institution.control == Some(required))
            }),
            FilterPass::State => state_pass(candidates, profile),
            FilterPass::Region => (!profile.preferred_regions.is_empty()).then(|| {
                keep(candidates, |entry| {
                    entry
                        .institution
                        .region
                        .is_some_and(|region| profile.preferred_regions.contains(&region))
                })
            }),
            FilterPass::Radius => self.radius_pass(candidates, profile),
            FilterPass::Selectivity => profile.selectivity.excludes_any().then(|| {
                keep(candidates, |entry| profile.selectivity.admits(entry.selectivity))
            }),
            FilterPass::Size => profile.size_preference.map(|size| {
                keep(candidates, |entry| {
                    entry.institution.size.map_or(true, |actual| actual == size)
                })
            }),
            FilterPass::Urbanization => profile.urbanization_preference.map(|setting| {
                keep(candidates, |entry| {
                    entry
                        .institution
                        .urbanization
                        .map_or(true, |actual| actual == setting)
                })
            }),
            FilterPass::Carnegie => {
                if profile.carnegie_preference.is_empty() {
                    return None;
                }
                let matches = keep(candidates, |entry| {
                    entry
                        .institution
                        .carnegie
                        .is_some_and(|tier| profile.carnegie_preference.contains(&tier))
                });
                Some(if matches.is_empty() {
                    candidates.to_vec()
                } else {
                    matches
                })
            }
            FilterPass::MinorityServing => match profile.msi_interest? {
                MsiInterest::Specific(designation) => Some(keep(candidates, |entry| {
                    entry.institution.msi.has(designation)
                })),
                MsiInterest::Any => {
                    let matches = keep(candidates, |entry| entry.institution.msi.any());
                    Some(if matches.is_empty() {
                        candidates.to_vec()
                    } else {
                        matches
                    })
                }
            },
            FilterPass::GraduationRate => profile.min_graduation_rate.map(|floor| {
                keep(candidates, |entry| {
                    entry
                        .institution
                        .graduation
                        .overall
                        .is_some_and(|rate| rate >= floor)
                })
            }),
        }
    }

    fn radius_pass<'a>(
        &self,
        candidates: &[Candidate<'a>],
        profile: &ApplicantProfile,
    ) -> Option<Vec<Candidate<'a>>> {
        let origin = profile.origin?;
        let radius = profile.max_distance_miles?;

        Some(
            candidates
                .iter()
                .filter_map(|candidate| match candidate.entry.institution.location {
                    Some(location) => {
                        let miles = self.distance.distance_miles(origin, location);
                        (miles <= radius).then_some(Candidate {
                            entry: candidate.entry,
                            distance_miles: Some(miles),
                        })
                    }
                    None => Some(*candidate),
                })
                .collect(),
        )
    }
}

/// In-state-only takes precedence over the preferred-states list.
fn state_pass<'a>(
    candidates: &[Candidate<'a>],
    profile: &ApplicantProfile,
) -> Option<Vec<Candidate<'a>>> {
    let allowed: Vec<String> = if profile.in_state_only {
        vec![profile.home_state()?]
    } else {
        profile
            .preferred_states
            .iter()
            .map(|state| state.trim().to_ascii_uppercase())
            .filter(|state| !state.is_empty())
            .collect()
    };
    if allowed.is_empty() {
        return None;
    }

    Some(keep(candidates, |entry| {
        entry
            .institution
            .state
            .as_ref()
            .is_some_and(|state| allowed.contains(state))
    }))
}

fn keep<'a, F>(candidates: &[Candidate<'a>], predicate: F) -> Vec<Candidate<'a>>
where
    F: Fn(&IndexedInstitution) -> bool,
{
    candidates
        .iter()
        .filter(|candidate| predicate(candidate.entry))
        .copied()
        .collect()
}

