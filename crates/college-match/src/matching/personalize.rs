use serde::{Deserialize, Serialize};

use super::indices::IndexedInstitution;
use super::normalize::NEUTRAL;
use super::profile::{ApplicantProfile, MsiInterest};
use super::selectivity::SelectivityBucket;
use super::weights::{IndexKind, WeightVector};

/// Tunable multipliers and thresholds applied per applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationPolicy {
    pub over_budget_rate: f64,
    pub max_over_budget_penalty: f64,
    pub race_specific_share: f64,
    pub msi_bonus: f64,
    pub support_threshold: f64,
    pub support_boost: f64,
    pub field_strength_share: f64,
    pub research_bonus: f64,
    pub preference_share: f64,
    pub international_threshold: f64,
    pub international_bonus: f64,
    pub strong_test_multiplier: f64,
}

impl Default for PersonalizationPolicy {
    fn default() -> Self {
        Self {
            over_budget_rate: 0.3,
            max_over_budget_penalty: 0.4,
            race_specific_share: 0.7,
            msi_bonus: 1.1,
            support_threshold: 0.6,
            support_boost: 1.15,
            field_strength_share: 0.7,
            research_bonus: 1.2,
            preference_share: 0.5,
            international_threshold: 0.6,
            international_bonus: 1.15,
            strong_test_multiplier: 1.1,
        }
    }
}

/// The seven index values for one candidate after applicant adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersonalizedIndices {
    pub roi: f64,
    pub affordability: f64,
    pub equity: f64,
    pub support: f64,
    pub academic_fit: f64,
    pub environment: f64,
    pub access: f64,
}

impl PersonalizedIndices {
    pub fn get(&self, kind: IndexKind) -> f64 {
        match kind {
            IndexKind::Roi => self.roi,
            IndexKind::Affordability => self.affordability,
            IndexKind::Equity => self.equity,
            IndexKind::Support => self.support,
            IndexKind::AcademicFit => self.academic_fit,
            IndexKind::Environment => self.environment,
            IndexKind::Access => self.access,
        }
    }

    /// Weighted sum over all seven indices.
    pub fn composite(&self, weights: &WeightVector) -> f64 {
        weights
            .iter()
            .map(|(kind, weight)| weight * self.get(kind))
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Personalizer {
    policy: PersonalizationPolicy,
}

impl Personalizer {
    pub fn new(policy: PersonalizationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PersonalizationPolicy {
        &self.policy
    }

    pub fn personalize(
        &self,
        entry: &IndexedInstitution,
        profile: &ApplicantProfile,
    ) -> PersonalizedIndices {
        PersonalizedIndices {
            roi: entry.base.roi,
            affordability: self.affordability(entry, profile),
            equity: self.equity(entry, profile),
            support: self.support(entry, profile),
            academic_fit: self.academic_fit(entry, profile),
            environment: self.environment(entry, profile),
            access: self.access(entry, profile),
        }
    }

    /// Parent or standard base score, less a capped penalty for exceeding the budget.
    pub fn affordability(&self, entry: &IndexedInstitution, profile: &ApplicantProfile) -> f64 {
        let base = if profile.student_parent {
            entry.base.affordability_parent
        } else {
            entry.base.affordability
        };

        let budget = profile.annual_budget;
        let penalty = match entry.institution.net_price {
            Some(price) if price > budget && budget > 0.0 => {
                let excess_fraction = (price - budget) / budget;
                (excess_fraction * self.policy.over_budget_rate)
                    .min(self.policy.max_over_budget_penalty)
            }
            Some(price) if price > budget => self.policy.max_over_budget_penalty,
            _ => 0.0,
        };

        (base - penalty).max(0.0)
    }

    pub fn equity(&self, entry: &IndexedInstitution, profile: &ApplicantProfile) -> f64 {
        let race_specific = profile
            .race_ethnicity
            .graduation_group()
            .map(|group| entry.components.graduation_for(group))
            .unwrap_or(NEUTRAL);
        let share = self.policy.race_specific_share;
        let score = share * race_specific + (1.0 - share) * entry.base.equity_parity;

        let msi_match = match profile.msi_interest {
            Some(MsiInterest::Specific(designation)) => entry.institution.msi.has(designation),
            Some(MsiInterest::Any) => entry.institution.msi.any(),
            None => false,
        };
        if msi_match {
            (score * self.policy.msi_bonus).min(1.0)
        } else {
            score
        }
    }

    /// Boost only already-strong support for applicants who need it.
    pub fn support(&self, entry: &IndexedInstitution, profile: &ApplicantProfile) -> f64 {
        let base = entry.base.support;
        if profile.wants_support() && base > self.policy.support_threshold {
            (base * self.policy.support_boost).min(1.0)
        } else {
            base
        }
    }

    pub fn academic_fit(&self, entry: &IndexedInstitution, profile: &ApplicantProfile) -> f64 {
        let mut score = entry.base.academic;
        if let Some(field) = profile.declared_field() {
            let share = self.policy.field_strength_share;
            score = share * entry.components.strength_for(field) + (1.0 - share) * score;
        }
        if profile.research_opportunities && entry.institution.is_doctoral() {
            score = (score * self.policy.research_bonus).min(1.0);
        }
        score
    }

    pub fn environment(&self, entry: &IndexedInstitution, profile: &ApplicantProfile) -> f64 {
        let mut score = entry.base.environment_diversity;

        let mut checks = 0u8;
        let mut matches = 0u8;
        if let Some(size) = profile.size_preference {
            checks += 1;
            if entry.institution.size == Some(size) {
                matches += 1;
            }
        }
        if let Some(setting) = profile.urbanization_preference {
            checks += 1;
            if entry.institution.urbanization == Some(setting) {
                matches += 1;
            }
        }
        if checks > 0 {
            let match_rate = f64::from(matches) / f64::from(checks);
            let share = self.policy.preference_share;
            score = (1.0 - share) * score + share * match_rate;
        }

        if profile.international
            && entry.components.international_presence > self.policy.international_threshold
        {
            score = (score * self.policy.international_bonus).min(1.0);
        }
        score
    }

    pub fn access(&self, entry: &IndexedInstitution, profile: &ApplicantProfile) -> f64 {
        let mut multiplier = alignment_multiplier(entry.selectivity, profile.gpa);
        if profile.has_strong_test_scores() {
            multiplier *= self.policy.strong_test_multiplier;
        }
        (entry.base.access * multiplier).min(1.0)
    }
}

/// Selectivity/GPA alignment factor for the Access index.
pub fn alignment_multiplier(bucket: SelectivityBucket, gpa: f64) -> f64 {
    match bucket {
        SelectivityBucket::Safety if gpa >= 3.0 => 1.2,
        SelectivityBucket::Target if (2.5..=3.8).contains(&gpa) => 1.1,
        SelectivityBucket::Reach if gpa >= 3.7 => 1.0,
        SelectivityBucket::Reach if gpa < 3.3 => 0.7,
        SelectivityBucket::Open => 1.3,
        _ => 1.0,
    }
}
