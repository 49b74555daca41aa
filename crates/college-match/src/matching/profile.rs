use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{
    CarnegieTier, Control, FieldOfStudy, GeoPoint, MsiDesignation, RaceGroup, SizeCategory,
    Urbanization,
};
use super::selectivity::SelectivityBucket;
use super::weights::DeclaredPriorities;

const STRONG_SAT: u16 = 1400;
const STRONG_ACT: u8 = 31;
const NONTRADITIONAL_AGE: u8 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestScoreStatus {
    Submitted,
    #[default]
    TestOptional,
    NoTest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestScores {
    pub status: TestScoreStatus,
    pub sat: Option<u16>,
    pub act: Option<u8>,
}

/// Self-reported race/ethnicity. Only selects the graduation-rate column used for Equity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceEthnicity {
    Black,
    Hispanic,
    White,
    Asian,
    Native,
    Pacific,
    TwoOrMore,
    #[default]
    PreferNotToSay,
}

impl RaceEthnicity {
    pub fn graduation_group(self) -> Option<RaceGroup> {
        match self {
            RaceEthnicity::Black => Some(RaceGroup::Black),
            RaceEthnicity::White => Some(RaceGroup::White),
            RaceEthnicity::Asian => Some(RaceGroup::Asian),
            RaceEthnicity::Native => Some(RaceGroup::Native),
            RaceEthnicity::Pacific => Some(RaceGroup::Pacific),
            RaceEthnicity::Hispanic | RaceEthnicity::TwoOrMore | RaceEthnicity::PreferNotToSay => {
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPreference {
    Public,
    PrivateNonprofit,
    #[default]
    Either,
}

impl ControlPreference {
    pub fn required(self) -> Option<Control> {
        match self {
            ControlPreference::Public => Some(Control::Public),
            ControlPreference::PrivateNonprofit => Some(Control::PrivateNonprofit),
            ControlPreference::Either => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsiInterest {
    Specific(MsiDesignation),
    Any,
}

/// Buckets the applicant wants to see. Everything is included unless switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectivityInclusion {
    pub safety: bool,
    pub target: bool,
    pub reach: bool,
    pub open: bool,
}

impl Default for SelectivityInclusion {
    fn default() -> Self {
        Self {
            safety: true,
            target: true,
            reach: true,
            open: true,
        }
    }
}

impl SelectivityInclusion {
    /// Unknown is always admitted.
    pub fn admits(&self, bucket: SelectivityBucket) -> bool {
        match bucket {
            SelectivityBucket::Safety => self.safety,
            SelectivityBucket::Target => self.target,
            SelectivityBucket::Reach => self.reach,
            SelectivityBucket::Open => self.open,
            SelectivityBucket::Unknown => true,
        }
    }

    pub fn excludes_any(&self) -> bool {
        !(self.safety && self.target && self.reach && self.open)
    }
}

/// Everything the engine knows about one applicant. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantProfile {
    pub gpa: f64,
    pub test_scores: TestScores,
    pub intended_field: FieldOfStudy,

    pub annual_budget: f64,
    pub family_income: Option<f64>,
    pub work_study_needed: bool,

    pub race_ethnicity: RaceEthnicity,

    pub first_generation: bool,
    pub student_parent: bool,
    pub international: bool,
    pub nontraditional: bool,
    pub age: Option<u8>,

    pub home_state: Option<String>,
    pub in_state_only: bool,
    pub preferred_states: Vec<String>,
    pub preferred_regions: Vec<u8>,
    /// Geocoded home location; required when `max_distance_miles` is set.
    pub origin: Option<GeoPoint>,
    pub max_distance_miles: Option<f64>,

    pub size_preference: Option<SizeCategory>,
    pub urbanization_preference: Option<Urbanization>,
    pub control_preference: ControlPreference,
    pub carnegie_preference: Vec<CarnegieTier>,
    pub msi_interest: Option<MsiInterest>,

    pub research_opportunities: bool,
    pub small_class_sizes: bool,
    pub strong_support_services: bool,

    pub selectivity: SelectivityInclusion,
    pub exclude_for_profit: bool,
    pub min_graduation_rate: Option<f64>,

    pub priorities: Option<DeclaredPriorities>,
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            gpa: 3.0,
            test_scores: TestScores::default(),
            intended_field: FieldOfStudy::Undecided,
            annual_budget: 20_000.0,
            family_income: None,
            work_study_needed: false,
            race_ethnicity: RaceEthnicity::default(),
            first_generation: false,
            student_parent: false,
            international: false,
            nontraditional: false,
            age: None,
            home_state: None,
            in_state_only: false,
            preferred_states: Vec::new(),
            preferred_regions: Vec::new(),
            origin: None,
            max_distance_miles: None,
            size_preference: None,
            urbanization_preference: None,
            control_preference: ControlPreference::default(),
            carnegie_preference: Vec::new(),
            msi_interest: None,
            research_opportunities: false,
            small_class_sizes: false,
            strong_support_services: false,
            selectivity: SelectivityInclusion::default(),
            exclude_for_profit: true,
            min_graduation_rate: None,
            priorities: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileValidationError {
    #[error("GPA must be between 0.0 and 4.0 (got {0})")]
    GpaOutOfRange(f64),
    #[error("annual budget must be a non-negative amount (got {0})")]
    NegativeBudget(f64),
    #[error("family income must be a non-negative amount (got {0})")]
    NegativeIncome(f64),
    #[error("SAT score must be between 400 and 1600 (got {0})")]
    SatOutOfRange(u16),
    #[error("ACT score must be between 1 and 36 (got {0})")]
    ActOutOfRange(u8),
    #[error("test score status is 'submitted' but no SAT or ACT score was provided")]
    MissingSubmittedScore,
    #[error("in-state-only search requires a home state")]
    InStateWithoutHomeState,
    #[error("a distance limit requires a home location")]
    RadiusWithoutOrigin,
    #[error("distance limit must be a positive number of miles (got {0})")]
    NonPositiveRadius(f64),
    #[error("home location ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidOrigin { latitude: f64, longitude: f64 },
    #[error("minimum graduation rate must be between 0 and 100 (got {0})")]
    MinGraduationRateOutOfRange(f64),
}

impl ApplicantProfile {
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if !(0.0..=4.0).contains(&self.gpa) {
            return Err(ProfileValidationError::GpaOutOfRange(self.gpa));
        }
        if !(self.annual_budget >= 0.0) || !self.annual_budget.is_finite() {
            return Err(ProfileValidationError::NegativeBudget(self.annual_budget));
        }
        if let Some(income) = self.family_income {
            if !(income >= 0.0) {
                return Err(ProfileValidationError::NegativeIncome(income));
            }
        }

        if let Some(sat) = self.test_scores.sat {
            if !(400..=1600).contains(&sat) {
                return Err(ProfileValidationError::SatOutOfRange(sat));
            }
        }
        if let Some(act) = self.test_scores.act {
            if !(1..=36).contains(&act) {
                return Err(ProfileValidationError::ActOutOfRange(act));
            }
        }
        if self.test_scores.status == TestScoreStatus::Submitted
            && self.test_scores.sat.is_none()
            && self.test_scores.act.is_none()
        {
            return Err(ProfileValidationError::MissingSubmittedScore);
        }

        if self.in_state_only && self.home_state().is_none() {
            return Err(ProfileValidationError::InStateWithoutHomeState);
        }

        if let Some(radius) = self.max_distance_miles {
            if !(radius > 0.0) {
                return Err(ProfileValidationError::NonPositiveRadius(radius));
            }
            if self.origin.is_none() {
                return Err(ProfileValidationError::RadiusWithoutOrigin);
            }
        }
        if let Some(origin) = self.origin {
            if !(-90.0..=90.0).contains(&origin.latitude)
                || !(-180.0..=180.0).contains(&origin.longitude)
            {
                return Err(ProfileValidationError::InvalidOrigin {
                    latitude: origin.latitude,
                    longitude: origin.longitude,
                });
            }
        }

        if let Some(rate) = self.min_graduation_rate {
            if !(0.0..=100.0).contains(&rate) {
                return Err(ProfileValidationError::MinGraduationRateOutOfRange(rate));
            }
        }

        Ok(())
    }

    /// Uppercased home state, ignoring blanks.
    pub fn home_state(&self) -> Option<String> {
        self.home_state
            .as_deref()
            .map(str::trim)
            .filter(|state| !state.is_empty())
            .map(str::to_ascii_uppercase)
    }

    pub fn is_nontraditional(&self) -> bool {
        self.nontraditional || self.age.is_some_and(|age| age >= NONTRADITIONAL_AGE)
    }

    /// Income bracket matching the catalog's earnings-ceiling rows.
    pub fn earnings_ceiling(&self) -> Option<f64> {
        self.family_income.map(|income| match income {
            i if i <= 30_000.0 => 30_000.0,
            i if i <= 48_000.0 => 48_000.0,
            i if i <= 75_000.0 => 75_000.0,
            i if i <= 110_000.0 => 110_000.0,
            _ => 150_000.0,
        })
    }

    pub fn has_strong_test_scores(&self) -> bool {
        self.test_scores.status == TestScoreStatus::Submitted
            && (self.test_scores.sat.is_some_and(|sat| sat >= STRONG_SAT)
                || self.test_scores.act.is_some_and(|act| act >= STRONG_ACT))
    }

    pub fn wants_support(&self) -> bool {
        self.strong_support_services || self.first_generation || self.is_nontraditional()
    }

    pub fn declared_field(&self) -> Option<FieldOfStudy> {
        (self.intended_field != FieldOfStudy::Undecided).then_some(self.intended_field)
    }
}
