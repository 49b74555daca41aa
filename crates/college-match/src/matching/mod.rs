//! Multi-criteria matching engine.
//!
//! Data flows strictly downstream: catalog rows are normalized into seven base indices
//! ([`IndexBuilder`]), bucketed by selectivity, narrowed by the applicant's constraints
//! ([`ConstraintFilter`]), adjusted per applicant ([`Personalizer`]) and ranked by the
//! weighted composite ([`Ranker`]). Weights come from the profile alone ([`resolve`]).

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod explain;
pub mod filter;
pub mod indices;
pub mod normalize;
pub mod personalize;
pub mod profile;
pub mod ranker;
pub mod router;
pub mod selectivity;
pub mod service;
pub mod weights;

#[cfg(test)]
mod tests;

pub use catalog::{
    BracketedCatalog, Catalog, CatalogImportError, CatalogImporter, EARNINGS_CEILINGS,
};
pub use domain::{
    CarnegieTier, Control, FieldOfStudy, GeoPoint, GraduationRates, Institution, InstitutionId,
    MsiDesignation, MsiFlags, RaceGroup, SizeCategory, Urbanization,
};
pub use engine::{MatchEngine, MatchError, MatchOutcome};
pub use explain::{Explainer, HighlightExplainer};
pub use filter::{
    Candidate, ConstraintFilter, DistanceProvider, FilterPass, FilterReport, FilterStep,
    FilterToggles, HaversineDistance,
};
pub use indices::{
    BaseIndices, DataAvailabilityWarning, IndexBuilder, IndexComponents, IndexedCatalog,
    IndexedInstitution,
};
pub use personalize::{PersonalizationPolicy, PersonalizedIndices, Personalizer};
pub use profile::{
    ApplicantProfile, ControlPreference, MsiInterest, ProfileValidationError, RaceEthnicity,
    SelectivityInclusion, TestScoreStatus, TestScores,
};
pub use ranker::{Ranker, ScoredCandidate};
pub use router::match_router;
pub use selectivity::{classify, SelectivityBucket};
pub use service::{CatalogSummary, MatchRequest, MatchResponse, MatchService};
pub use weights::{resolve, DeclaredPriorities, IndexKind, WeightValidationError, WeightVector};
