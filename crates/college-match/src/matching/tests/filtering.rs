use super::common::*;
use crate::matching::domain::{CarnegieTier, MsiDesignation, SizeCategory};
use crate::matching::filter::{ConstraintFilter, FilterPass, FilterToggles};
use crate::matching::profile::{ApplicantProfile, ControlPreference, MsiInterest};

fn surviving_ids(profile: &ApplicantProfile) -> Vec<String> {
    surviving_ids_with(&ConstraintFilter::default(), profile)
}

fn surviving_ids_with(filter: &ConstraintFilter, profile: &ApplicantProfile) -> Vec<String> {
    let catalog = sample_catalog();
    let outcome = filter.apply(&catalog.entries, profile);
    ids(outcome
        .survivors
        .iter()
        .map(|candidate| candidate.entry.institution.id.clone()))
}

#[test]
fn default_profile_applies_budget_and_for_profit_passes() {
    let catalog = sample_catalog();
    let outcome = ConstraintFilter::default().apply(&catalog.entries, &profile());

    let survivors = ids(outcome
        .survivors
        .iter()
        .map(|candidate| candidate.entry.institution.id.clone()));
    assert_eq!(survivors, vec!["1", "4", "5", "6"]);

    let passes: Vec<FilterPass> = outcome.report.steps.iter().map(|step| step.pass).collect();
    assert_eq!(passes, vec![FilterPass::Budget, FilterPass::ForProfit]);
    assert_eq!(outcome.report.initial, 6);
    assert_eq!(outcome.report.remaining, 4);
}

#[test]
fn budget_pass_allows_one_and_a_half_times_budget_and_missing_prices() {
    let profile = ApplicantProfile {
        annual_budget: 8_000.0,
        exclude_for_profit: false,
        ..profile()
    };
    // ceiling 12,000: keeps 12,000 and 9,000 and 11,000 plus the unpriced row
    assert_eq!(surviving_ids(&profile), vec!["1", "4", "5", "6"]);
}

#[test]
fn in_state_only_takes_precedence_over_preferred_states() {
    let profile = ApplicantProfile {
        home_state: Some("ca".into()),
        in_state_only: true,
        preferred_states: vec!["GA".into()],
        ..profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["1", "4"]);

    let profile = ApplicantProfile {
        preferred_states: vec!["ga".into(), "NV".into()],
        ..self::profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["5", "6"]);
}

#[test]
fn control_preference_requires_a_match() {
    let profile = ApplicantProfile {
        control_preference: ControlPreference::PrivateNonprofit,
        annual_budget: 30_000.0,
        ..profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["2", "6"]);
}

#[test]
fn radius_pass_keeps_nearby_and_unlocated_institutions() {
    let profile = ApplicantProfile {
        origin: Some(los_angeles()),
        max_distance_miles: Some(150.0),
        ..profile()
    };
    let catalog = sample_catalog();
    let outcome = ConstraintFilter::default().apply(&catalog.entries, &profile);

    let survivors: Vec<(&str, Option<f64>)> = outcome
        .survivors
        .iter()
        .map(|candidate| {
            (
                candidate.entry.institution.id.0.as_str(),
                candidate.distance_miles,
            )
        })
        .collect();
    assert_eq!(survivors.len(), 3);
    assert_eq!(survivors[0], ("1", Some(0.0)));
    assert_eq!(survivors[1].0, "4");
    assert!(survivors[1].1.expect("distance measured") < 150.0);
    assert_eq!(survivors[2], ("6", None));
}

#[test]
fn selectivity_exclusion_keeps_unknown_buckets() {
    let mut profile = ApplicantProfile {
        annual_budget: 30_000.0,
        ..profile()
    };
    profile.selectivity.reach = false;
    profile.selectivity.safety = false;
    assert_eq!(surviving_ids(&profile), vec!["4", "5", "6"]);
}

#[test]
fn size_preference_passes_missing_sizes_through() {
    let profile = ApplicantProfile {
        size_preference: Some(SizeCategory::Large),
        ..profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["1", "4", "6"]);
}

#[test]
fn carnegie_preference_is_a_no_op_when_nothing_matches() {
    let profile = ApplicantProfile {
        carnegie_preference: vec![CarnegieTier::Doctoral],
        ..profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["1"]);

    let profile = ApplicantProfile {
        carnegie_preference: vec![CarnegieTier::Associate],
        ..self::profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["1", "4", "5", "6"]);
}

#[test]
fn msi_preference_supports_specific_and_any() {
    let profile = ApplicantProfile {
        msi_interest: Some(MsiInterest::Specific(MsiDesignation::Hbcu)),
        ..profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["5"]);

    let profile = ApplicantProfile {
        msi_interest: Some(MsiInterest::Any),
        ..self::profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["1", "4", "5"]);
}

#[test]
fn graduation_floor_excludes_missing_rates() {
    let profile = ApplicantProfile {
        min_graduation_rate: Some(50.0),
        ..profile()
    };
    assert_eq!(surviving_ids(&profile), vec!["1", "4"]);
}

#[test]
fn disabled_passes_are_skipped_and_not_reported() {
    let filter = ConstraintFilter::default().with_toggles(
        FilterToggles::default()
            .disable(FilterPass::Budget)
            .disable(FilterPass::ForProfit),
    );
    let survivors = surviving_ids_with(&filter, &profile());
    assert_eq!(survivors, vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn each_pass_narrows_its_input() {
    let mut profile = ApplicantProfile {
        home_state: Some("CA".into()),
        preferred_states: vec!["CA".into(), "GA".into()],
        preferred_regions: vec![8, 5],
        size_preference: Some(SizeCategory::Large),
        msi_interest: Some(MsiInterest::Any),
        min_graduation_rate: Some(40.0),
        ..profile()
    };
    profile.selectivity.open = false;

    let catalog = sample_catalog();
    let outcome = ConstraintFilter::default().apply(&catalog.entries, &profile);
    let mut previous = outcome.report.initial;
    for step in &outcome.report.steps {
        assert_eq!(step.before, previous);
        assert!(step.after <= step.before, "{:?} grew the pool", step.pass);
        previous = step.after;
    }
    assert_eq!(previous, outcome.survivors.len());
}

#[test]
fn guidance_names_the_passes_that_removed_candidates() {
    let profile = ApplicantProfile {
        annual_budget: 1_000.0,
        msi_interest: Some(MsiInterest::Specific(MsiDesignation::Tribal)),
        ..profile()
    };
    let catalog = sample_catalog();
    let outcome = ConstraintFilter::default().apply(&catalog.entries, &profile);
    assert!(outcome.survivors.is_empty());
    assert_eq!(
        outcome.report.guidance(),
        vec![
            FilterPass::Budget.guidance().to_string(),
            FilterPass::MinorityServing.guidance().to_string(),
        ]
    );
}
