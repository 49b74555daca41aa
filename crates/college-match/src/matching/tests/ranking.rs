use std::collections::BTreeMap;

use super::common::*;
use crate::matching::engine::{MatchEngine, MatchError, MatchOutcome};
use crate::matching::filter::{ConstraintFilter, FilterPass, FilterToggles};
use crate::matching::indices::IndexBuilder;
use crate::matching::profile::{ApplicantProfile, ProfileValidationError};
use crate::matching::ranker::Ranker;
use crate::matching::weights::{DeclaredPriorities, IndexKind, WeightValidationError};

#[test]
fn ranked_results_are_sorted_and_truncated() {
    let catalog = sample_catalog();
    let outcome = MatchEngine::default()
        .rank(&catalog, &profile(), 3)
        .expect("ranking succeeds");

    let candidates = outcome.candidates();
    assert_eq!(candidates.len(), 3);
    for pair in candidates.windows(2) {
        assert!(pair[0].composite >= pair[1].composite);
    }
    let ranks: Vec<usize> = candidates.iter().map(|candidate| candidate.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    for candidate in candidates {
        for kind in IndexKind::ALL {
            let value = candidate.indices.get(kind);
            assert!((0.0..=1.0).contains(&value), "{kind:?} out of range: {value}");
        }
    }
}

#[test]
fn composite_is_the_weighted_sum_of_personalized_indices() {
    let catalog = sample_catalog();
    let outcome = MatchEngine::default()
        .rank(&catalog, &profile(), 10)
        .expect("ranking succeeds");

    let MatchOutcome::Ranked {
        candidates,
        weights,
        ..
    } = outcome
    else {
        panic!("expected ranked outcome");
    };
    for candidate in &candidates {
        let expected: f64 = IndexKind::ALL
            .iter()
            .map(|kind| weights.get(*kind) * candidate.indices.get(*kind))
            .sum();
        assert!((candidate.composite - expected).abs() < 1e-12);
    }
}

#[test]
fn higher_earnings_do_not_automatically_win_roi() {
    let mut x = institution("x", "Institution X");
    x.median_earnings = Some(80_000.0);
    x.median_debt = Some(20_000.0);
    let mut y = institution("y", "Institution Y");
    y.median_earnings = Some(40_000.0);
    y.median_debt = Some(5_000.0);

    let catalog = IndexBuilder::build(vec![x, y]);
    let roi_x = catalog.entries[0].base.roi;
    let roi_y = catalog.entries[1].base.roi;
    assert!((roi_x - (0.6 * 1.0 + 0.4 * 0.0)).abs() < 1e-12);
    assert!((roi_y - (0.6 * 0.0 + 0.4 * 1.0)).abs() < 1e-12);

    let profile = ApplicantProfile {
        priorities: Some(DeclaredPriorities::Explicit(BTreeMap::from([(
            IndexKind::Roi,
            1.0,
        )]))),
        ..profile()
    };
    let outcome = MatchEngine::default()
        .rank(&catalog, &profile, 2)
        .expect("ranking succeeds");
    assert_eq!(outcome.candidates()[0].institution.name, "Institution X");
    assert!((outcome.candidates()[1].composite - 0.4).abs() < 1e-12);
}

#[test]
fn over_budget_candidate_loses_thirty_points_of_affordability() {
    let mut priced = institution("p", "Priced College");
    priced.net_price = Some(30_000.0);
    priced.affordability_gap = Some(10_000.0);
    let mut cheap = institution("c", "Cheap College");
    cheap.net_price = Some(5_000.0);
    cheap.affordability_gap = Some(2_000.0);
    let catalog = IndexBuilder::build(vec![priced, cheap]);
    let base = catalog.entries[0].base.affordability;

    let profile = ApplicantProfile {
        annual_budget: 15_000.0,
        ..profile()
    };
    // the budget pass would drop a 2x-budget row before scoring
    let engine = MatchEngine::new(
        ConstraintFilter::default()
            .with_toggles(FilterToggles::default().disable(FilterPass::Budget)),
        Ranker::default(),
    );
    let outcome = engine
        .rank(&catalog, &profile, 5)
        .expect("ranking succeeds");
    let priced = outcome
        .candidates()
        .iter()
        .find(|candidate| candidate.institution.name == "Priced College")
        .expect("priced college is ranked");
    assert_eq!(priced.indices.affordability, (base - 0.3).max(0.0));
}

#[test]
fn empty_pool_is_reported_as_no_matches() {
    let catalog = IndexBuilder::build(
        (0..4)
            .map(|n| {
                let mut row = institution(&n.to_string(), &format!("College {n}"));
                row.net_price = Some(5_500.0 + f64::from(n) * 1_000.0);
                row
            })
            .collect(),
    );
    let profile = ApplicantProfile {
        annual_budget: 1_000.0,
        ..profile()
    };

    let outcome = MatchEngine::default()
        .rank(&catalog, &profile, 10)
        .expect("empty pool is not an error");
    match outcome {
        MatchOutcome::NoMatches { filter, guidance } => {
            assert_eq!(filter.remaining, 0);
            assert_eq!(guidance, vec![FilterPass::Budget.guidance().to_string()]);
        }
        other => panic!("expected no matches, got {other:?}"),
    }
}

#[test]
fn declared_two_index_weights_zero_the_rest() {
    let profile = ApplicantProfile {
        priorities: Some(DeclaredPriorities::Explicit(BTreeMap::from([
            (IndexKind::Roi, 0.5),
            (IndexKind::Affordability, 0.5),
        ]))),
        ..profile()
    };
    let outcome = MatchEngine::default()
        .rank(&sample_catalog(), &profile, 5)
        .expect("ranking succeeds");
    let MatchOutcome::Ranked { weights, .. } = outcome else {
        panic!("expected ranked outcome");
    };
    assert_eq!(weights.get(IndexKind::Roi) + weights.get(IndexKind::Affordability), 1.0);
    for kind in [
        IndexKind::Equity,
        IndexKind::Support,
        IndexKind::AcademicFit,
        IndexKind::Environment,
        IndexKind::Access,
    ] {
        assert_eq!(weights.get(kind), 0.0);
    }
}

#[test]
fn identical_requests_return_identical_results() {
    let catalog = sample_catalog();
    let engine = MatchEngine::default();
    let first = engine.rank(&catalog, &profile(), 5).expect("first run");
    let second = engine.rank(&catalog, &profile(), 5).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn ties_fall_back_to_catalog_order() {
    let rows: Vec<_> = ["b", "a", "c"]
        .iter()
        .map(|id| {
            let mut row = institution(id, &format!("Twin {id}"));
            row.net_price = Some(10_000.0);
            row
        })
        .collect();
    let catalog = IndexBuilder::build(rows);
    let outcome = MatchEngine::default()
        .rank(&catalog, &profile(), 3)
        .expect("ranking succeeds");
    let order = ids(outcome
        .candidates()
        .iter()
        .map(|candidate| candidate.institution.id.clone()));
    assert_eq!(order, vec!["b", "a", "c"]);
}

#[test]
fn invalid_profiles_fail_before_filtering() {
    let profile = ApplicantProfile {
        gpa: 4.5,
        ..profile()
    };
    assert_eq!(
        MatchEngine::default().rank(&sample_catalog(), &profile, 5),
        Err(MatchError::Profile(ProfileValidationError::GpaOutOfRange(4.5)))
    );
}

#[test]
fn invalid_weights_and_top_k_are_rejected() {
    let profile = ApplicantProfile {
        priorities: Some(DeclaredPriorities::Explicit(BTreeMap::from([(
            IndexKind::Access,
            -1.0,
        )]))),
        ..profile()
    };
    let error = MatchEngine::default()
        .rank(&sample_catalog(), &profile, 5)
        .expect_err("negative weight rejected");
    assert!(matches!(
        error,
        MatchError::Weights(WeightValidationError::Negative { .. })
    ));
    assert!(error.is_validation());

    assert_eq!(
        MatchEngine::default().rank(&sample_catalog(), &self::profile(), 0),
        Err(MatchError::InvalidTopK)
    );
}

#[test]
fn student_parent_profile_prefers_low_childcare_gap() {
    let profile = ApplicantProfile {
        student_parent: true,
        ..profile()
    };
    let outcome = MatchEngine::default()
        .rank(&sample_catalog(), &profile, 10)
        .expect("ranking succeeds");
    let lakeside = outcome
        .candidates()
        .iter()
        .find(|candidate| candidate.institution.name == "Lakeside University")
        .expect("lakeside survives");
    assert_eq!(lakeside.indices.affordability, 1.0);
}
