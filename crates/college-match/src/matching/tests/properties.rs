use std::collections::BTreeMap;

use proptest::prelude::*;

use super::common::*;
use crate::matching::engine::MatchEngine;
use crate::matching::filter::ConstraintFilter;
use crate::matching::indices::IndexBuilder;
use crate::matching::normalize::min_max;
use crate::matching::profile::ApplicantProfile;
use crate::matching::weights::{resolve, DeclaredPriorities, IndexKind};

fn optional_metric() -> impl Strategy<Value = Option<f64>> {
    prop::option::weighted(0.8, 0.0f64..200_000.0)
}

proptest! {
    #[test]
    fn scaled_columns_stay_in_unit_range(
        values in prop::collection::vec(optional_metric(), 1..40),
        inverse in any::<bool>(),
    ) {
        if let Some(scaled) = min_max(&values, inverse) {
            prop_assert_eq!(scaled.len(), values.len());
            for value in scaled {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        } else {
            prop_assert!(values.iter().all(Option::is_none));
        }
    }

    #[test]
    fn explicit_weights_always_sum_to_one(
        raw in prop::collection::vec(0.0f64..10.0, 7),
    ) {
        prop_assume!(raw.iter().any(|value| *value > 0.0));
        let declared: BTreeMap<IndexKind, f64> =
            IndexKind::ALL.iter().copied().zip(raw.iter().copied()).collect();
        let weights = resolve(Some(&DeclaredPriorities::Explicit(declared)))
            .expect("non-negative weights resolve");
        prop_assert!((weights.sum() - 1.0).abs() < 1e-6);
        for (_, weight) in weights.iter() {
            prop_assert!(weight >= 0.0);
        }
    }

    #[test]
    fn filter_passes_never_grow_the_pool(
        budget in 0.0f64..40_000.0,
        exclude_for_profit in any::<bool>(),
        min_graduation_rate in prop::option::of(0.0f64..100.0),
        reach in any::<bool>(),
        safety in any::<bool>(),
    ) {
        let mut profile = ApplicantProfile {
            annual_budget: budget,
            exclude_for_profit,
            min_graduation_rate,
            ..profile()
        };
        profile.selectivity.reach = reach;
        profile.selectivity.safety = safety;

        let catalog = sample_catalog();
        let outcome = ConstraintFilter::default().apply(&catalog.entries, &profile);
        let mut previous = catalog.len();
        for step in &outcome.report.steps {
            prop_assert_eq!(step.before, previous);
            prop_assert!(step.after <= step.before);
            previous = step.after;
        }
        prop_assert_eq!(previous, outcome.survivors.len());
    }

    #[test]
    fn roi_rises_with_earnings_at_fixed_debt(
        low in 20_000.0f64..60_000.0,
        bump in 1.0f64..40_000.0,
        debt in 5_000.0f64..30_000.0,
    ) {
        let mut modest = institution("m", "Modest");
        modest.median_earnings = Some(low);
        modest.median_debt = Some(debt);
        let mut strong = institution("s", "Strong");
        strong.median_earnings = Some(low + bump);
        strong.median_debt = Some(debt);
        let mut anchor = institution("a", "Anchor");
        anchor.median_earnings = Some(low / 2.0);
        anchor.median_debt = Some(debt * 2.0);

        let catalog = IndexBuilder::build(vec![modest, strong, anchor]);
        prop_assert!(catalog.entries[1].base.roi >= catalog.entries[0].base.roi);
    }

    #[test]
    fn affordability_never_rises_with_price_at_fixed_gap(
        price in 1_000.0f64..40_000.0,
        bump in 1.0f64..20_000.0,
        gap in 0.0f64..20_000.0,
    ) {
        let mut cheaper = institution("c", "Cheaper");
        cheaper.net_price = Some(price);
        cheaper.affordability_gap = Some(gap);
        let mut pricier = institution("p", "Pricier");
        pricier.net_price = Some(price + bump);
        pricier.affordability_gap = Some(gap);
        let mut anchor = institution("a", "Anchor");
        anchor.net_price = Some(price * 2.0);
        anchor.affordability_gap = Some(gap + 5_000.0);

        let catalog = IndexBuilder::build(vec![cheaper, pricier, anchor]);
        prop_assert!(catalog.entries[1].base.affordability <= catalog.entries[0].base.affordability);
    }

    #[test]
    fn ranking_is_sorted_and_bounded(
        gpa in 0.0f64..4.0,
        budget in 5_000.0f64..40_000.0,
        top_k in 1usize..8,
        student_parent in any::<bool>(),
    ) {
        let profile = ApplicantProfile {
            gpa,
            annual_budget: budget,
            student_parent,
            ..profile()
        };
        let outcome = MatchEngine::default()
            .rank(&sample_catalog(), &profile, top_k)
            .expect("valid profile ranks");
        let candidates = outcome.candidates();
        prop_assert!(candidates.len() <= top_k);
        for pair in candidates.windows(2) {
            prop_assert!(pair[0].composite >= pair[1].composite);
        }
        for candidate in candidates {
            for kind in IndexKind::ALL {
                let value = candidate.indices.get(kind);
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
