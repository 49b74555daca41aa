use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::matching::domain::{
    CarnegieTier, Control, GeoPoint, GraduationRates, Institution, InstitutionId, MsiFlags,
    SizeCategory, Urbanization,
};
use crate::matching::indices::{IndexBuilder, IndexedCatalog};
use crate::matching::profile::ApplicantProfile;
use crate::matching::service::MatchService;

pub(super) fn institution(id: &str, name: &str) -> Institution {
    Institution {
        id: InstitutionId(id.to_string()),
        name: name.to_string(),
        ..Institution::default()
    }
}

pub(super) fn los_angeles() -> GeoPoint {
    GeoPoint {
        latitude: 34.0522,
        longitude: -118.2437,
    }
}

/// Six institutions covering every bucket, control type and a data-poor row.
pub(super) fn sample_institutions() -> Vec<Institution> {
    vec![
        Institution {
            state: Some("CA".into()),
            region: Some(8),
            location: Some(los_angeles()),
            control: Some(Control::Public),
            net_price: Some(12_000.0),
            median_debt: Some(18_000.0),
            median_earnings: Some(52_000.0),
            affordability_gap: Some(4_000.0),
            parent_affordability_gap: Some(15_000.0),
            admission_rate: Some(72.0),
            size: Some(SizeCategory::Large),
            urbanization: Some(Urbanization::City),
            carnegie: Some(CarnegieTier::Doctoral),
            msi: MsiFlags {
                hsi: true,
                ..MsiFlags::default()
            },
            graduation: GraduationRates {
                overall: Some(65.0),
                black: Some(55.0),
                white: Some(70.0),
                asian: Some(75.0),
                ..GraduationRates::default()
            },
            student_faculty_ratio: Some(22.0),
            pell_share: Some(45.0),
            international_share: Some(9.0),
            ..institution("1", "Harbor State University")
        },
        Institution {
            state: Some("MA".into()),
            region: Some(1),
            location: Some(GeoPoint {
                latitude: 42.3601,
                longitude: -71.0589,
            }),
            control: Some(Control::PrivateNonprofit),
            net_price: Some(28_000.0),
            median_debt: Some(22_000.0),
            median_earnings: Some(70_000.0),
            affordability_gap: Some(20_000.0),
            parent_affordability_gap: Some(31_000.0),
            admission_rate: Some(20.0),
            size: Some(SizeCategory::Small),
            urbanization: Some(Urbanization::Suburb),
            carnegie: Some(CarnegieTier::Baccalaureate),
            graduation: GraduationRates {
                overall: Some(90.0),
                black: Some(88.0),
                white: Some(91.0),
                ..GraduationRates::default()
            },
            student_faculty_ratio: Some(8.0),
            pell_share: Some(15.0),
            international_share: Some(12.0),
            ..institution("2", "Summit College")
        },
        Institution {
            state: Some("TX".into()),
            region: Some(6),
            location: Some(GeoPoint {
                latitude: 32.7767,
                longitude: -96.7970,
            }),
            control: Some(Control::ForProfit),
            net_price: Some(16_000.0),
            median_debt: Some(25_000.0),
            median_earnings: Some(35_000.0),
            open_admission: true,
            size: Some(SizeCategory::Medium),
            urbanization: Some(Urbanization::Town),
            carnegie: Some(CarnegieTier::Associate),
            graduation: GraduationRates {
                overall: Some(30.0),
                ..GraduationRates::default()
            },
            ..institution("3", "Prairie Technical Institute")
        },
        Institution {
            state: Some("CA".into()),
            region: Some(8),
            location: Some(GeoPoint {
                latitude: 32.7157,
                longitude: -117.1611,
            }),
            control: Some(Control::Public),
            net_price: Some(9_000.0),
            median_debt: Some(14_000.0),
            median_earnings: Some(48_000.0),
            affordability_gap: Some(1_500.0),
            parent_affordability_gap: Some(12_000.0),
            admission_rate: Some(45.0),
            size: Some(SizeCategory::Large),
            urbanization: Some(Urbanization::Suburb),
            carnegie: Some(CarnegieTier::Masters),
            msi: MsiFlags {
                hsi: true,
                ..MsiFlags::default()
            },
            graduation: GraduationRates {
                overall: Some(58.0),
                black: Some(50.0),
                white: Some(60.0),
                ..GraduationRates::default()
            },
            student_faculty_ratio: Some(25.0),
            pell_share: Some(55.0),
            international_share: Some(3.0),
            ..institution("4", "Lakeside University")
        },
        Institution {
            state: Some("GA".into()),
            region: Some(5),
            location: Some(GeoPoint {
                latitude: 33.7490,
                longitude: -84.3880,
            }),
            control: Some(Control::Public),
            net_price: Some(11_000.0),
            median_debt: Some(24_000.0),
            median_earnings: Some(41_000.0),
            affordability_gap: Some(5_500.0),
            parent_affordability_gap: Some(17_000.0),
            admission_rate: Some(55.0),
            size: Some(SizeCategory::Medium),
            urbanization: Some(Urbanization::City),
            carnegie: Some(CarnegieTier::Masters),
            msi: MsiFlags {
                hbcu: true,
                ..MsiFlags::default()
            },
            graduation: GraduationRates {
                overall: Some(45.0),
                black: Some(46.0),
                ..GraduationRates::default()
            },
            student_faculty_ratio: Some(17.0),
            pell_share: Some(70.0),
            international_share: Some(1.0),
            ..institution("5", "Magnolia A&M University")
        },
        Institution {
            state: Some("NV".into()),
            control: Some(Control::PrivateNonprofit),
            ..institution("6", "Sparse Data College")
        },
    ]
}

pub(super) fn sample_catalog() -> IndexedCatalog {
    IndexBuilder::build(sample_institutions())
}

pub(super) fn profile() -> ApplicantProfile {
    ApplicantProfile {
        gpa: 3.4,
        annual_budget: 15_000.0,
        ..ApplicantProfile::default()
    }
}

pub(super) fn ids(names: impl IntoIterator<Item = InstitutionId>) -> Vec<String> {
    names.into_iter().map(|id| id.0).collect()
}

pub(super) fn build_service() -> Arc<MatchService> {
    Arc::new(MatchService::with_defaults(sample_catalog(), 3))
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn assert_status(response: &Response, status: StatusCode) {
    assert_eq!(response.status(), status);
}
