//! Personalized, explainable ranking of postsecondary institutions.
//!
//! The [`matching`] module holds the engine: raw institutional metrics are normalized into
//! composite indices once per catalog, then each request filters the pool against an applicant
//! profile, personalizes the surviving indices and ranks them by a weighted composite score.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
