use crate::infra::{load_service, read_profile};
use chrono::Local;
use clap::{Args, ValueEnum};
use college_match::config::AppConfig;
use college_match::error::AppError;
use college_match::matching::{
    ApplicantProfile, ControlPreference, DeclaredPriorities, FieldOfStudy, GeoPoint,
    MatchRequest, MatchResponse, MatchService, MsiDesignation, MsiInterest, RaceEthnicity,
    TestScoreStatus, TestScores,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Catalog CSV to rank (defaults to MATCH_CATALOG_PATH, then the bundled sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Applicant profile JSON document
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Number of institutions to return (defaults to MATCH_DEFAULT_TOP_K)
    #[arg(long)]
    pub(crate) top_k: Option<usize>,
    /// Print the full response as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Run a single persona instead of all of them
    #[arg(long, value_enum)]
    pub(crate) persona: Option<Persona>,
    /// Catalog CSV to rank against (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Institutions shown per persona
    #[arg(long, default_value_t = 5)]
    pub(crate) top_k: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Persona {
    /// Low-income student parent bound to their home state
    StudentParent,
    /// International applicant set on a research-heavy STEM program
    InternationalStem,
    /// First-generation applicant looking for a Hispanic-Serving Institution
    FirstGenHsi,
}

impl Persona {
    const ALL: [Persona; 3] = [
        Persona::StudentParent,
        Persona::InternationalStem,
        Persona::FirstGenHsi,
    ];

    fn title(self) -> &'static str {
        match self {
            Persona::StudentParent => "Low-income student parent (California, in-state only)",
            Persona::InternationalStem => "International STEM applicant",
            Persona::FirstGenHsi => "First-generation applicant interested in HSIs",
        }
    }

    pub(crate) fn profile(self) -> ApplicantProfile {
        match self {
            Persona::StudentParent => ApplicantProfile {
                gpa: 3.1,
                annual_budget: 9_000.0,
                family_income: Some(26_000.0),
                work_study_needed: true,
                student_parent: true,
                age: Some(27),
                home_state: Some("CA".to_string()),
                in_state_only: true,
                strong_support_services: true,
                priorities: Some(DeclaredPriorities::Emphasis(
                    "low cost and childcare support".to_string(),
                )),
                ..ApplicantProfile::default()
            },
            Persona::InternationalStem => ApplicantProfile {
                gpa: 3.9,
                test_scores: TestScores {
                    status: TestScoreStatus::Submitted,
                    sat: Some(1480),
                    act: None,
                },
                intended_field: FieldOfStudy::Stem,
                annual_budget: 32_000.0,
                international: true,
                control_preference: ControlPreference::Either,
                research_opportunities: true,
                priorities: Some(DeclaredPriorities::Emphasis(
                    "research and strong career earnings".to_string(),
                )),
                ..ApplicantProfile::default()
            },
            Persona::FirstGenHsi => ApplicantProfile {
                gpa: 3.4,
                intended_field: FieldOfStudy::Health,
                annual_budget: 14_000.0,
                family_income: Some(52_000.0),
                race_ethnicity: RaceEthnicity::Hispanic,
                first_generation: true,
                home_state: Some("AZ".to_string()),
                origin: Some(GeoPoint {
                    latitude: 33.4484,
                    longitude: -112.0740,
                }),
                max_distance_miles: Some(1_200.0),
                msi_interest: Some(MsiInterest::Specific(MsiDesignation::Hsi)),
                ..ApplicantProfile::default()
            },
        }
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        catalog,
        profile,
        top_k,
        json,
    } = args;

    let config = AppConfig::load()?;
    let catalog_path = catalog.or(config.matching.catalog_path);
    let service = load_service(
        catalog_path.as_deref(),
        config.matching.earnings_ceiling,
        config.matching.default_top_k,
    )?;
    let profile = read_profile(&profile)?;
    let response = service.rank(&MatchRequest { profile, top_k })?;

    if json {
        println!("{}", to_pretty_json(&response)?);
    } else {
        render_response(&response);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        persona,
        catalog,
        top_k,
    } = args;

    let service = load_service(catalog.as_deref(), None, top_k)?;
    println!(
        "College match demo ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    render_catalog(&service);
    let personas: Vec<Persona> = match persona {
        Some(persona) => vec![persona],
        None => Persona::ALL.to_vec(),
    };

    for persona in personas {
        println!("\n{}", persona.title());
        let request = MatchRequest {
            profile: persona.profile(),
            top_k: Some(top_k),
        };
        match service.rank(&request) {
            Ok(response) => render_response(&response),
            Err(err) => println!("  Request rejected: {}", err),
        }
    }

    Ok(())
}

/// Pretty JSON for stdout. A failure here is an output problem, not a bad profile.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|err| AppError::Io(err.into()))
}

fn render_catalog(service: &MatchService) {
    let catalog = service.catalog();
    println!("Catalog: {} institutions", catalog.len());
    let distribution = catalog
        .selectivity_distribution()
        .into_iter()
        .map(|(bucket, count)| format!("{} {}", bucket.label(), count))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("- Selectivity mix: {}", distribution);
    let brackets = service
        .brackets()
        .map(|ceiling| format!("${:.0}", ceiling))
        .collect::<Vec<_>>();
    if !brackets.is_empty() {
        println!("- Income brackets: {}", brackets.join(", "));
    }
    for warning in &catalog.warnings {
        println!(
            "- Data warning: {} missing, {} scored neutral",
            warning.column, warning.component
        );
    }
}

pub(crate) fn render_response(response: &MatchResponse) {
    println!(
        "- Filter trace: {} -> {} institutions",
        response.filter.initial, response.filter.remaining
    );
    if let Some(ceiling) = response.earnings_ceiling {
        println!("- Prices for family incomes up to ${:.0}", ceiling);
    }
    for step in &response.filter.steps {
        println!(
            "    - {:?}: {} -> {} (removed {})",
            step.pass,
            step.before,
            step.after,
            step.removed()
        );
    }

    if response.no_matches {
        println!("  No institutions matched. Try:");
        for hint in &response.guidance {
            println!("    - {}", hint);
        }
        return;
    }

    if let Some(weights) = &response.weights {
        let applied = weights
            .iter()
            .map(|(kind, weight)| format!("{} {:.0}%", kind.label(), weight * 100.0))
            .collect::<Vec<_>>()
            .join(", ");
        println!("- Weights: {}", applied);
    }

    for candidate in &response.candidates {
        let price = candidate
            .institution
            .net_price
            .map(|price| format!("${:.0}", price))
            .unwrap_or_else(|| "price n/a".to_string());
        println!(
            "  {:>2}. {} ({}) score {:.3} | {} | {}",
            candidate.rank,
            candidate.institution.name,
            candidate.institution.state.as_deref().unwrap_or("--"),
            candidate.composite,
            candidate.selectivity.label(),
            price
        );
    }
    println!("  Highlights:");
    for line in &response.highlights {
        println!("    - {}", line);
    }
}
