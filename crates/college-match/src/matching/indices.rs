use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{FieldOfStudy, Institution, RaceGroup};
use super::normalize::{self, clamp_unit, NEUTRAL};
use super::selectivity::{classify_institution, SelectivityBucket};

/// Raw numeric columns the index formulas read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    MedianEarnings,
    MedianDebt,
    AffordabilityGap,
    ParentAffordabilityGap,
    NetPrice,
    StudentFacultyRatio,
    EndowmentPerStudent,
    InstructionalExpenditure,
    PellShare,
    TransferOutRate,
    Age25PlusShare,
    InternationalShare,
    HighestDegree,
    CarnegieClassification,
    BachelorDegrees,
    AdmissionRate,
    GraduationRate(RaceGroup),
    FieldDegrees(FieldOfStudy),
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::MedianEarnings => "median_earnings",
            Column::MedianDebt => "median_debt",
            Column::AffordabilityGap => "affordability_gap",
            Column::ParentAffordabilityGap => "parent_affordability_gap",
            Column::NetPrice => "net_price",
            Column::StudentFacultyRatio => "student_faculty_ratio",
            Column::EndowmentPerStudent => "endowment_per_student",
            Column::InstructionalExpenditure => "instructional_expenditure",
            Column::PellShare => "pell_share",
            Column::TransferOutRate => "transfer_out_rate",
            Column::Age25PlusShare => "age_25_plus_share",
            Column::InternationalShare => "international_share",
            Column::HighestDegree => "highest_degree",
            Column::CarnegieClassification => "carnegie_classification",
            Column::BachelorDegrees => "bachelor_degrees",
            Column::AdmissionRate => "admission_rate",
            Column::GraduationRate(RaceGroup::Black) => "grad_rate_black",
            Column::GraduationRate(RaceGroup::White) => "grad_rate_white",
            Column::GraduationRate(RaceGroup::Asian) => "grad_rate_asian",
            Column::GraduationRate(RaceGroup::Native) => "grad_rate_native",
            Column::GraduationRate(RaceGroup::Pacific) => "grad_rate_pacific",
            Column::FieldDegrees(FieldOfStudy::Stem) => "stem_degrees",
            Column::FieldDegrees(FieldOfStudy::Business) => "business_degrees",
            Column::FieldDegrees(FieldOfStudy::Health) => "health_degrees",
            Column::FieldDegrees(FieldOfStudy::SocialSciences) => "social_sciences_degrees",
            Column::FieldDegrees(FieldOfStudy::ArtsAndHumanities) => "arts_and_humanities_degrees",
            Column::FieldDegrees(FieldOfStudy::Education) => "education_degrees",
            Column::FieldDegrees(FieldOfStudy::Undecided) => "undecided_degrees",
        }
    }

    pub fn extract(self, institution: &Institution) -> Option<f64> {
        match self {
            Column::MedianEarnings => institution.median_earnings,
            Column::MedianDebt => institution.median_debt,
            Column::AffordabilityGap => institution.affordability_gap,
            Column::ParentAffordabilityGap => institution.parent_affordability_gap,
            Column::NetPrice => institution.net_price,
            Column::StudentFacultyRatio => institution.student_faculty_ratio,
            Column::EndowmentPerStudent => institution.endowment_per_student(),
            Column::InstructionalExpenditure => institution.instructional_expenditure,
            Column::PellShare => institution.pell_share,
            Column::TransferOutRate => institution.transfer_out_rate,
            Column::Age25PlusShare => institution.age_25_plus_share,
            Column::InternationalShare => institution.international_share,
            Column::HighestDegree => institution.highest_degree,
            Column::CarnegieClassification => institution
                .carnegie
                .map(|tier| tier.research_intensity()),
            Column::BachelorDegrees => institution.bachelor_degrees,
            Column::AdmissionRate => institution.admission_rate,
            Column::GraduationRate(group) => institution.graduation.for_group(group),
            Column::FieldDegrees(field) => institution.field_degrees.for_field(field),
        }
    }
}

/// A formula component fell back to the neutral score because its column had no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataAvailabilityWarning {
    pub column: String,
    pub component: String,
}

/// Catalog-level index values, before any applicant adjustments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseIndices {
    pub roi: f64,
    pub affordability: f64,
    pub affordability_parent: f64,
    pub equity_parity: f64,
    pub support: f64,
    pub academic: f64,
    pub environment_diversity: f64,
    pub access: f64,
}

/// Normalized per-column values the personalizer substitutes into the indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexComponents {
    pub graduation_by_race: BTreeMap<RaceGroup, f64>,
    pub field_strength: BTreeMap<FieldOfStudy, f64>,
    pub international_presence: f64,
}

impl IndexComponents {
    pub fn graduation_for(&self, group: RaceGroup) -> f64 {
        self.graduation_by_race.get(&group).copied().unwrap_or(NEUTRAL)
    }

    pub fn strength_for(&self, field: FieldOfStudy) -> f64 {
        self.field_strength.get(&field).copied().unwrap_or(NEUTRAL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedInstitution {
    /// Position in the source catalog; the ranker's tie-break key.
    pub position: usize,
    pub institution: Institution,
    pub selectivity: SelectivityBucket,
    pub base: BaseIndices,
    pub components: IndexComponents,
}

/// Catalog with indices computed once over the full pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexedCatalog {
    pub entries: Vec<IndexedInstitution>,
    pub warnings: Vec<DataAvailabilityWarning>,
}

impl IndexedCatalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selectivity_distribution(&self) -> BTreeMap<SelectivityBucket, usize> {
        let mut distribution: BTreeMap<SelectivityBucket, usize> = SelectivityBucket::ALL
            .iter()
            .map(|bucket| (*bucket, 0))
            .collect();
        for entry in &self.entries {
            *distribution.entry(entry.selectivity).or_default() += 1;
        }
        distribution
    }
}

/// Builds the seven base indices from raw catalog columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexBuilder;

impl IndexBuilder {
    pub fn build(institutions: Vec<Institution>) -> IndexedCatalog {
        if institutions.is_empty() {
            return IndexedCatalog::default();
        }

        let mut scaler = ColumnScaler::new(&institutions);

        let earnings = scaler.norm(Column::MedianEarnings, false, "roi");
        let debt = scaler.norm(Column::MedianDebt, true, "roi");

        let gap = scaler.norm(Column::AffordabilityGap, true, "affordability");
        let parent_gap = scaler.norm(Column::ParentAffordabilityGap, true, "affordability_parent");
        let price = scaler.norm(Column::NetPrice, true, "affordability");

        let ratio = scaler.norm(Column::StudentFacultyRatio, true, "support");
        let endowment = scaler.norm(Column::EndowmentPerStudent, false, "support");
        let instruction = scaler.norm(Column::InstructionalExpenditure, false, "support");
        let pell = scaler.norm(Column::PellShare, false, "support");
        let transfer = scaler.norm(Column::TransferOutRate, true, "support");
        let adult = scaler.norm(Column::Age25PlusShare, false, "support");

        let degree_level = scaler.norm(Column::HighestDegree, false, "academic");
        let research = scaler.research_intensity();
        let volume = scaler.norm(Column::BachelorDegrees, false, "academic");

        let access = scaler.norm(Column::AdmissionRate, false, "access");

        let race_norms: Vec<(RaceGroup, Vec<f64>)> = RaceGroup::ALL
            .iter()
            .map(|group| {
                (
                    *group,
                    scaler.norm(Column::GraduationRate(*group), false, "equity"),
                )
            })
            .collect();
        let field_norms: Vec<(FieldOfStudy, Vec<f64>)> = FieldOfStudy::DECLARED
            .iter()
            .map(|field| {
                (
                    *field,
                    scaler.norm(Column::FieldDegrees(*field), false, "academic_fit"),
                )
            })
            .collect();

        let diversity_columns = [
            scaler.optional_norm(Column::InternationalShare),
            scaler.optional_presence(Column::Age25PlusShare, &adult),
            scaler.optional_presence(Column::PellShare, &pell),
        ];
        let international = diversity_columns[0].clone();
        let diversity_parts: Vec<&Vec<f64>> = diversity_columns.iter().flatten().collect();
        if diversity_parts.is_empty() {
            scaler.warn_absent("student_body_diversity", "environment");
        }

        let warnings = scaler.warnings;

        let entries: Vec<IndexedInstitution> = institutions
            .into_iter()
            .enumerate()
            .map(|(row, institution)| {
                let environment_diversity = if diversity_parts.is_empty() {
                    NEUTRAL
                } else {
                    diversity_parts.iter().map(|column| column[row]).sum::<f64>()
                        / diversity_parts.len() as f64
                };

                let base = BaseIndices {
                    roi: clamp_unit(0.6 * earnings[row] + 0.4 * debt[row]),
                    affordability: clamp_unit(0.6 * gap[row] + 0.4 * price[row]),
                    affordability_parent: clamp_unit(0.6 * parent_gap[row] + 0.4 * price[row]),
                    equity_parity: parity(&institution),
                    support: clamp_unit(
                        0.25 * ratio[row]
                            + 0.20 * endowment[row]
                            + 0.20 * instruction[row]
                            + 0.15 * pell[row]
                            + 0.10 * transfer[row]
                            + 0.10 * adult[row],
                    ),
                    academic: clamp_unit(
                        0.35 * degree_level[row] + 0.35 * research[row] + 0.30 * volume[row],
                    ),
                    environment_diversity: clamp_unit(environment_diversity),
                    access: access[row],
                };

                let components = IndexComponents {
                    graduation_by_race: race_norms
                        .iter()
                        .map(|(group, column)| (*group, column[row]))
                        .collect(),
                    field_strength: field_norms
                        .iter()
                        .map(|(field, column)| (*field, column[row]))
                        .collect(),
                    international_presence: international
                        .as_ref()
                        .map(|column| column[row])
                        .unwrap_or(0.0),
                };

                IndexedInstitution {
                    position: row,
                    selectivity: classify_institution(&institution),
                    institution,
                    base,
                    components,
                }
            })
            .collect();

        debug!(
            institutions = entries.len(),
            warnings = warnings.len(),
            "indexed catalog"
        );

        IndexedCatalog { entries, warnings }
    }
}

/// Graduation-rate parity across race groups; neutral with fewer than two rates.
pub fn parity(institution: &Institution) -> f64 {
    let rates: Vec<f64> = RaceGroup::ALL
        .iter()
        .filter_map(|group| institution.graduation.for_group(*group))
        .filter(|rate| rate.is_finite())
        .collect();
    if rates.len() < 2 {
        return NEUTRAL;
    }

    let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
    clamp_unit(1.0 - (max - min) / 100.0)
}

struct ColumnScaler<'a> {
    institutions: &'a [Institution],
    warnings: Vec<DataAvailabilityWarning>,
}

impl<'a> ColumnScaler<'a> {
    fn new(institutions: &'a [Institution]) -> Self {
        Self {
            institutions,
            warnings: Vec::new(),
        }
    }

    fn raw(&self, column: Column) -> Vec<Option<f64>> {
        self.institutions
            .iter()
            .map(|institution| column.extract(institution))
            .collect()
    }

    fn norm(&mut self, column: Column, inverse: bool, component: &str) -> Vec<f64> {
        match normalize::min_max(&self.raw(column), inverse) {
            Some(values) => values,
            None => {
                self.warn_absent(column.name(), component);
                vec![NEUTRAL; self.institutions.len()]
            }
        }
    }

    fn optional_norm(&self, column: Column) -> Option<Vec<f64>> {
        normalize::min_max(&self.raw(column), false)
    }

    /// Reuse an already scaled column when the raw column carried data.
    fn optional_presence(&self, column: Column, scaled: &[f64]) -> Option<Vec<f64>> {
        self.institutions
            .iter()
            .any(|institution| column.extract(institution).is_some())
            .then(|| scaled.to_vec())
    }

    fn research_intensity(&mut self) -> Vec<f64> {
        match normalize::impute(&self.raw(Column::CarnegieClassification)) {
            Some(values) => values,
            None => {
                self.warn_absent(Column::CarnegieClassification.name(), "academic");
                vec![NEUTRAL; self.institutions.len()]
            }
        }
    }

    fn warn_absent(&mut self, column: &str, component: &str) {
        warn!(column, component, "column has no data; using neutral score");
        self.warnings.push(DataAvailabilityWarning {
            column: column.to_string(),
            component: component.to_string(),
        });
    }
}
