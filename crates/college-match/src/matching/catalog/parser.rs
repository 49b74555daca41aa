use super::mapping::canonical_field;
use super::normalizer::{clean_state, clean_text, parse_flag, parse_number};
use crate::matching::domain::{
    CarnegieTier, Control, FieldDegrees, GeoPoint, GraduationRates, Institution, InstitutionId,
    MsiFlags, SizeCategory, Urbanization,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

const UNKNOWN_NAME: &str = "Unknown Institution";

/// Rows in file order plus the canonical fields the header row carried.
#[derive(Debug)]
pub(crate) struct ParsedCatalog {
    pub(crate) institutions: Vec<Institution>,
    pub(crate) fields: HashSet<&'static str>,
    pub(crate) rows_without_id: usize,
}

pub(crate) fn parse_catalog<R: Read>(reader: R) -> Result<ParsedCatalog, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let (headers, fields) = canonical_headers(csv_reader.headers()?);
    let mut institutions = Vec::new();
    let mut rows_without_id = 0;

    for record in csv_reader.records() {
        let record = record?;
        let row: CatalogRow = record.deserialize(Some(&headers))?;
        match row.into_institution() {
            Some(institution) => institutions.push(institution),
            None => rows_without_id += 1,
        }
    }

    Ok(ParsedCatalog {
        institutions,
        fields,
        rows_without_id,
    })
}

/// Rewrite raw headers onto canonical names. The first header that resolves to a field
/// wins; later variants and unknown headers get placeholder names serde ignores.
fn canonical_headers(raw: &csv::StringRecord) -> (csv::StringRecord, HashSet<&'static str>) {
    let mut seen = HashSet::new();
    let headers = raw
        .iter()
        .enumerate()
        .map(|(position, header)| match canonical_field(header) {
            Some(field) if seen.insert(field) => field.to_string(),
            _ => format!("__ignored_{position}"),
        })
        .collect();
    (headers, seen)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogRow {
    id: Option<String>,
    name: Option<String>,
    state: Option<String>,
    city: Option<String>,
    region: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,

    net_price: Option<String>,
    median_debt: Option<String>,
    median_earnings: Option<String>,
    endowment: Option<String>,
    endowment_gasb: Option<String>,
    endowment_fasb: Option<String>,
    enrollment: Option<String>,
    instructional_expenditure: Option<String>,
    affordability_gap: Option<String>,
    parent_affordability_gap: Option<String>,
    earnings_ceiling: Option<String>,

    grad_rate_total: Option<String>,
    grad_rate_black: Option<String>,
    grad_rate_white: Option<String>,
    grad_rate_asian: Option<String>,
    grad_rate_native: Option<String>,
    grad_rate_pacific: Option<String>,
    transfer_out_rate: Option<String>,
    retention_rate: Option<String>,

    admission_rate: Option<String>,
    open_admission: Option<String>,

    size_category: Option<String>,
    urbanization: Option<String>,
    control: Option<String>,
    carnegie: Option<String>,
    hbcu: Option<String>,
    hsi: Option<String>,
    tribal: Option<String>,
    aanapii: Option<String>,
    pbi: Option<String>,
    student_faculty_ratio: Option<String>,
    pell_share: Option<String>,
    age_25_plus_share: Option<String>,
    international_share: Option<String>,

    highest_degree: Option<String>,
    bachelor_degrees: Option<String>,
    degrees_stem: Option<String>,
    degrees_biology: Option<String>,
    degrees_computing: Option<String>,
    degrees_engineering: Option<String>,
    degrees_mathematics: Option<String>,
    degrees_physical_sciences: Option<String>,
    degrees_business: Option<String>,
    degrees_health: Option<String>,
    degrees_social_sciences: Option<String>,
    degrees_arts_and_humanities: Option<String>,
    degrees_visual_arts: Option<String>,
    degrees_english: Option<String>,
    degrees_education: Option<String>,
}

impl CatalogRow {
    fn into_institution(self) -> Option<Institution> {
        let id = self.id.as_deref().and_then(clean_text)?;
        let name = self
            .name
            .as_deref()
            .and_then(clean_text)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        let location = match (number(&self.latitude), number(&self.longitude)) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };

        let endowment = number(&self.endowment).or_else(|| {
            sum_present(&[number(&self.endowment_gasb), number(&self.endowment_fasb)])
        });

        let stem = number(&self.degrees_stem).or_else(|| {
            sum_present(&[
                number(&self.degrees_biology),
                number(&self.degrees_computing),
                number(&self.degrees_engineering),
                number(&self.degrees_mathematics),
                number(&self.degrees_physical_sciences),
            ])
        });
        let arts_and_humanities = number(&self.degrees_arts_and_humanities).or_else(|| {
            sum_present(&[number(&self.degrees_visual_arts), number(&self.degrees_english)])
        });

        Some(Institution {
            id: InstitutionId(id),
            name,
            state: self.state.as_deref().and_then(clean_state),
            city: self.city.as_deref().and_then(clean_text),
            region: number(&self.region)
                .filter(|region| (0.0..=u8::MAX as f64).contains(region))
                .map(|region| region as u8),
            location,

            net_price: number(&self.net_price),
            median_debt: number(&self.median_debt),
            median_earnings: number(&self.median_earnings),
            endowment,
            enrollment: number(&self.enrollment),
            instructional_expenditure: number(&self.instructional_expenditure),
            affordability_gap: number(&self.affordability_gap),
            parent_affordability_gap: number(&self.parent_affordability_gap),

            graduation: GraduationRates {
                overall: number(&self.grad_rate_total),
                black: number(&self.grad_rate_black),
                white: number(&self.grad_rate_white),
                asian: number(&self.grad_rate_asian),
                native: number(&self.grad_rate_native),
                pacific: number(&self.grad_rate_pacific),
            },
            transfer_out_rate: number(&self.transfer_out_rate),
            retention_rate: number(&self.retention_rate),

            admission_rate: number(&self.admission_rate),
            open_admission: flag(&self.open_admission),

            size: code(&self.size_category).and_then(SizeCategory::from_code),
            urbanization: code(&self.urbanization).and_then(Urbanization::from_code),
            control: code(&self.control).and_then(Control::from_code),
            carnegie: code(&self.carnegie).and_then(CarnegieTier::from_code),
            msi: MsiFlags {
                hbcu: flag(&self.hbcu),
                hsi: flag(&self.hsi),
                tribal: flag(&self.tribal),
                aanapii: flag(&self.aanapii),
                pbi: flag(&self.pbi),
            },
            student_faculty_ratio: number(&self.student_faculty_ratio),
            pell_share: number(&self.pell_share),
            age_25_plus_share: number(&self.age_25_plus_share),
            international_share: number(&self.international_share),

            highest_degree: number(&self.highest_degree),
            bachelor_degrees: number(&self.bachelor_degrees),
            field_degrees: FieldDegrees {
                stem,
                business: number(&self.degrees_business),
                health: number(&self.degrees_health),
                social_sciences: number(&self.degrees_social_sciences),
                arts_and_humanities,
                education: number(&self.degrees_education),
            },

            earnings_ceiling: number(&self.earnings_ceiling),
        })
    }
}

fn number(cell: &Option<String>) -> Option<f64> {
    cell.as_deref().and_then(parse_number)
}

fn code(cell: &Option<String>) -> Option<i64> {
    number(cell)
        .filter(|value| value.fract() == 0.0)
        .map(|value| value as i64)
}

fn flag(cell: &Option<String>) -> bool {
    cell.as_deref().is_some_and(parse_flag)
}

/// Sum of the present parts; `None` when every part is missing.
fn sum_present(parts: &[Option<f64>]) -> Option<f64> {
    parts
        .iter()
        .flatten()
        .copied()
        .fold(None, |total, part| Some(total.unwrap_or(0.0) + part))
}
