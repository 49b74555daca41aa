use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

static HEADER_MAP: OnceLock<HashMap<String, &'static str>> = OnceLock::new();

/// Canonical fields the index formulas depend on; reported when a file lacks them.
pub(crate) const INDEXED_FIELDS: &[&str] = &[
    "net_price",
    "median_debt",
    "median_earnings",
    "affordability_gap",
    "parent_affordability_gap",
    "student_faculty_ratio",
    "instructional_expenditure",
    "pell_share",
    "transfer_out_rate",
    "age_25_plus_share",
    "international_share",
    "highest_degree",
    "carnegie",
    "bachelor_degrees",
    "admission_rate",
    "grad_rate_black",
    "grad_rate_white",
    "grad_rate_asian",
    "grad_rate_native",
    "grad_rate_pacific",
];

/// Canonical field name for a raw header, if the header is one we read.
pub(crate) fn canonical_field(raw_header: &str) -> Option<&'static str> {
    header_map().get(&normalize_header(raw_header)).copied()
}

fn header_map() -> &'static HashMap<String, &'static str> {
    HEADER_MAP.get_or_init(|| {
        const HEADER_TO_FIELD: &[(&str, &str)] = &[
            // Identity
            ("UNITID", "id"),
            ("Unit ID", "id"),
            ("UNIQUE_IDENTIFICATION_NUMBER_OF_THE_INSTITUTION", "id"),
            ("Institution Name", "name"),
            ("INSTNM", "name"),
            ("State of Institution", "state"),
            ("STABBR", "state"),
            ("City", "city"),
            ("Region #", "region"),
            ("Region", "region"),
            ("Latitude", "latitude"),
            ("LAT", "latitude"),
            ("Longitude", "longitude"),
            ("LON", "longitude"),
            ("LNG", "longitude"),
            // Financial
            ("Net Price", "net_price"),
            ("Median Debt of Completers", "median_debt"),
            (
                "Median Earnings of Students Working and Not Enrolled 10 Years After Entry",
                "median_earnings",
            ),
            ("Median Earnings", "median_earnings"),
            ("Public Institution GASB Endowment Assets", "endowment_gasb"),
            (
                "Private not-for-profit or Public Institution FASB Endowment Assets",
                "endowment_fasb",
            ),
            ("Endowment Assets", "endowment"),
            ("Number of Undergraduates", "enrollment"),
            (
                "Instructional Expenditures per Full-Time Equivalent Student",
                "instructional_expenditure",
            ),
            (
                "Affordability Gap (net price minus income earned working 10 hrs at min wage)",
                "affordability_gap",
            ),
            ("Affordability Gap", "affordability_gap"),
            (
                "Student Parent Affordability Gap: Center-Based Care",
                "parent_affordability_gap",
            ),
            ("Earnings Ceiling", "earnings_ceiling"),
            // Outcomes
            (
                "Bachelor's Degree Graduation Rate Within 6 Years - Total",
                "grad_rate_total",
            ),
            (
                "Bachelor's Degree Graduation Rate Within 6 Years - Black, Non-Latino",
                "grad_rate_black",
            ),
            (
                "Bachelor's Degree Graduation Rate Within 6 Years - White Non-Latino",
                "grad_rate_white",
            ),
            (
                "Bachelor's Degree Graduation Rate Within 6 Years - Asian",
                "grad_rate_asian",
            ),
            (
                "Bachelor's Degree Graduation Rate Within 6 Years - American Indian or Alaska Native",
                "grad_rate_native",
            ),
            (
                "Bachelor's Degree Graduation Rate Within 6 Years - Native Hawaiian or Other Pacific Islander",
                "grad_rate_pacific",
            ),
            ("Transfer-Out Rate", "transfer_out_rate"),
            ("Full-Time Retention Rate", "retention_rate"),
            ("Retention Rate", "retention_rate"),
            // Access
            ("Total Percent of Applicants Admitted", "admission_rate"),
            ("Admission Rate", "admission_rate"),
            ("Open Admissions Policy", "open_admission"),
            // Environment
            ("Institution Size Category", "size_category"),
            ("Degree of Urbanization", "urbanization"),
            ("Control of Institution", "control"),
            ("2021 Carnegie Classification", "carnegie"),
            ("Carnegie Classification", "carnegie"),
            ("Historically Black College or University", "hbcu"),
            ("HBCU", "hbcu"),
            ("Hispanic-Serving Institution", "hsi"),
            ("HSI", "hsi"),
            ("Tribal College or University", "tribal"),
            ("TRIBAL", "tribal"),
            (
                "Asian American and Native American Pacific Islander-Serving Institution",
                "aanapii",
            ),
            ("AANAPII", "aanapii"),
            ("Predominantly Black Institution", "pbi"),
            ("PBI", "pbi"),
            ("Student-to-Faculty Ratio", "student_faculty_ratio"),
            ("Percent Receiving Pell Grants", "pell_share"),
            ("Percent of Undergraduates Age 25 and Older", "age_25_plus_share"),
            ("Percent International Students", "international_share"),
            // Academic
            ("Highest Degree Offered", "highest_degree"),
            ("Number of Bachelor Degrees Grand Total", "bachelor_degrees"),
            (
                "Number of Bachelor Degrees Biological And Biomedical Sciences",
                "degrees_biology",
            ),
            (
                "Number of Bachelor Degrees Computer And Information Sciences And Support Services",
                "degrees_computing",
            ),
            ("Number of Bachelor Degrees Engineering", "degrees_engineering"),
            (
                "Number of Bachelor Degrees Mathematics And Statistics",
                "degrees_mathematics",
            ),
            ("Number of Bachelor Degrees Physical Sciences", "degrees_physical_sciences"),
            (
                "Number of Bachelor Degrees Business, Management, Marketing, And Related Support Services",
                "degrees_business",
            ),
            (
                "Number of Bachelor Degrees Health Professions And Related Programs",
                "degrees_health",
            ),
            ("Number of Bachelor Degrees Social Sciences", "degrees_social_sciences"),
            ("Number of Bachelor Degrees Visual And Performing Arts", "degrees_visual_arts"),
            (
                "Number of Bachelor Degrees English Language And Literature/Letters",
                "degrees_english",
            ),
            ("Number of Bachelor Degrees Education", "degrees_education"),
        ];

        // snake_case exports use the canonical names directly.
        const CANONICAL: &[&str] = &[
            "id",
            "name",
            "state",
            "city",
            "region",
            "latitude",
            "longitude",
            "net_price",
            "median_debt",
            "median_earnings",
            "endowment",
            "endowment_gasb",
            "endowment_fasb",
            "enrollment",
            "instructional_expenditure",
            "affordability_gap",
            "parent_affordability_gap",
            "earnings_ceiling",
            "grad_rate_total",
            "grad_rate_black",
            "grad_rate_white",
            "grad_rate_asian",
            "grad_rate_native",
            "grad_rate_pacific",
            "transfer_out_rate",
            "retention_rate",
            "admission_rate",
            "open_admission",
            "size_category",
            "urbanization",
            "control",
            "carnegie",
            "hbcu",
            "hsi",
            "tribal",
            "aanapii",
            "pbi",
            "student_faculty_ratio",
            "pell_share",
            "age_25_plus_share",
            "international_share",
            "highest_degree",
            "bachelor_degrees",
            "degrees_stem",
            "degrees_biology",
            "degrees_computing",
            "degrees_engineering",
            "degrees_mathematics",
            "degrees_physical_sciences",
            "degrees_business",
            "degrees_health",
            "degrees_social_sciences",
            "degrees_arts_and_humanities",
            "degrees_visual_arts",
            "degrees_english",
            "degrees_education",
        ];

        let mut map = HashMap::new();
        for (header, field) in HEADER_TO_FIELD {
            map.insert(normalize_header(header), *field);
        }
        for field in CANONICAL {
            map.insert((*field).to_string(), *field);
        }
        map
    })
}
