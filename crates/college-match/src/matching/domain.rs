use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog institutions (IPEDS unit id in the bundled data).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstitutionId(pub String);

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Ownership of an institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Public,
    PrivateNonprofit,
    ForProfit,
}

impl Control {
    /// IPEDS control codes: 1 public, 2 private nonprofit, 3 private for-profit.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Public),
            2 => Some(Self::PrivateNonprofit),
            3 => Some(Self::ForProfit),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Control::Public => "Public",
            Control::PrivateNonprofit => "Private nonprofit",
            Control::ForProfit => "Private for-profit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    /// Size codes 1 and 2 are small and medium; every larger band counts as large.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Small),
            2 => Some(Self::Medium),
            3..=5 => Some(Self::Large),
            _ => None,
        }
    }
}

/// Campus setting derived from the locale code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urbanization {
    City,
    Suburb,
    Town,
    Rural,
}

impl Urbanization {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            11..=13 => Some(Self::City),
            21..=23 => Some(Self::Suburb),
            31..=33 => Some(Self::Town),
            41..=43 => Some(Self::Rural),
            _ => None,
        }
    }
}

/// Coarse Carnegie tier (2021 basic classification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarnegieTier {
    Doctoral,
    Masters,
    Baccalaureate,
    Associate,
    Other,
}

impl CarnegieTier {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            15..=17 => Some(Self::Doctoral),
            18..=20 => Some(Self::Masters),
            21..=23 => Some(Self::Baccalaureate),
            1..=9 => Some(Self::Associate),
            c if c > 0 => Some(Self::Other),
            _ => None,
        }
    }

    /// Research-intensity component of the Academic Offerings index.
    pub fn research_intensity(self) -> f64 {
        match self {
            CarnegieTier::Doctoral => 1.0,
            CarnegieTier::Masters => 0.7,
            CarnegieTier::Baccalaureate => 0.5,
            CarnegieTier::Associate => 0.3,
            CarnegieTier::Other => 0.5,
        }
    }
}

/// Minority-serving designations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsiDesignation {
    Hbcu,
    Hsi,
    Tribal,
    Aanapii,
    Pbi,
}

impl MsiDesignation {
    pub const ALL: [MsiDesignation; 5] = [
        MsiDesignation::Hbcu,
        MsiDesignation::Hsi,
        MsiDesignation::Tribal,
        MsiDesignation::Aanapii,
        MsiDesignation::Pbi,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MsiDesignation::Hbcu => "HBCU",
            MsiDesignation::Hsi => "HSI",
            MsiDesignation::Tribal => "Tribal",
            MsiDesignation::Aanapii => "AANAPII",
            MsiDesignation::Pbi => "PBI",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsiFlags {
    pub hbcu: bool,
    pub hsi: bool,
    pub tribal: bool,
    pub aanapii: bool,
    pub pbi: bool,
}

impl MsiFlags {
    pub fn has(&self, designation: MsiDesignation) -> bool {
        match designation {
            MsiDesignation::Hbcu => self.hbcu,
            MsiDesignation::Hsi => self.hsi,
            MsiDesignation::Tribal => self.tribal,
            MsiDesignation::Aanapii => self.aanapii,
            MsiDesignation::Pbi => self.pbi,
        }
    }

    pub fn any(&self) -> bool {
        MsiDesignation::ALL.iter().any(|designation| self.has(*designation))
    }
}

/// Race/ethnicity groups with a published 6-year graduation rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceGroup {
    Black,
    White,
    Asian,
    Native,
    Pacific,
}

impl RaceGroup {
    pub const ALL: [RaceGroup; 5] = [
        RaceGroup::Black,
        RaceGroup::White,
        RaceGroup::Asian,
        RaceGroup::Native,
        RaceGroup::Pacific,
    ];
}

/// Fields of study used for program strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOfStudy {
    Stem,
    Business,
    Health,
    SocialSciences,
    ArtsAndHumanities,
    Education,
    Undecided,
}

impl FieldOfStudy {
    pub const DECLARED: [FieldOfStudy; 6] = [
        FieldOfStudy::Stem,
        FieldOfStudy::Business,
        FieldOfStudy::Health,
        FieldOfStudy::SocialSciences,
        FieldOfStudy::ArtsAndHumanities,
        FieldOfStudy::Education,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FieldOfStudy::Stem => "STEM",
            FieldOfStudy::Business => "Business",
            FieldOfStudy::Health => "Health",
            FieldOfStudy::SocialSciences => "Social Sciences",
            FieldOfStudy::ArtsAndHumanities => "Arts & Humanities",
            FieldOfStudy::Education => "Education",
            FieldOfStudy::Undecided => "Undecided",
        }
    }
}

/// 6-year bachelor's graduation rates, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraduationRates {
    pub overall: Option<f64>,
    pub black: Option<f64>,
    pub white: Option<f64>,
    pub asian: Option<f64>,
    pub native: Option<f64>,
    pub pacific: Option<f64>,
}

impl GraduationRates {
    pub fn for_group(&self, group: RaceGroup) -> Option<f64> {
        match group {
            RaceGroup::Black => self.black,
            RaceGroup::White => self.white,
            RaceGroup::Asian => self.asian,
            RaceGroup::Native => self.native,
            RaceGroup::Pacific => self.pacific,
        }
    }
}

/// Bachelor's degrees conferred per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDegrees {
    pub stem: Option<f64>,
    pub business: Option<f64>,
    pub health: Option<f64>,
    pub social_sciences: Option<f64>,
    pub arts_and_humanities: Option<f64>,
    pub education: Option<f64>,
}

impl FieldDegrees {
    pub fn for_field(&self, field: FieldOfStudy) -> Option<f64> {
        match field {
            FieldOfStudy::Stem => self.stem,
            FieldOfStudy::Business => self.business,
            FieldOfStudy::Health => self.health,
            FieldOfStudy::SocialSciences => self.social_sciences,
            FieldOfStudy::ArtsAndHumanities => self.arts_and_humanities,
            FieldOfStudy::Education => self.education,
            FieldOfStudy::Undecided => None,
        }
    }
}

/// One catalog row in the canonical schema. Missing source values stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub region: Option<u8>,
    pub location: Option<GeoPoint>,

    pub net_price: Option<f64>,
    pub median_debt: Option<f64>,
    pub median_earnings: Option<f64>,
    pub endowment: Option<f64>,
    pub enrollment: Option<f64>,
    pub instructional_expenditure: Option<f64>,
    pub affordability_gap: Option<f64>,
    pub parent_affordability_gap: Option<f64>,

    pub graduation: GraduationRates,
    pub transfer_out_rate: Option<f64>,
    pub retention_rate: Option<f64>,

    pub admission_rate: Option<f64>,
    pub open_admission: bool,

    pub size: Option<SizeCategory>,
    pub urbanization: Option<Urbanization>,
    pub control: Option<Control>,
    pub carnegie: Option<CarnegieTier>,
    pub msi: MsiFlags,
    pub student_faculty_ratio: Option<f64>,
    pub pell_share: Option<f64>,
    pub age_25_plus_share: Option<f64>,
    pub international_share: Option<f64>,

    pub highest_degree: Option<f64>,
    pub bachelor_degrees: Option<f64>,
    pub field_degrees: FieldDegrees,

    /// Income bracket of the source row when the upstream data is one row per bracket.
    pub earnings_ceiling: Option<f64>,
}

impl Default for InstitutionId {
    fn default() -> Self {
        Self(String::new())
    }
}

impl Institution {
    pub fn endowment_per_student(&self) -> Option<f64> {
        match (self.endowment, self.enrollment) {
            (Some(endowment), Some(enrollment)) if enrollment > 0.0 => {
                Some(endowment / enrollment)
            }
            _ => None,
        }
    }

    pub fn is_doctoral(&self) -> bool {
        self.carnegie == Some(CarnegieTier::Doctoral)
    }
}
