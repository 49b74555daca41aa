use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted drift from 1.0 once a weight vector is renormalized.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

const EMPHASIS_MULTIPLIER: f64 = 2.0;

/// The seven ranking dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Roi,
    Affordability,
    Equity,
    Support,
    AcademicFit,
    Environment,
    Access,
}

impl IndexKind {
    pub const ALL: [IndexKind; 7] = [
        IndexKind::Roi,
        IndexKind::Affordability,
        IndexKind::Equity,
        IndexKind::Support,
        IndexKind::AcademicFit,
        IndexKind::Environment,
        IndexKind::Access,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            IndexKind::Roi => "Return on investment",
            IndexKind::Affordability => "Affordability",
            IndexKind::Equity => "Equity",
            IndexKind::Support => "Support",
            IndexKind::AcademicFit => "Academic fit",
            IndexKind::Environment => "Environment",
            IndexKind::Access => "Access",
        }
    }

    const fn slot(self) -> usize {
        match self {
            IndexKind::Roi => 0,
            IndexKind::Affordability => 1,
            IndexKind::Equity => 2,
            IndexKind::Support => 3,
            IndexKind::AcademicFit => 4,
            IndexKind::Environment => 5,
            IndexKind::Access => 6,
        }
    }

    const fn default_weight(self) -> f64 {
        match self {
            IndexKind::Roi => 0.20,
            IndexKind::Affordability => 0.25,
            IndexKind::Equity => 0.18,
            IndexKind::Support => 0.13,
            IndexKind::AcademicFit => 0.13,
            IndexKind::Environment => 0.06,
            IndexKind::Access => 0.05,
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            IndexKind::Roi => &[
                "roi", "return", "earning", "salary", "career", "job", "debt", "pay off",
            ],
            IndexKind::Affordability => &[
                "cost", "afford", "cheap", "price", "budget", "tuition", "financial aid",
            ],
            IndexKind::Equity => &[
                "equity", "graduation", "graduate", "outcome", "minority", "representation",
            ],
            IndexKind::Support => &[
                "support", "mentor", "advising", "tutoring", "childcare", "first-gen", "resources",
            ],
            IndexKind::AcademicFit => &["research", "academic", "program", "major", "professor"],
            IndexKind::Environment => &[
                "campus", "diverse", "diversity", "community", "culture", "environment",
                "international",
            ],
            IndexKind::Access => &["admission", "admit", "get in", "selective", "chance", "access"],
        }
    }
}

/// How an applicant stated their priorities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredPriorities {
    /// Relative emphasis per index; unlisted indices get zero.
    Explicit(BTreeMap<IndexKind, f64>),
    /// Free text scanned for index keywords.
    Emphasis(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightValidationError {
    #[error("weight for {index:?} must be finite")]
    NonFinite { index: IndexKind },
    #[error("weight for {index:?} must not be negative (got {value})")]
    Negative { index: IndexKind, value: f64 },
    #[error("declared weights must include at least one positive value")]
    ZeroTotal,
    #[error("weights sum to {sum} after normalization")]
    SumOutOfTolerance { sum: f64 },
}

/// Non-negative weights over the seven indices, summing to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "BTreeMap<IndexKind, f64>")]
pub struct WeightVector {
    weights: [f64; 7],
}

impl WeightVector {
    /// Validate and renormalize raw weights, indexed by [`IndexKind::ALL`] order.
    pub fn new(raw: [f64; 7]) -> Result<Self, WeightValidationError> {
        for kind in IndexKind::ALL {
            let value = raw[kind.slot()];
            if !value.is_finite() {
                return Err(WeightValidationError::NonFinite { index: kind });
            }
            if value < 0.0 {
                return Err(WeightValidationError::Negative { index: kind, value });
            }
        }

        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(WeightValidationError::ZeroTotal);
        }

        let weights = raw.map(|value| value / total);
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(WeightValidationError::SumOutOfTolerance { sum });
        }

        Ok(Self { weights })
    }

    pub fn defaults() -> Self {
        Self {
            weights: IndexKind::ALL.map(IndexKind::default_weight),
        }
    }

    pub fn get(&self, kind: IndexKind) -> f64 {
        self.weights[kind.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndexKind, f64)> + '_ {
        IndexKind::ALL.iter().map(|kind| (*kind, self.get(*kind)))
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::defaults()
    }
}

impl From<WeightVector> for BTreeMap<IndexKind, f64> {
    fn from(value: WeightVector) -> Self {
        value.iter().collect()
    }
}

/// Produce the weight vector for a request.
pub fn resolve(priorities: Option<&DeclaredPriorities>) -> Result<WeightVector, WeightValidationError> {
    match priorities {
        None => Ok(WeightVector::defaults()),
        Some(DeclaredPriorities::Explicit(declared)) => {
            let mut raw = [0.0; 7];
            for (kind, value) in declared {
                raw[kind.slot()] = *value;
            }
            WeightVector::new(raw)
        }
        Some(DeclaredPriorities::Emphasis(text)) => {
            let emphasized = emphasized_indices(text);
            if emphasized.is_empty() {
                return Ok(WeightVector::defaults());
            }
            let raw = IndexKind::ALL.map(|kind| {
                if emphasized.contains(&kind) {
                    kind.default_weight() * EMPHASIS_MULTIPLIER
                } else {
                    kind.default_weight()
                }
            });
            WeightVector::new(raw)
        }
    }
}

/// Endings a keyword may carry and still count as the same word.
const INFLECTIONS: [&str; 7] = ["", "s", "es", "ed", "ing", "able", "ability"];

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect()
}

fn word_matches(word: &str, stem: &str) -> bool {
    word.strip_prefix(stem)
        .is_some_and(|ending| INFLECTIONS.contains(&ending))
}

/// Whole-word match; multi-word keywords must appear as consecutive words.
fn mentions(words: &[&str], keyword: &str) -> bool {
    let phrase: Vec<&str> = keyword
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect();
    !phrase.is_empty()
        && words.windows(phrase.len()).any(|window| {
            window
                .iter()
                .zip(&phrase)
                .all(|(word, stem)| word_matches(word, stem))
        })
}

/// Indices whose keywords appear in the text, in [`IndexKind::ALL`] order.
pub fn emphasized_indices(text: &str) -> Vec<IndexKind> {
    let lowered = text.to_lowercase();
    let words = words(&lowered);
    IndexKind::ALL
        .into_iter()
        .filter(|kind| {
            kind.keywords()
                .iter()
                .any(|keyword| mentions(&words, keyword))
        })
        .collect()
}
