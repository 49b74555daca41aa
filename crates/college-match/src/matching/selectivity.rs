use serde::{Deserialize, Serialize};

use super::domain::Institution;

/// Admission-difficulty bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectivityBucket {
    Safety,
    Target,
    Reach,
    Open,
    Unknown,
}

impl SelectivityBucket {
    pub const ALL: [SelectivityBucket; 5] = [
        SelectivityBucket::Safety,
        SelectivityBucket::Target,
        SelectivityBucket::Reach,
        SelectivityBucket::Open,
        SelectivityBucket::Unknown,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SelectivityBucket::Safety => "Safety",
            SelectivityBucket::Target => "Target",
            SelectivityBucket::Reach => "Reach",
            SelectivityBucket::Open => "Open",
            SelectivityBucket::Unknown => "Unknown",
        }
    }
}

/// Classify from the open-admission flag and admit rate (percent).
///
/// The open-admission check runs first so an open institution that also reports a
/// rate is still `Open`.
pub fn classify(open_admission: bool, admission_rate: Option<f64>) -> SelectivityBucket {
    if open_admission {
        return SelectivityBucket::Open;
    }

    match admission_rate {
        Some(rate) if rate.is_nan() => SelectivityBucket::Unknown,
        Some(rate) if rate > 60.0 => SelectivityBucket::Safety,
        Some(rate) if rate >= 30.0 => SelectivityBucket::Target,
        Some(_) => SelectivityBucket::Reach,
        None => SelectivityBucket::Unknown,
    }
}

pub fn classify_institution(institution: &Institution) -> SelectivityBucket {
    classify(institution.open_admission, institution.admission_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_follow_inclusive_target_band() {
        assert_eq!(classify(false, Some(60.0)), SelectivityBucket::Target);
        assert_eq!(classify(false, Some(60.01)), SelectivityBucket::Safety);
        assert_eq!(classify(false, Some(30.0)), SelectivityBucket::Target);
        assert_eq!(classify(false, Some(29.999)), SelectivityBucket::Reach);
    }

    #[test]
    fn open_admission_wins_over_rate() {
        assert_eq!(classify(true, Some(12.0)), SelectivityBucket::Open);
        assert_eq!(classify(true, None), SelectivityBucket::Open);
    }

    #[test]
    fn missing_rate_is_unknown() {
        assert_eq!(classify(false, None), SelectivityBucket::Unknown);
    }
}
