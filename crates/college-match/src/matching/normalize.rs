//! Column scaling shared by the index builder.

/// Score assigned to every row of a degenerate column and to absent components.
pub const NEUTRAL: f64 = 0.5;

/// Median of the present values, `None` when the column has no data at all.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|value| value.is_finite())
        .collect();
    if present.is_empty() {
        return None;
    }

    present.sort_by(f64::total_cmp);
    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Fill missing or non-finite values with the column median.
pub fn impute(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let fill = median(values)?;
    Some(
        values
            .iter()
            .map(|value| match value {
                Some(v) if v.is_finite() => *v,
                _ => fill,
            })
            .collect(),
    )
}

/// Min-max scale a column into `[0, 1]` after median imputation.
///
/// Zero-variance columns map every row to [`NEUTRAL`]. With `inverse` set the
/// result is `1 - scaled`. Returns `None` when the column holds no values.
pub fn min_max(values: &[Option<f64>], inverse: bool) -> Option<Vec<f64>> {
    let filled = impute(values)?;
    Some(scale(&filled, inverse))
}

/// Min-max scale an already complete column.
pub fn scale(values: &[f64], inverse: bool) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let range = max - min;

    values
        .iter()
        .map(|value| {
            if !(range > 0.0) {
                return NEUTRAL;
            }
            let scaled = clamp_unit((value - min) / range);
            if inverse {
                1.0 - scaled
            } else {
                scaled
            }
        })
        .collect()
}

pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        NEUTRAL
    } else {
        value.clamp(0.0, 1.0)
    }
}
