//! Order statistics over small sample sets.

/// Consistency constant relating MAD to the standard deviation of a normal distribution.
pub const MAD_SCALE: f64 = 1.4826;

/// Median of a sample set.
///
/// Even-sized sets average the two middle values. Returns `None` for an
/// empty set.
pub fn median<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut sorted: Vec<f64> = values.into_iter().copied().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Scaled median absolute deviation around `center`.
pub fn scaled_mad<'a, I>(values: I, center: f64) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let deviations: Vec<f64> = values.into_iter().map(|v| (v - center).abs()).collect();
    median(&deviations).map(|m| MAD_SCALE * m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_scaled_mad() {
        // Deviations from 3: [2, 1, 0, 1, 2] → median 1
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mad = scaled_mad(&values, 3.0).unwrap();
        assert!((mad - MAD_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_mad_identical_values_is_zero() {
        let values = [7.0; 6];
        assert_eq!(scaled_mad(&values, 7.0), Some(0.0));
    }
}
