//! Rolling-window arithmetic used by the indicators.

/// Differences with magnitude at or below this are treated as a tie.
pub const SIGN_EPSILON: f64 = 1e-9;

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Trailing simple means for every full window.
///
/// Element `i` of the result is the mean of `values[i..i + period]`, i.e. the
/// average ending at index `i + period - 1`. Each window is summed
/// independently so equal inputs always produce bit-identical means.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Sign in {-1, 0, 1} with an absolute tie band of [`SIGN_EPSILON`].
pub fn sign(value: f64) -> i8 {
    if value.abs() <= SIGN_EPSILON {
        0
    } else if value > 0.0 {
        1
    } else {
        -1
    }
}
