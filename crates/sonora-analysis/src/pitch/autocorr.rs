//! Autocorrelation period estimation
//!
//! `ac[lag] = Σ x[i]·x[i+lag]`. The first strict local peak at or beyond the
//! minimum lag that exceeds half of `ac[0]` is taken, not the global maximum,
//! which favours the fundamental over its harmonics.

use super::{parabolic_interpolation, LagRange, Period};

/// Fraction of the zero-lag energy a peak must exceed.
const PEAK_THRESHOLD: f64 = 0.5;

pub(super) fn estimate_period(samples: &[f32], lags: LagRange) -> Option<Period> {
    let ac = autocorrelation(samples, lags.max);

    let energy = ac[0];
    if energy <= 1e-10 {
        return None;
    }

    let lag = (lags.min.max(1)..lags.max - 1).find(|&lag| {
        ac[lag] > ac[lag - 1] && ac[lag] > ac[lag + 1] && ac[lag] > PEAK_THRESHOLD * energy
    })?;

    Some(Period {
        lag: parabolic_interpolation(&ac, lag),
        confidence: (ac[lag] / energy) as f32,
    })
}

/// Raw autocorrelation for lags `0..max_lag`.
fn autocorrelation(samples: &[f32], max_lag: usize) -> Vec<f64> {
    (0..max_lag)
        .map(|lag| {
            samples
                .iter()
                .zip(&samples[lag.min(samples.len())..])
                .map(|(&a, &b)| a as f64 * b as f64)
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autocorrelation_values() {
        let ac = autocorrelation(&[1.0, 2.0, 3.0], 3);
        assert_eq!(ac, vec![14.0, 8.0, 3.0]);
    }

    #[test]
    fn test_first_peak_preferred() {
        // Impulse train with period 10 has peaks at 10, 20, 30...; the first wins.
        let samples: Vec<f32> = (0..200).map(|i| if i % 10 == 0 { 1.0 } else { 0.0 }).collect();
        let period = estimate_period(&samples, LagRange { min: 2, max: 100 });
        // ac[10] is 19/20 of ac[0] but its neighbours are zero: a strict peak.
        let period = period.expect("impulse train is periodic");
        assert!((period.lag - 10.0).abs() < 1e-9);
        assert!((period.confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_silence_has_no_period() {
        assert_eq!(estimate_period(&[0.0; 256], LagRange { min: 2, max: 100 }), None);
    }
}
