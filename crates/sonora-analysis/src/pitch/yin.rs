//! YIN period estimation (de Cheveigné & Kawahara, 2002)
//!
//! 1. **Difference function** - d(τ) = Σ(x[j] - x[j+τ])²
//! 2. **Cumulative mean normalized difference** - d'(τ) = d(τ) / ((1/τ) Σ d(1..=τ))
//! 3. **Absolute threshold** - first τ where d'(τ) < threshold, walked down to its local minimum
//! 4. **Parabolic interpolation** - sub-sample accuracy
//!
//! O(W × max_lag) using direct computation.

use super::{parabolic_interpolation, LagRange, Period};

/// Below this total energy the window is treated as silence.
const SILENCE_ENERGY: f64 = 1e-10;

pub(super) fn estimate_period(samples: &[f32], lags: LagRange, threshold: f64) -> Option<Period> {
    let energy: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    if energy < SILENCE_ENERGY {
        return None;
    }

    let difference = difference_function(samples, lags.max);
    let cmndf = cumulative_mean_normalized(&difference);
    let tau = absolute_threshold(&cmndf, lags, threshold)?;

    Some(Period {
        lag: parabolic_interpolation(&cmndf, tau),
        confidence: (1.0 - cmndf[tau]) as f32,
    })
}

/// d(τ) for τ in 0..max_lag, summed over the first `W - max_lag` samples so
/// every lag sees the same number of terms.
fn difference_function(samples: &[f32], max_lag: usize) -> Vec<f64> {
    let terms = samples.len() - max_lag;
    let mut difference = vec![0.0f64; max_lag];

    for (tau, d) in difference.iter_mut().enumerate().skip(1) {
        *d = samples[..terms]
            .iter()
            .zip(&samples[tau..tau + terms])
            .map(|(&a, &b)| {
                let delta = a as f64 - b as f64;
                delta * delta
            })
            .sum();
    }

    difference
}

fn cumulative_mean_normalized(difference: &[f64]) -> Vec<f64> {
    let mut cmndf = vec![1.0f64; difference.len()];

    let mut running_sum = 0.0f64;
    for tau in 1..difference.len() {
        running_sum += difference[tau];
        if running_sum > SILENCE_ENERGY {
            cmndf[tau] = difference[tau] * tau as f64 / running_sum;
        }
    }

    cmndf
}

/// First τ ≥ `lags.min` under the threshold, then down to the bottom of its dip.
///
/// Taking the first dip rather than the global minimum avoids subharmonic
/// (octave-down) errors.
fn absolute_threshold(cmndf: &[f64], lags: LagRange, threshold: f64) -> Option<usize> {
    let mut tau = (lags.min..lags.max).find(|&tau| cmndf[tau] < threshold)?;

    while tau + 1 < lags.max && cmndf[tau + 1] < cmndf[tau] {
        tau += 1;
    }

    Some(tau)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_function_periodic() {
        // Period-4 square-ish pattern: d(4) must be exactly zero.
        let samples: Vec<f32> = (0..64).map(|i| [1.0, 0.5, -1.0, -0.5][i % 4]).collect();
        let difference = difference_function(&samples, 16);
        assert_eq!(difference[0], 0.0);
        assert_eq!(difference[4], 0.0);
        assert_eq!(difference[8], 0.0);
        assert!(difference[2] > 0.0);
    }

    #[test]
    fn test_cmndf_starts_at_one() {
        let cmndf = cumulative_mean_normalized(&[0.0, 2.0, 4.0, 0.0]);
        assert_eq!(cmndf[0], 1.0);
        assert_eq!(cmndf[1], 1.0);
        assert!((cmndf[2] - 4.0 * 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(cmndf[3], 0.0);
    }

    #[test]
    fn test_threshold_walks_to_local_minimum() {
        let cmndf = [1.0, 1.0, 0.9, 0.08, 0.05, 0.02, 0.3, 0.01];
        let lags = LagRange { min: 1, max: 8 };
        assert_eq!(absolute_threshold(&cmndf, lags, 0.1), Some(5));
        assert_eq!(absolute_threshold(&cmndf, LagRange { min: 6, max: 8 }, 0.1), Some(7));
        assert_eq!(absolute_threshold(&[1.0; 8], lags, 0.1), None);
    }

    #[test]
    fn test_silence_has_no_period() {
        let lags = LagRange { min: 8, max: 512 };
        assert_eq!(estimate_period(&[0.0; 1024], lags, 0.1), None);
    }
}
