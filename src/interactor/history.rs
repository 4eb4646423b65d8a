use rand::Rng;

use crate::settings::HISTORY_POINTS;

/// Value every generated series starts from
pub const BASE_VALUE: f64 = 100.0;

// Noise amplitudes for freshly generated and advancing series
const GENERATE_NOISE: f64 = 1.0;
const ADVANCE_NOISE: f64 = 0.5;

/// Generate a synthetic series drifting by `trend_percent` over `point_count` steps
pub fn generate(trend_percent: f64, point_count: usize) -> Vec<f64> {
    generate_with(&mut rand::rng(), trend_percent, point_count)
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, trend_percent: f64, point_count: usize) -> Vec<f64> {
    if point_count == 0 {
        return Vec::new();
    }

    let step = finite_or_zero(trend_percent) / point_count as f64;
    let mut current = BASE_VALUE;

    (0..point_count)
        .map(|_| {
            current += step + rng.random_range(-GENERATE_NOISE..=GENERATE_NOISE);
            current
        })
        .collect()
}

/// Shift out the oldest sample and append one following `change_percent`.
///
/// The length never changes. An empty history is regenerated with
/// `HISTORY_POINTS` samples instead.
pub fn advance(history: &mut Vec<f64>, change_percent: f64) {
    advance_with(&mut rand::rng(), history, change_percent)
}

pub fn advance_with<R: Rng + ?Sized>(rng: &mut R, history: &mut Vec<f64>, change_percent: f64) {
    let Some(&last) = history.last() else {
        *history = generate_with(rng, change_percent, HISTORY_POINTS);
        return;
    };

    // Per-step drift is fixed regardless of the configured series length
    let trend = finite_or_zero(change_percent) / HISTORY_POINTS as f64;
    let next = last + trend + rng.random_range(-ADVANCE_NOISE..=ADVANCE_NOISE);

    history.remove(0);
    history.push(if next.is_finite() { next } else { last });
}

/// Use a provided series when it has the right shape, otherwise generate one
pub fn fit_or_generate(history: Option<Vec<f64>>, trend_percent: f64, point_count: usize) -> Vec<f64> {
    match history {
        Some(series) if series.len() == point_count && series.iter().all(|v| v.is_finite()) => series,
        _ => generate(trend_percent, point_count),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
