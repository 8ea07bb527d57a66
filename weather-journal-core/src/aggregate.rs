use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{Result, WeatherError},
    model::{DailySeries, Summary},
};

/// Reduce a daily series to mean max/min temperature and total precipitation.
///
/// Means and the sum are computed on the unrounded daily values; only the
/// results are rounded to one decimal. Missing days are skipped.
pub fn summarize(series: &DailySeries) -> Result<Summary> {
    let avg_max_temp = mean(&series.temperature_2m_max)
        .ok_or_else(|| WeatherError::validation("No maximum temperatures to average"))?;
    let avg_min_temp = mean(&series.temperature_2m_min)
        .ok_or_else(|| WeatherError::validation("No minimum temperatures to average"))?;
    let total_precipitation: f64 = series.precipitation_sum.iter().flatten().sum();

    Ok(Summary {
        avg_max_temp: round1(avg_max_temp),
        avg_min_temp: round1(avg_min_temp),
        total_precipitation: round1(total_precipitation),
    })
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Round the exact binary value to one fractional digit, ties away from zero.
///
/// 0.35 is stored as 0.3499..., so it rounds to 0.3.
pub fn round1(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_string().parse().ok())
        .unwrap_or(value)
}
