//! Short-horizon revenue forecasting.
//!
//! Fits a straight line through the daily revenue series by closed-form
//! ordinary least squares and extrapolates it a fixed 30 days past the last
//! observed date. Forecast values are deliberately not clamped: a declining
//! trend may legitimately forecast negative revenue.

use chrono::{Days, NaiveDate};
use core_types::TrendDirection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of days forecast beyond the last observed date.
pub const HORIZON_DAYS: u64 = 30;

/// Total net revenue recognised on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub net: Decimal,
}

/// The fitted line `revenue = slope * day_offset + intercept`, where the day
/// offset counts from the earliest observed date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: Decimal,
    pub intercept: Decimal,
}

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// The forecaster's output: a trend label, the fit that produced it (absent
/// when fewer than two distinct days exist) and the extrapolated points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub direction: TrendDirection,
    pub fit: Option<LinearFit>,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    /// The neutral result emitted when no fit is possible.
    fn neutral() -> Self {
        Self { direction: TrendDirection::Neutral, fit: None, points: Vec::new() }
    }
}

/// Fits the daily trend and extrapolates [`HORIZON_DAYS`] past the series.
///
/// The input is re-sorted by date internally, so callers may pass the daily
/// aggregate in any order. Rows sharing a date are merged by summing their
/// revenue; fewer than two distinct days yields the neutral result.
pub fn fit_daily_trend(daily: &[DailyRevenue]) -> Forecast {
    let mut sorted: Vec<&DailyRevenue> = daily.iter().collect();
    sorted.sort_by_key(|d| d.date);

    let mut series: Vec<(NaiveDate, Decimal)> = Vec::new();
    for day in sorted {
        match series.last_mut() {
            Some((date, net)) if *date == day.date => *net += day.net,
            _ => series.push((day.date, day.net)),
        }
    }

    if series.len() < 2 {
        debug!(days = series.len(), "fewer than two distinct days, skipping forecast");
        return Forecast::neutral();
    }

    let first_date = series[0].0;
    let last_date = series[series.len() - 1].0;

    let n = Decimal::from(series.len() as u64);
    let mut sum_x = Decimal::ZERO;
    let mut sum_y = Decimal::ZERO;
    let mut sum_xx = Decimal::ZERO;
    let mut sum_xy = Decimal::ZERO;

    for (date, net) in &series {
        let x = Decimal::from(date.signed_duration_since(first_date).num_days());
        sum_x += x;
        sum_y += *net;
        sum_xx += x * x;
        sum_xy += x * *net;
    }

    // The series holds >= 2 distinct days, so the x values differ and the
    // denominator is never zero.
    let denominator = n * sum_xx - sum_x * sum_x;
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let direction = if slope > Decimal::ZERO {
        TrendDirection::Rising
    } else {
        TrendDirection::FallingOrFlat
    };

    let last_offset = Decimal::from(last_date.signed_duration_since(first_date).num_days());
    let points = (1..=HORIZON_DAYS)
        .map(|i| ForecastPoint {
            date: last_date + Days::new(i),
            value: slope * (last_offset + Decimal::from(i)) + intercept,
        })
        .collect();

    debug!(%slope, %intercept, direction = direction.label(), "fitted daily revenue trend");

    Forecast { direction, fit: Some(LinearFit { slope, intercept }), points }
}
