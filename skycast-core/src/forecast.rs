use chrono::{FixedOffset, NaiveDate, Offset, Timelike, Utc};
use std::collections::BTreeMap;

use crate::model::ForecastPoint;

/// Number of days shown in the forecast strip.
pub const FORECAST_DAYS: usize = 5;

const NOON_SECS: i64 = 12 * 3600;
/// Half of the 3-hour slot width: a day whose slots all fall further than
/// this from noon has no representative.
const NOON_WINDOW_SECS: i64 = 90 * 60;

/// Picks one point per local calendar day, the one closest to local noon.
///
/// Days without a slot within 90 minutes of noon are skipped, so a partial
/// first or last day does not push a full day out of the strip. Ties go to
/// the earlier slot. At most [`FORECAST_DAYS`] points, in date order.
pub fn select_daily(points: &[ForecastPoint], utc_offset_secs: i32) -> Vec<ForecastPoint> {
    let offset = FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(|| Utc.fix());

    let mut by_day: BTreeMap<NaiveDate, (i64, &ForecastPoint)> = BTreeMap::new();

    for point in points {
        let local = point.forecast_at.with_timezone(&offset);
        let distance = (i64::from(local.num_seconds_from_midnight()) - NOON_SECS).abs();
        if distance > NOON_WINDOW_SECS {
            continue;
        }

        by_day
            .entry(local.date_naive())
            .and_modify(|best| {
                let closer = distance < best.0
                    || (distance == best.0 && point.forecast_at < best.1.forecast_at);
                if closer {
                    *best = (distance, point);
                }
            })
            .or_insert((distance, point));
    }

    by_day
        .into_values()
        .take(FORECAST_DAYS)
        .map(|(_, point)| point.clone())
        .collect()
}
