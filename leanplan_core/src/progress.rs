//! Progress analysis over the logged weight history.
//!
//! Weight entries are taken from the daily records that carry one, ordered
//! by date. The rate is measured across the whole span between the first
//! and the last entry.

use crate::aggregate::summarize_period;
use crate::metrics::{bmi, target_bmi, tdee};
use crate::{DailyRecord, Error, ProgressReport, Result, User};
use chrono::{Duration, NaiveDate};

/// Fastest weekly loss still considered safe
pub const MAX_SAFE_WEEKLY_LOSS_KG: f64 = 1.5;

/// A dated weight measurement
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

/// Extract weight entries from records, sorted by date ascending
pub fn weight_entries(records: &[DailyRecord]) -> Vec<WeightEntry> {
    let mut entries: Vec<WeightEntry> = records
        .iter()
        .filter_map(|r| {
            r.weight_kg.map(|weight_kg| WeightEntry {
                date: r.date,
                weight_kg,
            })
        })
        .collect();
    entries.sort_by_key(|e| e.date);
    entries
}

/// Analyze weight progress for `user` as of `today`
///
/// Fails with `InsufficientData` when fewer than two weight entries exist
/// or when they all fall on the same day.
pub fn analyze(user: &User, records: &[DailyRecord], today: NaiveDate) -> Result<ProgressReport> {
    let entries = weight_entries(records);
    let (first, last) = match (entries.first(), entries.last()) {
        (Some(first), Some(last)) if entries.len() >= 2 => (*first, *last),
        _ => {
            return Err(Error::InsufficientData(format!(
                "need at least 2 weight entries, found {}",
                entries.len()
            )))
        }
    };

    let span_days = (last.date - first.date).num_days();
    if span_days <= 0 {
        return Err(Error::InsufficientData(
            "weight entries span zero days".into(),
        ));
    }

    let total_lost = first.weight_kg - last.weight_kg;
    let avg_weekly_rate = total_lost / (span_days as f64 / 7.0);
    let remaining_kg = last.weight_kg - user.target_weight_kg;

    let moving_toward_target = avg_weekly_rate > 0.0 || remaining_kg <= 0.0;
    let on_track =
        (0.0..=MAX_SAFE_WEEKLY_LOSS_KG).contains(&avg_weekly_rate) && moving_toward_target;
    let too_fast = avg_weekly_rate > MAX_SAFE_WEEKLY_LOSS_KG;
    if too_fast {
        tracing::warn!(
            "Losing {:.2} kg/week, faster than the {:.1} kg/week safe maximum",
            avg_weekly_rate,
            MAX_SAFE_WEEKLY_LOSS_KG
        );
    }

    let projected_completion_date = projected_completion(today, remaining_kg, avg_weekly_rate);

    let averages = summarize_period(records, user)?;

    tracing::debug!(
        "Progress over {} days: lost {:.2} kg at {:.2} kg/week",
        span_days,
        total_lost,
        avg_weekly_rate
    );

    Ok(ProgressReport {
        user_name: user.name.clone(),
        start_date: first.date,
        latest_date: last.date,
        start_weight: first.weight_kg,
        current_weight: last.weight_kg,
        target_weight: user.target_weight_kg,
        total_lost,
        remaining_kg,
        avg_weekly_rate,
        days_tracked: records.len(),
        on_track,
        too_fast,
        projected_completion_date,
        current_bmi: bmi(last.weight_kg, user.height_cm),
        target_bmi: target_bmi(user),
        tdee: tdee(user)?,
        avg_daily_calories_in: averages.avg_calories_in,
        avg_daily_exercise_calories: averages.avg_exercise_calories,
    })
}

/// Date the target is reached at the current pace, if the pace is positive
fn projected_completion(today: NaiveDate, remaining_kg: f64, weekly_rate: f64) -> Option<NaiveDate> {
    if weekly_rate <= 0.0 {
        return None;
    }
    if remaining_kg <= 0.0 {
        return Some(today);
    }
    let days = (remaining_kg / weekly_rate * 7.0).ceil();
    if !days.is_finite() || days > i64::MAX as f64 {
        return None;
    }
    // Out of chrono's date range means no meaningful projection
    Duration::try_days(days as i64).and_then(|offset| today.checked_add_signed(offset))
}
