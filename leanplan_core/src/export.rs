//! CSV export of daily summaries.

use crate::{DailyRecord, DailySummary, Result};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    weight_kg: Option<f64>,
    meals: usize,
    exercises: usize,
    calories_in: f64,
    exercise_calories: f64,
    calories_out: f64,
    net_balance: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    fiber_g: f64,
}

impl From<(&DailyRecord, &DailySummary)> for CsvRow {
    fn from((record, summary): (&DailyRecord, &DailySummary)) -> Self {
        CsvRow {
            date: record.date.to_string(),
            weight_kg: record.weight_kg,
            meals: record.meals.len(),
            exercises: record.exercises.len(),
            calories_in: round1(summary.calories_in),
            exercise_calories: round1(summary.exercise_calories),
            calories_out: round1(summary.calories_out),
            net_balance: round1(summary.net_balance),
            protein_g: round1(summary.macro_totals.protein_g),
            carbs_g: round1(summary.macro_totals.carbs_g),
            fat_g: round1(summary.macro_totals.fat_g),
            fiber_g: round1(summary.macro_totals.fiber_g),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Write one CSV row per day, replacing any existing file
///
/// Returns the number of rows written. The file is synced to disk
/// before returning.
pub fn export_summaries(rows: &[(DailyRecord, DailySummary)], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    for (record, summary) in rows {
        writer.serialize(CsvRow::from((record, summary)))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} days to {:?}", rows.len(), csv_path);
    Ok(rows.len())
}
