//! Fixed lookup tables used by the calculator and planner.
//!
//! Activity multipliers, MET values, the macro split and the calorie
//! floors live here as one process-wide table built on first use.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

/// kcal in one kilogram of body fat
pub const KCAL_PER_KG_FAT: f64 = 7700.0;

/// kcal per gram of carbohydrate and protein
pub const KCAL_PER_G_CARB_PROTEIN: f64 = 4.0;

/// kcal per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Cached default tables - built once and reused across all operations
static DEFAULT_TABLES: Lazy<Tables> = Lazy::new(build_default_tables);

/// The complete set of constant lookup tables
#[derive(Clone, Debug)]
pub struct Tables {
    pub activity_multipliers: HashMap<ActivityLevel, f64>,
    /// MET value per activity type, ordered by key for display
    pub met_values: BTreeMap<String, f64>,
    pub macro_split: MacroSplit,
    pub calorie_floors: HashMap<Gender, f64>,
}

/// Get a reference to the cached default tables
pub fn get_default_tables() -> &'static Tables {
    &DEFAULT_TABLES
}

/// Builds the default tables
///
/// **Note**: prefer `get_default_tables()`, which returns the cached copy.
pub fn build_default_tables() -> Tables {
    let activity_multipliers = HashMap::from([
        (ActivityLevel::Sedentary, 1.2),
        (ActivityLevel::LightlyActive, 1.375),
        (ActivityLevel::ModeratelyActive, 1.55),
        (ActivityLevel::VeryActive, 1.725),
        (ActivityLevel::ExtraActive, 1.9),
    ]);

    let met_values = [
        ("walking_slow", 2.5),
        ("walking_moderate", 3.5),
        ("walking_fast", 4.5),
        ("running_slow", 7.0),
        ("running_moderate", 10.0),
        ("running_fast", 12.0),
        ("cycling_slow", 4.0),
        ("cycling_moderate", 8.0),
        ("cycling_fast", 12.0),
        ("swimming", 8.0),
        ("yoga", 2.5),
        ("weight_training", 6.0),
        ("aerobics", 7.0),
        ("dancing", 4.5),
        ("basketball", 8.0),
        ("soccer", 10.0),
        ("tennis", 7.5),
    ]
    .into_iter()
    .map(|(name, met)| (name.to_string(), met))
    .collect();

    let calorie_floors = HashMap::from([(Gender::Male, 1500.0), (Gender::Female, 1200.0)]);

    Tables {
        activity_multipliers,
        met_values,
        macro_split: MacroSplit {
            carbs_pct: 40.0,
            protein_pct: 30.0,
            fat_pct: 30.0,
        },
        calorie_floors,
    }
}

impl Tables {
    /// Validate table consistency, returning a list of problems
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for level in ActivityLevel::ALL {
            match self.activity_multipliers.get(&level) {
                None => errors.push(format!("Activity level '{}' has no multiplier", level)),
                Some(m) if *m < 1.0 => errors.push(format!(
                    "Activity level '{}' multiplier {} is below 1.0",
                    level, m
                )),
                Some(_) => {}
            }
        }

        for (name, met) in &self.met_values {
            if name.is_empty() {
                errors.push("MET table has an empty activity name".to_string());
            }
            if met.is_nan() || *met <= 0.0 {
                errors.push(format!("Activity '{}' has non-positive MET {}", name, met));
            }
        }

        let split = self.macro_split;
        let total = split.carbs_pct + split.protein_pct + split.fat_pct;
        if (total - 100.0).abs() > f64::EPSILON {
            errors.push(format!("Macro split sums to {}%, expected 100%", total));
        }

        for gender in [Gender::Male, Gender::Female] {
            if !self.calorie_floors.contains_key(&gender) {
                errors.push(format!("No calorie floor for {}", gender));
            }
        }

        errors
    }
}
