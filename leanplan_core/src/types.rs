//! Core domain types for the Leanplan system.
//!
//! This module defines the fundamental types used throughout the system:
//! - User profile and its enumerations (gender, activity level)
//! - Logged entries (exercises, foods, meals, daily records)
//! - Computed outputs (daily summaries, plans, progress reports)

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Profile Types
// ============================================================================

/// Sex used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(Error::InvalidGender(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Habitual activity level, mapped to a TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise and a physical job
    #[serde(alias = "extremely_active")]
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" | "extremely_active" => Ok(ActivityLevel::ExtraActive),
            other => Err(Error::InvalidActivityLevel(other.to_string())),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single user tracked by a leanplan instance
///
/// Only source fields are stored. BMI, BMR and TDEE are recomputed from
/// the current values by the `metrics` module whenever they are needed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub target_weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a validated user profile
    pub fn new(
        name: impl Into<String>,
        age: u32,
        gender: Gender,
        height_cm: f64,
        current_weight_kg: f64,
        target_weight_kg: f64,
        activity_level: ActivityLevel,
    ) -> Result<Self> {
        let user = Self {
            name: name.into(),
            age,
            gender,
            height_cm,
            current_weight_kg,
            target_weight_kg,
            activity_level,
            created_at: Utc::now(),
        };
        user.validate()?;
        Ok(user)
    }

    /// Check profile invariants
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidProfile("name must not be empty".into()));
        }
        if self.age == 0 {
            return Err(Error::InvalidProfile("age must be positive".into()));
        }
        if !is_positive(self.height_cm) {
            return Err(Error::InvalidProfile(format!(
                "height must be positive, got {}",
                self.height_cm
            )));
        }
        if !is_positive(self.current_weight_kg) {
            return Err(Error::InvalidProfile(format!(
                "current weight must be positive, got {}",
                self.current_weight_kg
            )));
        }
        if !is_positive(self.target_weight_kg) {
            return Err(Error::InvalidTarget(format!(
                "target weight must be positive, got {}",
                self.target_weight_kg
            )));
        }
        if self.target_weight_kg > self.current_weight_kg {
            return Err(Error::InvalidTarget(format!(
                "target weight {:.1} kg is above current weight {:.1} kg",
                self.target_weight_kg, self.current_weight_kg
            )));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// ============================================================================
// Logged Entries
// ============================================================================

/// A logged exercise session
///
/// Calories burned are not stored; they are derived from the MET table
/// and the user's weight at read time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub duration_minutes: u32,
    pub activity_type: String,
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// A food item with its nutrition facts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Food {
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default = "default_serving_size")]
    pub serving_size: String,
}

fn default_serving_size() -> String {
    "1 serving".into()
}

impl Food {
    /// Build a validated food item with the default serving size
    pub fn new(
        name: impl Into<String>,
        calories: f64,
        protein_g: f64,
        carbs_g: f64,
        fat_g: f64,
        fiber_g: f64,
    ) -> Result<Self> {
        let food = Self {
            name: name.into(),
            calories,
            protein_g,
            carbs_g,
            fat_g,
            fiber_g,
            serving_size: default_serving_size(),
        };
        food.validate()?;
        Ok(food)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidEntry("food name must not be empty".into()));
        }
        let fields = [
            ("calories", self.calories),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
            ("fiber_g", self.fiber_g),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidEntry(format!(
                    "{} of {} must be a non-negative number, got {}",
                    field, self.name, value
                )));
            }
        }
        Ok(())
    }
}

/// Meal slot within a day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl FromStr for MealType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" | "snacks" => Ok(MealType::Snack),
            other => Err(Error::InvalidMealType(other.to_string())),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        };
        f.write_str(name)
    }
}

/// A logged meal: an ordered list of foods eaten together
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub foods: Vec<Food>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Component-wise macronutrient totals in grams
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroTotals {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

impl MacroTotals {
    pub fn add_food(&mut self, food: &Food) {
        self.protein_g += food.protein_g;
        self.carbs_g += food.carbs_g;
        self.fat_g += food.fat_g;
        self.fiber_g += food.fiber_g;
    }
}

/// Everything logged for one calendar date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl DailyRecord {
    /// Create an empty record for a date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            exercises: Vec::new(),
            meals: Vec::new(),
            weight_kg: None,
            notes: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty() && self.meals.is_empty() && self.weight_kg.is_none()
    }
}

// ============================================================================
// Computed Outputs
// ============================================================================

/// Calorie balance and macro totals for one day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub calories_in: f64,
    /// Calories burned by logged exercise only
    pub exercise_calories: f64,
    /// Baseline TDEE plus logged exercise
    pub calories_out: f64,
    /// Positive is a surplus, negative a deficit
    pub net_balance: f64,
    pub macro_totals: MacroTotals,
}

/// Share of daily calories per macronutrient, in percent
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroSplit {
    pub carbs_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
}

/// Daily macronutrient targets in grams
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroGrams {
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
}

/// One recommended recurring exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRecommendation {
    pub activity_type: String,
    pub frequency: String,
    pub duration_minutes: u32,
    pub description: String,
}

/// Suggested calories and macros for one meal slot
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealSuggestion {
    pub meal_type: MealType,
    pub calories: f64,
    pub example: String,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// A generated weight-loss plan
///
/// Plans are values: a new plan replaces the stored one rather than
/// being edited in place.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightLossPlan {
    pub generated_date: NaiveDate,
    pub duration_weeks: u32,
    pub target_date: NaiveDate,
    pub aggressive: bool,
    pub tdee: f64,
    pub daily_calorie_target: f64,
    pub macro_split: MacroSplit,
    pub macro_grams: MacroGrams,
    /// Requested pace before the calorie floor was applied
    pub weekly_weight_loss_target_kg: f64,
    /// Pace implied by the final calorie target
    pub effective_weekly_loss_kg: f64,
    /// True when the sex-specific minimum raised the calorie target
    pub floor_applied: bool,
    pub exercise_recommendation: String,
    pub diet_recommendation: String,
    pub exercise_plan: Vec<ExerciseRecommendation>,
    pub meal_breakdown: Vec<MealSuggestion>,
}

/// Weight trend statistics over the logged history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressReport {
    pub user_name: String,
    pub start_date: NaiveDate,
    pub latest_date: NaiveDate,
    pub start_weight: f64,
    pub current_weight: f64,
    pub target_weight: f64,
    pub total_lost: f64,
    pub remaining_kg: f64,
    pub avg_weekly_rate: f64,
    pub days_tracked: usize,
    pub on_track: bool,
    /// Losing faster than the safe maximum; a caution, not an error
    pub too_fast: bool,
    pub projected_completion_date: Option<NaiveDate>,
    pub current_bmi: f64,
    pub target_bmi: f64,
    pub tdee: f64,
    pub avg_daily_calories_in: f64,
    pub avg_daily_exercise_calories: f64,
}
