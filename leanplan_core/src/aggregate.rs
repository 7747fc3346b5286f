//! Daily calorie and macro rollups.
//!
//! Folds the meals and exercises of a `DailyRecord` into a `DailySummary`.
//! TDEE is the baseline burn for the day; logged exercise is added on top.

use crate::metrics::{activity_calories, tdee};
use crate::{DailyRecord, DailySummary, Exercise, MacroTotals, Meal, Result, User};

impl Meal {
    /// Sum of calories across all foods in the meal
    pub fn total_calories(&self) -> f64 {
        self.foods.iter().map(|f| f.calories).sum()
    }

    /// Component-wise macro totals across all foods in the meal
    pub fn macro_totals(&self) -> MacroTotals {
        let mut totals = MacroTotals::default();
        for food in &self.foods {
            totals.add_food(food);
        }
        totals
    }
}

impl Exercise {
    /// Calories burned at the given body weight
    pub fn calories_burned(&self, weight_kg: f64) -> Result<f64> {
        activity_calories(&self.activity_type, weight_kg, self.duration_minutes)
    }
}

/// Summarize one day's intake and expenditure for a user
///
/// Exercise burn uses the user's current weight. A record with no meals
/// yields `calories_in == 0`.
pub fn aggregate(record: &DailyRecord, user: &User) -> Result<DailySummary> {
    let baseline = tdee(user)?;

    let mut calories_in = 0.0;
    let mut macro_totals = MacroTotals::default();
    for meal in &record.meals {
        for food in &meal.foods {
            calories_in += food.calories;
            macro_totals.add_food(food);
        }
    }

    let mut exercise_calories = 0.0;
    for exercise in &record.exercises {
        exercise_calories += exercise.calories_burned(user.current_weight_kg)?;
    }

    let calories_out = baseline + exercise_calories;
    let summary = DailySummary {
        date: record.date,
        calories_in,
        exercise_calories,
        calories_out,
        net_balance: calories_in - calories_out,
        macro_totals,
    };

    tracing::debug!(
        "Aggregated {}: in {:.0} kcal, out {:.0} kcal, net {:.0} kcal",
        record.date,
        summary.calories_in,
        summary.calories_out,
        summary.net_balance
    );

    Ok(summary)
}

/// Averages over a run of tracked days
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeriodAverages {
    pub days: usize,
    pub avg_calories_in: f64,
    pub avg_exercise_calories: f64,
}

/// Average daily intake and exercise burn across records
pub fn summarize_period(records: &[DailyRecord], user: &User) -> Result<PeriodAverages> {
    if records.is_empty() {
        return Ok(PeriodAverages::default());
    }

    let mut total_in = 0.0;
    let mut total_exercise = 0.0;
    for record in records {
        let summary = aggregate(record, user)?;
        total_in += summary.calories_in;
        total_exercise += summary.exercise_calories;
    }

    let days = records.len();
    Ok(PeriodAverages {
        days,
        avg_calories_in: total_in / days as f64,
        avg_exercise_calories: total_exercise / days as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityLevel, Error, Food, Gender, MealType};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn sample_user() -> User {
        User::new(
            "Sam",
            30,
            Gender::Male,
            175.0,
            85.0,
            75.0,
            ActivityLevel::ModeratelyActive,
        )
        .unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn breakfast() -> Meal {
        Meal {
            id: Uuid::new_v4(),
            date: day(),
            meal_type: MealType::Breakfast,
            foods: vec![
                Food::new("Oatmeal", 150.0, 5.0, 27.0, 3.0, 4.0).unwrap(),
                Food::new("Egg", 70.0, 6.0, 1.0, 5.0, 0.0).unwrap(),
                Food::new("Apple", 95.0, 0.5, 25.0, 0.3, 4.0).unwrap(),
            ],
            time: Some("08:00".into()),
            notes: String::new(),
        }
    }

    fn jog(activity_type: &str) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            date: day(),
            name: "Morning jog".into(),
            duration_minutes: 30,
            activity_type: activity_type.into(),
            intensity: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_meal_totals() {
        let meal = breakfast();
        assert_eq!(meal.total_calories(), 315.0);
        let macros = meal.macro_totals();
        assert!((macros.protein_g - 11.5).abs() < 1e-9);
        assert!((macros.carbs_g - 53.0).abs() < 1e-9);
        assert!((macros.fat_g - 8.3).abs() < 1e-9);
        assert!((macros.fiber_g - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_day_is_pure_tdee() {
        let user = sample_user();
        let summary = aggregate(&DailyRecord::new(day()), &user).unwrap();

        assert_eq!(summary.calories_in, 0.0);
        assert_eq!(summary.exercise_calories, 0.0);
        assert_eq!(summary.calories_out, tdee(&user).unwrap());
        assert!(summary.net_balance < 0.0);
    }

    #[test]
    fn test_aggregate_with_meals_and_exercise() {
        let user = sample_user();
        let mut record = DailyRecord::new(day());
        record.meals.push(breakfast());
        record.exercises.push(jog("running_slow"));

        let summary = aggregate(&record, &user).unwrap();
        let baseline = tdee(&user).unwrap();

        assert_eq!(summary.calories_in, 315.0);
        assert!((summary.exercise_calories - 297.5).abs() < 1e-9);
        assert!((summary.calories_out - (baseline + 297.5)).abs() < 1e-9);
        assert!((summary.net_balance - (315.0 - baseline - 297.5)).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let user = sample_user();
        let mut record = DailyRecord::new(day());
        record.meals.push(breakfast());
        record.exercises.push(jog("yoga"));

        let first = aggregate(&record, &user).unwrap();
        let second = aggregate(&record, &user).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exercise_burn_follows_current_weight() {
        let mut user = sample_user();
        let mut record = DailyRecord::new(day());
        record.exercises.push(jog("running_slow"));

        let before = aggregate(&record, &user).unwrap().exercise_calories;
        user.current_weight_kg = 80.0;
        let after = aggregate(&record, &user).unwrap().exercise_calories;

        assert!((before - 297.5).abs() < 1e-9);
        assert!((after - 280.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_activity_fails_whole_summary() {
        let user = sample_user();
        let mut record = DailyRecord::new(day());
        record.exercises.push(jog("moonwalking"));

        let err = aggregate(&record, &user).unwrap_err();
        assert!(matches!(err, Error::UnknownActivityType(_)));
    }

    #[test]
    fn test_summarize_period_averages() {
        let user = sample_user();
        let mut first = DailyRecord::new(day());
        first.meals.push(breakfast());
        let mut second = DailyRecord::new(day().succ_opt().unwrap());
        second.exercises.push(jog("running_slow"));

        let averages = summarize_period(&[first, second], &user).unwrap();
        assert_eq!(averages.days, 2);
        assert!((averages.avg_calories_in - 157.5).abs() < 1e-9);
        assert!((averages.avg_exercise_calories - 148.75).abs() < 1e-9);

        let empty = summarize_period(&[], &user).unwrap();
        assert_eq!(empty.days, 0);
    }
}
