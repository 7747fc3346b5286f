//! Weight-loss plan generation.
//!
//! This module implements the planning rules:
//! - Pick a weekly loss pace (even pace within 0.5-1.0 kg/week, or a fixed
//!   1.5 kg/week in aggressive mode)
//! - Convert the pace into a daily deficit below TDEE
//! - Hold the calorie target at the sex-specific minimum
//! - Split the target 40/30/30 into carbs, protein and fat

use crate::metrics::{calorie_floor, target_bmi, tdee};
use crate::tables::{get_default_tables, KCAL_PER_G_CARB_PROTEIN, KCAL_PER_G_FAT, KCAL_PER_KG_FAT};
use crate::{
    ActivityLevel, Error, ExerciseRecommendation, MacroGrams, MacroSplit, MealSuggestion,
    MealType, Result, User, WeightLossPlan,
};
use chrono::{Duration, NaiveDate};

/// Fixed pace used in aggressive mode, regardless of plan length
pub const AGGRESSIVE_WEEKLY_LOSS_KG: f64 = 1.5;

/// Bounds for the even pace used in safe mode
pub const SAFE_WEEKLY_LOSS_MIN_KG: f64 = 0.5;
pub const SAFE_WEEKLY_LOSS_MAX_KG: f64 = 1.0;

/// Targets below this BMI are refused
pub const MIN_TARGET_BMI: f64 = 15.0;

/// Share of daily calories per meal slot
const MEAL_SHARES: [(MealType, f64, &str); 4] = [
    (MealType::Breakfast, 0.25, "Oatmeal with berries and Greek yogurt"),
    (MealType::Lunch, 0.35, "Grilled chicken salad with quinoa"),
    (MealType::Dinner, 0.30, "Baked fish with vegetables and brown rice"),
    (MealType::Snack, 0.10, "Fruit, nuts, or a protein shake"),
];

/// Generate a plan for `user` over `weeks`, dated `generated_date`
///
/// Any invalid input aborts generation; no partial plan is returned.
///
/// Aggressive mode uses a fixed 1.5 kg/week and ignores `weeks` for the
/// pace; `weeks` still sets `target_date`.
pub fn generate_plan(
    user: &User,
    weeks: u32,
    aggressive: bool,
    generated_date: NaiveDate,
) -> Result<WeightLossPlan> {
    if weeks == 0 {
        return Err(Error::InvalidTarget(
            "plan duration must be at least one week".into(),
        ));
    }

    let target_date = generated_date
        .checked_add_signed(Duration::weeks(i64::from(weeks)))
        .ok_or_else(|| Error::InvalidTarget(format!("plan of {} weeks is too long", weeks)))?;

    let tdee = tdee(user)?;

    let total_to_lose = user.current_weight_kg - user.target_weight_kg;
    if total_to_lose <= 0.0 {
        return Err(Error::InvalidTarget(format!(
            "nothing to lose: current {:.1} kg, target {:.1} kg",
            user.current_weight_kg, user.target_weight_kg
        )));
    }

    let goal_bmi = target_bmi(user);
    if goal_bmi < MIN_TARGET_BMI {
        return Err(Error::InvalidTarget(format!(
            "target weight {:.1} kg gives BMI {:.1}, below the safe minimum of {:.0}",
            user.target_weight_kg, goal_bmi, MIN_TARGET_BMI
        )));
    }

    let weekly_target = weekly_loss_target(total_to_lose, weeks, aggressive);
    let daily_deficit = weekly_target * KCAL_PER_KG_FAT / 7.0;

    let floor = calorie_floor(user.gender)?;
    let raw_target = tdee - daily_deficit;
    let floor_applied = raw_target < floor;
    let daily_calorie_target = raw_target.max(floor);
    let effective_weekly_loss_kg = ((tdee - daily_calorie_target) * 7.0 / KCAL_PER_KG_FAT).max(0.0);

    if floor_applied {
        tracing::warn!(
            "Calorie target {:.0} kcal is below the {:.0} kcal minimum; holding at the floor ({:.2} kg/week instead of {:.2})",
            raw_target,
            floor,
            effective_weekly_loss_kg,
            weekly_target
        );
    }

    let macro_split = get_default_tables().macro_split;
    let macro_grams = macro_grams(daily_calorie_target, &macro_split);

    let plan = WeightLossPlan {
        generated_date,
        duration_weeks: weeks,
        target_date,
        aggressive,
        tdee,
        daily_calorie_target,
        macro_split,
        macro_grams,
        weekly_weight_loss_target_kg: weekly_target,
        effective_weekly_loss_kg,
        floor_applied,
        exercise_recommendation: exercise_recommendation(user.activity_level),
        diet_recommendation: diet_recommendation(
            daily_calorie_target,
            &macro_grams,
            floor_applied,
            effective_weekly_loss_kg,
        ),
        exercise_plan: exercise_plan(user.activity_level),
        meal_breakdown: meal_breakdown(daily_calorie_target, &macro_grams),
    };

    tracing::info!(
        "Generated {}-week plan: {:.0} kcal/day, {:.2} kg/week{}",
        weeks,
        plan.daily_calorie_target,
        plan.weekly_weight_loss_target_kg,
        if floor_applied { " (floor applied)" } else { "" }
    );

    Ok(plan)
}

/// Weekly loss pace in kg
fn weekly_loss_target(total_to_lose: f64, weeks: u32, aggressive: bool) -> f64 {
    if aggressive {
        AGGRESSIVE_WEEKLY_LOSS_KG
    } else {
        (total_to_lose / f64::from(weeks)).clamp(SAFE_WEEKLY_LOSS_MIN_KG, SAFE_WEEKLY_LOSS_MAX_KG)
    }
}

/// Convert a calorie target into grams per macro
pub fn macro_grams(daily_calories: f64, split: &MacroSplit) -> MacroGrams {
    MacroGrams {
        carbs_g: daily_calories * split.carbs_pct / 100.0 / KCAL_PER_G_CARB_PROTEIN,
        protein_g: daily_calories * split.protein_pct / 100.0 / KCAL_PER_G_CARB_PROTEIN,
        fat_g: daily_calories * split.fat_pct / 100.0 / KCAL_PER_G_FAT,
    }
}

fn exercise_recommendation(level: ActivityLevel) -> String {
    match level {
        ActivityLevel::Sedentary | ActivityLevel::LightlyActive => {
            "Build the habit first: brisk walking for 30 minutes every day, plus light \
             resistance training 2-3 times per week to preserve muscle."
                .into()
        }
        ActivityLevel::ModeratelyActive => {
            "Jog or run intervals for 30 minutes 3-4 times per week and keep up \
             moderate resistance training 3 times per week."
                .into()
        }
        ActivityLevel::VeryActive | ActivityLevel::ExtraActive => {
            "Keep your training volume: 45 minutes of moderate to hard running 4-5 times \
             per week and intense resistance training 3-4 times per week. Prioritise recovery."
                .into()
        }
    }
}

fn diet_recommendation(
    daily_calories: f64,
    grams: &MacroGrams,
    floor_applied: bool,
    effective_weekly_loss_kg: f64,
) -> String {
    let mut text = format!(
        "Eat about {:.0} kcal per day: {:.0} g carbohydrate, {:.0} g protein and {:.0} g fat. \
         Favour vegetables, lean protein and whole grains, and spread intake over 3 meals and a snack.",
        daily_calories, grams.carbs_g, grams.protein_g, grams.fat_g
    );
    if floor_applied {
        text.push_str(&format!(
            " Your target is held at the {:.0} kcal minimum, so expect about {:.2} kg per week.",
            daily_calories, effective_weekly_loss_kg
        ));
    }
    text
}

fn exercise_plan(level: ActivityLevel) -> Vec<ExerciseRecommendation> {
    let mut plan = match level {
        ActivityLevel::Sedentary | ActivityLevel::LightlyActive => vec![
            recommendation("walking_moderate", "daily", 30, "Brisk walking at a moderate pace"),
            recommendation(
                "weight_training",
                "2-3 times per week",
                30,
                "Light resistance training to preserve muscle",
            ),
        ],
        ActivityLevel::ModeratelyActive => vec![
            recommendation("running_slow", "3-4 times per week", 30, "Light jogging or interval training"),
            recommendation("weight_training", "3 times per week", 45, "Moderate resistance training"),
        ],
        ActivityLevel::VeryActive | ActivityLevel::ExtraActive => vec![
            recommendation("running_moderate", "4-5 times per week", 45, "Moderate to intense running"),
            recommendation("weight_training", "3-4 times per week", 60, "Intense resistance training"),
        ],
    };
    plan.push(recommendation("yoga", "1-2 times per week", 30, "Flexibility and stress relief"));
    plan
}

fn recommendation(
    activity_type: &str,
    frequency: &str,
    duration_minutes: u32,
    description: &str,
) -> ExerciseRecommendation {
    ExerciseRecommendation {
        activity_type: activity_type.into(),
        frequency: frequency.into(),
        duration_minutes,
        description: description.into(),
    }
}

fn meal_breakdown(daily_calories: f64, grams: &MacroGrams) -> Vec<MealSuggestion> {
    MEAL_SHARES
        .iter()
        .map(|(meal_type, share, example)| MealSuggestion {
            meal_type: *meal_type,
            calories: daily_calories * share,
            example: (*example).into(),
            protein_g: grams.protein_g * share,
            carbs_g: grams.carbs_g * share,
            fat_g: grams.fat_g * share,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::met_value;
    use crate::Gender;

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

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_safe_plan_scenario() {
        let plan = generate_plan(&sample_user(), 12, false, today()).unwrap();

        assert!((plan.weekly_weight_loss_target_kg - 10.0 / 12.0).abs() < 1e-9);
        // 2788.06 - 916.67
        assert!((plan.daily_calorie_target - 1871.40).abs() < 0.01);
        assert!(!plan.floor_applied);
        assert!((plan.effective_weekly_loss_kg - plan.weekly_weight_loss_target_kg).abs() < 1e-9);
        assert_eq!(plan.target_date, NaiveDate::from_ymd_opt(2024, 3, 25).unwrap());
    }

    #[test]
    fn test_aggressive_plan_hits_floor() {
        for weeks in [1, 8, 52] {
            let plan = generate_plan(&sample_user(), weeks, true, today()).unwrap();
            assert_eq!(plan.weekly_weight_loss_target_kg, 1.5);
            assert_eq!(plan.daily_calorie_target, 1500.0);
            assert!(plan.floor_applied);
            assert!(plan.effective_weekly_loss_kg < 1.5);
            assert!(plan.diet_recommendation.contains("minimum"));
        }
    }

    #[test]
    fn test_safe_pace_is_clamped() {
        // 10 kg over 52 weeks is slower than the 0.5 kg/week minimum
        let slow = generate_plan(&sample_user(), 52, false, today()).unwrap();
        assert_eq!(slow.weekly_weight_loss_target_kg, 0.5);

        // 10 kg over 4 weeks is faster than the 1.0 kg/week maximum
        let fast = generate_plan(&sample_user(), 4, false, today()).unwrap();
        assert_eq!(fast.weekly_weight_loss_target_kg, 1.0);
    }

    #[test]
    fn test_floor_invariant_holds_for_all_profiles() {
        for gender in [Gender::Male, Gender::Female] {
            for level in ActivityLevel::ALL {
                for aggressive in [false, true] {
                    let mut user = sample_user();
                    user.gender = gender;
                    user.activity_level = level;
                    user.current_weight_kg = 60.0;
                    user.target_weight_kg = 55.0;
                    user.height_cm = 160.0;
                    user.age = 55;

                    let plan = generate_plan(&user, 10, aggressive, today()).unwrap();
                    let floor = if gender == Gender::Male { 1500.0 } else { 1200.0 };
                    assert!(plan.daily_calorie_target >= floor);
                    assert!(plan.effective_weekly_loss_kg >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_macro_split_grams() {
        let plan = generate_plan(&sample_user(), 12, true, today()).unwrap();
        assert_eq!(plan.macro_split.carbs_pct, 40.0);
        assert_eq!(plan.macro_split.protein_pct, 30.0);
        assert_eq!(plan.macro_split.fat_pct, 30.0);
        assert!((plan.macro_grams.carbs_g - 150.0).abs() < 1e-9);
        assert!((plan.macro_grams.protein_g - 112.5).abs() < 1e-9);
        assert!((plan.macro_grams.fat_g - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_meal_breakdown_covers_whole_day() {
        let plan = generate_plan(&sample_user(), 12, false, today()).unwrap();
        let total: f64 = plan.meal_breakdown.iter().map(|m| m.calories).sum();
        assert!((total - plan.daily_calorie_target).abs() < 1e-6);
        assert_eq!(plan.meal_breakdown.len(), 4);
    }

    #[test]
    fn test_exercise_plan_uses_known_activities() {
        for level in ActivityLevel::ALL {
            let mut user = sample_user();
            user.activity_level = level;
            let plan = generate_plan(&user, 12, false, today()).unwrap();
            assert!(!plan.exercise_recommendation.is_empty());
            for rec in &plan.exercise_plan {
                assert!(met_value(&rec.activity_type).is_ok(), "{}", rec.activity_type);
            }
            assert!(plan.exercise_plan.iter().any(|r| r.activity_type == "yoga"));
        }
    }

    #[test]
    fn test_nothing_to_lose_is_invalid() {
        let mut user = sample_user();
        user.target_weight_kg = user.current_weight_kg;
        let err = generate_plan(&user, 12, false, today()).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(_)));
    }

    #[test]
    fn test_unsafe_target_bmi_is_invalid() {
        let mut user = sample_user();
        // 40 kg at 175 cm is BMI ~13
        user.target_weight_kg = 40.0;
        let err = generate_plan(&user, 12, false, today()).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(_)));
    }

    #[test]
    fn test_zero_weeks_is_invalid() {
        let err = generate_plan(&sample_user(), 0, false, today()).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(_)));
    }
}
