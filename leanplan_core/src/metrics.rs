//! Body metric formulas.
//!
//! Everything here is a pure function of its inputs. Derived values are
//! never cached on the `User`; callers recompute them from the current
//! profile so a weight update is reflected immediately.

use crate::tables::get_default_tables;
use crate::{Error, Gender, Result, User};

/// Body Mass Index: weight / height in metres squared
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// BMI at the user's current weight
pub fn current_bmi(user: &User) -> f64 {
    bmi(user.current_weight_kg, user.height_cm)
}

/// BMI the user would have at their target weight
pub fn target_bmi(user: &User) -> f64 {
    bmi(user.target_weight_kg, user.height_cm)
}

/// WHO weight class for a BMI value
pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "underweight"
    } else if bmi < 25.0 {
        "normal"
    } else if bmi < 30.0 {
        "overweight"
    } else {
        "obese"
    }
}

/// Basal Metabolic Rate (kcal/day) using the Mifflin-St Jeor equation
///
/// Gender is already typed here; an unrecognized gender string is
/// rejected with `InvalidGender` when it is parsed into a `Gender`.
pub fn bmr(user: &User) -> f64 {
    let base = 10.0 * user.current_weight_kg + 6.25 * user.height_cm - 5.0 * f64::from(user.age);
    match user.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total Daily Energy Expenditure: BMR times the activity multiplier
pub fn tdee(user: &User) -> Result<f64> {
    let multiplier = get_default_tables()
        .activity_multipliers
        .get(&user.activity_level)
        .copied()
        .ok_or_else(|| Error::InvalidActivityLevel(user.activity_level.to_string()))?;
    Ok(bmr(user) * multiplier)
}

/// MET value for an activity type from the fixed MET table
pub fn met_value(activity_type: &str) -> Result<f64> {
    let key = activity_type.trim().to_lowercase();
    get_default_tables()
        .met_values
        .get(&key)
        .copied()
        .ok_or_else(|| Error::UnknownActivityType(activity_type.to_string()))
}

/// Calories burned: MET x weight (kg) x duration (hours)
pub fn exercise_calories(met_value: f64, weight_kg: f64, duration_minutes: f64) -> f64 {
    met_value * weight_kg * (duration_minutes / 60.0)
}

/// Calories burned by a named activity at the given body weight
pub fn activity_calories(activity_type: &str, weight_kg: f64, duration_minutes: u32) -> Result<f64> {
    let met = met_value(activity_type)?;
    Ok(exercise_calories(met, weight_kg, f64::from(duration_minutes)))
}

/// Minimum safe daily calorie intake for a gender
pub fn calorie_floor(gender: Gender) -> Result<f64> {
    get_default_tables()
        .calorie_floors
        .get(&gender)
        .copied()
        .ok_or_else(|| Error::InvalidGender(gender.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActivityLevel;

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

    #[test]
    fn test_bmi_calculation() {
        let value = bmi(85.0, 175.0);
        assert!((value - 27.755).abs() < 0.01);
        assert_eq!(bmi_category(value), "overweight");
        assert_eq!(bmi_category(22.0), "normal");
        assert_eq!(bmi_category(17.0), "underweight");
        assert_eq!(bmi_category(31.0), "obese");
    }

    #[test]
    fn test_bmr_male_scenario() {
        let user = sample_user();
        assert!((bmr(&user) - 1798.75).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_female_offset() {
        let mut user = sample_user();
        user.gender = Gender::Female;
        // Male and female differ by 166 kcal
        assert!((bmr(&user) - (1798.75 - 166.0)).abs() < 1e-9);
    }

    #[test]
    fn test_tdee_scenario() {
        let user = sample_user();
        let value = tdee(&user).unwrap();
        assert!((value - 2788.0625).abs() < 1e-6);
    }

    #[test]
    fn test_tdee_never_below_bmr() {
        let mut user = sample_user();
        for level in ActivityLevel::ALL {
            user.activity_level = level;
            for gender in [Gender::Male, Gender::Female] {
                user.gender = gender;
                let b = bmr(&user);
                assert!(b > 0.0);
                assert!(tdee(&user).unwrap() >= b);
            }
        }
    }

    #[test]
    fn test_exercise_calories() {
        // 7.0 MET * 85 kg * 0.5 h
        assert!((exercise_calories(7.0, 85.0, 30.0) - 297.5).abs() < 1e-9);
        let burned = activity_calories("Running_Slow", 85.0, 30).unwrap();
        assert!((burned - 297.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_activity_type() {
        let err = met_value("underwater_basket_weaving").unwrap_err();
        assert!(matches!(err, Error::UnknownActivityType(_)));
    }

    #[test]
    fn test_calorie_floors() {
        assert_eq!(calorie_floor(Gender::Male).unwrap(), 1500.0);
        assert_eq!(calorie_floor(Gender::Female).unwrap(), 1200.0);
    }

    #[test]
    fn test_invalid_gender_string() {
        let err = "robot".parse::<Gender>().unwrap_err();
        assert!(matches!(err, Error::InvalidGender(_)));
        let err = "couch_potato".parse::<ActivityLevel>().unwrap_err();
        assert!(matches!(err, Error::InvalidActivityLevel(_)));
    }
}
