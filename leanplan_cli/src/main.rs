use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use leanplan_core::metrics::{bmi_category, bmr, current_bmi, tdee};
use leanplan_core::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "leanplan")]
#[command(about = "Weight-loss planning and tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or replace the user profile
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        /// male or female
        #[arg(long)]
        gender: String,
        /// Height in centimetres
        #[arg(long)]
        height: f64,
        /// Current weight in kg
        #[arg(long)]
        weight: f64,
        /// Target weight in kg
        #[arg(long)]
        target: f64,
        /// sedentary, lightly_active, moderately_active, very_active, extra_active
        #[arg(long, default_value = "moderately_active")]
        activity: String,
    },

    /// Generate a new weight-loss plan (replaces the active one)
    Plan {
        /// Plan length in weeks (defaults to the configured value)
        #[arg(long)]
        weeks: Option<u32>,

        /// Fixed 1.5 kg/week pace instead of an even pace
        #[arg(long)]
        aggressive: bool,
    },

    /// Show the active plan
    ShowPlan,

    /// Log an exercise
    Exercise {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        minutes: u32,
        /// Activity type, see `leanplan activities`
        #[arg(long)]
        activity: String,
        #[arg(long)]
        intensity: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Log a meal
    Meal {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// breakfast, lunch, dinner or snack
        #[arg(long = "type")]
        meal_type: String,
        /// Food as name:calories:protein:carbs:fat[:fiber] (repeatable)
        #[arg(long = "food", required = true)]
        foods: Vec<String>,
        /// Time eaten (HH:MM)
        #[arg(long)]
        time: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Record a weigh-in
    Weight {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        kg: f64,
    },

    /// Show the calorie balance for a day
    Summary {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the progress report
    Progress,

    /// List supported activity types and their MET values
    Activities,

    /// Export daily summaries to CSV
    Export {
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    leanplan_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // The MET listing is static and must not depend on config or data
    if let Commands::Activities = cli.command {
        cmd_activities();
        return Ok(());
    }

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let mut tracker = Tracker::open(JsonFileStore::in_dir(&data_dir))?;
    let today = tracker.today();

    match cli.command {
        Commands::Profile {
            name,
            age,
            gender,
            height,
            weight,
            target,
            activity,
        } => {
            let gender: Gender = gender.parse()?;
            let activity: ActivityLevel = activity.parse()?;
            let user = tracker.create_user(&name, age, gender, height, weight, target, activity)?;
            display_profile(&user)?;
        }
        Commands::Plan { weeks, aggressive } => {
            let weeks = weeks.unwrap_or(config.plan.default_weeks);
            let aggressive = aggressive || config.plan.aggressive;
            let plan = tracker.generate_plan(weeks, aggressive)?;
            println!("\n✓ Plan generated!");
            display_plan(&plan);
        }
        Commands::ShowPlan => match tracker.current_plan()? {
            Some(plan) => display_plan(&plan),
            None => println!("No plan yet. Run `leanplan plan` to generate one."),
        },
        Commands::Exercise {
            date,
            name,
            minutes,
            activity,
            intensity,
            notes,
        } => {
            let details = EntryDetails {
                intensity,
                time: None,
                notes,
            };
            let date = date.unwrap_or(today);
            let exercise = tracker.add_exercise_with(date, &name, minutes, &activity, details)?;
            let burned = exercise.calories_burned(tracker.user()?.current_weight_kg)?;
            println!("\n✓ Exercise logged!");
            println!(
                "  {} on {}: {} min, ~{:.0} kcal",
                exercise.name, exercise.date, exercise.duration_minutes, burned
            );
        }
        Commands::Meal {
            date,
            meal_type,
            foods,
            time,
            notes,
        } => {
            let meal_type: MealType = meal_type.parse()?;
            let foods = foods
                .iter()
                .map(String::as_str)
                .map(parse_food)
                .collect::<Result<Vec<_>>>()?;
            let details = EntryDetails {
                intensity: None,
                time,
                notes,
            };
            let meal = tracker.add_meal_with(date.unwrap_or(today), meal_type, foods, details)?;
            let macros = meal.macro_totals();
            println!("\n✓ Meal logged!");
            println!("  {} on {}: {:.0} kcal", meal.meal_type, meal.date, meal.total_calories());
            println!(
                "  Protein {:.1} g, carbs {:.1} g, fat {:.1} g",
                macros.protein_g, macros.carbs_g, macros.fat_g
            );
        }
        Commands::Weight { date, kg } => {
            let date = date.unwrap_or(today);
            tracker.update_weight(date, kg)?;
            let user = tracker.user()?;
            println!("\n✓ Weight recorded: {:.1} kg on {}", kg, date);
            let to_go = user.current_weight_kg - user.target_weight_kg;
            if to_go > 0.0 {
                println!(
                    "  Current weight {:.1} kg, {:.1} kg to target",
                    user.current_weight_kg, to_go
                );
            } else {
                println!(
                    "  Current weight {:.1} kg, target reached",
                    user.current_weight_kg
                );
            }
        }
        Commands::Summary { date } => {
            let date = date.unwrap_or(today);
            let record = tracker.daily_record(date)?;
            let summary = tracker.daily_summary(date)?;
            display_summary(record.as_ref(), &summary, tracker.user()?)?;
        }
        Commands::Progress => {
            let report = tracker.get_progress_report()?;
            display_progress(&report);
        }
        Commands::Export { output } => {
            let rows = tracker.all_summaries()?;
            let count = export_summaries(&rows, &output)?;
            println!("✓ Exported {} days to CSV", count);
            println!("  CSV: {}", output.display());
        }
        Commands::Activities => cmd_activities(),
    }

    Ok(())
}

/// Parse `name:calories:protein:carbs:fat[:fiber]`
fn parse_food(spec: &str) -> Result<Food> {
    let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
    if !(5..=6).contains(&parts.len()) {
        return Err(Error::InvalidEntry(format!(
            "food '{}' must look like name:calories:protein:carbs:fat[:fiber]",
            spec
        )));
    }

    let number = |idx: usize| -> Result<f64> {
        parts[idx].parse::<f64>().map_err(|_| {
            Error::InvalidEntry(format!("'{}' in food '{}' is not a number", parts[idx], spec))
        })
    };

    let fiber = if parts.len() == 6 { number(5)? } else { 0.0 };
    Food::new(parts[0], number(1)?, number(2)?, number(3)?, number(4)?, fiber)
}

fn cmd_activities() {
    println!("Activity types (MET):");
    for (name, met) in &get_default_tables().met_values {
        println!("  {:<18} {:>5.1}", name, met);
    }
}

fn display_profile(user: &User) -> Result<()> {
    let bmi = current_bmi(user);
    println!("\n✓ Profile saved for {}", user.name);
    println!("  BMI:  {:.2} ({})", bmi, bmi_category(bmi));
    println!("  BMR:  {:.0} kcal/day", bmr(user));
    println!("  TDEE: {:.0} kcal/day", tdee(user)?);
    Ok(())
}

fn display_plan(plan: &WeightLossPlan) {
    println!("\n╭─────────────────────────────────────────╮");
    println!(
        "│  {}-WEEK PLAN{}",
        plan.duration_weeks,
        if plan.aggressive { " (AGGRESSIVE)" } else { "" }
    );
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Generated:     {}", plan.generated_date);
    println!("  Target date:   {}", plan.target_date);
    println!("  Daily target:  {:.0} kcal (TDEE {:.0})", plan.daily_calorie_target, plan.tdee);
    println!("  Weekly loss:   {:.2} kg", plan.weekly_weight_loss_target_kg);
    if plan.floor_applied {
        println!(
            "  ⚠ Calorie floor applied: expect ~{:.2} kg/week",
            plan.effective_weekly_loss_kg
        );
    }
    println!(
        "  Macros:        {:.0} g carbs / {:.0} g protein / {:.0} g fat",
        plan.macro_grams.carbs_g, plan.macro_grams.protein_g, plan.macro_grams.fat_g
    );
    println!();
    println!("  Exercise: {}", plan.exercise_recommendation);
    for rec in &plan.exercise_plan {
        println!(
            "  → {} ({}, {} min)",
            rec.description, rec.frequency, rec.duration_minutes
        );
    }
    println!();
    println!("  Diet: {}", plan.diet_recommendation);
    for meal in &plan.meal_breakdown {
        println!(
            "  → {}: {:.0} kcal, e.g. {}",
            meal.meal_type, meal.calories, meal.example
        );
    }
    println!();
}

fn display_summary(record: Option<&DailyRecord>, summary: &DailySummary, user: &User) -> Result<()> {
    println!("\nSummary for {}", summary.date);
    println!("─────────────────────────────────────────");

    if let Some(record) = record {
        if let Some(weight) = record.weight_kg {
            println!("  Weight: {:.1} kg", weight);
        }
        println!("  Exercises ({}):", record.exercises.len());
        for exercise in &record.exercises {
            println!(
                "    • {}: {} min, {:.0} kcal",
                exercise.name,
                exercise.duration_minutes,
                exercise.calories_burned(user.current_weight_kg)?
            );
        }
        println!("  Meals ({}):", record.meals.len());
        for meal in &record.meals {
            println!("    • {}: {:.0} kcal", meal.meal_type, meal.total_calories());
        }
    } else {
        println!("  Nothing logged for this day.");
    }

    println!();
    println!("  Calories in:   {:.0} kcal", summary.calories_in);
    println!(
        "  Calories out:  {:.0} kcal ({:.0} from exercise)",
        summary.calories_out, summary.exercise_calories
    );
    if summary.net_balance < 0.0 {
        println!("  Net balance:   {:.0} kcal (deficit)", summary.net_balance);
    } else {
        println!("  Net balance:   +{:.0} kcal (surplus)", summary.net_balance);
    }
    let macros = &summary.macro_totals;
    println!(
        "  Macros:        {:.1} g protein, {:.1} g carbs, {:.1} g fat, {:.1} g fiber",
        macros.protein_g, macros.carbs_g, macros.fat_g, macros.fiber_g
    );
    Ok(())
}

fn display_progress(report: &ProgressReport) {
    println!("\nProgress for {}", report.user_name);
    println!("─────────────────────────────────────────");
    println!("  Days tracked:  {}", report.days_tracked);
    println!(
        "  Weight:        {:.1} kg → {:.1} kg (target {:.1} kg)",
        report.start_weight, report.current_weight, report.target_weight
    );
    println!("  Lost:          {:.2} kg", report.total_lost);
    println!("  Weekly rate:   {:.2} kg/week", report.avg_weekly_rate);
    println!(
        "  BMI:           {:.2} (target {:.2})",
        report.current_bmi, report.target_bmi
    );
    println!(
        "  Daily average: {:.0} kcal in, {:.0} kcal exercise (TDEE {:.0})",
        report.avg_daily_calories_in, report.avg_daily_exercise_calories, report.tdee
    );

    if report.on_track {
        println!("  ✓ On track");
    } else if report.too_fast {
        println!("  ⚠ Losing faster than 1.5 kg/week; consider eating a little more");
    } else {
        println!("  ⚠ Not on track");
    }

    match report.projected_completion_date {
        Some(date) => println!("  Projected to reach target: {}", date),
        None => println!("  No projection (weight is not trending down)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_food_with_fiber() {
        let food = parse_food("Oatmeal:150:5:27:3:4").unwrap();
        assert_eq!(food.name, "Oatmeal");
        assert_eq!(food.calories, 150.0);
        assert_eq!(food.fiber_g, 4.0);
    }

    #[test]
    fn test_parse_food_without_fiber() {
        let food = parse_food("Egg:70:6:1:5").unwrap();
        assert_eq!(food.fiber_g, 0.0);
    }

    #[test]
    fn test_parse_food_errors() {
        assert!(matches!(parse_food("Egg:70"), Err(Error::InvalidEntry(_))));
        assert!(matches!(
            parse_food("Egg:lots:6:1:5"),
            Err(Error::InvalidEntry(_))
        ));
        assert!(matches!(
            parse_food("Egg:-70:6:1:5"),
            Err(Error::InvalidEntry(_))
        ));
    }
}
