//! The tracker: the operations exposed to the CLI.
//!
//! A `Tracker` wraps a `Store` and the single `User` it belongs to. It
//! validates logged entries, keeps one `DailyRecord` per date, and hands
//! the stored data to the planner, aggregator and analyzer.

use crate::aggregate::aggregate;
use crate::metrics::met_value;
use crate::plan::generate_plan;
use crate::progress::analyze;
use crate::store::Store;
use crate::{
    ActivityLevel, DailyRecord, DailySummary, Error, Exercise, Food, Gender, Meal, MealType,
    ProgressReport, Result, User, WeightLossPlan,
};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

/// Optional free-text details attached to a logged entry
#[derive(Clone, Debug, Default)]
pub struct EntryDetails {
    pub intensity: Option<String>,
    pub time: Option<String>,
    pub notes: String,
}

pub struct Tracker<S: Store> {
    store: S,
    user: Option<User>,
    today: NaiveDate,
}

impl<S: Store> Tracker<S> {
    /// Open a tracker over `store`, loading the stored profile if any
    pub fn open(store: S) -> Result<Self> {
        let user = store.load_user()?;
        Ok(Self {
            store,
            user,
            today: Local::now().date_naive(),
        })
    }

    /// Use a fixed "today" for plan dates and projections
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current profile, or `NoUser` if none was created
    pub fn user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(Error::NoUser)
    }

    /// Create or replace the user profile
    #[allow(clippy::too_many_arguments)]
    pub fn create_user(
        &mut self,
        name: &str,
        age: u32,
        gender: Gender,
        height_cm: f64,
        current_weight_kg: f64,
        target_weight_kg: f64,
        activity_level: ActivityLevel,
    ) -> Result<User> {
        let user = User::new(
            name,
            age,
            gender,
            height_cm,
            current_weight_kg,
            target_weight_kg,
            activity_level,
        )?;
        self.store.save_user(&user)?;
        tracing::info!("Created profile for {}", user.name);
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Generate a plan for the current profile and make it the active plan
    pub fn generate_plan(&mut self, weeks: u32, aggressive: bool) -> Result<WeightLossPlan> {
        let plan = generate_plan(self.user()?, weeks, aggressive, self.today)?;
        self.store.save_plan(&plan)?;
        Ok(plan)
    }

    /// The active plan, if one has been generated
    pub fn current_plan(&self) -> Result<Option<WeightLossPlan>> {
        self.store.load_plan()
    }

    pub fn add_exercise(
        &mut self,
        date: NaiveDate,
        name: &str,
        duration_minutes: u32,
        activity_type: &str,
    ) -> Result<Exercise> {
        self.add_exercise_with(date, name, duration_minutes, activity_type, EntryDetails::default())
    }

    /// Log an exercise with optional intensity and notes
    pub fn add_exercise_with(
        &mut self,
        date: NaiveDate,
        name: &str,
        duration_minutes: u32,
        activity_type: &str,
        details: EntryDetails,
    ) -> Result<Exercise> {
        self.user()?;
        if name.trim().is_empty() {
            return Err(Error::InvalidEntry("exercise name must not be empty".into()));
        }
        if duration_minutes == 0 {
            return Err(Error::InvalidEntry("exercise duration must be positive".into()));
        }
        met_value(activity_type)?;

        let exercise = Exercise {
            id: Uuid::new_v4(),
            date,
            name: name.trim().to_string(),
            duration_minutes,
            activity_type: activity_type.trim().to_lowercase(),
            intensity: details.intensity,
            notes: details.notes,
        };

        let mut record = self.record_for(date)?;
        record.exercises.push(exercise.clone());
        self.store.upsert_daily_record(record)?;

        tracing::info!(
            "Logged exercise {} ({} min {}) on {}",
            exercise.name,
            exercise.duration_minutes,
            exercise.activity_type,
            date
        );
        Ok(exercise)
    }

    pub fn add_meal(&mut self, date: NaiveDate, meal_type: MealType, foods: Vec<Food>) -> Result<Meal> {
        self.add_meal_with(date, meal_type, foods, EntryDetails::default())
    }

    /// Log a meal with optional time and notes
    pub fn add_meal_with(
        &mut self,
        date: NaiveDate,
        meal_type: MealType,
        foods: Vec<Food>,
        details: EntryDetails,
    ) -> Result<Meal> {
        self.user()?;
        if foods.is_empty() {
            return Err(Error::InvalidEntry("a meal needs at least one food".into()));
        }
        for food in &foods {
            food.validate()?;
        }

        let meal = Meal {
            id: Uuid::new_v4(),
            date,
            meal_type,
            foods,
            time: details.time,
            notes: details.notes,
        };

        let mut record = self.record_for(date)?;
        record.meals.push(meal.clone());
        self.store.upsert_daily_record(record)?;

        tracing::info!(
            "Logged {} with {} foods ({:.0} kcal) on {}",
            meal.meal_type,
            meal.foods.len(),
            meal.total_calories(),
            date
        );
        Ok(meal)
    }

    /// Record a weigh-in for a date
    ///
    /// The profile's current weight follows the latest-dated weigh-in, so
    /// back-filling an older date leaves it alone.
    pub fn update_weight(&mut self, date: NaiveDate, weight_kg: f64) -> Result<()> {
        self.user()?;
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(Error::InvalidEntry(format!(
                "weight must be positive, got {}",
                weight_kg
            )));
        }

        let records = self.store.load_daily_records()?;
        let is_latest = records
            .iter()
            .filter(|r| r.weight_kg.is_some() && r.date != date)
            .all(|r| r.date < date);

        let mut record = records
            .into_iter()
            .find(|r| r.date == date)
            .unwrap_or_else(|| DailyRecord::new(date));
        record.weight_kg = Some(weight_kg);
        self.store.upsert_daily_record(record)?;

        if is_latest {
            if let Some(user) = self.user.as_mut() {
                user.current_weight_kg = weight_kg;
                self.store.save_user(user)?;
            }
        }

        tracing::info!("Recorded weight {:.1} kg on {}", weight_kg, date);
        Ok(())
    }

    /// Progress report over the full history as of today
    pub fn get_progress_report(&self) -> Result<ProgressReport> {
        let records = self.store.load_daily_records()?;
        analyze(self.user()?, &records, self.today)
    }

    /// The stored record for a date, if any
    pub fn daily_record(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        Ok(self
            .store
            .load_daily_records()?
            .into_iter()
            .find(|r| r.date == date))
    }

    /// Calorie balance for a date; a day with nothing logged is all deficit
    pub fn daily_summary(&self, date: NaiveDate) -> Result<DailySummary> {
        let record = self
            .daily_record(date)?
            .unwrap_or_else(|| DailyRecord::new(date));
        aggregate(&record, self.user()?)
    }

    /// Summaries for every stored day, oldest first
    pub fn all_summaries(&self) -> Result<Vec<(DailyRecord, DailySummary)>> {
        let user = self.user()?;
        self.store
            .load_daily_records()?
            .into_iter()
            .map(|record| {
                let summary = aggregate(&record, user)?;
                Ok((record, summary))
            })
            .collect()
    }

    fn record_for(&self, date: NaiveDate) -> Result<DailyRecord> {
        Ok(self
            .daily_record(date)?
            .unwrap_or_else(|| DailyRecord::new(date)))
    }
}
