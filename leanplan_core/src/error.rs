//! Error types for the leanplan_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for leanplan_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Gender string is not one of the supported values
    #[error("Invalid gender: {0} (expected male or female)")]
    InvalidGender(String),

    /// Activity level string is not one of the five recognized levels
    #[error("Invalid activity level: {0}")]
    InvalidActivityLevel(String),

    /// Activity type has no entry in the MET table
    #[error("Unknown activity type: {0}")]
    UnknownActivityType(String),

    /// Weight target is non-positive, above current weight, or unsafe
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Not enough weight history to analyze progress
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Profile field outside its allowed range
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Meal type string is not breakfast, lunch, dinner or snack
    #[error("Invalid meal type: {0}")]
    InvalidMealType(String),

    /// Logged exercise, food or weight entry failed validation
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// An operation needs a user profile and none has been created
    #[error("No user profile found; create one first")]
    NoUser,

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
