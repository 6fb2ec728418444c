pub mod models;
pub mod workout_log;
