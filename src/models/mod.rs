// src/models/mod.rs

pub mod api;
pub mod app;
pub mod lighthouse;
pub mod mobile;
pub mod privacy;
pub mod security;
pub mod tech;

pub use api::{Analyzed, CategoryOutcome, FullAudit, ParamsAnalyze};
pub use app::AppState;
