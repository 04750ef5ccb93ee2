pub mod full_audit;
pub mod params;

pub use full_audit::{CategoryOutcome, FullAudit};
pub use params::{Analyzed, ParamsAnalyze};
