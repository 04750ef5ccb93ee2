pub mod audit;
pub mod category;
pub mod report;
pub mod screenshot;

pub use audit::{Audit, AuditMap};
pub use category::{Categories, Category, CategoryScores};
pub use report::{
    Issue, IssuesByCategory, LighthouseResult, Metrics, NormalizedReport, Resources,
    RuntimeError, Suggestion, SuggestionKind, NOT_AVAILABLE,
};
pub use screenshot::{PhaseLabel, RawFrame, Screenshot};
