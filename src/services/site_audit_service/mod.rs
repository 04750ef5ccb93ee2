// src/services/site_audit_service/mod.rs

pub mod lighthouse;
pub mod mobile_friendly;
pub mod normalize;
pub mod orchestrator;
pub mod pagespeed;
pub mod privacy;
pub mod probe;
pub mod process;
pub mod security_headers;
pub mod tech_stack;
pub mod wappalyzer;

pub use normalize::normalize_performance_report;
pub use orchestrator::{
    analyze_all, analyze_lighthouse, analyze_mobile_friendly, analyze_privacy_tracking,
    analyze_security_headers, analyze_tech_stack, analyze_tech_stack_with,
};
pub use tech_stack::normalize_tech_stack_report;
pub use wappalyzer::{TechnologyProvider, WappalyzerCli};
