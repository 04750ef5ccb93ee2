pub mod site_audit_service;

pub use site_audit_service::{
    analyze_all, analyze_lighthouse, analyze_mobile_friendly, analyze_privacy_tracking,
    analyze_security_headers, analyze_tech_stack,
};
