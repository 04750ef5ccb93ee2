pub mod handler;

pub use handler::{
    all_handler, health_handler, lighthouse_handler, mobile_friendly_handler,
    privacy_tracking_handler, security_headers_handler, tech_stack_handler,
};
