pub mod file_utils;
pub mod log_utils;
pub mod text_utils;
pub mod url_utils;

pub use file_utils::{remove_report, sanitize_filename, temp_report_path};
pub use log_utils::init_logging;
pub use text_utils::contains_word;
pub use url_utils::normalize_url;
