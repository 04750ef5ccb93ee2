pub mod lighthouse;

pub use lighthouse::{run_lighthouse, LIGHTHOUSE};
