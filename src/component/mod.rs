mod report;
mod solution;

pub use report::{write_json, Report};
pub use solution::write_text;
