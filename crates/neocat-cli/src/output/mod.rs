mod csv;
mod report;

pub use csv::CsvSink;
pub use report::{render_json, render_text};
