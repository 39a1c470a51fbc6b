use serde::Serialize;

use super::{Formatter, iso8601_timestamp};
use crate::report::ValidationReport;

pub struct JsonFormatter;

#[derive(Serialize)]
struct Document<'a> {
    generated: String,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let doc = Document {
            generated: iso8601_timestamp(),
            report,
        };
        serde_json::to_string_pretty(&doc)
            .unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
