use super::{Formatter, iso8601_timestamp};
use crate::report::ValidationReport;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut out = format!(
            "Input vs output comparison for {} ({})\n",
            report.unit,
            iso8601_timestamp()
        );
        out.push_str(&format!(
            "{:<24} {:>10} {:>6} {:>8} {:>8} {:>10} {:>8} {:>8}\n",
            "Profile", "CoefReg", "CSR", "Outputs", "Skipped", "Mean", "Min", "Max"
        ));
        out.push_str(&"-".repeat(89));
        out.push('\n');

        for result in &report.profiles {
            let (coef, csr) = result.image.map_or(("-".to_string(), "-".to_string()), |img| {
                (
                    format!("{:#010x}", img.coefficient_word),
                    format!("{:#04x}", img.control_word),
                )
            });

            if let Some(ref err) = result.error {
                let state = result
                    .device_state
                    .map_or(String::new(), |s| format!(" (device {})", s));
                out.push_str(&format!(
                    "{:<24} {:>10} {:>6} ERROR{}: {}\n",
                    result.name, coef, csr, state, err
                ));
                continue;
            }

            let (mean, min, max) = result.summary.as_ref().map_or(
                ("-".to_string(), "-".to_string(), "-".to_string()),
                |s| {
                    (
                        format!("{:.2}", s.mean),
                        format!("{}", s.min),
                        format!("{}", s.max),
                    )
                },
            );
            out.push_str(&format!(
                "{:<24} {:>10} {:>6} {:>8} {:>8} {:>10} {:>8} {:>8}\n",
                result.name,
                coef,
                csr,
                result.outputs.len(),
                result.skipped,
                mean,
                min,
                max
            ));
        }

        if report.malformed_vector_lines > 0 {
            out.push_str(&format!(
                "\n{} malformed vector lines skipped\n",
                report.malformed_vector_lines
            ));
        }

        if self.verbose {
            out.push_str(&format!("\nInput ({} samples): {:?}\n", report.input_prefix.len(), report.input_prefix));
            for result in report.profiles.iter().filter(|r| r.is_ok()) {
                out.push_str(&format!("{}: {:?}\n", result.name, result.outputs));
            }
        }
        out
    }
}
