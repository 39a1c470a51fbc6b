use super::Formatter;
use crate::report::ValidationReport;

/// Long-form sample table, one row per output sample.
///
/// The `input` column comes from the shared input prefix and is empty past
/// its end.
pub struct CsvFormatter;

/// Quote a field when it holds a comma, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut out = String::from("profile,index,input,output\n");
        for profile in &report.profiles {
            let name = escape(&profile.name);
            for (i, output) in profile.outputs.iter().enumerate() {
                let input = report
                    .input_prefix
                    .get(i)
                    .map_or(String::new(), |v| v.to_string());
                out.push_str(&format!("{},{},{},{}\n", name, i, input, output));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ProfileResult;

    #[test]
    fn test_rows_per_output() {
        let report = ValidationReport {
            unit: "impl0".to_string(),
            profiles: vec![
                ProfileResult {
                    name: "p0".to_string(),
                    image: None,
                    outputs: vec![7, 8],
                    skipped: 0,
                    summary: None,
                    device_state: None,
                    error: None,
                },
                ProfileResult::failed("p4", None, None, "boom".to_string()),
            ],
            input_prefix: vec![1],
            malformed_vector_lines: 0,
        };
        assert_eq!(
            CsvFormatter.format(&report),
            "profile,index,input,output\np0,0,1,7\np0,1,,8\n"
        );
    }

    #[test]
    fn test_profile_name_with_comma_is_quoted() {
        let report = ValidationReport {
            unit: "impl0".to_string(),
            profiles: vec![ProfileResult {
                name: "lp, \"3 taps\"".to_string(),
                image: None,
                outputs: vec![5],
                skipped: 0,
                summary: None,
                device_state: None,
                error: None,
            }],
            input_prefix: vec![2],
            malformed_vector_lines: 0,
        };
        assert_eq!(
            CsvFormatter.format(&report),
            "profile,index,input,output\n\"lp, \"\"3 taps\"\"\",0,2,5\n"
        );
    }

    #[test]
    fn test_plain_fields_unquoted() {
        assert_eq!(escape("p0.cfg"), "p0.cfg");
        assert_eq!(escape("a\nb"), "\"a\nb\"");
    }
}
