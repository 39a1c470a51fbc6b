use std::path::Path;

use crate::config::SampleRadix;
use crate::error::{FirCheckError, Result};

/// Samples read from a vector file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleVector {
    pub samples: Vec<i64>,
    /// Lines that did not parse as a sample and were dropped
    pub malformed_lines: usize,
}

/// Parse vector text: one sample per line, blank lines and `#` comments skipped.
///
/// A line that is not a valid sample is logged with its line number and
/// dropped; the rest of the vector is kept.
pub fn parse_vector(text: &str, source: &str, radix: SampleRadix) -> SampleVector {
    let mut vector = SampleVector::default();

    for (line, sample) in text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
    {
        match radix.parse_i64(sample) {
            Ok(value) => vector.samples.push(value),
            Err(reason) => {
                let e = FirCheckError::VectorParse {
                    path: source.to_string(),
                    line,
                    reason,
                };
                log::warn!("Skipping malformed sample: {}", e);
                vector.malformed_lines += 1;
            }
        }
    }
    vector
}

pub fn load_vector<P: AsRef<Path>>(path: P, radix: SampleRadix) -> Result<SampleVector> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| FirCheckError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let vector = parse_vector(&text, &path.display().to_string(), radix);
    log::info!("Loaded {} samples from {}", vector.samples.len(), path.display());
    if vector.malformed_lines > 0 {
        log::warn!(
            "{} malformed lines skipped in {}",
            vector.malformed_lines,
            path.display()
        );
    }
    Ok(vector)
}
