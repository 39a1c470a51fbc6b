//! Validation profiles and coefficient file parsing.
//!
//! A coefficient file is comma-separated text with a header row naming the
//! `coef`, `value` and `en` columns:
//!
//! ```text
//! coef,value,en
//! 0,1f,1
//! 1,40,0
//! ```

use std::path::{Path, PathBuf};

use crate::config::SampleRadix;
use crate::error::{FirCheckError, Result};
use crate::register::CoefficientEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileSource {
    File(PathBuf),
    Inline(Vec<CoefficientEntry>),
}

/// A named coefficient/enable configuration to apply and validate.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationProfile {
    pub name: String,
    pub source: ProfileSource,
}

impl ValidationProfile {
    /// Profile backed by a coefficient file, named after the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: ProfileSource::File(path.to_path_buf()),
        }
    }

    pub fn inline(name: impl Into<String>, entries: Vec<CoefficientEntry>) -> Self {
        Self {
            name: name.into(),
            source: ProfileSource::Inline(entries),
        }
    }

    /// Decode the profile's coefficient entries.
    pub fn entries(&self, radix: SampleRadix) -> Result<Vec<CoefficientEntry>> {
        match &self.source {
            ProfileSource::Inline(entries) => Ok(entries.clone()),
            ProfileSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| FirCheckError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                parse_coefficients(&text, &path.display().to_string(), radix)
            }
        }
    }
}

/// Trim a field and drop one surrounding pair of double quotes.
fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(field)
}

struct Columns {
    coef: usize,
    value: usize,
    en: usize,
}

impl Columns {
    fn from_header(header: &str) -> std::result::Result<Self, String> {
        let names: Vec<String> = header
            .split(',')
            .map(|s| unquote(s).to_ascii_lowercase())
            .collect();
        let find = |column: &str| {
            names
                .iter()
                .position(|n| n == column)
                .ok_or_else(|| format!("header is missing the '{}' column", column))
        };
        Ok(Self {
            coef: find("coef")?,
            value: find("value")?,
            en: find("en")?,
        })
    }
}

fn parse_enable(text: &str) -> std::result::Result<bool, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(format!("invalid enable flag: {:?}", other)),
    }
}

/// Parse coefficient file text. Blank lines and `#` comments are skipped.
/// `source` names the input in error messages.
pub fn parse_coefficients(
    text: &str,
    source: &str,
    radix: SampleRadix,
) -> Result<Vec<CoefficientEntry>> {
    let err = |line: usize, reason: String| FirCheckError::CoefficientParse {
        path: source.to_string(),
        line,
        reason,
    };

    let mut rows = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let Some((header_line, header)) = rows.next() else {
        return Err(err(1, "missing header row".to_string()));
    };
    let columns = Columns::from_header(header).map_err(|reason| err(header_line, reason))?;

    rows.map(|(line, row)| {
        let fields: Vec<&str> = row.split(',').map(unquote).collect();
        let field = |idx: usize, column: &str| {
            fields
                .get(idx)
                .copied()
                .ok_or_else(|| err(line, format!("missing '{}' field", column)))
        };

        let coef = field(columns.coef, "coef")?;
        let index = coef
            .trim()
            .parse::<usize>()
            .map_err(|_| err(line, format!("invalid coefficient index: {:?}", coef.trim())))?;
        let value = radix
            .parse_u8(field(columns.value, "value")?)
            .map_err(|reason| err(line, reason))?;
        // a short row without the enable column reads as disabled
        let enabled = match fields.get(columns.en) {
            Some(flag) => parse_enable(flag).map_err(|reason| err(line, reason))?,
            None => false,
        };

        Ok(CoefficientEntry::new(index, value, enabled))
    })
    .collect()
}
