//! Configuration for a fircheck validation run.
//!
//! Everything can come from a TOML file; command-line options override it.
//!
//! ```toml
//! unit = "impl0"
//! vector = "sqr.vec"
//!
//! [registers]
//! settle_ms = 10
//!
//! [[profiles]]
//! file = "p0.cfg"
//!
//! [[profiles]]
//! name = "passthrough"
//! coefficients = [{ index = 0, value = 0x40, enabled = true }]
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{COEF_ADDRESS, CSR_ADDRESS, MAX_INPUT_SAMPLES, SETTLE_DELAY};
use crate::error::{FirCheckError, Result};
use crate::profile::ValidationProfile;
use crate::register::CoefficientEntry;

/// Device under test, identified by its control program.
///
/// A bare name resolves to an executable in the working directory, so
/// `impl0` becomes `./impl0`. Anything containing a path separator is used
/// as given.
///
/// # Example
/// ```
/// use fircheck::config::DeviceTarget;
///
/// let target: DeviceTarget = "impl0".parse().unwrap();
/// assert_eq!(target.program().to_str(), Some("./impl0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct DeviceTarget {
    name: String,
    program: PathBuf,
}

impl DeviceTarget {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for DeviceTarget {
    fn default() -> Self {
        Self {
            name: "impl0".to_string(),
            program: PathBuf::from("./impl0"),
        }
    }
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for DeviceTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("device target must not be empty".to_string());
        }

        let program = if s.contains(std::path::MAIN_SEPARATOR) || s.contains('/') {
            PathBuf::from(s)
        } else {
            Path::new(".").join(s)
        };

        Ok(Self {
            name: s.to_string(),
            program,
        })
    }
}

impl TryFrom<String> for DeviceTarget {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Number base for sample and coefficient literals without a `0x` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SampleRadix {
    /// Bare literals are hexadecimal (`1f`, `0x1f`)
    #[default]
    Hex,
    /// Bare literals are decimal (`31`, `0x1f` still hex)
    Dec,
}

impl SampleRadix {
    pub fn radix(self) -> u32 {
        match self {
            Self::Hex => 16,
            Self::Dec => 10,
        }
    }

    /// Parse an integer literal with an optional leading `-`.
    /// A `0x` prefix always selects hexadecimal.
    pub fn parse_i64(self, text: &str) -> std::result::Result<i64, String> {
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (radix, digits) = match body
            .strip_prefix("0x")
            .or_else(|| body.strip_prefix("0X"))
        {
            Some(hex) => (16, hex),
            None => (self.radix(), body),
        };

        if digits.is_empty() || digits.starts_with(['+', '-']) {
            return Err(format!("invalid number: {:?}", text));
        }

        let magnitude = i64::from_str_radix(digits, radix)
            .map_err(|_| format!("invalid number: {:?}", text))?;
        Ok(if negative { -magnitude } else { magnitude })
    }

    /// Parse an 8-bit unsigned coefficient value.
    pub fn parse_u8(self, text: &str) -> std::result::Result<u8, String> {
        let value = self.parse_i64(text)?;
        u8::try_from(value).map_err(|_| format!("value {} does not fit in 8 bits", text.trim()))
    }
}

/// Register addresses and bring-up timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// Control/status register address
    pub control_address: u32,
    /// Coefficient register address
    pub coefficient_address: u32,
    /// Settle time after the halt write in milliseconds
    pub settle_ms: u64,
}

impl RegisterConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            control_address: CSR_ADDRESS,
            coefficient_address: COEF_ADDRESS,
            settle_ms: SETTLE_DELAY.as_millis() as u64,
        }
    }
}

/// One `[[profiles]]` table: either a coefficient file or inline entries.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    pub name: Option<String>,
    pub file: Option<PathBuf>,
    pub coefficients: Option<Vec<CoefficientEntry>>,
}

impl ProfileConfig {
    pub fn to_profile(&self) -> Result<ValidationProfile> {
        match (&self.file, &self.coefficients) {
            (Some(file), None) => {
                let mut profile = ValidationProfile::from_file(file);
                if let Some(name) = &self.name {
                    profile.name = name.clone();
                }
                Ok(profile)
            }
            (None, Some(entries)) => {
                let name = self.name.clone().ok_or_else(|| {
                    FirCheckError::Config("inline profile requires a name".to_string())
                })?;
                Ok(ValidationProfile::inline(name, entries.clone()))
            }
            (Some(_), Some(_)) => Err(FirCheckError::Config(format!(
                "profile {} sets both file and coefficients",
                self.name.as_deref().unwrap_or("<unnamed>")
            ))),
            (None, None) => Err(FirCheckError::Config(format!(
                "profile {} needs a file or coefficients",
                self.name.as_deref().unwrap_or("<unnamed>")
            ))),
        }
    }
}

/// Top-level run configuration.
///
/// Use `FirCheckConfig::default()` for the stock register map and a device
/// named `impl0`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirCheckConfig {
    /// Device under test
    pub unit: DeviceTarget,
    /// Input vector file
    pub vector: PathBuf,
    /// Radix for bare sample and coefficient literals
    pub sample_radix: SampleRadix,
    /// Maximum number of input samples kept for the report
    pub input_prefix_cap: usize,
    /// Register map and timing
    pub registers: RegisterConfig,
    /// Profiles, validated in order
    pub profiles: Vec<ProfileConfig>,
}

impl Default for FirCheckConfig {
    fn default() -> Self {
        Self {
            unit: DeviceTarget::default(),
            vector: PathBuf::from("sqr.vec"),
            sample_radix: SampleRadix::default(),
            input_prefix_cap: MAX_INPUT_SAMPLES,
            registers: RegisterConfig::default(),
            profiles: Vec::new(),
        }
    }
}

impl FirCheckConfig {
    /// Load a TOML configuration. Relative vector and profile paths are
    /// resolved against the directory holding the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FirCheckError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FirCheckError::Config(e.to_string()))
    }

    fn resolve_paths(&mut self, base: &Path) {
        if self.vector.is_relative() {
            self.vector = base.join(&self.vector);
        }
        for profile in &mut self.profiles {
            if let Some(file) = profile.file.as_mut().filter(|f| f.is_relative()) {
                *file = base.join(&*file);
            }
        }
    }

    pub fn validation_profiles(&self) -> Result<Vec<ValidationProfile>> {
        self.profiles.iter().map(ProfileConfig::to_profile).collect()
    }
}
