use rolling_stats::Stats;
use serde::Serialize;

use crate::device::DeviceState;
use crate::register::RegisterImage;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl StatsSummary {
    pub fn from_samples(samples: &[i64]) -> Option<Self> {
        let mut stats: Stats<f64> = Stats::new();
        for &s in samples {
            stats.update(s as f64);
        }
        Self::from_stats(&stats)
    }

    fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

/// Outcome of validating one profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResult {
    pub name: String,
    /// Packed registers, absent when the profile could not be packed
    pub image: Option<RegisterImage>,
    pub outputs: Vec<i64>,
    /// Samples dropped on undecodable responses
    pub skipped: usize,
    pub summary: Option<StatsSummary>,
    /// Where bring-up stopped, absent when it was never attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_state: Option<DeviceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileResult {
    pub fn failed(
        name: &str,
        image: Option<RegisterImage>,
        device_state: Option<DeviceState>,
        error: String,
    ) -> Self {
        Self {
            name: name.to_string(),
            image,
            outputs: Vec::new(),
            skipped: 0,
            summary: None,
            device_state,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-profile outputs plus the shared input prefix they are compared against.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub unit: String,
    pub profiles: Vec<ProfileResult>,
    pub input_prefix: Vec<i64>,
    /// Vector file lines dropped because they did not parse as a sample
    pub malformed_vector_lines: usize,
}

impl ValidationReport {
    /// Output samples for the named profile.
    pub fn outputs(&self, name: &str) -> Option<&[i64]> {
        self.get(name).map(|p| p.outputs.as_slice())
    }

    pub fn get(&self, name: &str) -> Option<&ProfileResult> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn failed_profiles(&self) -> impl Iterator<Item = &ProfileResult> {
        self.profiles.iter().filter(|p| !p.is_ok())
    }

    pub fn total_skipped(&self) -> usize {
        self.profiles.iter().map(|p| p.skipped).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_summary_of_samples() {
        let summary = StatsSummary::from_samples(&[0, 10, 20]).unwrap();
        assert_eq!(summary.count, 3);
        assert_relative_eq!(summary.mean, 10.0);
        assert_relative_eq!(summary.min, 0.0);
        assert_relative_eq!(summary.max, 20.0);
        assert!(summary.std_dev > 0.0);
    }

    #[test]
    fn test_summary_of_nothing() {
        assert!(StatsSummary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_report_lookup() {
        let report = ValidationReport {
            unit: "impl0".to_string(),
            profiles: vec![
                ProfileResult {
                    name: "p0".to_string(),
                    image: None,
                    outputs: vec![1, 2],
                    skipped: 1,
                    summary: None,
                    device_state: Some(DeviceState::Running),
                    error: None,
                },
                ProfileResult::failed("p4", None, None, "boom".to_string()),
            ],
            input_prefix: vec![1, 2],
            malformed_vector_lines: 0,
        };

        assert_eq!(report.outputs("p0"), Some(&[1, 2][..]));
        assert_eq!(report.outputs("p9"), None);
        assert_eq!(report.failed_profiles().count(), 1);
        assert_eq!(report.total_skipped(), 1);
    }
}
