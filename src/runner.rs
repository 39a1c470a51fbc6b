use crate::config::{FirCheckConfig, SampleRadix};
use crate::device::{DeviceChannel, DeviceSequencer};
use crate::error::Result;
use crate::profile::ValidationProfile;
use crate::register::{RegisterImage, pack};
use crate::report::{ProfileResult, StatsSummary, ValidationReport};
use crate::vector::{InputPrefix, VectorDriver};

/// Runs every profile against the DUT: pack, bring up, drive.
///
/// Profiles are independent; a failure in one is recorded in its result and
/// the next profile is still attempted. Only the input prefix is shared.
pub struct ValidationRunner {
    unit: String,
    radix: SampleRadix,
    prefix_cap: usize,
    sequencer: DeviceSequencer,
    driver: VectorDriver,
}

impl ValidationRunner {
    pub fn new(config: &FirCheckConfig) -> Self {
        Self {
            unit: config.unit.name().to_string(),
            radix: config.sample_radix,
            prefix_cap: config.input_prefix_cap,
            sequencer: DeviceSequencer::new(&config.registers),
            driver: VectorDriver::new(),
        }
    }

    pub fn run(
        &mut self,
        profiles: &[ValidationProfile],
        samples: &[i64],
        channel: &mut dyn DeviceChannel,
    ) -> ValidationReport {
        let mut prefix = InputPrefix::new(self.prefix_cap);
        let mut results = Vec::with_capacity(profiles.len());

        for profile in profiles {
            log::info!(">>> Running validation profile: {} <<<", profile.name);

            let mut image = None;
            let result = match self.run_profile(profile, samples, channel, &mut prefix, &mut image) {
                Ok(result) => result,
                Err(e) => {
                    // image is set only once bring-up is about to start
                    let device_state = image.map(|_| self.sequencer.state());
                    match device_state {
                        Some(state) => {
                            log::error!("Profile {} failed (device {}): {}", profile.name, state, e)
                        }
                        None => log::error!("Profile {} failed: {}", profile.name, e),
                    }
                    ProfileResult::failed(&profile.name, image, device_state, e.to_string())
                }
            };
            results.push(result);
        }

        ValidationReport {
            unit: self.unit.clone(),
            profiles: results,
            input_prefix: prefix.into_samples(),
            malformed_vector_lines: 0,
        }
    }

    fn run_profile(
        &mut self,
        profile: &ValidationProfile,
        samples: &[i64],
        channel: &mut dyn DeviceChannel,
        prefix: &mut InputPrefix,
        image_out: &mut Option<RegisterImage>,
    ) -> Result<ProfileResult> {
        let entries = profile.entries(self.radix)?;
        let image = pack(&entries)?;
        *image_out = Some(image);

        self.sequencer.bring_up(&image, channel)?;
        log::info!(
            "DUT active. Config: {}, CoefReg: {:#x}, CSR: {:#x}",
            profile.name,
            image.coefficient_word,
            image.control_word
        );

        let outcome = self.driver.drive(samples, channel, prefix)?;
        log::info!(
            "Profile {}: {} outputs, {} skipped",
            profile.name,
            outcome.outputs.len(),
            outcome.skipped
        );

        Ok(ProfileResult {
            name: profile.name.clone(),
            image: Some(image),
            summary: StatsSummary::from_samples(&outcome.outputs),
            outputs: outcome.outputs,
            skipped: outcome.skipped,
            device_state: Some(self.sequencer.state()),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCommand, DeviceState, MockDevice};
    use crate::register::CoefficientEntry;

    fn profile(name: &str, index: usize) -> ValidationProfile {
        ValidationProfile::inline(name, vec![CoefficientEntry::new(index, 0x10, true)])
    }

    #[test]
    fn test_runs_profiles_in_order() {
        let mut runner = ValidationRunner::new(&FirCheckConfig::default());
        let mut dut = MockDevice::new();
        let samples: Vec<i64> = (0..8).collect();

        let report = runner.run(&[profile("a", 0), profile("b", 1)], &samples, &mut dut);

        assert_eq!(report.profiles.len(), 2);
        assert_eq!(report.profiles[0].name, "a");
        assert_eq!(report.profiles[1].name, "b");
        assert_eq!(report.outputs("a"), Some(samples.as_slice()));
        assert_eq!(report.input_prefix, samples);

        // 3 writes + settle + 8 samples per profile
        assert_eq!(dut.log().len(), 24);
    }

    #[test]
    fn test_bad_profile_does_not_stop_run() {
        let mut runner = ValidationRunner::new(&FirCheckConfig::default());
        let mut dut = MockDevice::new();

        let report = runner.run(&[profile("bad", 7), profile("good", 2)], &[1, 2], &mut dut);

        let bad = report.get("bad").unwrap();
        assert!(bad.error.as_deref().unwrap().contains("out of range"));
        assert!(bad.image.is_none());
        assert_eq!(report.outputs("good"), Some(&[1, 2][..]));

        // nothing reached the device for the bad profile
        assert!(matches!(
            dut.log()[0],
            DeviceCommand::Configure { address: 0, .. }
        ));
        assert_eq!(dut.writes().len(), 3);
    }

    #[test]
    fn test_bring_up_failure_isolated() {
        let mut runner = ValidationRunner::new(&FirCheckConfig::default());
        let mut dut = MockDevice::new().fail_configure_call(2);

        let report = runner.run(&[profile("p0", 0), profile("p4", 1)], &[5, 6], &mut dut);

        let p0 = report.get("p0").unwrap();
        assert!(!p0.is_ok());
        assert!(p0.image.is_some());
        assert!(p0.outputs.is_empty());
        assert_eq!(p0.device_state, Some(DeviceState::Configured));
        assert!(report.get("p4").unwrap().is_ok());
        assert_eq!(report.outputs("p4"), Some(&[5, 6][..]));

        // no samples were driven for the failed profile
        let stimuli = dut
            .log()
            .iter()
            .filter(|c| matches!(c, DeviceCommand::Stimulate(_)))
            .count();
        assert_eq!(stimuli, 2);
    }

    #[test]
    fn test_pack_failure_after_running_profile_has_no_device_state() {
        let mut runner = ValidationRunner::new(&FirCheckConfig::default());
        let mut dut = MockDevice::new();

        let report = runner.run(&[profile("good", 0), profile("bad", 9)], &[1], &mut dut);

        assert_eq!(report.get("good").unwrap().device_state, Some(DeviceState::Running));
        let bad = report.get("bad").unwrap();
        assert!(!bad.is_ok());
        assert_eq!(bad.device_state, None);
        assert_eq!(dut.writes().len(), 3);
    }

    #[test]
    fn test_prefix_shared_across_profiles() {
        let config = FirCheckConfig {
            input_prefix_cap: 5,
            ..FirCheckConfig::default()
        };
        let mut runner = ValidationRunner::new(&config);
        let mut dut = MockDevice::new();
        let samples: Vec<i64> = (100..103).collect();

        let report = runner.run(
            &[profile("a", 0), profile("b", 1), profile("c", 2)],
            &samples,
            &mut dut,
        );

        // filled by the first profile, topped up by the second, never past cap
        assert_eq!(report.input_prefix, vec![100, 101, 102, 100, 101]);
    }
}
