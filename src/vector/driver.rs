use crate::device::DeviceChannel;
use crate::error::Result;

/// Bounded record of the input samples that produced output.
///
/// Shared by every profile in a run: it fills during the first profile(s)
/// and stops growing once `cap` samples are held.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPrefix {
    samples: Vec<i64>,
    cap: usize,
}

impl InputPrefix {
    pub fn new(cap: usize) -> Self {
        Self {
            samples: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Append `sample` unless the prefix is already full.
    pub fn offer(&mut self, sample: i64) -> bool {
        if self.samples.len() < self.cap {
            self.samples.push(sample);
            true
        } else {
            false
        }
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.cap
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn samples(&self) -> &[i64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i64> {
        self.samples
    }
}

/// Output of driving one vector through the device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveOutcome {
    /// One entry per successfully decoded response, in input order
    pub outputs: Vec<i64>,
    /// Input samples dropped because the response could not be decoded
    pub skipped: usize,
}

/// Feeds input samples to the DUT one at a time.
#[derive(Debug, Default)]
pub struct VectorDriver;

impl VectorDriver {
    pub fn new() -> Self {
        Self
    }

    /// Stimulate the device with every sample in order.
    ///
    /// A sample whose response cannot be decoded is skipped: it is neither
    /// recorded as output nor offered to `prefix`, so outputs can be shorter
    /// than `samples`. The count is reported in `DriveOutcome::skipped`.
    /// Transport errors abort the drive.
    pub fn drive(
        &self,
        samples: &[i64],
        channel: &mut dyn DeviceChannel,
        prefix: &mut InputPrefix,
    ) -> Result<DriveOutcome> {
        let mut outcome = DriveOutcome {
            outputs: Vec::with_capacity(samples.len()),
            skipped: 0,
        };

        for (position, &sample) in samples.iter().enumerate() {
            match channel.stimulate(sample) {
                Ok(output) => {
                    outcome.outputs.push(output);
                    prefix.offer(sample);
                }
                Err(e) if e.is_sample_decode() => {
                    log::warn!("Skipping sample {} ({:#x}): {}", position, sample, e);
                    outcome.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if outcome.skipped > 0 {
            log::warn!(
                "{} of {} samples skipped on undecodable responses",
                outcome.skipped,
                samples.len()
            );
        }
        Ok(outcome)
    }
}
