//! Device transport through the DUT's command-line control program.
//!
//! The control program takes one command per invocation:
//! - `<unit> cfg --address 0x4 --data 0x4433` writes a configuration register
//! - `<unit> sig --data 0x1f` drives one sample and prints the output sample

use std::process::{Command, Output};

use crate::config::{DeviceTarget, SampleRadix};
use crate::device::DeviceChannel;
use crate::error::{FirCheckError, Result};

pub struct ProcessChannel {
    target: DeviceTarget,
    radix: SampleRadix,
}

impl ProcessChannel {
    pub fn new(target: DeviceTarget, radix: SampleRadix) -> Self {
        log::info!(
            "Using control program {} for unit {}",
            target.program().display(),
            target
        );
        Self { target, radix }
    }

    pub fn target(&self) -> &DeviceTarget {
        &self.target
    }

    fn invoke(&self, args: &[&str]) -> Result<Output> {
        log::trace!("{} {}", self.target.program().display(), args.join(" "));
        Command::new(self.target.program())
            .args(args)
            .output()
            .map_err(|e| {
                FirCheckError::Transport(format!(
                    "failed to run {}: {}",
                    self.target.program().display(),
                    e
                ))
            })
    }

    fn format_sample(&self, sample: i64) -> String {
        match self.radix {
            SampleRadix::Hex if sample < 0 => format!("-{:#x}", sample.unsigned_abs()),
            SampleRadix::Hex => format!("{:#x}", sample),
            SampleRadix::Dec => sample.to_string(),
        }
    }

    /// Read the output sample from a `sig` invocation.
    ///
    /// Stdout is parsed whatever the exit status; a non-zero status only
    /// fails the sample when stdout holds no sample either.
    fn decode_response(&self, data: &str, output: &Output) -> Result<i64> {
        let stdout = String::from_utf8_lossy(&output.stdout);
        match self.radix.parse_i64(stdout.trim()) {
            Ok(value) => {
                if !output.status.success() {
                    log::warn!("sig --data {} exited with {}, using output {}", data, output.status, value);
                }
                Ok(value)
            }
            Err(reason) if output.status.success() => Err(FirCheckError::ResponseDecode(format!(
                "sig --data {}: {}",
                data, reason
            ))),
            Err(reason) => Err(FirCheckError::ResponseDecode(format!(
                "sig --data {} exited with {}: {}",
                data, output.status, reason
            ))),
        }
    }
}

impl DeviceChannel for ProcessChannel {
    fn configure(&mut self, address: u32, data: u32) -> Result<()> {
        let address = format!("{:#x}", address);
        let data = format!("{:#x}", data);
        let output = self.invoke(&["cfg", "--address", &address, "--data", &data])?;

        if !output.status.success() {
            return Err(FirCheckError::Transport(format!(
                "cfg --address {} --data {} failed ({}): {}",
                address,
                data,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    fn stimulate(&mut self, sample: i64) -> Result<i64> {
        let data = self.format_sample(sample);
        let output = self.invoke(&["sig", "--data", &data])?;
        self.decode_response(&data, &output)
    }
}
