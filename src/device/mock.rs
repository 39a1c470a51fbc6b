//! Mock device for dry runs and tests without hardware.
//!
//! Select it with `fircheck --mock`. Register writes are logged at INFO so
//! you can check exactly what would reach a real DUT. While the filter is
//! enabled and not halted, `stimulate` loops the input sample back; it does
//! not model filter arithmetic.

use std::collections::HashSet;
use std::time::Duration;

use crate::constants::{COEF_ADDRESS, CSR_ADDRESS, CSR_FILTER_EN_BIT, CSR_HALT_BIT};
use crate::device::DeviceChannel;
use crate::error::{FirCheckError, Result};

/// One command as seen by the mock device, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    Configure { address: u32, data: u32 },
    Settle(Duration),
    Stimulate(i64),
}

#[derive(Debug, Default)]
pub struct MockDevice {
    control_address: u32,
    coefficient_address: u32,
    control: Option<u32>,
    coefficients: Option<u32>,
    log: Vec<DeviceCommand>,
    configure_calls: usize,
    stimulate_calls: usize,
    fail_configure_call: Option<usize>,
    disconnect_after: Option<usize>,
    rejected_samples: HashSet<i64>,
    reject_all: bool,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::with_addresses(CSR_ADDRESS, COEF_ADDRESS)
    }

    pub fn with_addresses(control_address: u32, coefficient_address: u32) -> Self {
        log::info!(
            "[MOCK DUT] Initialized, csr@{:#x} coef@{:#x}",
            control_address,
            coefficient_address
        );
        Self {
            control_address,
            coefficient_address,
            ..Self::default()
        }
    }

    /// Fail the `n`th configure call (0-based, counted over the device lifetime).
    pub fn fail_configure_call(mut self, n: usize) -> Self {
        self.fail_configure_call = Some(n);
        self
    }

    /// Return a transport error from every stimulate call after the first `n`.
    pub fn disconnect_after(mut self, n: usize) -> Self {
        self.disconnect_after = Some(n);
        self
    }

    /// Answer these input samples with an undecodable response.
    pub fn reject_samples(mut self, samples: impl IntoIterator<Item = i64>) -> Self {
        self.rejected_samples.extend(samples);
        self
    }

    /// Answer every input sample with an undecodable response.
    pub fn reject_all_samples(mut self) -> Self {
        self.reject_all = true;
        self
    }

    pub fn log(&self) -> &[DeviceCommand] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Configuration writes only, as (address, data) pairs.
    pub fn writes(&self) -> Vec<(u32, u32)> {
        self.log
            .iter()
            .filter_map(|cmd| match *cmd {
                DeviceCommand::Configure { address, data } => Some((address, data)),
                _ => None,
            })
            .collect()
    }

    pub fn control(&self) -> Option<u32> {
        self.control
    }

    pub fn coefficients(&self) -> Option<u32> {
        self.coefficients
    }

    pub fn is_running(&self) -> bool {
        self.control.is_some_and(|csr| {
            csr & (1 << CSR_FILTER_EN_BIT) != 0 && csr & (1 << CSR_HALT_BIT) == 0
        }) && self.coefficients.is_some()
    }
}

impl DeviceChannel for MockDevice {
    fn configure(&mut self, address: u32, data: u32) -> Result<()> {
        let call = self.configure_calls;
        self.configure_calls += 1;
        self.log.push(DeviceCommand::Configure { address, data });

        if self.fail_configure_call == Some(call) {
            log::info!("[MOCK DUT] cfg {:#x} <- {:#x} FAILED", address, data);
            return Err(FirCheckError::Transport(format!(
                "mock device rejected write {:#x} to {:#x}",
                data, address
            )));
        }

        if address == self.control_address {
            self.control = Some(data);
        } else if address == self.coefficient_address {
            self.coefficients = Some(data);
        } else {
            return Err(FirCheckError::Transport(format!(
                "no register at address {:#x}",
                address
            )));
        }
        log::info!("[MOCK DUT] cfg {:#x} <- {:#x}", address, data);
        Ok(())
    }

    fn stimulate(&mut self, sample: i64) -> Result<i64> {
        let call = self.stimulate_calls;
        self.stimulate_calls += 1;
        self.log.push(DeviceCommand::Stimulate(sample));

        if self.disconnect_after.is_some_and(|n| call >= n) {
            return Err(FirCheckError::Transport("mock device disconnected".to_string()));
        }
        if self.reject_all || self.rejected_samples.contains(&sample) {
            return Err(FirCheckError::ResponseDecode(format!(
                "no response for sample {}",
                sample
            )));
        }
        if !self.is_running() {
            return Err(FirCheckError::ResponseDecode(
                "device not running".to_string(),
            ));
        }

        log::debug!("[MOCK DUT] sig {} -> {}", sample, sample);
        Ok(sample)
    }

    fn settle(&mut self, delay: Duration) {
        log::info!("[MOCK DUT] settle {:?}", delay);
        self.log.push(DeviceCommand::Settle(delay));
    }
}
