use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::config::RegisterConfig;
use crate::device::DeviceChannel;
use crate::error::Result;
use crate::register::RegisterImage;

/// Where the DUT is in the bring-up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    Unknown,
    Halted,
    Configured,
    Running,
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Halted => "halted",
            Self::Configured => "configured",
            Self::Running => "running",
        };
        f.write_str(name)
    }
}

/// Brings the DUT from an unknown state to running with one register image.
///
/// The write order is fixed:
/// 1. control register <- control word | halt
/// 2. settle
/// 3. coefficient register <- coefficient word
/// 4. control register <- control word (clears halt)
///
/// Loading coefficients while halted keeps the filter from glitching on a
/// half-written configuration.
pub struct DeviceSequencer {
    control_address: u32,
    coefficient_address: u32,
    settle_delay: Duration,
    state: DeviceState,
}

impl DeviceSequencer {
    pub fn new(registers: &RegisterConfig) -> Self {
        Self {
            control_address: registers.control_address,
            coefficient_address: registers.coefficient_address,
            settle_delay: registers.settle_delay(),
            state: DeviceState::Unknown,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Run the bring-up sequence. A failed write aborts immediately and
    /// leaves the device wherever it stopped; nothing is rolled back.
    pub fn bring_up(
        &mut self,
        image: &RegisterImage,
        channel: &mut dyn DeviceChannel,
    ) -> Result<()> {
        self.state = DeviceState::Unknown;

        log::debug!("Halting DUT: csr <- {:#x}", image.halt_word());
        channel.configure(self.control_address, image.halt_word())?;
        self.state = DeviceState::Halted;

        channel.settle(self.settle_delay);

        log::debug!("Loading coefficients: coef <- {:#x}", image.coefficient_word);
        channel.configure(self.coefficient_address, image.coefficient_word)?;
        self.state = DeviceState::Configured;

        log::debug!("Activating filter: csr <- {:#x}", image.control_word);
        channel.configure(self.control_address, image.control_word)?;
        self.state = DeviceState::Running;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COEF_ADDRESS, CSR_ADDRESS, SETTLE_DELAY};
    use crate::device::{DeviceCommand, MockDevice};
    use crate::register::{CoefficientEntry, pack};

    fn image() -> RegisterImage {
        pack(&[
            CoefficientEntry::new(0, 0xAB, true),
            CoefficientEntry::new(3, 0x12, false),
        ])
        .unwrap()
    }

    #[test]
    fn test_write_order() {
        let mut sequencer = DeviceSequencer::new(&RegisterConfig::default());
        let mut dut = MockDevice::new();
        let image = image();

        sequencer.bring_up(&image, &mut dut).unwrap();

        assert_eq!(
            dut.log(),
            &[
                DeviceCommand::Configure {
                    address: CSR_ADDRESS,
                    data: image.halt_word()
                },
                DeviceCommand::Settle(SETTLE_DELAY),
                DeviceCommand::Configure {
                    address: COEF_ADDRESS,
                    data: 0x1200_00AB
                },
                DeviceCommand::Configure {
                    address: CSR_ADDRESS,
                    data: 0b00_0011
                },
            ]
        );
        assert_eq!(sequencer.state(), DeviceState::Running);
        assert!(dut.is_running());
    }

    #[test]
    fn test_failed_coefficient_write_aborts() {
        let mut sequencer = DeviceSequencer::new(&RegisterConfig::default());
        let mut dut = MockDevice::new().fail_configure_call(1);

        assert!(sequencer.bring_up(&image(), &mut dut).is_err());
        assert_eq!(sequencer.state(), DeviceState::Halted);
        assert_eq!(dut.writes().len(), 2);
        assert!(!dut.is_running());
    }

    #[test]
    fn test_failed_halt_write_leaves_state_unknown() {
        let mut sequencer = DeviceSequencer::new(&RegisterConfig::default());
        let mut dut = MockDevice::new().fail_configure_call(0);

        assert!(sequencer.bring_up(&image(), &mut dut).is_err());
        assert_eq!(sequencer.state(), DeviceState::Unknown);
        assert!(!dut.log().iter().any(|c| matches!(c, DeviceCommand::Settle(_))));
    }

    #[test]
    fn test_custom_register_map() {
        let registers = RegisterConfig {
            control_address: 0x100,
            coefficient_address: 0x104,
            settle_ms: 3,
        };
        let mut sequencer = DeviceSequencer::new(&registers);
        let mut dut = MockDevice::with_addresses(0x100, 0x104);

        sequencer.bring_up(&image(), &mut dut).unwrap();
        assert_eq!(
            dut.writes().iter().map(|w| w.0).collect::<Vec<_>>(),
            vec![0x100, 0x104, 0x100]
        );
        assert!(dut.log().contains(&DeviceCommand::Settle(Duration::from_millis(3))));
    }
}
