use std::time::Duration;

use crate::error::Result;

/// Command interface to the device under test.
///
/// Calls are blocking and strictly ordered; implementations must not
/// reorder or overlap commands.
pub trait DeviceChannel {
    /// Write `data` to the configuration register at `address`.
    /// Any error is fatal to the current profile.
    fn configure(&mut self, address: u32, data: u32) -> Result<()>;

    /// Send one input sample and return the device's output sample.
    /// `FirCheckError::ResponseDecode` marks a response that could not be
    /// read back; other errors are transport failures.
    fn stimulate(&mut self, sample: i64) -> Result<i64>;

    /// Block for the settle interval after a halt write.
    fn settle(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SETTLE_DELAY;
    use std::time::Instant;

    /// Loopback channel that keeps the provided `settle`.
    struct Loopback;

    impl DeviceChannel for Loopback {
        fn configure(&mut self, _address: u32, _data: u32) -> Result<()> {
            Ok(())
        }

        fn stimulate(&mut self, sample: i64) -> Result<i64> {
            Ok(sample)
        }
    }

    #[test]
    fn test_default_settle_blocks_for_delay() {
        let mut channel = Loopback;
        let start = Instant::now();
        channel.settle(SETTLE_DELAY);
        assert!(start.elapsed() >= SETTLE_DELAY);
    }

    #[test]
    fn test_bring_up_waits_on_default_settle() {
        use crate::config::RegisterConfig;
        use crate::device::DeviceSequencer;
        use crate::register::{CoefficientEntry, pack};

        let image = pack(&[CoefficientEntry::new(0, 0x40, true)]).unwrap();
        let mut sequencer = DeviceSequencer::new(&RegisterConfig::default());
        let start = Instant::now();
        sequencer.bring_up(&image, &mut Loopback).unwrap();
        assert!(start.elapsed() >= SETTLE_DELAY);
    }
}
