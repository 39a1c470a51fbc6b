//! Register map and protocol constants for the FIR filter block.
//!
//! Addresses and bit positions match the device's configuration interface.
//! The coefficient register packs one 8-bit coefficient per byte, lowest
//! index in the least significant byte.

use std::time::Duration;

/// Number of coefficient slots in the coefficient register.
pub const NUM_COEFFICIENTS: usize = 4;

/// Width of one packed coefficient in bits.
pub const COEFFICIENT_BITS: usize = 8;

/// Control/status register address.
pub const CSR_ADDRESS: u32 = 0x0;

/// Coefficient register address.
pub const COEF_ADDRESS: u32 = 0x4;

/// Control word: filter enable.
pub const CSR_FILTER_EN_BIT: u32 = 0;

/// Control word: first per-coefficient enable bit (coefficient `i` uses `base + i`).
pub const CSR_COEF_EN_BASE: u32 = 1;

/// Control word: halt. Only set during the first bring-up write.
pub const CSR_HALT_BIT: u32 = 5;

/// Wait after the halt write before loading coefficients. DUT timing requirement.
pub const SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Number of input samples retained for display across all profiles.
pub const MAX_INPUT_SAMPLES: usize = 100;
