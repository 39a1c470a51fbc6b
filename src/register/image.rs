use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{CSR_COEF_EN_BASE, CSR_FILTER_EN_BIT, CSR_HALT_BIT};

/// One symbolic coefficient slot: 8-bit value plus its enable flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientEntry {
    pub index: usize,
    pub value: u8,
    #[serde(default)]
    pub enabled: bool,
}

impl CoefficientEntry {
    pub fn new(index: usize, value: u8, enabled: bool) -> Self {
        Self {
            index,
            value,
            enabled,
        }
    }
}

/// Register words describing one filter configuration as the DUT sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterImage {
    pub coefficient_word: u32,
    pub control_word: u32,
}

impl RegisterImage {
    /// Control word with the halt bit set, written first during bring-up.
    pub fn halt_word(&self) -> u32 {
        self.control_word | (1 << CSR_HALT_BIT)
    }

    pub fn filter_enabled(&self) -> bool {
        self.control_word & (1 << CSR_FILTER_EN_BIT) != 0
    }

    pub fn coefficient_enabled(&self, index: usize) -> bool {
        match u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(CSR_COEF_EN_BASE))
        {
            Some(bit) if bit < CSR_HALT_BIT => self.control_word & (1 << bit) != 0,
            _ => false,
        }
    }

    pub fn coefficient(&self, index: usize) -> Option<u8> {
        let shift = u32::try_from(index).ok()?.checked_mul(8)?;
        let word = self.coefficient_word.checked_shr(shift)?;
        Some((word & 0xFF) as u8)
    }
}

impl fmt::Display for RegisterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "coef={:#010x} csr={:#04x}",
            self.coefficient_word, self.control_word
        )
    }
}
