use crate::constants::{
    COEFFICIENT_BITS, CSR_COEF_EN_BASE, CSR_FILTER_EN_BIT, NUM_COEFFICIENTS,
};
use crate::error::{FirCheckError, Result};

use super::{CoefficientEntry, RegisterImage};

/// Pack symbolic coefficient entries into the coefficient and control words.
///
/// The filter-enable bit is always set. Each entry contributes its value to
/// byte `index` of the coefficient word and, when enabled, bit `1 + index` of
/// the control word. Entry order does not affect the result.
///
/// # Errors
/// Rejects indices outside the coefficient register and indices that appear
/// more than once, since either would corrupt neighbouring fields.
///
/// # Example
/// ```
/// use fircheck::register::{pack, CoefficientEntry};
///
/// let image = pack(&[CoefficientEntry::new(0, 0xAB, true)]).unwrap();
/// assert_eq!(image.coefficient_word, 0xAB);
/// assert_eq!(image.control_word, 0b000011);
/// ```
pub fn pack(entries: &[CoefficientEntry]) -> Result<RegisterImage> {
    let mut coefficient_word = 0u32;
    let mut control_word = 1u32 << CSR_FILTER_EN_BIT;
    let mut seen = [false; NUM_COEFFICIENTS];

    for entry in entries {
        if entry.index >= NUM_COEFFICIENTS {
            return Err(FirCheckError::CoefficientIndexOutOfRange {
                index: entry.index,
                count: NUM_COEFFICIENTS,
            });
        }
        if std::mem::replace(&mut seen[entry.index], true) {
            return Err(FirCheckError::DuplicateCoefficient { index: entry.index });
        }

        // index < NUM_COEFFICIENTS keeps both shifts inside the 32-bit words
        let index = entry.index as u32;
        coefficient_word |= u32::from(entry.value) << (index * COEFFICIENT_BITS as u32);

        if entry.enabled {
            control_word |= 1 << (CSR_COEF_EN_BASE + index);
        }
    }

    Ok(RegisterImage {
        coefficient_word,
        control_word,
    })
}
