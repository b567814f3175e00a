//! Bech32 and Bech32m encoding and decoding.
//!
//! The two variants differ only in the final checksum constant
//! (BIP-173 vs BIP-350). Feeding a Bech32m string to a Bech32 decoder
//! is a checksum failure, never silent corruption, so `decode` reports
//! which variant actually validated and callers check it against the
//! format they expect (v0 segwit vs taproot-style outputs).

use ::bech32::primitives::decode::CheckedHrpstring;
use ::bech32::{Bech32, Bech32m, Hrp};

use crate::PrimitivesError;

/// Which checksum polynomial constant a string was encoded with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// BIP-173 checksum (constant 1).
    Bech32,
    /// BIP-350 checksum (constant 0x2bc830a3).
    Bech32m,
}

/// Encode a byte payload under a human-readable part.
///
/// # Arguments
/// * `hrp` - Human-readable part (lowercase, 1..=83 ASCII chars in 33..=126).
/// * `data` - Payload bytes; converted to 5-bit groups internally.
/// * `variant` - Checksum variant to apply.
///
/// # Returns
/// The encoded lowercase string, or [`PrimitivesError::InvalidHrp`] if
/// the human-readable part is not valid.
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String, PrimitivesError> {
    let hrp = Hrp::parse(hrp).map_err(|e| PrimitivesError::InvalidHrp(e.to_string()))?;
    let encoded = match variant {
        Variant::Bech32 => ::bech32::encode::<Bech32>(hrp, data),
        Variant::Bech32m => ::bech32::encode::<Bech32m>(hrp, data),
    };
    encoded.map_err(|e| PrimitivesError::InvalidHrp(e.to_string()))
}

/// Decode a Bech32 or Bech32m string, detecting the variant.
///
/// Case handling follows BIP-173: all-lowercase and all-uppercase are
/// both accepted, mixed case is rejected outright.
///
/// # Arguments
/// * `s` - The encoded string.
///
/// # Returns
/// `Ok((hrp, payload, variant))` with the lowercase human-readable
/// part, or one of [`PrimitivesError::MixedCase`],
/// [`PrimitivesError::InvalidHrp`], [`PrimitivesError::InvalidChecksum`].
pub fn decode(s: &str) -> Result<(String, Vec<u8>, Variant), PrimitivesError> {
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(PrimitivesError::MixedCase);
    }

    // The separator is the last '1'; everything before it is the HRP.
    let (hrp_part, _) = s
        .rsplit_once('1')
        .ok_or_else(|| PrimitivesError::InvalidHrp("missing separator".to_string()))?;
    Hrp::parse(hrp_part).map_err(|e| PrimitivesError::InvalidHrp(e.to_string()))?;

    let hrp = hrp_part.to_ascii_lowercase();
    if let Ok(checked) = CheckedHrpstring::new::<Bech32>(s) {
        let payload: Vec<u8> = checked.byte_iter().collect();
        return Ok((hrp, payload, Variant::Bech32));
    }
    if let Ok(checked) = CheckedHrpstring::new::<Bech32m>(s) {
        let payload: Vec<u8> = checked.byte_iter().collect();
        return Ok((hrp, payload, Variant::Bech32m));
    }
    Err(PrimitivesError::InvalidChecksum)
}
