//! Base58 encoding and decoding with optional checksum support.
//!
//! Provides raw Base58 encode/decode and Base58Check encode/decode
//! (with a 4-byte double-SHA-256 checksum) used for WIF private keys,
//! legacy addresses, and serialized BIP-32 extended keys.

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Encode a byte slice to a Base58 string.
///
/// Uses the Bitcoin alphabet (no `0`, `O`, `I`, `l`). Leading zero
/// bytes are encoded as leading '1' characters.
///
/// # Arguments
/// * `data` - The bytes to encode.
///
/// # Returns
/// A Base58-encoded string.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// Leading '1' characters decode to leading zero bytes.
///
/// # Arguments
/// * `s` - The Base58 string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or [`PrimitivesError::InvalidCharacter`]
/// for characters outside the alphabet.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidCharacter(e.to_string()))
}

/// Encode a byte slice with a 4-byte double-SHA-256 checksum appended (Base58Check).
///
/// The checksum is the first 4 bytes of SHA-256d(data). The result
/// is `encode(data || checksum)`.
///
/// # Arguments
/// * `data` - The bytes to encode (typically version byte + payload).
///
/// # Returns
/// A Base58Check-encoded string.
pub fn check_encode(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum[..4]);
    encode(&payload)
}

/// Decode a Base58Check string, verifying the 4-byte checksum.
///
/// # Arguments
/// * `s` - The Base58Check string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` of the payload (without checksum) on success,
/// [`PrimitivesError::ChecksumMismatch`] if the checksum fails, or
/// [`PrimitivesError::InvalidCharacter`] for invalid encoding.
pub fn check_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < 4 {
        return Err(PrimitivesError::InvalidCharacter(
            "data too short for checksum".to_string(),
        ));
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - 4);
    let expected = sha256d(payload);
    if checksum != &expected[..4] {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

/// Base58Check-encode a payload behind a single version byte.
///
/// # Arguments
/// * `version` - Network/format version byte (e.g. 0x00 for P2PKH).
/// * `payload` - The payload bytes.
///
/// # Returns
/// A Base58Check-encoded string of `version || payload || checksum`.
pub fn check_encode_version(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    check_encode(&data)
}

/// Decode a Base58Check string, splitting off the leading version byte.
///
/// # Returns
/// `Ok((version, payload))` on success, or the decode/checksum error.
pub fn check_decode_version(s: &str) -> Result<(u8, Vec<u8>), PrimitivesError> {
    let decoded = check_decode(s)?;
    if decoded.is_empty() {
        return Err(PrimitivesError::InvalidCharacter(
            "missing version byte".to_string(),
        ));
    }
    Ok((decoded[0], decoded[1..].to_vec()))
}
