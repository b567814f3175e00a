//! BIP-340 Schnorr signatures over secp256k1.
//!
//! Keys are x-only 32-byte public keys; signatures are fixed 64 bytes.
//! Signing takes explicit 32 bytes of auxiliary randomness so callers
//! can be deterministic (all-zero aux) or hedge with fresh entropy.

use k256::schnorr::signature::hazmat::PrehashVerifier;
use k256::schnorr::{Signature as K256SchnorrSignature, SigningKey, VerifyingKey};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// A 64-byte BIP-340 Schnorr signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchnorrSignature {
    bytes: [u8; 64],
}

impl SchnorrSignature {
    /// Parse a signature from its 64-byte encoding `R.x || s`.
    ///
    /// # Arguments
    /// * `bytes` - The 64-byte signature encoding.
    ///
    /// # Returns
    /// `Ok(SchnorrSignature)`, or [`PrimitivesError::InvalidSignature`]
    /// if the length is wrong.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != 64 {
            return Err(PrimitivesError::InvalidSignature(format!(
                "invalid schnorr signature size {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 64];
        out.copy_from_slice(bytes);
        Ok(SchnorrSignature { bytes: out })
    }

    /// The 64-byte signature encoding.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.bytes
    }

    /// Hex encoding of the 64-byte signature.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// Sign a 32-byte message with BIP-340 Schnorr.
///
/// The secret key is negated internally when its point has an odd Y
/// coordinate, per the BIP-340 signing algorithm.
///
/// # Arguments
/// * `msg` - The 32-byte message (usually a tagged hash).
/// * `priv_key` - The private key to sign with.
/// * `aux_rand` - 32 bytes of auxiliary randomness; all zeros gives the
///   deterministic reference behavior.
///
/// # Returns
/// `Ok(SchnorrSignature)` on success, or an error if signing fails.
pub fn sign(
    msg: &[u8; 32],
    priv_key: &PrivateKey,
    aux_rand: &[u8; 32],
) -> Result<SchnorrSignature, PrimitivesError> {
    let signing_key = SigningKey::from_bytes(&priv_key.to_bytes())
        .map_err(|e| PrimitivesError::InvalidScalar(e.to_string()))?;

    let sig = signing_key
        .sign_raw(msg, aux_rand)
        .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

    SchnorrSignature::from_bytes(&sig.to_bytes())
}

/// Verify a BIP-340 Schnorr signature over a 32-byte message.
///
/// # Arguments
/// * `msg` - The 32-byte message that was signed.
/// * `sig` - The signature to check.
/// * `pub_key` - The public key; only its x-only form participates.
///
/// # Returns
/// `true` if the signature is valid, `false` otherwise.
pub fn verify(msg: &[u8; 32], sig: &SchnorrSignature, pub_key: &PublicKey) -> bool {
    let verifying_key = match VerifyingKey::from_bytes(&pub_key.x_only()) {
        Ok(vk) => vk,
        Err(_) => return false,
    };
    let parsed = match K256SchnorrSignature::try_from(&sig.bytes[..]) {
        Ok(s) => s,
        Err(_) => return false,
    };
    verifying_key.verify_prehash(msg, &parsed).is_ok()
}

/// Verify against a bare x-only public key, as consumed off the wire.
///
/// # Arguments
/// * `msg` - The 32-byte message that was signed.
/// * `sig` - The signature to check.
/// * `x_only` - The 32-byte x-only public key.
pub fn verify_x_only(msg: &[u8; 32], sig: &SchnorrSignature, x_only: &[u8; 32]) -> bool {
    let verifying_key = match VerifyingKey::from_bytes(x_only) {
        Ok(vk) => vk,
        Err(_) => return false,
    };
    let parsed = match K256SchnorrSignature::try_from(&sig.bytes[..]) {
        Ok(s) => s,
        Err(_) => return false,
    };
    verifying_key.verify_prehash(msg, &parsed).is_ok()
}
