//! secp256k1 public key with wallet-specific functionality.
//!
//! Supports compressed/uncompressed SEC1 serialization, legacy address
//! generation, and strict (low-S only) ECDSA verification.

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::FromEncodedPoint;
use k256::{AffinePoint, ProjectivePoint};
use std::fmt;

use crate::base58;
use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed public key in bytes (prefix + 32 byte x + 32 byte y).
const UNCOMPRESSED_LEN: usize = 65;

/// Mainnet P2PKH address version byte.
const P2PKH_VERSION: u8 = 0x00;

/// A secp256k1 public key.
///
/// Wraps a k256 `VerifyingKey`, which guarantees the point lies on the
/// curve and is not the point at infinity. Provides SEC1 serialization,
/// address generation, and ECDSA verification.
#[derive(Clone, Debug)]
pub struct PublicKey {
    /// The underlying k256 verifying key.
    inner: VerifyingKey,
}

impl PublicKey {
    /// Create a PublicKey from raw SEC1 encoded bytes.
    ///
    /// Accepts both compressed (33-byte) and uncompressed (65-byte) formats.
    ///
    /// # Arguments
    /// * `bytes` - SEC1-encoded public key bytes.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or [`PrimitivesError::InvalidPoint`]
    /// if the bytes do not represent a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPoint(
                "public key bytes are empty".to_string(),
            ));
        }
        let vk = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPoint(e.to_string()))?;
        Ok(PublicKey { inner: vk })
    }

    /// Create a PublicKey from a hex-encoded SEC1 string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of a compressed (66 chars) or uncompressed (130 chars) key.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the hex or point is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the public key in compressed SEC1 format (33 bytes).
    ///
    /// The first byte is 0x02 (even Y) or 0x03 (odd Y), followed by the
    /// 32-byte X coordinate.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the public key in uncompressed SEC1 format (65 bytes).
    ///
    /// The first byte is 0x04, followed by 32-byte X and 32-byte Y coordinates.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the public key as a lowercase hex string (compressed format).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// The 32-byte X coordinate, as used by BIP-340 x-only public keys.
    pub fn x_only(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.to_compressed()[1..]);
        out
    }

    /// Compute the Hash160 of the compressed public key.
    ///
    /// Hash160 = RIPEMD160(SHA256(compressed_pubkey)).
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Derive a mainnet P2PKH address from the compressed public key.
    ///
    /// # Returns
    /// A Base58Check-encoded legacy address string.
    pub fn to_address(&self) -> String {
        self.to_address_version(P2PKH_VERSION)
    }

    /// Derive a P2PKH address with a custom version byte.
    ///
    /// # Arguments
    /// * `version` - The network version byte (0x00 mainnet, 0x6f testnet).
    ///
    /// # Returns
    /// A Base58Check-encoded address string.
    pub fn to_address_version(&self, version: u8) -> String {
        base58::check_encode_version(version, &self.hash160())
    }

    /// Verify an ECDSA signature against a 32-byte message digest.
    ///
    /// Signatures with `s` in the upper half of the curve order are
    /// rejected as invalid by policy, mirroring strict consensus-client
    /// verification.
    ///
    /// # Arguments
    /// * `digest` - The 32-byte message digest that was signed.
    /// * `sig` - The ECDSA signature to verify.
    ///
    /// # Returns
    /// `true` if the signature is valid and canonical, `false` otherwise.
    pub fn verify(&self, digest: &[u8; 32], sig: &Signature) -> bool {
        sig.verify(digest, self)
    }

    /// Construct a PublicKey from a k256 `VerifyingKey`.
    pub(crate) fn from_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: *vk }
    }

    /// Convert this public key to a k256 `ProjectivePoint` for EC arithmetic.
    pub(crate) fn to_projective_point(&self) -> Result<ProjectivePoint, PrimitivesError> {
        let encoded = self.inner.to_encoded_point(false);
        let ct_option = AffinePoint::from_encoded_point(&encoded);
        if bool::from(ct_option.is_some()) {
            Ok(ProjectivePoint::from(ct_option.unwrap()))
        } else {
            Err(PrimitivesError::InvalidPoint("point not on curve".to_string()))
        }
    }

    /// Access the underlying k256 `VerifyingKey`.
    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::PrivateKey;

    #[test]
    fn test_compressed_uncompressed_roundtrip() {
        let pk = PrivateKey::random();
        let pub_key = pk.pub_key();

        let compressed = pub_key.to_compressed();
        assert!(compressed[0] == 0x02 || compressed[0] == 0x03);
        assert_eq!(PublicKey::from_bytes(&compressed).unwrap(), pub_key);

        let uncompressed = pub_key.to_uncompressed();
        assert_eq!(uncompressed[0], 0x04);
        assert_eq!(PublicKey::from_bytes(&uncompressed).unwrap(), pub_key);
    }

    #[test]
    fn test_invalid_points_rejected() {
        // empty
        assert!(PublicKey::from_bytes(&[]).is_err());
        // x not on curve (compressed encoding of x = 5 with no square y... tampered)
        let mut bad = hex::decode(
            "0411db93e1dcdb8a016b49840f8c53bc1eb68a382e97b1482ecad7b148a6909a\
             5cb2e0eaddfb84ccf9744464f82e160bfa9b8b64f9d4c03f999b8643f656b412a3",
        )
        .unwrap();
        assert!(PublicKey::from_bytes(&bad).is_ok());
        bad[1] = 0x15; // perturb x
        assert!(PublicKey::from_bytes(&bad).is_err());
        // point at infinity encoding
        assert!(PublicKey::from_bytes(&[0x00]).is_err());
    }

    #[test]
    fn test_known_address() {
        let pk = PrivateKey::from_hex(
            "eaf02ca348c524e6392655ba4d29603cd1a7347d9d65cfe93ce1ebffdca22694",
        )
        .unwrap();
        assert_eq!(pk.pub_key().to_address(), "15un4Q6siC5CkRyvZG6mFHBZvHG6Qw9v9N");
    }

    #[test]
    fn test_x_only_strips_parity_byte() {
        let pk = PrivateKey::random();
        let pub_key = pk.pub_key();
        assert_eq!(pub_key.x_only()[..], pub_key.to_compressed()[1..]);
    }

    #[test]
    fn test_hex_roundtrip() {
        let pk = PrivateKey::random();
        let pub_key = pk.pub_key();
        assert_eq!(PublicKey::from_hex(&pub_key.to_hex()).unwrap(), pub_key);
    }
}
