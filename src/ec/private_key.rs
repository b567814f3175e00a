//! secp256k1 private key with wallet-specific functionality.
//!
//! Wraps a k256 signing key and adds WIF encoding, RFC 6979 deterministic
//! signing with recovery support, and ECDH shared secret computation.

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::Scalar;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::base58;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// A secp256k1 private key for signing and key derivation.
///
/// Wraps a k256 `SigningKey`, which enforces the scalar-range invariant
/// `0 < scalar < n` on construction. Provides WIF serialization, ECDH
/// shared secrets, and RFC 6979 deterministic ECDSA.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    /// The underlying k256 signing key.
    inner: SigningKey,
}

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Mainnet WIF prefix byte.
const MAINNET_WIF_PREFIX: u8 = 0x80;

/// Compression flag byte appended to WIF for compressed public keys.
const COMPRESS_MAGIC: u8 = 0x01;

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    ///
    /// # Returns
    /// A new randomly generated `PrivateKey`.
    pub fn random() -> Self {
        Self::random_with_rng(&mut OsRng)
    }

    /// Generate a new random private key from a caller-supplied secure RNG.
    ///
    /// Lets tests and embedders inject deterministic randomness instead of
    /// the process-wide OS source.
    ///
    /// # Arguments
    /// * `rng` - A cryptographically secure random number generator.
    ///
    /// # Returns
    /// A new randomly generated `PrivateKey`.
    pub fn random_with_rng<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        PrivateKey {
            inner: SigningKey::random(rng),
        }
    }

    /// Create a private key from a raw 32-byte scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte big-endian scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes are a valid secp256k1 scalar, or
    /// [`PrimitivesError::InvalidScalar`] if the scalar is zero or not
    /// below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PRIVATE_KEY_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let signing_key = SigningKey::from_bytes(k256::FieldBytes::from_slice(bytes))
            .map_err(|e| PrimitivesError::InvalidScalar(e.to_string()))?;
        Ok(PrivateKey { inner: signing_key })
    }

    /// Create a private key from a hexadecimal string.
    ///
    /// # Arguments
    /// * `hex_str` - A 64-character hex string representing the 32-byte scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, or an error if the hex or scalar is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidScalar(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Create a private key from a WIF (Wallet Import Format) string.
    ///
    /// Decodes the Base58Check-encoded string, validates the checksum,
    /// and extracts the 32-byte private key scalar.
    ///
    /// # Arguments
    /// * `wif` - A Base58Check-encoded WIF string (compressed or uncompressed).
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, or an error if the WIF is malformed
    /// or the checksum fails.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        let decoded = base58::decode(wif)
            .map_err(|e| PrimitivesError::InvalidWif(e.to_string()))?;
        let decoded_len = decoded.len();

        // 1 byte prefix + 32 bytes key + 1 byte compress flag + 4 byte checksum = 38
        // 1 byte prefix + 32 bytes key + 4 byte checksum = 37
        let is_compressed = match decoded_len {
            38 => {
                if decoded[33] != COMPRESS_MAGIC {
                    return Err(PrimitivesError::InvalidWif(
                        "malformed private key: invalid compression flag".to_string(),
                    ));
                }
                true
            }
            37 => false,
            _ => {
                return Err(PrimitivesError::InvalidWif(format!(
                    "malformed private key: invalid length {}",
                    decoded_len
                )));
            }
        };

        let payload_end = if is_compressed {
            1 + PRIVATE_KEY_BYTES_LEN + 1
        } else {
            1 + PRIVATE_KEY_BYTES_LEN
        };
        let checksum = crate::hash::sha256d(&decoded[..payload_end]);
        if checksum[..4] != decoded[decoded_len - 4..] {
            return Err(PrimitivesError::ChecksumMismatch);
        }

        Self::from_bytes(&decoded[1..1 + PRIVATE_KEY_BYTES_LEN])
    }

    /// Encode the private key as a WIF string with the mainnet prefix (0x80).
    ///
    /// Always encodes for compressed public key format.
    ///
    /// # Returns
    /// A Base58Check-encoded WIF string.
    pub fn to_wif(&self) -> String {
        self.to_wif_prefix(MAINNET_WIF_PREFIX)
    }

    /// Encode the private key as a WIF string with a custom network prefix.
    ///
    /// # Arguments
    /// * `prefix` - The network prefix byte (0x80 for mainnet, 0xef for testnet).
    ///
    /// # Returns
    /// A Base58Check-encoded WIF string.
    pub fn to_wif_prefix(&self, prefix: u8) -> String {
        let key_bytes = self.to_bytes();
        let mut payload = Vec::with_capacity(1 + PRIVATE_KEY_BYTES_LEN + 1);
        payload.push(prefix);
        payload.extend_from_slice(&key_bytes);
        payload.push(COMPRESS_MAGIC); // always compressed
        base58::check_encode(&payload)
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Serialize the private key as a lowercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the corresponding public key for this private key.
    ///
    /// # Returns
    /// The `PublicKey` at `scalar * G`.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte message digest using deterministic RFC 6979 nonces.
    ///
    /// Produces a low-S normalized signature with a recovery id; the
    /// public key can be recovered from `(r, s, recovery_id, digest)` alone.
    ///
    /// # Arguments
    /// * `digest` - The 32-byte message digest to sign.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if signing fails.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(digest, self)
    }

    /// Compute an ECDH shared secret with another public key.
    ///
    /// Multiplies the other party's public key by this private key's
    /// scalar, producing a shared EC point.
    ///
    /// # Arguments
    /// * `pub_key` - The other party's public key.
    ///
    /// # Returns
    /// `Ok(PublicKey)` representing the shared secret point, or an error
    /// if the supplied public key is not on the curve.
    pub fn shared_secret(&self, pub_key: &PublicKey) -> Result<PublicKey, PrimitivesError> {
        let their_point = pub_key.to_projective_point()?;
        let shared_point = their_point * self.to_scalar();

        let affine = shared_point.to_affine();
        let encoded = affine.to_encoded_point(true);
        PublicKey::from_bytes(encoded.as_bytes())
    }

    /// Access the underlying k256 `SigningKey`.
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }

    /// Convert the private key to a k256 `Scalar` for arithmetic operations.
    pub(crate) fn to_scalar(&self) -> Scalar {
        *self.inner.as_nonzero_scalar().as_ref()
    }

    /// Build a private key directly from a nonzero scalar.
    pub(crate) fn from_scalar(scalar: Scalar) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&scalar.to_bytes())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "eaf02ca348c524e6392655ba4d29603cd1a7347d9d65cfe93ce1ebffdca22694";

    /// The wrapped signing key must wipe its scalar when dropped.
    #[test]
    fn test_inner_key_zeroizes_on_drop() {
        fn assert_zeroize_on_drop<T: zeroize::ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<SigningKey>();
    }

    /// Basic generation, serialization, and signing round-trip.
    #[test]
    fn test_priv_keys() {
        let priv_key = PrivateKey::from_hex(KEY_HEX).unwrap();
        let pub_key = priv_key.pub_key();

        assert_eq!(
            pub_key.to_hex(),
            "025ceeba2ab4a635df2c0301a3d773da06ac5a18a7c3e0d09a795d7e57d233edf1"
        );

        let digest = crate::hash::sha256(b"derive and sign");
        let sig = priv_key.sign(&digest).unwrap();
        assert!(sig.verify(&digest, &pub_key));

        assert_eq!(priv_key.to_hex(), KEY_HEX);
    }

    #[test]
    fn test_rejects_zero_and_overflow_scalars() {
        assert!(matches!(
            PrivateKey::from_bytes(&[0u8; 32]),
            Err(PrimitivesError::InvalidScalar(_))
        ));
        // The curve order itself is out of range.
        let order =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap();
        assert!(PrivateKey::from_bytes(&order).is_err());
        // One below the order is the largest valid scalar.
        let max =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140")
                .unwrap();
        assert!(PrivateKey::from_bytes(&max).is_ok());
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            PrivateKey::from_bytes(&[1u8; 31]),
            Err(PrimitivesError::InvalidKeyLength { expected: 32, got: 31 })
        ));
    }

    /// Serialization round-trips via bytes, hex, and WIF.
    #[test]
    fn test_private_key_serialization_and_deserialization() {
        let pk = PrivateKey::random();

        let serialized = pk.to_bytes();
        let deserialized = PrivateKey::from_bytes(&serialized).unwrap();
        assert_eq!(pk, deserialized);

        let hex_str = pk.to_hex();
        let deserialized = PrivateKey::from_hex(&hex_str).unwrap();
        assert_eq!(pk, deserialized);

        let wif = pk.to_wif();
        let deserialized = PrivateKey::from_wif(&wif).unwrap();
        assert_eq!(pk, deserialized);
    }

    #[test]
    fn test_wif_known_vector() {
        let pk = PrivateKey::from_hex(KEY_HEX).unwrap();
        assert_eq!(
            pk.to_wif(),
            "L56Q9sRtxUT1ax8rmxFVgJtggRw7VNqFKD2gynbabhNPgAL4Qpix"
        );
        let back = PrivateKey::from_wif("L56Q9sRtxUT1ax8rmxFVgJtggRw7VNqFKD2gynbabhNPgAL4Qpix")
            .unwrap();
        assert_eq!(back.to_hex(), KEY_HEX);
    }

    #[test]
    fn test_private_key_from_invalid_wif() {
        // modified character
        assert!(PrivateKey::from_wif("L401GXuUSHauk19f9Cfpm1qfSXZuGLBUAC2VZM6vdmfMxRxAYkWq").is_err());
        // truncated
        assert!(PrivateKey::from_wif("L4o1GXuUSHauk19f9Cfpm1qfSXZuGLBUAC2VZM6vdmfMxRxAYkW").is_err());
    }

    #[test]
    fn test_shared_secret_is_symmetric() {
        let a = PrivateKey::random();
        let b = PrivateKey::random();
        let ab = a.shared_secret(&b.pub_key()).unwrap();
        let ba = b.shared_secret(&a.pub_key()).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_injected_rng_is_deterministic() {
        use rand::SeedableRng;
        let mut rng1 = rand::rngs::StdRng::seed_from_u64(7);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(7);
        let k1 = PrivateKey::random_with_rng(&mut rng1);
        let k2 = PrivateKey::random_with_rng(&mut rng2);
        assert_eq!(k1, k2);
    }
}
