//! Ed25519 signing and verification (RFC 8032).
//!
//! Keys derive deterministically from a 32-byte seed; signatures are a
//! fixed 64 bytes. Verification uses the strict rules, rejecting
//! non-canonical scalars and small-order components that the original
//! RFC verification equation would let through.

use ed25519_dalek::hazmat::ExpandedSecretKey;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::PrimitivesError;

/// Length of an Ed25519 seed, public key, and signature half in bytes.
pub const SEED_LENGTH: usize = 32;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 private key, held as its 32-byte seed.
///
/// The expanded scalar and prefix are derived on demand by the signing
/// routine; only the seed is stored, and it is wiped on drop.
pub struct Ed25519PrivateKey {
    inner: SigningKey,
}

impl Ed25519PrivateKey {
    /// Generate a new private key from the operating system RNG.
    pub fn random() -> Self {
        Self::random_with_rng(&mut OsRng)
    }

    /// Generate a new private key from a caller-supplied RNG.
    ///
    /// # Arguments
    /// * `rng` - A cryptographically secure random number generator.
    pub fn random_with_rng<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        let mut seed = [0u8; SEED_LENGTH];
        rng.fill_bytes(&mut seed);
        let key = Ed25519PrivateKey {
            inner: SigningKey::from_bytes(&seed),
        };
        seed.zeroize();
        key
    }

    /// Build a private key from a 32-byte seed.
    ///
    /// Every 32-byte string is a valid seed; key clamping happens
    /// inside the derivation, so this cannot fail for correct lengths.
    ///
    /// # Arguments
    /// * `seed` - The 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        Ed25519PrivateKey {
            inner: SigningKey::from_bytes(seed),
        }
    }

    /// Build a private key from a seed given as a byte slice.
    ///
    /// # Arguments
    /// * `bytes` - Seed bytes, must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(Ed25519PrivateKey)`, or [`PrimitivesError::InvalidKeyLength`]
    /// for any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let seed: [u8; SEED_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| PrimitivesError::InvalidKeyLength {
                    expected: SEED_LENGTH,
                    got: bytes.len(),
                })?;
        Ok(Self::from_seed(&seed))
    }

    /// Build a private key from a hex-encoded seed.
    ///
    /// # Arguments
    /// * `hex_str` - 64 hex characters encoding the seed.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// The 32-byte seed this key was built from.
    pub fn to_bytes(&self) -> [u8; SEED_LENGTH] {
        self.inner.to_bytes()
    }

    /// The corresponding public key.
    pub fn pub_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// The expanded secret derived from the seed: the clamped signing
    /// scalar (in canonical form, reduced mod the group order) and the
    /// 32-byte hash prefix that seeds deterministic nonces.
    ///
    /// The scalar is what multiplies the base point to give the public
    /// key; derivation layers and hardware bridges that operate on key
    /// halves rather than seeds consume these directly.
    ///
    /// # Returns
    /// `(scalar, hash_prefix)`, both 32 bytes little-endian.
    pub fn expanded_secret(&self) -> ([u8; 32], [u8; 32]) {
        let expanded = ExpandedSecretKey::from(&self.inner.to_bytes());
        (expanded.scalar.to_bytes(), expanded.hash_prefix)
    }

    /// Sign a message of any length.
    ///
    /// Ed25519 hashes internally, so the message is passed whole rather
    /// than pre-digested.
    ///
    /// # Arguments
    /// * `msg` - The message bytes to sign.
    ///
    /// # Returns
    /// The 64-byte signature.
    pub fn sign(&self, msg: &[u8]) -> Ed25519Signature {
        Ed25519Signature {
            inner: self.inner.sign(msg),
        }
    }
}

impl std::fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the seed.
        write!(f, "Ed25519PrivateKey({})", self.pub_key().to_hex())
    }
}

impl Clone for Ed25519PrivateKey {
    fn clone(&self) -> Self {
        Ed25519PrivateKey {
            inner: SigningKey::from_bytes(&self.inner.to_bytes()),
        }
    }
}

/// An Ed25519 public key (32-byte compressed Edwards point).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    inner: VerifyingKey,
}

impl Ed25519PublicKey {
    /// Parse a public key from its 32-byte compressed encoding.
    ///
    /// # Arguments
    /// * `bytes` - The 32-byte encoded point.
    ///
    /// # Returns
    /// `Ok(Ed25519PublicKey)`, or [`PrimitivesError::InvalidPoint`] if
    /// the bytes do not decode to a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| PrimitivesError::InvalidKeyLength {
                expected: 32,
                got: bytes.len(),
            })?;
        let inner = VerifyingKey::from_bytes(&arr)
            .map_err(|e| PrimitivesError::InvalidPoint(e.to_string()))?;
        Ok(Ed25519PublicKey { inner })
    }

    /// Parse a public key from hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// The 32-byte compressed encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }

    /// Hex encoding of the compressed point.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verify a signature over a message.
    ///
    /// Uses strict verification: non-canonical `s` values and
    /// small-order points are rejected.
    ///
    /// # Arguments
    /// * `msg` - The message bytes that were signed.
    /// * `sig` - The signature to check.
    ///
    /// # Returns
    /// `true` if the signature is valid, `false` otherwise.
    pub fn verify(&self, msg: &[u8], sig: &Ed25519Signature) -> bool {
        self.inner.verify_strict(msg, &sig.inner).is_ok()
    }
}

/// A 64-byte Ed25519 signature `R || s`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ed25519Signature {
    inner: ed25519_dalek::Signature,
}

impl Ed25519Signature {
    /// Parse a signature from its 64-byte encoding.
    ///
    /// Length is the only check applied here; validity is decided at
    /// verification time.
    ///
    /// # Arguments
    /// * `bytes` - The 64-byte `R || s` encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; SIGNATURE_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| PrimitivesError::InvalidSignature(format!(
                    "invalid ed25519 signature size {}",
                    bytes.len()
                )))?;
        Ok(Ed25519Signature {
            inner: ed25519_dalek::Signature::from_bytes(&arr),
        })
    }

    /// Parse a signature from hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// The 64-byte signature encoding.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.inner.to_bytes()
    }

    /// Hex encoding of the signature.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}
