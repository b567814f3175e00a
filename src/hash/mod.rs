//! Hash function primitives for the wallet SDK.
//!
//! Provides SHA-256, double SHA-256, SHA-512, RIPEMD-160, Hash160,
//! Keccak-256, and HMAC variants used throughout the supported chains.
//!
//! Keccak-256 here is the original Keccak with 0x01 padding as used by
//! Ethereum, not the NIST-standardized SHA3-256 (0x06 padding). The two
//! are not interchangeable; every chain module in the SDK that hashes
//! addresses or transactions uses this original-padding variant.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// This is the standard Bitcoin-family hash used for Base58Check
/// checksums. Computes SHA-256(SHA-256(data)).
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte double-SHA-256 digest.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute SHA-512 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 64-byte SHA-512 digest.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 64];
    output.copy_from_slice(&result);
    output
}

/// Compute RIPEMD-160 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte RIPEMD-160 digest.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 20];
    output.copy_from_slice(&result);
    output
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// Used for legacy address generation from public keys and for
/// BIP-32 key fingerprints.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte Hash160 digest.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Compute Keccak-256 (original padding) hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute HMAC-SHA256 of the input data with the given key.
///
/// # Arguments
/// * `key` - The HMAC key bytes.
/// * `data` - The message bytes to authenticate.
///
/// # Returns
/// A 32-byte HMAC-SHA256 tag.
pub fn sha256_hmac(key: &[u8], data: &[u8]) -> [u8; 32] {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(key)
        .expect("HMAC accepts any key length");
    mac.update(data);
    let result = mac.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result.into_bytes());
    output
}

/// Compute HMAC-SHA512 of the input data with the given key.
///
/// # Arguments
/// * `key` - The HMAC key bytes.
/// * `data` - The message bytes to authenticate.
///
/// # Returns
/// A 64-byte HMAC-SHA512 tag.
pub fn sha512_hmac(key: &[u8], data: &[u8]) -> [u8; 64] {
    type HmacSha512 = Hmac<Sha512>;
    let mut mac = HmacSha512::new_from_slice(key)
        .expect("HMAC accepts any key length");
    mac.update(data);
    let result = mac.finalize();
    let mut output = [0u8; 64];
    output.copy_from_slice(&result.into_bytes());
    output
}

/// The closed set of hash functions exposed by this crate.
///
/// New algorithms are added as new variants so that every dispatch
/// site is an exhaustive match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashFunction {
    /// Original-padding Keccak-256 (Ethereum), 32-byte output.
    Keccak256,
    /// SHA-256, 32-byte output.
    Sha256,
    /// SHA-512, 64-byte output.
    Sha512,
    /// RIPEMD-160, 20-byte output.
    Ripemd160,
}

impl HashFunction {
    /// Digest size in bytes for this function.
    pub fn output_len(&self) -> usize {
        match self {
            HashFunction::Keccak256 | HashFunction::Sha256 => 32,
            HashFunction::Sha512 => 64,
            HashFunction::Ripemd160 => 20,
        }
    }

    /// Hash `data` in one shot.
    ///
    /// # Returns
    /// The digest, `output_len()` bytes long.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = Hasher::new(*self);
        hasher.update(data);
        hasher.finalize()
    }
}

/// Incremental hasher over the [`HashFunction`] set.
///
/// Large inputs should be fed in chunks via [`Hasher::update`] rather
/// than materialized in memory.
#[derive(Clone)]
pub enum Hasher {
    Keccak256(Keccak256),
    Sha256(Sha256),
    Sha512(Sha512),
    Ripemd160(Ripemd160),
}

impl Hasher {
    /// Create a fresh hasher for the given function.
    pub fn new(function: HashFunction) -> Self {
        match function {
            HashFunction::Keccak256 => Hasher::Keccak256(Keccak256::new()),
            HashFunction::Sha256 => Hasher::Sha256(Sha256::new()),
            HashFunction::Sha512 => Hasher::Sha512(Sha512::new()),
            HashFunction::Ripemd160 => Hasher::Ripemd160(Ripemd160::new()),
        }
    }

    /// Absorb more input.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Keccak256(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
            Hasher::Ripemd160(h) => h.update(data),
        }
    }

    /// Consume the hasher and produce the digest.
    pub fn finalize(self) -> Vec<u8> {
        match self {
            Hasher::Keccak256(h) => h.finalize().to_vec(),
            Hasher::Sha256(h) => h.finalize().to_vec(),
            Hasher::Sha512(h) => h.finalize().to_vec(),
            Hasher::Ripemd160(h) => h.finalize().to_vec(),
        }
    }
}
