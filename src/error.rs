/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, curve operations, mnemonic handling,
/// HD derivation, and the text encoding layers. Signature verification
/// is never an error: `verify` returns a definite `bool` for any
/// well-formed input.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    #[error("invalid curve point: {0}")]
    InvalidPoint(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("invalid entropy length: {bits} bits (expected 128, 160, 192, 224, or 256)")]
    InvalidEntropyLength { bits: usize },

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("seed produced an invalid master key")]
    InvalidMasterKey,

    #[error("derivation at index {index} produced an invalid child key")]
    InvalidChildKey { index: u32 },

    #[error("derivation would exceed the maximum tree depth of 255")]
    MaxDepthExceeded,

    #[error("hardened derivation requires the parent private key")]
    PrivateKeyRequired,

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid character in encoded string: {0}")]
    InvalidCharacter(String),

    #[error("invalid bech32 checksum")]
    InvalidChecksum,

    #[error("mixed-case bech32 string")]
    MixedCase,

    #[error("invalid human-readable part: {0}")]
    InvalidHrp(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
