//! Multi-chain wallet SDK - cryptographic primitives and key derivation.
//!
//! This crate provides the foundational building blocks every higher
//! layer of the wallet SDK (transaction signers, address formats,
//! hardware-wallet bridges) calls down into:
//! - Hash functions (SHA-256, SHA-256d, SHA-512, RIPEMD-160, Keccak-256, HMAC)
//! - Key stretching (PBKDF2-HMAC-SHA256/512)
//! - secp256k1 ECDSA with public-key recovery and BIP-340 Schnorr signatures
//! - Ed25519 EdDSA (RFC 8032)
//! - BIP-39 mnemonic generation, validation, and seed derivation
//! - BIP-32 hierarchical deterministic key trees with BIP-44 path semantics
//! - Base58Check and Bech32/Bech32m encoding

pub mod hash;
pub mod kdf;
pub mod base58;
pub mod bech32;
pub mod ec;
pub mod ed25519;
pub mod bip32;
pub mod bip39;

mod error;
pub use error::PrimitivesError;
