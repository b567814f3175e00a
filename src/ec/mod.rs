/// Elliptic curve cryptography on secp256k1.
///
/// Provides private keys, public keys, ECDSA signatures with public-key
/// recovery, ECDH shared secrets, and BIP-340 Schnorr signatures.

pub mod private_key;
pub mod public_key;
pub mod schnorr;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
