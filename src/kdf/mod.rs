//! Key-stretching primitives.
//!
//! PBKDF2 over HMAC-SHA256/SHA-512 with arbitrary output length via the
//! standard block-counter expansion. BIP-39 seed derivation fixes the
//! SHA-512 variant at 2048 iterations with a "mnemonic" salt prefix;
//! both knobs stay caller-controlled here so other consumers (keystore
//! formats, legacy imports) can reuse the same primitive.

use sha2::{Sha256, Sha512};

/// PBKDF2 iteration count mandated by BIP-39 for mnemonic-to-seed.
pub const BIP39_ROUNDS: u32 = 2048;

/// Derive `output_len` bytes from a password with PBKDF2-HMAC-SHA512.
///
/// # Arguments
/// * `password` - The secret input (e.g. a normalized mnemonic sentence).
/// * `salt` - The salt bytes.
/// * `rounds` - Iteration count; BIP-39 uses [`BIP39_ROUNDS`].
/// * `output_len` - Number of bytes to produce.
///
/// # Returns
/// `output_len` derived bytes.
pub fn pbkdf2_hmac_sha512(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    output_len: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; output_len];
    pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, rounds, &mut out);
    out
}

/// Derive `output_len` bytes from a password with PBKDF2-HMAC-SHA256.
///
/// # Arguments
/// * `password` - The secret input.
/// * `salt` - The salt bytes.
/// * `rounds` - Iteration count.
/// * `output_len` - Number of bytes to produce.
///
/// # Returns
/// `output_len` derived bytes.
pub fn pbkdf2_hmac_sha256(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    output_len: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; output_len];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pbkdf2_sha512_one_round() {
        let out = pbkdf2_hmac_sha512(b"password", b"salt", 1, 64);
        assert_eq!(
            hex::encode(out),
            "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252\
             c02d470a285a0501bad999bfe943c08f050235d7d68b1da55e63f73b60a57fce"
        );
    }

    #[test]
    fn test_pbkdf2_sha512_two_rounds() {
        let out = pbkdf2_hmac_sha512(b"password", b"salt", 2, 64);
        assert_eq!(
            hex::encode(out),
            "e1d9c16aa681708a45f5c7c4e215ceb66e011a2e9f0040713f18aefdb866d53c\
             f76cab2868a39b9f7840edce4fef5a82be67335c77a6068e04112754f27ccf4e"
        );
    }

    #[test]
    fn test_pbkdf2_bip39_seed() {
        // The BIP-39 reference vector for the zero-entropy mnemonic with an
        // empty passphrase, reproduced here through the raw KDF.
        let phrase = "abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon about";
        let seed = pbkdf2_hmac_sha512(phrase.as_bytes(), b"mnemonic", BIP39_ROUNDS, 64);
        assert_eq!(
            hex::encode(seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_pbkdf2_arbitrary_output_length() {
        // Output longer than one HMAC block forces counter expansion; the
        // first block must be a prefix of the longer output.
        let short = pbkdf2_hmac_sha256(b"password", b"salt", 8, 20);
        let long = pbkdf2_hmac_sha256(b"password", b"salt", 8, 100);
        assert_eq!(short[..], long[..20]);
        assert_eq!(long.len(), 100);
    }
}
