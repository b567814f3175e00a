//! BIP-39 mnemonic generation and seed derivation.
//!
//! Provides mnemonic phrase generation from entropy, validation,
//! and PBKDF2-based seed derivation for HD wallet compatibility.
//!
//! Entropy sizes of 128 to 256 bits in 32-bit steps map to phrases of
//! 12 to 24 words. The phrase checksum is the leading bits of the
//! SHA-256 of the entropy, so a single transposed word is detected at
//! parse time.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::PrimitivesError;

/// Length in bytes of the seed derived from a mnemonic.
pub const SEED_LENGTH: usize = 64;

/// A validated BIP-39 mnemonic phrase (English wordlist).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mnemonic {
    inner: ::bip39::Mnemonic,
}

impl Mnemonic {
    /// Generate a new mnemonic from operating system randomness.
    ///
    /// # Arguments
    /// * `entropy_bits` - Entropy size in bits; one of 128, 160, 192,
    ///   224, or 256, giving 12 to 24 words.
    ///
    /// # Returns
    /// `Ok(Mnemonic)`, or [`PrimitivesError::InvalidEntropyLength`] for
    /// an unsupported size.
    pub fn generate(entropy_bits: usize) -> Result<Self, PrimitivesError> {
        Self::generate_with_rng(entropy_bits, &mut OsRng)
    }

    /// Generate a new mnemonic from a caller-supplied RNG.
    ///
    /// # Arguments
    /// * `entropy_bits` - Entropy size in bits (128..=256, step 32).
    /// * `rng` - A cryptographically secure random number generator.
    pub fn generate_with_rng<R: CryptoRng + RngCore>(
        entropy_bits: usize,
        rng: &mut R,
    ) -> Result<Self, PrimitivesError> {
        if !matches!(entropy_bits, 128 | 160 | 192 | 224 | 256) {
            return Err(PrimitivesError::InvalidEntropyLength { bits: entropy_bits });
        }
        let mut entropy = [0u8; 32];
        let len = entropy_bits / 8;
        rng.fill_bytes(&mut entropy[..len]);
        Self::from_entropy(&entropy[..len])
    }

    /// Build a mnemonic from raw entropy bytes.
    ///
    /// # Arguments
    /// * `entropy` - 16, 20, 24, 28, or 32 bytes of entropy.
    ///
    /// # Returns
    /// `Ok(Mnemonic)`, or [`PrimitivesError::InvalidEntropyLength`] for
    /// any other length.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self, PrimitivesError> {
        if !matches!(entropy.len(), 16 | 20 | 24 | 28 | 32) {
            return Err(PrimitivesError::InvalidEntropyLength {
                bits: entropy.len() * 8,
            });
        }
        let inner = ::bip39::Mnemonic::from_entropy(entropy)
            .map_err(|e| PrimitivesError::InvalidMnemonic(e.to_string()))?;
        Ok(Mnemonic { inner })
    }

    /// Parse and validate an existing phrase.
    ///
    /// Word count, wordlist membership, and the entropy checksum are
    /// all checked. Whitespace is normalized, so extra spaces between
    /// words are accepted.
    ///
    /// # Arguments
    /// * `phrase` - The space-separated mnemonic words.
    ///
    /// # Returns
    /// `Ok(Mnemonic)`, or [`PrimitivesError::InvalidMnemonic`] naming
    /// what failed.
    pub fn from_phrase(phrase: &str) -> Result<Self, PrimitivesError> {
        let inner = ::bip39::Mnemonic::parse(phrase)
            .map_err(|e| PrimitivesError::InvalidMnemonic(e.to_string()))?;
        Ok(Mnemonic { inner })
    }

    /// The space-separated phrase.
    pub fn phrase(&self) -> String {
        self.inner.to_string()
    }

    /// Number of words in the phrase (12, 15, 18, 21, or 24).
    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// The underlying entropy the phrase encodes.
    pub fn to_entropy(&self) -> Vec<u8> {
        self.inner.to_entropy()
    }

    /// Derive the 64-byte seed for HD key derivation.
    ///
    /// Runs PBKDF2-HMAC-SHA512 for 2048 rounds over the
    /// NFKD-normalized phrase, salted with `"mnemonic" + passphrase`.
    ///
    /// # Arguments
    /// * `passphrase` - Optional protection passphrase; pass `""` for
    ///   the standard unprotected seed.
    pub fn to_seed(&self, passphrase: &str) -> [u8; SEED_LENGTH] {
        self.inner.to_seed(passphrase)
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::str::FromStr for Mnemonic {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_phrase(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TV_PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    /// Trezor reference vector: all-zero 128-bit entropy.
    #[test]
    fn test_zero_entropy_vector() {
        let mnemonic = Mnemonic::from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(mnemonic.phrase(), TV_PHRASE);
        assert_eq!(mnemonic.word_count(), 12);
        assert_eq!(mnemonic.to_entropy(), vec![0u8; 16]);
    }

    /// Trezor reference vector: seed derivation with and without passphrase.
    #[test]
    fn test_seed_vectors() {
        let mnemonic = Mnemonic::from_phrase(TV_PHRASE).unwrap();

        assert_eq!(
            hex::encode(mnemonic.to_seed("")),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
        assert_eq!(
            hex::encode(mnemonic.to_seed("TREZOR")),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553\
             1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    /// A swapped word breaks the checksum.
    #[test]
    fn test_checksum_detects_tampering() {
        let tampered =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about abandon";
        assert!(Mnemonic::from_phrase(tampered).is_err());
    }

    #[test]
    fn test_unknown_word_rejected() {
        let bad =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon zzzz";
        assert!(Mnemonic::from_phrase(bad).is_err());
    }

    #[test]
    fn test_bad_word_count_rejected() {
        assert!(Mnemonic::from_phrase("abandon abandon abandon").is_err());
    }

    #[test]
    fn test_entropy_lengths() {
        for (bytes, words) in [(16, 12), (20, 15), (24, 18), (28, 21), (32, 24)] {
            let mnemonic = Mnemonic::from_entropy(&vec![0x7fu8; bytes]).unwrap();
            assert_eq!(mnemonic.word_count(), words);
            assert_eq!(mnemonic.to_entropy().len(), bytes);
        }
        assert!(Mnemonic::from_entropy(&[0u8; 17]).is_err());
        assert!(Mnemonic::from_entropy(&[0u8; 12]).is_err());
    }

    #[test]
    fn test_generate_bits_validation() {
        assert!(Mnemonic::generate(128).is_ok());
        assert!(Mnemonic::generate(256).is_ok());
        assert!(Mnemonic::generate(100).is_err());
        assert!(Mnemonic::generate(512).is_err());
    }

    /// Seeded RNG generation is reproducible and round-trips through the phrase.
    #[test]
    fn test_generate_with_rng_roundtrip() {
        let mut rng1 = StdRng::seed_from_u64(11);
        let mut rng2 = StdRng::seed_from_u64(11);
        let a = Mnemonic::generate_with_rng(192, &mut rng1).unwrap();
        let b = Mnemonic::generate_with_rng(192, &mut rng2).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.word_count(), 18);

        let reparsed = Mnemonic::from_phrase(&a.phrase()).unwrap();
        assert_eq!(reparsed.to_entropy(), a.to_entropy());
    }
}
