//! BIP-32 hierarchical deterministic key derivation.
//!
//! Extended keys carry a secp256k1 key plus a 32-bit chain code and
//! positional metadata (depth, parent fingerprint, child number).
//! Private nodes derive both hardened and normal children; public
//! nodes derive normal children only, and the two derivations agree:
//! deriving then converting to public equals converting then deriving,
//! for every non-hardened path.
//!
//! Serialization uses the standard `xprv`/`xpub` Base58Check format.

mod path;

pub use path::DerivationPath;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::{Group, PrimeField};
use k256::{FieldBytes, ProjectivePoint, Scalar};

use crate::base58;
use crate::ec::{PrivateKey, PublicKey};
use crate::hash::{hash160, sha512_hmac};
use crate::PrimitivesError;

/// First hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Mainnet extended private key version bytes ("xprv").
const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];

/// Mainnet extended public key version bytes ("xpub").
const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

/// HMAC key for master key generation, fixed by the standard.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Serialized extended key length before the Base58Check checksum.
const EXTENDED_KEY_LEN: usize = 78;

/// An extended private key: a key, a chain code, and its place in the tree.
#[derive(Clone, Debug)]
pub struct ExtendedPrivateKey {
    key: PrivateKey,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedPrivateKey {
    /// Build the master key from a seed.
    ///
    /// Computes HMAC-SHA512 keyed on `"Bitcoin seed"` over the seed;
    /// the left half is the key and the right half the chain code.
    ///
    /// # Arguments
    /// * `seed` - Seed bytes, 16 to 64 bytes (commonly the 64-byte
    ///   BIP-39 seed).
    ///
    /// # Returns
    /// `Ok(ExtendedPrivateKey)`, or [`PrimitivesError::InvalidMasterKey`]
    /// if the seed length is out of range or the left half falls
    /// outside the valid scalar range (probability ~2^-127).
    pub fn master_from_seed(seed: &[u8]) -> Result<Self, PrimitivesError> {
        if seed.len() < 16 || seed.len() > 64 {
            return Err(PrimitivesError::InvalidMasterKey);
        }

        let i = sha512_hmac(MASTER_HMAC_KEY, seed);
        let (il, ir) = i.split_at(32);

        let key = PrivateKey::from_bytes(il).map_err(|_| PrimitivesError::InvalidMasterKey)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);

        Ok(ExtendedPrivateKey {
            key,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
        })
    }

    /// Derive a BIP-39 mnemonic into its master key.
    ///
    /// # Arguments
    /// * `mnemonic` - A validated mnemonic phrase.
    /// * `passphrase` - Optional protection passphrase (`""` for none).
    pub fn from_mnemonic(
        mnemonic: &crate::bip39::Mnemonic,
        passphrase: &str,
    ) -> Result<Self, PrimitivesError> {
        Self::master_from_seed(&mnemonic.to_seed(passphrase))
    }

    /// The private key at this node.
    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    /// The public key at this node.
    pub fn public_key(&self) -> PublicKey {
        self.key.pub_key()
    }

    /// The chain code at this node.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth of this node in the tree (0 for the master key).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The child number this node was derived with.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// First four bytes of this node's public key hash160.
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint(&self.public_key())
    }

    /// Derive one child key.
    ///
    /// Indices at or above [`HARDENED_OFFSET`] derive hardened
    /// children from the private key bytes; lower indices derive
    /// normal children from the compressed public key.
    ///
    /// # Arguments
    /// * `index` - Raw child index, hardened bit included.
    ///
    /// # Returns
    /// `Ok(ExtendedPrivateKey)`;
    /// [`PrimitivesError::InvalidChildKey`] for the
    /// negligible-probability invalid indices the standard tells
    /// callers to skip, [`PrimitivesError::MaxDepthExceeded`] when the
    /// parent already sits at depth 255.
    pub fn derive_child(&self, index: u32) -> Result<Self, PrimitivesError> {
        // The serialized depth field is one byte; a child of a depth-255
        // node could not be represented and must not wrap to 0.
        if self.depth == u8::MAX {
            return Err(PrimitivesError::MaxDepthExceeded);
        }

        let mut data = Vec::with_capacity(37);
        if index >= HARDENED_OFFSET {
            data.push(0x00);
            data.extend_from_slice(&self.key.to_bytes());
        } else {
            data.extend_from_slice(&self.public_key().to_compressed());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let i = sha512_hmac(&self.chain_code, &data);
        let (il, ir) = i.split_at(32);

        // IL must be a valid scalar below the curve order.
        let tweak: Scalar = Option::from(Scalar::from_repr(*FieldBytes::from_slice(il)))
            .ok_or(PrimitivesError::InvalidChildKey { index })?;

        let child_scalar = tweak + self.key.to_scalar();
        let child_key = PrivateKey::from_scalar(child_scalar)
            .map_err(|_| PrimitivesError::InvalidChildKey { index })?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);

        Ok(ExtendedPrivateKey {
            key: child_key,
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint: self.fingerprint(),
            child_number: index,
        })
    }

    /// Derive along a full path from this node.
    ///
    /// # Arguments
    /// * `path` - The derivation path; the empty path returns a clone
    ///   of this node.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, PrimitivesError> {
        let mut node = self.clone();
        for &index in path.indices() {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }

    /// The extended public key for this node.
    ///
    /// The chain code and positional metadata carry over unchanged, so
    /// the result derives the same non-hardened children.
    pub fn to_extended_public_key(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            key: self.public_key(),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
        }
    }

    /// Serialize as an `xprv` Base58Check string.
    pub fn to_string_xprv(&self) -> String {
        let mut data = Vec::with_capacity(EXTENDED_KEY_LEN);
        data.extend_from_slice(&XPRV_VERSION);
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_number.to_be_bytes());
        data.extend_from_slice(&self.chain_code);
        data.push(0x00);
        data.extend_from_slice(&self.key.to_bytes());
        base58::check_encode(&data)
    }

    /// Parse an `xprv` Base58Check string.
    ///
    /// # Arguments
    /// * `s` - The serialized extended private key.
    ///
    /// # Returns
    /// `Ok(ExtendedPrivateKey)`, or an error for a bad checksum, wrong
    /// length, wrong version bytes, or an out-of-range key.
    pub fn from_string_xprv(s: &str) -> Result<Self, PrimitivesError> {
        let data = base58::check_decode(s)?;
        if data.len() != EXTENDED_KEY_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: EXTENDED_KEY_LEN,
                got: data.len(),
            });
        }
        if data[..4] != XPRV_VERSION {
            return Err(PrimitivesError::InvalidScalar(
                "not an extended private key".to_string(),
            ));
        }
        if data[45] != 0x00 {
            return Err(PrimitivesError::InvalidScalar(
                "missing private key padding byte".to_string(),
            ));
        }

        let key = PrivateKey::from_bytes(&data[46..78])?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let child_number = u32::from_be_bytes(data[9..13].try_into().unwrap());

        Ok(ExtendedPrivateKey {
            key,
            chain_code,
            depth: data[4],
            parent_fingerprint,
            child_number,
        })
    }
}

/// An extended public key for watch-only, non-hardened derivation.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtendedPublicKey {
    key: PublicKey,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedPublicKey {
    /// The public key at this node.
    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }

    /// The chain code at this node.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth of this node in the tree (0 for the master key).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The child number this node was derived with.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// First four bytes of this node's public key hash160.
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint(&self.key)
    }

    /// Derive one non-hardened child.
    ///
    /// # Arguments
    /// * `index` - Child index below [`HARDENED_OFFSET`].
    ///
    /// # Returns
    /// `Ok(ExtendedPublicKey)`;
    /// [`PrimitivesError::PrivateKeyRequired`] for a hardened index,
    /// [`PrimitivesError::InvalidChildKey`] for the
    /// negligible-probability invalid indices,
    /// [`PrimitivesError::MaxDepthExceeded`] when the parent already
    /// sits at depth 255.
    pub fn derive_child(&self, index: u32) -> Result<Self, PrimitivesError> {
        if index >= HARDENED_OFFSET {
            return Err(PrimitivesError::PrivateKeyRequired);
        }
        if self.depth == u8::MAX {
            return Err(PrimitivesError::MaxDepthExceeded);
        }

        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&self.key.to_compressed());
        data.extend_from_slice(&index.to_be_bytes());

        let i = sha512_hmac(&self.chain_code, &data);
        let (il, ir) = i.split_at(32);

        let tweak: Scalar = Option::from(Scalar::from_repr(*FieldBytes::from_slice(il)))
            .ok_or(PrimitivesError::InvalidChildKey { index })?;

        let parent_point = self.key.to_projective_point()?;
        let child_point = ProjectivePoint::GENERATOR * tweak + parent_point;
        if bool::from(child_point.is_identity()) {
            return Err(PrimitivesError::InvalidChildKey { index });
        }

        let encoded = child_point.to_affine().to_encoded_point(true);
        let child_key = PublicKey::from_bytes(encoded.as_bytes())?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);

        Ok(ExtendedPublicKey {
            key: child_key,
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint: self.fingerprint(),
            child_number: index,
        })
    }

    /// Derive along a full non-hardened path from this node.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, PrimitivesError> {
        let mut node = self.clone();
        for &index in path.indices() {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }

    /// Serialize as an `xpub` Base58Check string.
    pub fn to_string_xpub(&self) -> String {
        let mut data = Vec::with_capacity(EXTENDED_KEY_LEN);
        data.extend_from_slice(&XPUB_VERSION);
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_number.to_be_bytes());
        data.extend_from_slice(&self.chain_code);
        data.extend_from_slice(&self.key.to_compressed());
        base58::check_encode(&data)
    }

    /// Parse an `xpub` Base58Check string.
    ///
    /// # Arguments
    /// * `s` - The serialized extended public key.
    pub fn from_string_xpub(s: &str) -> Result<Self, PrimitivesError> {
        let data = base58::check_decode(s)?;
        if data.len() != EXTENDED_KEY_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: EXTENDED_KEY_LEN,
                got: data.len(),
            });
        }
        if data[..4] != XPUB_VERSION {
            return Err(PrimitivesError::InvalidPoint(
                "not an extended public key".to_string(),
            ));
        }

        let key = PublicKey::from_bytes(&data[45..78])?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let child_number = u32::from_be_bytes(data[9..13].try_into().unwrap());

        Ok(ExtendedPublicKey {
            key,
            chain_code,
            depth: data[4],
            parent_fingerprint,
            child_number,
        })
    }
}

fn fingerprint(pub_key: &PublicKey) -> [u8; 4] {
    let h160 = hash160(&pub_key.to_compressed());
    let mut out = [0u8; 4];
    out.copy_from_slice(&h160[..4]);
    out
}
