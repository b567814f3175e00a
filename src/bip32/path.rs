//! Derivation path parsing and formatting.

use std::fmt;
use std::str::FromStr;

use crate::bip32::HARDENED_OFFSET;
use crate::PrimitivesError;

/// A BIP-32 derivation path such as `m/44'/0'/0'/0/0`.
///
/// Each component is the raw child index; hardened components carry
/// the high bit (`index + 0x80000000`). Both `'` and `h` are accepted
/// as hardened markers when parsing, and `'` is used when formatting.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DerivationPath {
    children: Vec<u32>,
}

impl DerivationPath {
    /// The empty path `m`, addressing the master key itself.
    pub fn master() -> Self {
        DerivationPath::default()
    }

    /// Build a path from raw child indices (hardened bit included).
    pub fn from_indices(children: Vec<u32>) -> Self {
        DerivationPath { children }
    }

    /// The standard BIP-44 account path `m/44'/coin'/account'/change/index`.
    ///
    /// # Arguments
    /// * `coin_type` - Registered coin type (0 for Bitcoin, 60 for
    ///   Ethereum, 501 for Solana, and so on).
    /// * `account` - Account number, hardened.
    /// * `change` - 0 for external addresses, 1 for change.
    /// * `index` - Address index within the chain.
    pub fn bip44(coin_type: u32, account: u32, change: u32, index: u32) -> Self {
        DerivationPath {
            children: vec![
                44 | HARDENED_OFFSET,
                coin_type | HARDENED_OFFSET,
                account | HARDENED_OFFSET,
                change,
                index,
            ],
        }
    }

    /// The child indices in derivation order.
    pub fn indices(&self) -> &[u32] {
        &self.children
    }

    /// Number of components in the path.
    pub fn depth(&self) -> usize {
        self.children.len()
    }

    /// Extend the path by one child index.
    pub fn child(&self, index: u32) -> Self {
        let mut children = self.children.clone();
        children.push(index);
        DerivationPath { children }
    }
}

impl FromStr for DerivationPath {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');

        match parts.next() {
            Some("m") | Some("M") => {}
            _ => {
                return Err(PrimitivesError::InvalidPath(format!(
                    "path must start with 'm': {}",
                    s
                )))
            }
        }

        let mut children = Vec::new();
        for part in parts {
            if part.is_empty() {
                return Err(PrimitivesError::InvalidPath(format!(
                    "empty path component in: {}",
                    s
                )));
            }
            let (digits, hardened) = match part.strip_suffix('\'').or_else(|| {
                part.strip_suffix('h').or_else(|| part.strip_suffix('H'))
            }) {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            // u32::from_str alone would accept "+1" and "007"; canonical
            // notation is plain decimal digits with no leading zeros.
            if digits.is_empty()
                || !digits.bytes().all(|b| b.is_ascii_digit())
                || (digits.len() > 1 && digits.starts_with('0'))
            {
                return Err(PrimitivesError::InvalidPath(format!(
                    "invalid path component '{}'",
                    part
                )));
            }
            let index: u32 = digits.parse().map_err(|_| {
                PrimitivesError::InvalidPath(format!("invalid path component '{}'", part))
            })?;
            if index >= HARDENED_OFFSET {
                return Err(PrimitivesError::InvalidPath(format!(
                    "child index {} out of range",
                    index
                )));
            }
            children.push(if hardened {
                index | HARDENED_OFFSET
            } else {
                index
            });
        }

        Ok(DerivationPath { children })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for &child in &self.children {
            if child >= HARDENED_OFFSET {
                write!(f, "/{}'", child - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", child)?;
            }
        }
        Ok(())
    }
}
