//! SHA-256 and fixed-width hex helpers.

use crate::entities::Hash;
use crate::errors::TypesError;
use sha2::{Digest, Sha256};

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Decode a hex string into exactly `N` bytes.
///
/// Accepts upper or lower case digits. Any other length is an error.
pub fn decode_fixed_hex<const N: usize>(input: &str) -> Result<[u8; N], TypesError> {
    let bytes = hex::decode(input).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(TypesError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
