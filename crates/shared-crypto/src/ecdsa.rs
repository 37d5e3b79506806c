//! # ECDSA Signatures (NIST P-256)
//!
//! Device identity keys and reading signatures.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Signatures are always 64 bytes, `r || s`, each left-padded to 32 bytes
//! - Public keys are only accepted in uncompressed SEC1 form and are checked
//!   to lie on the curve
//!
//! ## Use Cases
//!
//! - Device identity (`DeviceId` is derived from the public key)
//! - Signing reading digests on the device
//! - Verifying submissions on the collector

use crate::CryptoError;
use p256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    Signature, SigningKey, VerifyingKey,
};
use shared_types::{DeviceId, Hash};
use std::fmt;
use zeroize::Zeroizing;

/// Byte length of a P-256 scalar or field element.
pub const P256_SCALAR_LEN: usize = 32;

/// Byte length of an uncompressed SEC1 point.
pub const P256_PUBLIC_KEY_LEN: usize = 65;

/// Byte length of a fixed-width `r || s` signature.
pub const P256_SIGNATURE_LEN: usize = 64;

const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

/// Uncompressed P-256 public key (65 bytes: `0x04 || X || Y`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct P256PublicKey([u8; P256_PUBLIC_KEY_LEN]);

impl P256PublicKey {
    /// Parse an uncompressed SEC1 point.
    ///
    /// Rejects compressed encodings, the identity and points not on the curve.
    pub fn from_sec1_uncompressed(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != P256_PUBLIC_KEY_LEN || bytes[0] != SEC1_UNCOMPRESSED_TAG {
            return Err(CryptoError::InvalidPublicKey);
        }
        VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;

        let mut out = [0u8; P256_PUBLIC_KEY_LEN];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Parse from hex.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(input).map_err(|_| CryptoError::InvalidPublicKey)?;
        Self::from_sec1_uncompressed(&bytes)
    }

    /// Raw uncompressed bytes.
    pub fn as_bytes(&self) -> &[u8; P256_PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Lowercase hex of the uncompressed encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Derive the device identifier bound to this key.
    pub fn device_id(&self) -> DeviceId {
        DeviceId::from_public_key_bytes(&self.0)
    }

    /// Verify a signature over a 32-byte message digest.
    pub fn verify_prehash(
        &self,
        digest: &Hash,
        signature: &P256Signature,
    ) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;
        let sig = signature.to_signature()?;

        verifying_key
            .verify_prehash(digest, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

impl fmt::Debug for P256PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P256PublicKey({})", self.to_hex())
    }
}

/// ECDSA signature (64 bytes, `r || s`, big-endian, fixed width).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct P256Signature([u8; P256_SIGNATURE_LEN]);

impl P256Signature {
    /// Create from bytes (64 bytes).
    pub fn from_bytes(bytes: [u8; P256_SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice; anything but 64 bytes is rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; P256_SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; P256_SIGNATURE_LEN] {
        &self.0
    }

    /// `r` component, big-endian.
    pub fn r(&self) -> &[u8] {
        &self.0[..P256_SCALAR_LEN]
    }

    /// `s` component, big-endian.
    pub fn s(&self) -> &[u8] {
        &self.0[P256_SCALAR_LEN..]
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Rejects zero scalars and scalars not below the curve order.
    fn to_signature(&self) -> Result<Signature, CryptoError> {
        Signature::from_slice(&self.0).map_err(|_| CryptoError::InvalidSignature)
    }
}

impl fmt::Debug for P256Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P256Signature({})", self.to_hex())
    }
}

/// P-256 ECDSA keypair.
pub struct P256KeyPair {
    signing_key: SigningKey,
}

impl P256KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Restore from a big-endian scalar.
    ///
    /// Encodings shorter than 32 bytes are left-padded with zeros (writers
    /// that strip leading zero bytes produce these); longer ones are rejected.
    pub fn from_scalar_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.is_empty() || bytes.len() > P256_SCALAR_LEN {
            return Err(CryptoError::InvalidPrivateKey);
        }
        let mut padded = Zeroizing::new([0u8; P256_SCALAR_LEN]);
        padded[P256_SCALAR_LEN - bytes.len()..].copy_from_slice(bytes);

        let signing_key = SigningKey::from_bytes((&*padded).into())
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Get public key (uncompressed, 65 bytes).
    pub fn public_key(&self) -> P256PublicKey {
        let encoded = self.signing_key.verifying_key().to_encoded_point(false);
        let mut bytes = [0u8; P256_PUBLIC_KEY_LEN];
        bytes.copy_from_slice(encoded.as_bytes());
        P256PublicKey(bytes)
    }

    /// Device identifier for this keypair.
    pub fn device_id(&self) -> DeviceId {
        self.public_key().device_id()
    }

    /// Sign a 32-byte digest (deterministic RFC 6979).
    pub fn sign_prehash(&self, digest: &Hash) -> Result<P256Signature, CryptoError> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let bytes: [u8; P256_SIGNATURE_LEN] = sig.to_bytes().into();
        Ok(P256Signature(bytes))
    }

    /// Secret scalar, always 32 bytes big-endian.
    pub fn to_scalar_bytes(&self) -> Zeroizing<[u8; P256_SCALAR_LEN]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }
}

impl fmt::Debug for P256KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("P256KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
