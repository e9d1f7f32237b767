//! Cryptographic primitives for note signing and verification.
//!
//! Three key algorithms are understood: RSA (PSS padding), ECDSA over P-256
//! (ASN.1/DER signatures), and Ed25519. Verification keys are classified once,
//! when they are parsed, into a [`LogPublicKey`] variant; the per-signature
//! check is then a plain match on that variant.

use ed25519_dalek::{Signer as _, Verifier as _};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};
use spki::der::Decode;
use spki::{DecodePublicKey, EncodePublicKey, ObjectIdentifier, SubjectPublicKeyInfoRef};
use std::fmt;

use crate::error::{KeyError, SigningError};
use crate::types::KeyHint;

/// rsaEncryption (RFC 8017).
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// id-ecPublicKey (RFC 5480).
const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// secp256r1 / prime256v1 (RFC 5480).
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// id-Ed25519 (RFC 8410).
const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// Digest applied to a note before it is handed to the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA-256 (the default).
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// Sign the serialized note directly. Required for Ed25519.
    None,
}

impl HashAlgorithm {
    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::None => "none",
        }
    }

    /// Hash `data`, or return `None` for [`HashAlgorithm::None`].
    pub fn digest(self, data: &[u8]) -> Option<Vec<u8>> {
        match self {
            Self::Sha256 => Some(Sha256::digest(data).to_vec()),
            Self::Sha384 => Some(Sha384::digest(data).to_vec()),
            Self::Sha512 => Some(Sha512::digest(data).to_vec()),
            Self::None => None,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A signer able to produce note signatures.
///
/// The key material stays with the implementor; a signed note only borrows
/// the signer for the duration of one `sign` call.
pub trait NoteSigner {
    /// DER-encoded SubjectPublicKeyInfo of the signing key.
    fn public_key_der(&self) -> Result<Vec<u8>, SigningError>;

    /// Sign `input`.
    ///
    /// `input` is a digest computed with `hash`, or the raw message when `hash`
    /// is [`HashAlgorithm::None`].
    fn sign(&self, input: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>, SigningError>;

    /// Key hint for this signer's public key.
    fn key_hint(&self) -> Result<KeyHint, SigningError> {
        Ok(KeyHint::for_public_key_der(&self.public_key_der()?))
    }
}

/// A private key for one of the supported algorithms.
#[derive(Clone)]
pub enum LogSigningKey {
    /// RSA key, signs with PSS padding.
    Rsa(RsaPrivateKey),
    /// ECDSA P-256 key, emits ASN.1/DER signatures.
    EcdsaP256(p256::ecdsa::SigningKey),
    /// Ed25519 key, signs the raw message.
    Ed25519(ed25519_dalek::SigningKey),
}

impl LogSigningKey {
    /// Generate a new random Ed25519 key.
    pub fn generate_ed25519() -> Self {
        let mut rng = rand::thread_rng();
        Self::Ed25519(ed25519_dalek::SigningKey::generate(&mut rng))
    }

    /// Generate a new random ECDSA P-256 key.
    pub fn generate_ecdsa_p256() -> Self {
        let mut rng = rand::thread_rng();
        Self::EcdsaP256(p256::ecdsa::SigningKey::random(&mut rng))
    }

    /// Generate a new random RSA key of `bits` bits.
    pub fn generate_rsa(bits: usize) -> Result<Self, SigningError> {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, bits)
            .map(Self::Rsa)
            .map_err(|e| SigningError::Signer(e.to_string()))
    }

    /// Algorithm name.
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "rsa",
            Self::EcdsaP256(_) => "ecdsa-p256",
            Self::Ed25519(_) => "ed25519",
        }
    }

    /// The matching verification key.
    pub fn public_key(&self) -> LogPublicKey {
        match self {
            Self::Rsa(key) => LogPublicKey::Rsa(key.to_public_key()),
            Self::EcdsaP256(key) => LogPublicKey::EcdsaP256(key.verifying_key().clone()),
            Self::Ed25519(key) => LogPublicKey::Ed25519(key.verifying_key()),
        }
    }
}

impl NoteSigner for LogSigningKey {
    fn public_key_der(&self) -> Result<Vec<u8>, SigningError> {
        let document = match self {
            Self::Rsa(key) => key.to_public_key().to_public_key_der(),
            Self::EcdsaP256(key) => key.verifying_key().to_public_key_der(),
            Self::Ed25519(key) => key.verifying_key().to_public_key_der(),
        }
        .map_err(|e| SigningError::PublicKeyEncoding(e.to_string()))?;
        Ok(document.as_bytes().to_vec())
    }

    fn sign(&self, input: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>, SigningError> {
        match self {
            Self::Rsa(key) => {
                let padding = match hash {
                    HashAlgorithm::Sha256 => Pss::new::<Sha256>(),
                    HashAlgorithm::Sha384 => Pss::new::<Sha384>(),
                    HashAlgorithm::Sha512 => Pss::new::<Sha512>(),
                    HashAlgorithm::None => return Err(SigningError::UnsupportedHash(hash.name())),
                };
                let mut rng = rand::thread_rng();
                key.sign_with_rng(&mut rng, padding, input)
                    .map_err(|e| SigningError::Signer(e.to_string()))
            }
            Self::EcdsaP256(key) => {
                if hash == HashAlgorithm::None {
                    return Err(SigningError::UnsupportedHash(hash.name()));
                }
                let signature: p256::ecdsa::Signature = key
                    .sign_prehash(input)
                    .map_err(|e| SigningError::Signer(e.to_string()))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            Self::Ed25519(key) => {
                // Ed25519 hashes internally and cannot sign a digest.
                if hash != HashAlgorithm::None {
                    return Err(SigningError::UnsupportedHash(hash.name()));
                }
                Ok(key.sign(input).to_bytes().to_vec())
            }
        }
    }
}

impl fmt::Debug for LogSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key_hint() {
            Ok(hint) => write!(f, "LogSigningKey({}, {})", self.algorithm(), hint),
            Err(_) => write!(f, "LogSigningKey({})", self.algorithm()),
        }
    }
}

impl From<RsaPrivateKey> for LogSigningKey {
    fn from(key: RsaPrivateKey) -> Self {
        Self::Rsa(key)
    }
}

impl From<p256::ecdsa::SigningKey> for LogSigningKey {
    fn from(key: p256::ecdsa::SigningKey) -> Self {
        Self::EcdsaP256(key)
    }
}

impl From<ed25519_dalek::SigningKey> for LogSigningKey {
    fn from(key: ed25519_dalek::SigningKey) -> Self {
        Self::Ed25519(key)
    }
}

/// A log verification key, classified by algorithm when parsed.
#[derive(Clone, Debug)]
pub enum LogPublicKey {
    /// RSA key; signatures are PSS over the SHA-256 digest of the note.
    Rsa(RsaPublicKey),
    /// ECDSA P-256 key; signatures are ASN.1/DER over the SHA-256 digest.
    EcdsaP256(p256::ecdsa::VerifyingKey),
    /// Ed25519 key; signatures cover the raw note text.
    Ed25519(ed25519_dalek::VerifyingKey),
    /// A well-formed key of an algorithm notes cannot be verified with.
    Unsupported {
        /// Algorithm (and curve, for EC keys) OID.
        algorithm: String,
    },
}

impl LogPublicKey {
    /// Parse a DER-encoded SubjectPublicKeyInfo.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, KeyError> {
        let spki = SubjectPublicKeyInfoRef::from_der(der)
            .map_err(|e| KeyError::InvalidSpki(e.to_string()))?;
        let oid = spki.algorithm.oid;

        if oid == RSA_ENCRYPTION {
            RsaPublicKey::from_public_key_der(der)
                .map(Self::Rsa)
                .map_err(|e| invalid_key("rsa", e))
        } else if oid == EC_PUBLIC_KEY {
            match spki.algorithm.parameters_oid() {
                Ok(curve) if curve == SECP256R1 => p256::ecdsa::VerifyingKey::from_public_key_der(der)
                    .map(Self::EcdsaP256)
                    .map_err(|e| invalid_key("ecdsa-p256", e)),
                Ok(curve) => Ok(Self::Unsupported {
                    algorithm: format!("{oid}/{curve}"),
                }),
                Err(e) => Err(invalid_key("ecdsa", e)),
            }
        } else if oid == ED25519 {
            ed25519_dalek::VerifyingKey::from_public_key_der(der)
                .map(Self::Ed25519)
                .map_err(|e| invalid_key("ed25519", e))
        } else {
            Ok(Self::Unsupported {
                algorithm: oid.to_string(),
            })
        }
    }

    /// Parse a PEM `PUBLIC KEY` block.
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let (label, document) =
            spki::Document::from_pem(pem).map_err(|e| KeyError::InvalidPem(e.to_string()))?;
        if label != "PUBLIC KEY" {
            return Err(KeyError::InvalidPem(format!("unexpected label {label:?}")));
        }
        Self::from_public_key_der(document.as_bytes())
    }

    /// Parse a key given either as PEM text or as DER bytes.
    pub fn from_pem_or_der(bytes: &[u8]) -> Result<Self, KeyError> {
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        if bytes[start..].starts_with(b"-----BEGIN") {
            let pem = std::str::from_utf8(&bytes[start..])
                .map_err(|e| KeyError::InvalidPem(e.to_string()))?;
            return Self::from_pem(pem);
        }
        Self::from_public_key_der(bytes)
    }

    /// DER-encoded SubjectPublicKeyInfo.
    pub fn to_public_key_der(&self) -> Result<Vec<u8>, KeyError> {
        let document = match self {
            Self::Rsa(key) => key.to_public_key_der(),
            Self::EcdsaP256(key) => key.to_public_key_der(),
            Self::Ed25519(key) => key.to_public_key_der(),
            Self::Unsupported { algorithm } => return Err(unsupported(algorithm)),
        }
        .map_err(|e| invalid_key(self.static_algorithm(), e))?;
        Ok(document.as_bytes().to_vec())
    }

    /// PEM `PUBLIC KEY` block with LF line endings.
    pub fn to_pem(&self) -> Result<String, KeyError> {
        let line_ending = spki::der::pem::LineEnding::LF;
        match self {
            Self::Rsa(key) => key.to_public_key_pem(line_ending),
            Self::EcdsaP256(key) => key.to_public_key_pem(line_ending),
            Self::Ed25519(key) => key.to_public_key_pem(line_ending),
            Self::Unsupported { algorithm } => return Err(unsupported(algorithm)),
        }
        .map_err(|e| invalid_key(self.static_algorithm(), e))
    }

    /// Key hint for this key, if it can be encoded.
    pub fn key_hint(&self) -> Result<KeyHint, KeyError> {
        Ok(KeyHint::for_public_key_der(&self.to_public_key_der()?))
    }

    fn static_algorithm(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "rsa",
            Self::EcdsaP256(_) => "ecdsa-p256",
            Self::Ed25519(_) => "ed25519",
            Self::Unsupported { .. } => "unsupported",
        }
    }

    /// Algorithm name.
    pub fn algorithm(&self) -> &str {
        match self {
            Self::Rsa(_) => "rsa",
            Self::EcdsaP256(_) => "ecdsa-p256",
            Self::Ed25519(_) => "ed25519",
            Self::Unsupported { algorithm } => algorithm,
        }
    }

    /// Check whether notes can be verified with this key.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported { .. })
    }

    /// Verify one note signature.
    ///
    /// `message` is the serialized note and `digest` its SHA-256. Returns
    /// `None` for an unsupported key.
    pub(crate) fn verify_note_signature(
        &self,
        message: &[u8],
        digest: &[u8],
        signature: &[u8],
    ) -> Option<bool> {
        let verified = match self {
            Self::Rsa(key) => key.verify(Pss::new::<Sha256>(), digest, signature).is_ok(),
            Self::EcdsaP256(key) => match p256::ecdsa::Signature::from_der(signature) {
                Ok(sig) => key.verify_prehash(digest, &sig).is_ok(),
                Err(_) => false,
            },
            Self::Ed25519(key) => match ed25519_dalek::Signature::from_slice(signature) {
                Ok(sig) => key.verify(message, &sig).is_ok(),
                Err(_) => false,
            },
            Self::Unsupported { .. } => return None,
        };
        Some(verified)
    }
}

impl From<RsaPublicKey> for LogPublicKey {
    fn from(key: RsaPublicKey) -> Self {
        Self::Rsa(key)
    }
}

impl From<p256::ecdsa::VerifyingKey> for LogPublicKey {
    fn from(key: p256::ecdsa::VerifyingKey) -> Self {
        Self::EcdsaP256(key)
    }
}

impl From<ed25519_dalek::VerifyingKey> for LogPublicKey {
    fn from(key: ed25519_dalek::VerifyingKey) -> Self {
        Self::Ed25519(key)
    }
}

fn unsupported(algorithm: &str) -> KeyError {
    KeyError::InvalidKey {
        algorithm: "unsupported",
        reason: format!("cannot encode key of algorithm {algorithm}"),
    }
}

fn invalid_key(algorithm: &'static str, e: impl fmt::Display) -> KeyError {
    KeyError::InvalidKey {
        algorithm,
        reason: e.to_string(),
    }
}
