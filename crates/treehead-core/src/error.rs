//! Error types for treehead core.

use thiserror::Error;

/// Errors raised while decoding checkpoint or signed note text.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid checkpoint - too few newlines")]
    TooFewLines,

    #[error("invalid checkpoint - empty ecosystem")]
    EmptyEcosystem,

    #[error("invalid checkpoint - size invalid: {0:?}")]
    InvalidSize(String),

    #[error("invalid checkpoint - invalid hash: {0}")]
    InvalidHash(#[source] base64::DecodeError),

    #[error("parsing note portion: {0}")]
    Note(#[source] Box<FormatError>),

    #[error("parsing signature: malformed line {0:?}")]
    MalformedSignatureLine(String),

    #[error("decoding signature: {0}")]
    InvalidSignatureEncoding(#[source] base64::DecodeError),

    #[error("signature is too small: {0} bytes")]
    SignatureTooShort(usize),

    #[error("no signatures found in input")]
    NoSignatures,

    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

/// Errors raised while producing a signature.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("hash algorithm {0} is not supported by this signer")]
    UnsupportedHash(&'static str),

    #[error("signing checkpoint: {0}")]
    Signer(String),

    #[error("marshalling public key: {0}")]
    PublicKeyEncoding(String),
}

/// Errors raised while parsing a verification key.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid PEM: {0}")]
    InvalidPem(String),

    #[error("invalid SubjectPublicKeyInfo: {0}")]
    InvalidSpki(String),

    #[error("invalid {algorithm} public key: {reason}")]
    InvalidKey {
        algorithm: &'static str,
        reason: String,
    },
}
