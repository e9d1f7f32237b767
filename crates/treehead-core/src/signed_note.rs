//! Signed notes: a [`Note`] followed by one or more signature lines.
//!
//! ```text
//! <note text>
//!
//! — <signer name> <base64(key hint || signature)>
//! — <signer name> <base64(key hint || signature)>
//! ```
//!
//! The signature prefix is U+2014 EM DASH followed by a space. The key hint is
//! the big-endian [`KeyHint`] of the signer's public key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::checkpoint::Checkpoint;
use crate::crypto::{HashAlgorithm, LogPublicKey, NoteSigner};
use crate::error::{FormatError, SigningError};
use crate::note::Note;
use crate::types::KeyHint;

/// Leading glyph of every signature line.
pub const SIGNATURE_DASH: char = '\u{2014}';

/// Minimum decoded length of a signature blob: 4 hint bytes plus at least one
/// signature byte.
const MIN_SIGNATURE_BLOB: usize = 5;

/// One named signature over a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSignature {
    /// Name of the signer.
    pub name: String,

    /// Hint identifying the signing key.
    pub key_hint: KeyHint,

    /// Raw signature bytes (algorithm specific).
    pub signature: Vec<u8>,
}

impl NoteSignature {
    /// Render as a signature line, without the trailing newline.
    pub fn to_line(&self) -> String {
        let mut blob = Vec::with_capacity(4 + self.signature.len());
        blob.extend_from_slice(&self.key_hint.to_be_bytes());
        blob.extend_from_slice(&self.signature);
        format!("{} {} {}", SIGNATURE_DASH, self.name, STANDARD.encode(blob))
    }

    /// Parse a single signature line.
    pub fn parse_line(line: &str) -> Result<Self, FormatError> {
        let malformed = || FormatError::MalformedSignatureLine(line.to_owned());

        let rest = line.strip_prefix(SIGNATURE_DASH).ok_or_else(malformed)?;
        let mut fields = rest.split_whitespace();
        let (Some(name), Some(encoded), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };

        let blob = STANDARD
            .decode(encoded)
            .map_err(FormatError::InvalidSignatureEncoding)?;
        if blob.len() < MIN_SIGNATURE_BLOB {
            return Err(FormatError::SignatureTooShort(blob.len()));
        }

        Ok(Self {
            name: name.to_owned(),
            key_hint: KeyHint::from_be_bytes([blob[0], blob[1], blob[2], blob[3]]),
            signature: blob[4..].to_vec(),
        })
    }
}

/// A note together with the signatures covering its canonical text.
///
/// A freshly created `SignedNote` has no signatures; it only becomes valid
/// text once at least one signature has been added with [`SignedNote::sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedNote<N = Checkpoint> {
    /// The signed payload.
    pub note: N,

    /// Signatures in insertion order. Duplicates are allowed.
    pub signatures: Vec<NoteSignature>,
}

impl<N: Note> SignedNote<N> {
    /// Wrap a note with no signatures yet.
    pub fn new(note: N) -> Self {
        Self {
            note,
            signatures: Vec::new(),
        }
    }

    /// Sign the note and append the signature.
    ///
    /// Unless `hash` is [`HashAlgorithm::None`], the serialized note is hashed
    /// and the digest is signed; otherwise the serialized note itself is
    /// handed to the signer.
    pub fn sign<S>(
        &mut self,
        identity: &str,
        signer: &S,
        hash: HashAlgorithm,
    ) -> Result<NoteSignature, SigningError>
    where
        S: NoteSigner + ?Sized,
    {
        let message = self.note.to_text();
        let input = match hash.digest(&message) {
            Some(digest) => digest,
            None => message,
        };

        let signature = signer.sign(&input, hash)?;
        let key_hint = signer.key_hint()?;

        let signature = NoteSignature {
            name: identity.to_owned(),
            key_hint,
            signature,
        };
        self.signatures.push(signature.clone());
        Ok(signature)
    }

    /// Check that at least one signature verifies under `key`.
    ///
    /// RSA and ECDSA signatures are checked against the SHA-256 digest of the
    /// note, Ed25519 signatures against the note text itself. A key of an
    /// unsupported algorithm fails the whole call at the first signature.
    pub fn verify(&self, key: &LogPublicKey) -> bool {
        if self.signatures.is_empty() {
            return false;
        }

        let message = self.note.to_text();
        let digest = Sha256::digest(&message);

        for signature in &self.signatures {
            match key.verify_note_signature(&message, &digest, &signature.signature) {
                Some(true) => return true,
                Some(false) => continue,
                None => {
                    tracing::debug!(
                        algorithm = key.algorithm(),
                        "cannot verify note with unsupported key type"
                    );
                    return false;
                }
            }
        }
        false
    }

    /// Signatures whose key hint matches `hint`.
    pub fn signatures_with_hint(&self, hint: KeyHint) -> impl Iterator<Item = &NoteSignature> {
        self.signatures.iter().filter(move |s| s.key_hint == hint)
    }
}

impl<N: Note> Note for SignedNote<N> {
    fn to_text(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Parse a signed note. THIS DOES NOT VERIFY THE SIGNATURES.
    ///
    /// The note is parsed from the leading portion of `data`; the first empty
    /// line after the note text starts the signature block, in which every
    /// non-empty line must be a signature line.
    fn from_text(data: &[u8]) -> Result<Self, FormatError> {
        let note = N::from_text(data).map_err(|e| FormatError::Note(Box::new(e)))?;

        // Skip the note's own text so that empty lines inside it (an empty
        // root hash, for instance) are not taken as the boundary.
        let note_text = note.to_text();
        let block = data.strip_prefix(note_text.as_slice()).unwrap_or(data);
        let block = std::str::from_utf8(block).map_err(|_| FormatError::InvalidUtf8)?;

        let mut past_note = false;
        let mut signatures = Vec::new();
        for line in block.lines() {
            if line.is_empty() {
                past_note = true;
                continue;
            }
            if past_note {
                signatures.push(NoteSignature::parse_line(line)?);
            }
        }

        if signatures.is_empty() {
            return Err(FormatError::NoSignatures);
        }

        Ok(Self { note, signatures })
    }
}

impl<N: Note> fmt::Display for SignedNote<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.note)?;
        writeln!(f)?;
        for signature in &self.signatures {
            writeln!(f, "{}", signature.to_line())?;
        }
        Ok(())
    }
}

impl<N: Note> From<N> for SignedNote<N> {
    fn from(note: N) -> Self {
        Self::new(note)
    }
}
