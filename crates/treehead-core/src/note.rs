//! The payload contract for signed notes.

use std::fmt;

use crate::error::FormatError;

/// A payload that can be wrapped by a [`SignedNote`](crate::SignedNote).
///
/// `to_text` must be canonical: it is the exact byte string that gets signed.
/// `from_text` must accept everything `to_text` produces.
pub trait Note: Sized + fmt::Display {
    /// Canonical text form.
    fn to_text(&self) -> Vec<u8>;

    /// Parse the canonical text form.
    fn from_text(data: &[u8]) -> Result<Self, FormatError>;
}
