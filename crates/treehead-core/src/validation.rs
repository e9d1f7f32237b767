//! Structural validators for checkpoint text.
//!
//! These only check that the text parses; they never verify signatures.

use crate::checkpoint::Checkpoint;
use crate::note::Note;
use crate::signed_note::SignedNote;
use crate::tree_head::SignedTreeHead;

/// Check that `text` is a well-formed checkpoint.
pub fn is_valid_checkpoint(text: &str) -> bool {
    Checkpoint::from_text(text.as_bytes()).is_ok()
}

/// Check that `text` is a checkpoint followed by at least one well-formed
/// signature line.
pub fn is_valid_signed_note(text: &str) -> bool {
    SignedNote::<Checkpoint>::from_text(text.as_bytes()).is_ok()
}

/// Check that `text` is a well-formed signed tree head.
pub fn is_valid_signed_tree_head(text: &str) -> bool {
    SignedTreeHead::from_text(text.as_bytes()).is_ok()
}
