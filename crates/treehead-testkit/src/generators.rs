//! Proptest generators for property-based testing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use proptest::prelude::*;

use treehead_core::{Checkpoint, NoteSignature, SignedNote};
use treehead_shard::LogRange;

/// Generate an origin line.
pub fn origin() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,31}( - [0-9]{1,19})?".prop_map(String::from)
}

/// Generate a root hash.
pub fn root_hash() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 32)
}

/// Generate a non-empty extension line.
pub fn extension_line() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 :=_-]{0,47}".prop_map(String::from)
}

/// Generate a checkpoint.
pub fn checkpoint() -> impl Strategy<Value = Checkpoint> {
    (
        origin(),
        any::<u64>(),
        root_hash(),
        prop::collection::vec(extension_line(), 0..4),
    )
        .prop_map(|(ecosystem, size, hash, other_content)| Checkpoint {
            ecosystem,
            size,
            hash,
            other_content,
        })
}

/// Generate a signature line with an arbitrary (unverifiable) signature.
pub fn note_signature() -> impl Strategy<Value = NoteSignature> {
    (
        "[a-z][a-z0-9.-]{0,23}",
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 1..96),
    )
        .prop_map(|(name, hint, signature)| NoteSignature {
            name,
            key_hint: hint.into(),
            signature,
        })
}

/// Generate a signed note with one to three signatures.
pub fn signed_note() -> impl Strategy<Value = SignedNote<Checkpoint>> {
    (checkpoint(), prop::collection::vec(note_signature(), 1..4)).prop_map(
        |(note, signatures)| SignedNote { note, signatures },
    )
}

/// Parameters for a consistent shard table.
#[derive(Debug, Clone)]
pub struct ShardParams {
    /// `(tree_id, tree_length, public key text)` in shard order.
    pub inactive: Vec<(i64, i64, String)>,
    pub active: i64,
}

impl ShardParams {
    pub fn ranges(&self) -> Vec<LogRange> {
        self.inactive
            .iter()
            .map(|(id, len, key)| {
                LogRange::new(*id, *len, STANDARD.encode(key)).expect("generated shard is valid")
            })
            .collect()
    }
}

impl Arbitrary for ShardParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec((0i64..1000, prop_oneof![Just(String::new()), "K[0-9]{1,3}"]), 0..6)
            .prop_map(|shards| {
                let inactive: Vec<_> = shards
                    .into_iter()
                    .enumerate()
                    .map(|(i, (len, key))| (i as i64 + 1, len, key))
                    .collect();
                let active = inactive.len() as i64 + 1;
                ShardParams { inactive, active }
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treehead_core::Note;
    use treehead_shard::LogRanges;

    proptest! {
        #[test]
        fn test_checkpoint_text_roundtrip(cp in checkpoint()) {
            let parsed = Checkpoint::from_text(&cp.to_text()).unwrap();
            prop_assert_eq!(parsed, cp);
        }

        #[test]
        fn test_signed_note_text_roundtrip(note in signed_note()) {
            let parsed = SignedNote::<Checkpoint>::from_text(&note.to_text()).unwrap();
            prop_assert_eq!(parsed, note);
        }

        #[test]
        fn test_total_length_covers_inactive_indexes(params: ShardParams) {
            let ranges = LogRanges::new(params.ranges(), params.active).unwrap();
            let total = ranges.total_inactive_length();
            prop_assert_eq!(total, params.inactive.iter().map(|s| s.1).sum::<i64>());
            prop_assert_eq!(ranges.resolve_virtual_index(total as u64), (params.active, 0));
        }

        #[test]
        fn test_public_key_falls_back_to_active(params: ShardParams) {
            let ranges = LogRanges::new(params.ranges(), params.active).unwrap();
            for (id, _, key) in &params.inactive {
                let expected = if key.is_empty() { "AK" } else { key.as_str() };
                let found = ranges.public_key("AK", Some(&id.to_string())).unwrap();
                prop_assert_eq!(found, expected.as_bytes());
            }
        }
    }
}
