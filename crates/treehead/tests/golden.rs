//! Golden signed tree heads.
//!
//! Every implementation of the checkpoint format must produce these exact
//! texts for the same Ed25519 seed, size and timestamp.

use treehead::core::{is_valid_checkpoint, is_valid_signed_note};
use treehead::{Note, ShardSource, ShardedVerifier, SignedTreeHead, VerifierConfig};
use treehead_testkit::fixtures::shard_record;
use treehead_testkit::vectors::{
    all_vectors, generate_tree_head_from_vector, vector_key, vectors_json,
};

#[test]
fn golden_texts_are_reproduced() {
    for vector in all_vectors() {
        let text = generate_tree_head_from_vector(&vector).to_text();
        assert_eq!(
            String::from_utf8(text).unwrap(),
            vector.expected_text,
            "vector '{}'",
            vector.name
        );
    }
}

#[test]
fn golden_texts_validate() {
    for vector in all_vectors() {
        assert!(is_valid_checkpoint(&vector.expected_text));
        assert!(is_valid_signed_note(&vector.expected_text));
    }
}

#[test]
fn golden_texts_verify_as_shards() {
    let vectors = all_vectors();
    let active = vector_key(&vectors[0]).public_key().to_pem().unwrap();
    let retired = vector_key(&vectors[2]).public_key();

    let verifier = ShardedVerifier::new(VerifierConfig {
        active_public_key: active,
        active_tree_id: 2,
        shards: Some(ShardSource::Records(vec![shard_record(1, 1_000_000_000, &retired)])),
        log_failures: false,
    })
    .unwrap();

    let retired_head = SignedTreeHead::from_text(vectors[2].expected_text.as_bytes()).unwrap();
    let active_head = SignedTreeHead::from_text(vectors[1].expected_text.as_bytes()).unwrap();

    let result = verifier.verify_index(5, |_| Ok(retired_head.clone())).unwrap();
    assert_eq!(result.location.tree_id, 1);
    assert!(result.covers_entry());

    let result = verifier
        .verify_index(1_000_000_003, |_| Ok(active_head.clone()))
        .unwrap();
    assert_eq!(result.location.tree_id, 2);
    assert_eq!(result.location.local_index, 3);
    assert!(result.covers_entry());
}

#[test]
fn golden_vectors_survive_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vectors.json");
    std::fs::write(&path, vectors_json()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"expected_text\""));
    let count = text.matches("\"name\"").count();
    assert_eq!(count, all_vectors().len());
}
