//! Sign and verify signed tree heads with every supported key type.

use treehead::core::{is_valid_signed_tree_head, Checkpoint, NoteSignature, SIGNATURE_DASH};
use treehead::{HashAlgorithm, LogPublicKey, LogSigningKey, Note, SignedNote, SignedTreeHead};
use treehead_testkit::fixtures::{signing_key, KeyKind, TestLog};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn sign_then_verify_with_matching_key() {
    init_tracing();
    for kind in KeyKind::ALL {
        let log = TestLog::new(kind);
        let sth = log.signed_tree_head(42, 1_700_000_000);

        let text = sth.to_text();
        let parsed = SignedTreeHead::from_text(&text).unwrap();
        assert_eq!(parsed, sth, "{kind:?}");
        assert!(parsed.verify(&log.public_key()), "{kind:?}");
        assert!(is_valid_signed_tree_head(std::str::from_utf8(&text).unwrap()));
    }
}

#[test]
fn verify_with_unrelated_key_fails() {
    init_tracing();
    let mut seed = [0x42; 32];
    seed[31] = 0x01;
    for kind in KeyKind::ALL {
        let log = TestLog::new(kind);
        let other = signing_key(kind, seed);
        assert_ne!(
            other.public_key().to_pem().unwrap(),
            log.public_key_pem(),
            "{kind:?}"
        );
        let sth = log.signed_tree_head(42, 1);
        assert!(!sth.verify(&other.public_key()), "{kind:?}");
    }

    let rsa = TestLog::new(KeyKind::Rsa).signed_tree_head(42, 1);
    assert!(!rsa.verify(&TestLog::new(KeyKind::EcdsaP256).public_key()));
    assert!(!rsa.verify(&TestLog::new(KeyKind::Ed25519).public_key()));
}

#[test]
fn zero_signatures_never_verify() {
    let log = TestLog::new(KeyKind::Ed25519);
    let sth = SignedTreeHead::new(log.checkpoint(5));
    assert!(sth.signatures.is_empty());
    assert!(!sth.verify(&log.public_key()));
}

#[test]
fn tampered_note_fails() {
    for kind in KeyKind::ALL {
        let log = TestLog::new(kind);
        let mut sth = log.signed_tree_head(42, 10);
        sth.note.size = 43;
        assert!(!sth.verify(&log.public_key()), "{kind:?}");
    }
}

#[test]
fn retimestamping_invalidates_signature() {
    let log = TestLog::new(KeyKind::Ed25519);
    let mut sth = log.signed_tree_head(42, 10);
    sth.set_timestamp(11);
    assert!(!sth.verify(&log.public_key()));

    sth.signatures.clear();
    sth.sign(&log.identity, &log.key, HashAlgorithm::None).unwrap();
    assert!(sth.verify(&log.public_key()));
    assert_eq!(sth.timestamp(), 11);
}

#[test]
fn repeated_set_timestamp_leaves_one_line() {
    let mut sth = SignedTreeHead::new(Checkpoint::new("eco", 1, vec![1, 2, 3]));
    for ts in [5, 6, 7] {
        sth.set_timestamp(ts);
    }
    let lines: Vec<_> = sth
        .note
        .other_content
        .iter()
        .filter(|l| l.starts_with("Timestamp: "))
        .collect();
    assert_eq!(lines, vec!["Timestamp: 7"]);
    assert_eq!(sth.timestamp(), 7);
}

#[test]
fn any_matching_signature_verifies() {
    let first = TestLog::new(KeyKind::Ed25519);
    let second = TestLog::new(KeyKind::EcdsaP256);

    let mut note = SignedNote::new(first.checkpoint(9));
    note.sign("first", &first.key, HashAlgorithm::None).unwrap();
    note.sign("second", &second.key, HashAlgorithm::Sha256).unwrap();

    let parsed = SignedNote::<Checkpoint>::from_text(&note.to_text()).unwrap();
    assert_eq!(parsed.signatures.len(), 2);
    assert!(parsed.verify(&first.public_key()));
    assert!(parsed.verify(&second.public_key()));
}

#[test]
fn unsupported_key_short_circuits() {
    let log = TestLog::new(KeyKind::Ed25519);
    let sth = log.signed_tree_head(1, 1);
    let unknown = LogPublicKey::Unsupported {
        algorithm: "dsa".to_string(),
    };
    assert!(!sth.verify(&unknown));
}

#[test]
fn signature_lines_carry_key_hint() {
    let log = TestLog::new(KeyKind::EcdsaP256);
    let sth = log.signed_tree_head(3, 3);
    let hint = log.public_key().key_hint().unwrap();

    let text = String::from_utf8(sth.to_text()).unwrap();
    let line = text.lines().last().unwrap();
    assert!(line.starts_with(SIGNATURE_DASH));

    let parsed = NoteSignature::parse_line(line).unwrap();
    assert_eq!(parsed.name, log.identity);
    assert_eq!(parsed.key_hint, hint);
    assert_eq!(sth.signatures_with_hint(hint).count(), 1);
}

#[test]
fn hash_choice_is_enforced_per_algorithm() {
    let ed = LogSigningKey::generate_ed25519();
    let ec = LogSigningKey::generate_ecdsa_p256();
    let mut note = SignedNote::new(Checkpoint::new("eco", 1, vec![0; 32]));

    assert!(note.sign("ed", &ed, HashAlgorithm::Sha256).is_err());
    assert!(note.sign("ec", &ec, HashAlgorithm::None).is_err());
    let rsa = TestLog::new(KeyKind::Rsa).key;
    assert!(note.sign("rsa", &rsa, HashAlgorithm::None).is_err());
    assert!(note.signatures.is_empty());

    note.sign("ec", &ec, HashAlgorithm::Sha384).unwrap();
    note.sign("ec", &ec, HashAlgorithm::Sha512).unwrap();
    assert_eq!(note.signatures.len(), 2);
}
