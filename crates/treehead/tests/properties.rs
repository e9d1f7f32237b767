//! Property tests for mapping global indexes onto shards.

use std::sync::Arc;

use proptest::prelude::*;
use treehead::{LogRanges, ShardedVerifier};
use treehead_testkit::fixtures::{KeyKind, TestLog};
use treehead_testkit::ShardParams;

fn verifier(params: &ShardParams) -> (TestLog, ShardedVerifier) {
    let log = TestLog::new(KeyKind::Ed25519);
    let ranges = LogRanges::new(params.ranges(), params.active).unwrap();
    let verifier = ShardedVerifier::with_ranges(log.public_key_pem(), Arc::new(ranges)).unwrap();
    (log, verifier)
}

/// Walk the shards in order to find where `index` lands.
fn expected_location(params: &ShardParams, mut index: u64) -> (i64, u64) {
    for (tree_id, tree_length, _) in &params.inactive {
        let len = *tree_length as u64;
        if index < len {
            return (*tree_id, index);
        }
        index -= len;
    }
    (params.active, index)
}

proptest! {
    #[test]
    fn locate_agrees_with_shard_walk(params: ShardParams, extra in 0u64..50) {
        let (_, verifier) = verifier(&params);
        let total = verifier.ranges().total_inactive_length() as u64;
        for index in 0..=total + extra {
            let location = verifier.locate(index);
            prop_assert_eq!(
                (location.tree_id, location.local_index),
                expected_location(&params, index)
            );
        }
    }

    #[test]
    fn inactive_local_index_stays_inside_shard(params: ShardParams, index in 0u64..6000) {
        let (_, verifier) = verifier(&params);
        let location = verifier.locate(index);
        match params.inactive.iter().find(|s| s.0 == location.tree_id) {
            Some((_, tree_length, _)) => prop_assert!(location.local_index < *tree_length as u64),
            None => {
                prop_assert_eq!(location.tree_id, params.active);
                let total = verifier.ranges().total_inactive_length() as u64;
                prop_assert_eq!(location.local_index, index - total);
            }
        }
    }

    #[test]
    fn keyless_shards_use_active_key(params: ShardParams) {
        let (log, verifier) = verifier(&params);
        for (tree_id, _, _) in params.inactive.iter().filter(|s| s.2.is_empty()) {
            let found = verifier.key_for_tree(*tree_id).unwrap();
            prop_assert_eq!(found.to_pem().unwrap(), log.public_key_pem(), "tree {}", tree_id);
        }
        prop_assert_eq!(
            verifier.key_for_tree(params.active).unwrap().to_pem().unwrap(),
            log.public_key_pem()
        );
    }
}
