//! Property-based test generators using proptest.
//!
//! Provides strategies for generating dump records, whole segments and
//! relation maps.

use crate::fixtures::{DumpBuilder, Record};
use proptest::prelude::*;
use std::collections::BTreeMap;
use xlogstat_core::RelationPageMap;

/// Strategy for relation file nodes; kept small so relations repeat.
pub fn relation_strategy() -> impl Strategy<Value = u32> {
    16384u32..16392
}

/// Strategy for block numbers; kept small so pages repeat.
pub fn block_strategy() -> impl Strategy<Value = u32> {
    0u32..16
}

/// Strategy for backup block bitmaps.
pub fn bkp_strategy() -> impl Strategy<Value = [u8; 4]> {
    prop::array::uniform4(0u8..=1)
}

/// Strategy for lines that match no pattern at all.
///
/// Every marker starts with a space, so space-free text never matches.
pub fn noise_line_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9=_.:/]{0,40}").expect("Invalid regex")
}

/// Strategy for a single record.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    let page = || (relation_strategy(), block_strategy());
    prop_oneof![
        page().prop_map(|(relation, block)| Record::HeapInsert { relation, block }),
        page().prop_map(|(relation, block)| Record::HeapUpdate { relation, block }),
        page().prop_map(|(relation, block)| Record::HotUpdate { relation, block }),
        page().prop_map(|(relation, block)| Record::HeapDelete { relation, block }),
        page().prop_map(|(relation, block)| Record::BtreeInsert { relation, block }),
        page().prop_map(|(relation, block)| Record::Heap2Clean { relation, block }),
        Just(Record::Commit),
        Just(Record::Abort),
        noise_line_strategy().prop_map(Record::Noise),
    ]
}

/// Strategy for the records of one segment with their backup bitmaps.
pub fn segment_records_strategy() -> impl Strategy<Value = Vec<(Record, [u8; 4])>> {
    prop::collection::vec((record_strategy(), bkp_strategy()), 0..64)
}

/// Strategy for a built segment dump.
pub fn segment_strategy() -> impl Strategy<Value = String> {
    segment_records_strategy().prop_map(|records| build_segment(&records))
}

/// Builds dump text from generated records.
#[must_use]
pub fn build_segment(records: &[(Record, [u8; 4])]) -> String {
    records
        .iter()
        .fold(DumpBuilder::new(), |builder, (record, bkp)| {
            builder.record_with_backup(record.clone(), *bkp)
        })
        .build()
}

/// Strategy for lines made of arbitrary kind and operation markers.
///
/// These lines can carry several record kinds at once.
pub fn marker_line_strategy() -> impl Strategy<Value = String> {
    let token = prop::sample::select(vec![
        "Heap", "Heap2", "Btree", "Transaction", "insert", "update", "hotupdate", "delete",
        "commit", "abort", "xid", "clean",
    ]);
    prop::collection::vec(token, 0..6).prop_map(|tokens| format!(" {} ", tokens.join("  ")))
}

/// Strategy for relation page maps.
pub fn relation_map_strategy() -> impl Strategy<Value = RelationPageMap> {
    prop::collection::btree_map(
        relation_strategy().prop_map(|r| r.to_string()),
        prop::collection::btree_map(block_strategy().prop_map(|b| b.to_string()), 1u64..5, 1..8),
        0..8,
    )
}

/// Expected page occurrences of generated records.
#[must_use]
pub fn expected_pages(records: &[(Record, [u8; 4])]) -> RelationPageMap {
    let mut map: RelationPageMap = BTreeMap::new();
    for (relation, block) in records.iter().filter_map(|(r, _)| r.page()) {
        *map.entry(relation.to_string())
            .or_default()
            .entry(block.to_string())
            .or_insert(0) += 1;
    }
    map
}

/// Test configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
