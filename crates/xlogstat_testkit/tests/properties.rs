//! Property tests for classification, accumulation, rollup and ranking.

use proptest::prelude::*;
use xlogstat_core::{classify, rank, Rollup, Statistics};
use xlogstat_testkit::prelude::*;

fn count_records(records: &[(Record, [u8; 4])], f: impl Fn(&Record) -> bool) -> u64 {
    records.iter().filter(|(r, _)| f(r)).count() as u64
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn unrecognized_line_only_counts(line in noise_line_strategy()) {
        prop_assert!(classify(&line).is_unrecognized());

        let mut stats = Statistics::new();
        stats.ingest(&line);
        let mut expected = Statistics::new();
        expected.count = 1;
        prop_assert_eq!(stats, expected);
    }

    #[test]
    fn other_is_count_minus_kinds(lines in prop::collection::vec(marker_line_strategy(), 0..32)) {
        let stats = Statistics::from_text(&lines.join("\n"));
        let kinds = stats.n_heap + stats.n_heap2 + stats.n_btree + stats.n_transaction;
        prop_assert_eq!(stats.n_other, stats.count as i64 - kinds as i64);
    }

    #[test]
    fn counters_match_generated_records(records in segment_records_strategy()) {
        let builder = records
            .iter()
            .fold(DumpBuilder::new(), |b, (r, bkp)| b.record_with_backup(r.clone(), *bkp));
        let stats = Statistics::from_text(&builder.build());

        prop_assert_eq!(stats.count, builder.line_count());
        prop_assert_eq!(stats.n_heap, count_records(&records, |r| matches!(
            r,
            Record::HeapInsert { .. } | Record::HeapUpdate { .. } | Record::HotUpdate { .. } | Record::HeapDelete { .. }
        )));
        prop_assert_eq!(stats.n_heap2, count_records(&records, |r| matches!(r, Record::Heap2Clean { .. })));
        prop_assert_eq!(stats.n_btree, count_records(&records, |r| matches!(r, Record::BtreeInsert { .. })));
        prop_assert_eq!(stats.n_transaction, count_records(&records, |r| matches!(r, Record::Commit | Record::Abort)));
        prop_assert_eq!(stats.n_insert, count_records(&records, |r| matches!(
            r,
            Record::HeapInsert { .. } | Record::BtreeInsert { .. }
        )));
        prop_assert_eq!(stats.n_update, count_records(&records, |r| matches!(r, Record::HeapUpdate { .. })));
        prop_assert_eq!(stats.n_hotupdate, count_records(&records, |r| matches!(r, Record::HotUpdate { .. })));
        prop_assert_eq!(stats.n_delete, count_records(&records, |r| matches!(r, Record::HeapDelete { .. })));
        prop_assert_eq!(stats.n_commit, count_records(&records, |r| matches!(r, Record::Commit)));
        prop_assert_eq!(stats.n_abort, count_records(&records, |r| matches!(r, Record::Abort)));

        let expected_bkp: u64 = records
            .iter()
            .filter(|(r, _)| !matches!(r, Record::Noise(_)))
            .map(|(_, bkp)| bkp.iter().filter(|&&d| d == 1).count() as u64)
            .sum();
        prop_assert_eq!(stats.n_bkp, expected_bkp);
    }

    #[test]
    fn distinct_counts_follow_relation_map(records in segment_records_strategy()) {
        let stats = Statistics::from_text(&build_segment(&records));
        let expected = expected_pages(&records);
        let references = records.iter().filter(|(r, _)| r.page().is_some()).count() as u64;

        prop_assert_eq!(stats.n_relation, references);
        prop_assert_eq!(stats.n_page, references);
        prop_assert_eq!(stats.n_distinct_relation, expected.len() as u64);
        prop_assert_eq!(
            stats.n_distinct_page,
            expected.values().map(|p| p.len() as u64).sum::<u64>()
        );
        prop_assert_eq!(stats.relations, expected);
    }

    #[test]
    fn rollup_is_commutative(a in segment_strategy(), b in segment_strategy()) {
        let a = Statistics::from_text(&a);
        let b = Statistics::from_text(&b);

        let mut ab = Rollup::new();
        ab.add(&a);
        ab.add(&b);
        let mut ba = Rollup::new();
        ba.add(&b);
        ba.add(&a);

        prop_assert_eq!(ab.finish().unwrap(), ba.finish().unwrap());
    }

    #[test]
    fn rollup_matches_single_pass(a in segment_records_strategy(), b in segment_records_strategy()) {
        let mut all = a.clone();
        all.extend(b.iter().cloned());
        let single = Statistics::from_text(&build_segment(&all));

        let mut rollup = Rollup::new();
        rollup.add(&Statistics::from_text(&build_segment(&a)));
        rollup.add(&Statistics::from_text(&build_segment(&b)));
        let overall = rollup.finish().unwrap();

        prop_assert_eq!(&overall.relations, &single.relations);
        prop_assert_eq!(overall.n_distinct_relation, single.n_distinct_relation);
        prop_assert_eq!(overall.n_distinct_page, single.n_distinct_page);
        prop_assert_eq!(overall.n_page, single.n_page);
        prop_assert_eq!(overall.avg_pages_per_relation, single.avg_pages_per_relation);
        prop_assert_eq!(overall.avg_pages_per_transaction, single.avg_pages_per_transaction);
    }

    #[test]
    fn rank_zero_is_empty(map in relation_map_strategy()) {
        prop_assert!(rank(&map, 0).is_empty());
    }

    #[test]
    fn rank_is_sorted_and_bounded(map in relation_map_strategy(), limit in 0usize..12) {
        let ranked = rank(&map, limit);
        prop_assert_eq!(ranked.len(), limit.min(map.len()));

        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.1 > b.1 || (a.1 == b.1 && a.0 < b.0));
        }
        for (relation, pages) in &ranked {
            prop_assert_eq!(*pages, map[relation].len() as u64);
        }
    }

    #[test]
    fn rank_all_returns_every_relation(map in relation_map_strategy()) {
        let ranked = rank(&map, map.len() + 3);
        prop_assert_eq!(ranked.len(), map.len());
    }
}
