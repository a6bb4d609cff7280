//! Property-based tests using proptest.
//!
//! These tests verify the invariants of LLR scoring, ranking, and the two
//! jobs on randomly generated interaction logs.

use std::collections::BTreeMap;

use llr_similarity::contingency::ContingencyTableBuilder;
use llr_similarity::cooccurrence::Cooccurrences;
use llr_similarity::interactions::Axis;
use llr_similarity::llr::{log_likelihood, log_likelihood_ratio};
use llr_similarity::prelude::*;
use llr_similarity::rank::{self, ScoredPair, TopKRanker};
use proptest::prelude::*;

// Strategy for small interaction logs with overlapping baskets
fn interactions_strategy() -> impl Strategy<Value = Interactions> {
    proptest::collection::vec((0i64..30, 0i64..20), 0..200).prop_map(Interactions::from_pairs)
}

// Strategy for scored candidate lists with frequent ties
fn scored_pairs_strategy() -> impl Strategy<Value = Vec<ScoredPair>> {
    proptest::collection::vec((0i64..10, 0i64..50, 0u8..8), 0..150).prop_map(|raw| {
        raw.into_iter()
            .map(|(anchor, candidate, bucket)| {
                ScoredPair::new(anchor, candidate, f64::from(bucket) / 8.0)
            })
            .collect()
    })
}

fn ranks_by_anchor<I>(rows: I) -> BTreeMap<EntityId, Vec<usize>>
where
    I: IntoIterator<Item = (EntityId, usize)>,
{
    let mut ranks: BTreeMap<EntityId, Vec<usize>> = BTreeMap::new();
    for (anchor, rank) in rows {
        ranks.entry(anchor).or_default().push(rank);
    }
    ranks
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // LLR properties
    #[test]
    fn llr_score_is_in_unit_interval(
        k11 in 0u64..10_000,
        k12 in 0u64..10_000,
        k21 in 0u64..10_000,
        k22 in 0u64..10_000,
    ) {
        let score = log_likelihood_ratio(k11, k12, k21, k22);
        prop_assert!(score.is_finite());
        prop_assert!((0.0..1.0).contains(&score));
    }

    #[test]
    fn llr_is_zero_for_independent_tables(
        a in 1u64..100,
        b in 1u64..100,
        c in 1u64..100,
        d in 1u64..100,
    ) {
        // Outer product of two marginal vectors: k11·k22 = k12·k21.
        let raw = log_likelihood(a * c, a * d, b * c, b * d);
        prop_assert!(raw.abs() < 1e-6, "raw = {}", raw);
        prop_assert!(log_likelihood_ratio(a * c, a * d, b * c, b * d) < 1e-6);
    }

    #[test]
    fn llr_is_symmetric_under_transposition(
        k11 in 0u64..1_000,
        k12 in 0u64..1_000,
        k21 in 0u64..1_000,
        k22 in 0u64..1_000,
    ) {
        let forward = log_likelihood(k11, k12, k21, k22);
        let transposed = log_likelihood(k11, k21, k12, k22);
        prop_assert!((forward - transposed).abs() <= 1e-9 * (1.0 + forward.abs()));
    }

    #[test]
    fn llr_increases_with_positive_association(
        row in 1u64..60,
        col in 1u64..60,
        extra in 0u64..80,
    ) {
        // Fixed marginals: row total, column total and population.
        let population = row.max(col) + extra + 1;
        let expected = (row * col) as f64 / population as f64;
        let lowest = (row + col).saturating_sub(population);
        let highest = row.min(col);

        let mut previous: Option<f64> = None;
        for k11 in lowest..=highest {
            if (k11 as f64) < expected {
                continue;
            }
            let score = log_likelihood_ratio(
                k11,
                row - k11,
                col - k11,
                population + k11 - row - col,
            );
            if let Some(prev) = previous {
                prop_assert!(score > prev, "k11 = {}: {} <= {}", k11, score, prev);
            }
            previous = Some(score);
        }
    }

    // Contingency properties
    #[test]
    fn contingency_tables_partition_population(data in interactions_strategy()) {
        for context in [Axis::User, Axis::Item] {
            let cooccurrences = Cooccurrences::count(&data, context);
            let builder = ContingencyTableBuilder::from_cooccurrences(&cooccurrences);
            for pair in cooccurrences.pairs() {
                let table = builder.build_pair(pair).expect("tables from real input are consistent");
                prop_assert_eq!(table.total(), cooccurrences.population());
                prop_assert_eq!(table.k11, pair.count);
            }
        }
    }

    // Ranking properties
    #[test]
    fn top_k_ranks_are_contiguous(pairs in scored_pairs_strategy(), k in 1usize..6) {
        let ranked = TopKRanker::new(k).rank(pairs);
        let ranks = ranks_by_anchor(ranked.iter().map(|r| (r.anchor, r.rank)));
        for (anchor, ranks) in ranks {
            prop_assert!(ranks.len() <= k, "anchor {} kept {}", anchor, ranks.len());
            let expected: Vec<usize> = (1..=ranks.len()).collect();
            prop_assert_eq!(ranks, expected);
        }
        for window in ranked.windows(2) {
            if window[0].anchor == window[1].anchor {
                prop_assert!(window[0].score >= window[1].score);
            }
        }
    }

    #[test]
    fn top_k_keeps_the_best_candidates(pairs in scored_pairs_strategy(), k in 1usize..6) {
        let ranked = TopKRanker::new(k).rank(pairs.clone());
        for kept in &ranked {
            let better = pairs
                .iter()
                .filter(|p| p.anchor == kept.anchor && p.score > kept.score)
                .count();
            prop_assert!(better < k);
        }
    }

    #[test]
    fn threshold_filter_is_inclusive(pairs in scored_pairs_strategy(), threshold in 0.0f64..1.0) {
        let expected = pairs.iter().filter(|p| p.score >= threshold).count();
        let kept = rank::apply_threshold(pairs, threshold);
        prop_assert_eq!(kept.len(), expected);
        prop_assert!(kept.iter().all(|p| p.score >= threshold));
    }

    // Job properties
    #[test]
    fn item_similarity_respects_bounds(
        data in interactions_strategy(),
        k in 1usize..5,
        threshold in 0.0f64..0.9,
    ) {
        let config = ItemSimilarityConfig::default()
            .with_max_similarities_per_item(k)
            .with_threshold(threshold);
        let table = ItemSimilarityJob::new(config)
            .expect("valid config")
            .run(&data, &NullReporter)
            .expect("job succeeds");

        let mut per_item: BTreeMap<EntityId, usize> = BTreeMap::new();
        for row in &table {
            prop_assert_ne!(row.item1, row.item2);
            prop_assert!(f64::from(row.llr) >= threshold);
            prop_assert!(row.llr >= 0.0 && row.llr <= 1.0);
            *per_item.entry(row.item1).or_default() += 1;
        }
        prop_assert!(per_item.values().all(|&n| n <= k));
    }

    #[test]
    fn user_recommendations_exclude_known_items(
        data in interactions_strategy(),
        neighbors in 1usize..6,
        recommendations in 1usize..6,
    ) {
        let config = UserSimilarityConfig::default()
            .with_num_neighbors(neighbors)
            .with_num_recommendations(recommendations);
        let job = UserSimilarityJob::new(config).expect("valid config");

        let ranked = job.neighbors(&data, &NullReporter).expect("job succeeds");
        let ranks = ranks_by_anchor(ranked.iter().map(|r| (r.anchor, r.rank)));
        prop_assert!(ranks.values().all(|r| r.len() <= neighbors));

        let recs = job.run(&data, &NullReporter).expect("job succeeds");
        let mut per_user: BTreeMap<EntityId, usize> = BTreeMap::new();
        for rec in &recs {
            prop_assert!(!data.contains(rec.user, rec.item), "({}, {}) is known", rec.user, rec.item);
            prop_assert!(rec.llr_agg >= 0.0);
            *per_user.entry(rec.user).or_default() += 1;
        }
        prop_assert!(per_user.values().all(|&n| n <= recommendations));
    }

    #[test]
    fn jobs_ignore_input_order(data in interactions_strategy()) {
        let mut reversed: Vec<Interaction> = data.records().to_vec();
        reversed.reverse();
        let shuffled = Interactions::from_records(reversed);

        let item_job = ItemSimilarityJob::new(ItemSimilarityConfig::default()).expect("valid");
        prop_assert_eq!(
            item_job.run(&data, &NullReporter).expect("job succeeds"),
            item_job.run(&shuffled, &NullReporter).expect("job succeeds")
        );

        let user_job = UserSimilarityJob::new(UserSimilarityConfig::default()).expect("valid");
        prop_assert_eq!(
            user_job.run(&data, &NullReporter).expect("job succeeds"),
            user_job.run(&shuffled, &NullReporter).expect("job succeeds")
        );
    }
}

#[cfg(feature = "parallel")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn jobs_are_deterministic_across_pool_sizes(data in interactions_strategy()) {
        let pool = |threads| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .expect("pool")
        };
        let item_job = ItemSimilarityJob::new(ItemSimilarityConfig::default()).expect("valid");
        let user_job = UserSimilarityJob::new(UserSimilarityConfig::default()).expect("valid");

        let single = pool(1).install(|| {
            (
                item_job.run(&data, &NullReporter).expect("job succeeds"),
                user_job.run(&data, &NullReporter).expect("job succeeds"),
            )
        });
        let many = pool(4).install(|| {
            (
                item_job.run(&data, &NullReporter).expect("job succeeds"),
                user_job.run(&data, &NullReporter).expect("job succeeds"),
            )
        });
        prop_assert_eq!(single, many);
    }
}
