use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use llr_similarity::config::{ItemSimilarityConfig, UserSimilarityConfig};
use llr_similarity::cooccurrence::Cooccurrences;
use llr_similarity::interactions::{Axis, EntityId, Interactions};
use llr_similarity::item_similarity::ItemSimilarityJob;
use llr_similarity::observe::NullReporter;
use llr_similarity::user_similarity::UserSimilarityJob;

/// Synthetic log with a skewed item popularity: low item ids are bought often.
fn generate_interactions(users: usize, basket: usize, catalog: usize) -> Interactions {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let mut pairs = Vec::with_capacity(users * basket);
    for user in 0..users {
        for _ in 0..basket {
            let a = next() % catalog as u64;
            let b = next() % catalog as u64;
            pairs.push((user as EntityId, a.min(b) as EntityId));
        }
    }
    Interactions::from_pairs(pairs)
}

fn bench_cooccurrence_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("cooccurrence_count");

    for users in [1_000, 10_000].iter() {
        let data = generate_interactions(*users, 20, 2_000);
        group.bench_with_input(BenchmarkId::from_parameter(users), &data, |b, data| {
            b.iter(|| Cooccurrences::count(black_box(data), Axis::User));
        });
    }

    group.finish();
}

fn bench_item_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_similarity_job");
    group.sample_size(20);

    let job = ItemSimilarityJob::new(ItemSimilarityConfig::default()).expect("valid config");
    for users in [1_000, 10_000].iter() {
        let data = generate_interactions(*users, 20, 2_000);
        group.bench_with_input(BenchmarkId::from_parameter(users), &data, |b, data| {
            b.iter(|| {
                job.run(black_box(data), &NullReporter)
                    .expect("should succeed")
            });
        });
    }

    group.finish();
}

fn bench_user_similarity(c: &mut Criterion) {
    let data = generate_interactions(2_000, 10, 500);
    let job = UserSimilarityJob::new(UserSimilarityConfig::default().with_max_prefs(Some(200)))
        .expect("valid config");

    c.bench_function("user_similarity_2k_users", |b| {
        b.iter(|| {
            job.run(black_box(&data), &NullReporter)
                .expect("should succeed")
        });
    });
}

criterion_group!(
    benches,
    bench_cooccurrence_count,
    bench_item_similarity,
    bench_user_similarity
);
criterion_main!(benches);
