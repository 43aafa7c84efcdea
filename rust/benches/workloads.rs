use btree_engine::{BTree, DEFAULT_MIN_DEGREE};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

const RECORDS: u64 = 100_000;

fn shuffled_keys(count: u64, seed: u64) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..count).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

fn bulk_load_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_load");

    for min_degree in [4, 16, DEFAULT_MIN_DEGREE] {
        group.bench_with_input(
            BenchmarkId::new("sorted", min_degree),
            &min_degree,
            |b, &min_degree| {
                b.iter(|| {
                    let mut tree = BTree::with_natural_order(min_degree).unwrap();
                    tree.bulk_load(0..RECORDS).unwrap();
                    black_box(tree.height())
                })
            },
        );
    }

    group.finish();
}

fn insert_delete_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_delete");
    let keys = shuffled_keys(RECORDS, 1);

    for min_degree in [4, 16, DEFAULT_MIN_DEGREE] {
        group.bench_with_input(
            BenchmarkId::new("our_tree", min_degree),
            &min_degree,
            |b, &min_degree| {
                b.iter(|| {
                    let mut tree = BTree::with_natural_order(min_degree).unwrap();
                    for &key in &keys {
                        tree.insert(key).unwrap();
                    }
                    for &key in &keys {
                        tree.remove(&key).unwrap();
                    }
                    black_box(tree.is_empty())
                })
            },
        );
    }

    group.bench_function("std_btreeset", |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &key in &keys {
                set.insert(key);
            }
            for key in &keys {
                set.remove(key);
            }
            black_box(set.is_empty())
        })
    });

    group.finish();
}

fn mixed_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_70_30");

    // Pre-generate the operation stream: 70% inserts of fresh keys, 30% removals
    // of keys inserted earlier.
    let mut rng = StdRng::seed_from_u64(70);
    let mut live = Vec::new();
    let mut next_key = 0u64;
    let mut ops = Vec::with_capacity(RECORDS as usize);
    for _ in 0..RECORDS {
        if live.is_empty() || rng.gen_bool(0.7) {
            ops.push((true, next_key));
            live.push(next_key);
            next_key += 1;
        } else {
            let victim = live.swap_remove(rng.gen_range(0..live.len()));
            ops.push((false, victim));
        }
    }

    group.bench_function("our_tree", |b| {
        b.iter(|| {
            let mut tree = BTree::with_natural_order(DEFAULT_MIN_DEGREE).unwrap();
            for &(insert, key) in &ops {
                if insert {
                    tree.insert(key).unwrap();
                } else {
                    tree.remove(&key).unwrap();
                }
            }
            black_box(tree.len())
        })
    });

    group.finish();
}

fn range_scan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_scan");

    let mut tree = BTree::with_natural_order(DEFAULT_MIN_DEGREE).unwrap();
    tree.bulk_load(0..RECORDS).unwrap();

    for width in [100u64, 10_000] {
        let start = RECORDS / 2 - width / 2;
        group.bench_with_input(BenchmarkId::new("bounds", width), &width, |b, &width| {
            b.iter(|| {
                let front = tree.lower_bound(black_box(&start));
                let back = tree.upper_bound(black_box(&(start + width)));
                black_box(tree.range_between(front, back).count())
            })
        });
    }

    group.bench_function("full_walk", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            tree.walk(|record| sum += *record);
            black_box(sum)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bulk_load_benchmark,
    insert_delete_benchmark,
    mixed_benchmark,
    range_scan_benchmark
);
criterion_main!(benches);
