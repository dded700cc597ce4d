use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ordered_cow_set::OrderedSet;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn filled(seed: u64, n: usize) -> OrderedSet<u64> {
    lcg(seed).take(n).collect()
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("ordered_set_insert_10k", |b| {
        b.iter_batched(
            OrderedSet::<u64>::new,
            |mut s| {
                for x in lcg(1).take(10_000) {
                    s.insert(x);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_at_front(c: &mut Criterion) {
    c.bench_function("ordered_set_insert_at_front_2k", |b| {
        b.iter_batched(
            OrderedSet::<u64>::new,
            |mut s| {
                for x in lcg(3).take(2_000) {
                    s.insert_at(0, x);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_contains_hit(c: &mut Criterion) {
    c.bench_function("ordered_set_contains_hit", |b| {
        let keys: Vec<u64> = lcg(7).take(20_000).collect();
        let s: OrderedSet<u64> = keys.iter().copied().collect();
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(s.contains(k));
        })
    });
}

fn bench_contains_miss(c: &mut Criterion) {
    c.bench_function("ordered_set_contains_miss", |b| {
        let s = filled(11, 10_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = miss.next().unwrap();
            black_box(s.contains(&k));
        })
    });
}

fn bench_clone_then_mutate(c: &mut Criterion) {
    c.bench_function("ordered_set_clone_then_insert_10k", |b| {
        let s = filled(13, 10_000);
        b.iter(|| {
            let mut copy = s.clone();
            copy.insert(u64::MAX);
            black_box(copy);
        })
    });
}

fn bench_replace_range(c: &mut Criterion) {
    c.bench_function("ordered_set_replace_middle_range", |b| {
        let s = filled(17, 10_000);
        let incoming: Vec<u64> = lcg(19).take(500).collect();
        b.iter_batched(
            || s.clone(),
            |mut s| {
                s.replace_range(4_000..5_000, incoming.iter().copied());
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_algebra(c: &mut Criterion) {
    let a = filled(23, 5_000);
    let b_set: OrderedSet<u64> = a
        .iter()
        .step_by(2)
        .copied()
        .chain(lcg(29).take(2_500))
        .collect();
    c.bench_function("ordered_set_union_5k", |b| {
        b.iter(|| black_box(a.union(&b_set)))
    });
    c.bench_function("ordered_set_intersect_5k", |b| {
        b.iter(|| black_box(a.intersect(&b_set)))
    });
    c.bench_function("ordered_set_exclusive_or_5k", |b| {
        b.iter(|| black_box(a.exclusive_or(&b_set)))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_insert_at_front, bench_contains_hit, bench_contains_miss,
        bench_clone_then_mutate, bench_replace_range, bench_algebra
}
criterion_main!(benches);
