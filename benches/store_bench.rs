//! Benchmarks for MeshKV store operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meshkv::Store;

fn store_benchmarks(c: &mut Criterion) {
    let store = Store::new();
    store.set("bench-hot", b"payload".to_vec(), 0);

    c.bench_function("set_single_key", |b| {
        b.iter(|| {
            store.set(black_box("bench-hot"), b"payload".to_vec(), 0);
        })
    });

    c.bench_function("get_single_key", |b| {
        b.iter(|| {
            let _ = store.get(black_box("bench-hot"));
        })
    });

    c.bench_function("set_spread_keys", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i = i.wrapping_add(1);
            store.set(&format!("bench-{}", i % 1024), b"payload".to_vec(), 0);
        })
    });

    c.bench_function("cas_retry_free", |b| {
        let key = "bench-cas";
        store.set(key, b"seed".to_vec(), 0);
        b.iter(|| {
            let version = store.get_meta(key).unwrap();
            store
                .compare_and_swap(key, version, b"payload".to_vec(), 0)
                .unwrap();
        })
    });
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
