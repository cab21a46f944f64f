use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use tablekv::config::StoreConfig;
use tablekv::store::{self, BackendKind};
use tablekv::traits::store_ops::KvStore;
use tempfile::TempDir;

const BACKENDS: [BackendKind; 2] = [BackendKind::Json, BackendKind::Sqlite];

fn create_store(kind: BackendKind) -> (Box<dyn KvStore>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = match kind {
        BackendKind::Json => temp_dir.path().join("json"),
        BackendKind::Sqlite => temp_dir.path().join("bench.sqlite3"),
    };
    let config = StoreConfig::builder().path(path).use_fsync(false).build();
    (store::open(kind, config).unwrap(), temp_dir)
}

fn sample_value(id: usize) -> Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("user{id}@example.com"),
        "tags": ["a", "b", "c"],
    })
}

fn bench_single_key_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_key_operations");

    for kind in BACKENDS {
        group.bench_with_input(BenchmarkId::new("set", kind), &kind, |b, &kind| {
            b.iter_batched(
                || create_store(kind),
                |(store, _temp)| {
                    let _ = black_box(store.set("user", sample_value(1), "main"));
                },
                criterion::BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("get_from_100", kind), &kind, |b, &kind| {
            let (store, _temp) = create_store(kind);
            for i in 0..100 {
                store.set(&format!("user{i}"), sample_value(i), "main").unwrap();
            }
            b.iter(|| black_box(store.get("user50", "main").unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("all_of_100", kind), &kind, |b, &kind| {
            let (store, _temp) = create_store(kind);
            for i in 0..100 {
                store.set(&format!("user{i}"), sample_value(i), "main").unwrap();
            }
            b.iter(|| black_box(store.all("main").unwrap().len()))
        });
    }

    group.finish();
}

fn bench_growing_table_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("growing_table_writes");
    group.sample_size(20);

    for kind in BACKENDS {
        group.bench_with_input(BenchmarkId::new("set_100_keys", kind), &kind, |b, &kind| {
            b.iter_batched(
                || create_store(kind),
                |(store, _temp)| {
                    for i in 0..100 {
                        let _ = black_box(store.set(&format!("user{i}"), sample_value(i), "main"));
                    }
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_key_operations, bench_growing_table_writes);
criterion_main!(benches);
