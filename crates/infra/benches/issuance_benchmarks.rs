use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use workwear_core::{Aggregate, IssuanceRequest, Size, StockEntry};
use workwear_infra::store::InMemoryInventoryStore;
use workwear_infra::{IssuanceProcessor, StockGate};
use workwear_inventory::{decode, encode, IssuanceCommand, IssuanceLedger};

/// `items` items with three types each, every canonical size stocked.
fn stock(items: usize) -> Vec<StockEntry> {
    let mut entries = Vec::with_capacity(items * 3 * Size::CANONICAL.len());
    for i in 0..items {
        for t in ["Orange", "Red", "Black"] {
            for size in Size::CANONICAL {
                entries.push(StockEntry::new(format!("Item {i}"), t, size.as_str(), 1_000));
            }
        }
    }
    entries
}

fn batch(lines: usize) -> Vec<IssuanceRequest> {
    (0..lines)
        .map(|i| {
            let size = Size::CANONICAL[i % Size::CANONICAL.len()];
            IssuanceRequest::new("2024-07-01", "Ivan", "Petro", "Item 0", "Red", size.as_str(), 1)
                .unwrap()
        })
        .collect()
}

fn bench_grid_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_codec");

    for items in [10, 100, 500] {
        let entries = stock(items);
        let grid = encode(&entries).unwrap();
        group.throughput(Throughput::Elements(entries.len() as u64));

        group.bench_with_input(BenchmarkId::new("decode", items), &grid, |b, grid| {
            b.iter(|| decode(black_box(grid)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("encode", items), &entries, |b, entries| {
            b.iter(|| encode(black_box(entries)).unwrap());
        });
    }

    group.finish();
}

fn bench_ledger_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_decision");
    let ledger = IssuanceLedger::new(stock(1).into_iter().map(|e| (e.key(), e.quantity)));

    for lines in [1, 10, 100] {
        let command = IssuanceCommand::IssueBatch(batch(lines));
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &command, |b, command| {
            b.iter(|| ledger.handle(black_box(command)).unwrap());
        });
    }

    group.finish();
}

fn bench_in_memory_issuance(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("in_memory_issuance");

    for lines in [1, 10] {
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_function(BenchmarkId::from_parameter(lines), |b| {
            b.iter_batched(
                || {
                    let store = InMemoryInventoryStore::with_stock(stock(5));
                    (IssuanceProcessor::new(store, StockGate::new()), batch(lines))
                },
                |(processor, batch)| {
                    runtime.block_on(async {
                        processor.process(batch).await.unwrap();
                    })
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_codec, bench_ledger_decision, bench_in_memory_issuance);
criterion_main!(benches);
