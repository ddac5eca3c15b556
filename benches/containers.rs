#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::BTreeMap;

use bid_index::{Bid, ChainedHashTable, OrderedTree};
use criterion::{Criterion, criterion_group, criterion_main};
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn bid_index_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let bids: Vec<Bid> = any::<[u32; ITEMS_AMOUNT]>()
        .new_tree(&mut runner)
        .unwrap()
        .current()
        .iter()
        .map(|id| Bid::new(id.to_string(), "Lot", "General Fund", 1.0))
        .collect();

    let mut group = c.benchmark_group("Bid index comparison benchmark");
    group.sample_size(SAMPLE_SIZE);

    group.bench_function("hash table insert", |b| {
        b.iter(|| {
            let mut table = ChainedHashTable::new();
            for bid in bids.clone() {
                table.insert(bid).unwrap();
            }
            table
        });
    });
    group.bench_function("tree insert", |b| {
        b.iter(|| {
            let mut tree = OrderedTree::new();
            for bid in bids.clone() {
                tree.insert(bid);
            }
            tree
        });
    });
    group.bench_function("balanced tree build", |b| {
        b.iter(|| OrderedTree::from_sorted(bids.clone()));
    });
    group.bench_function("rust std btree insert", |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for bid in bids.clone() {
                map.insert(bid.id.clone(), bid);
            }
            map
        });
    });

    let mut table = ChainedHashTable::new();
    let mut tree = OrderedTree::new();
    let mut map = BTreeMap::new();
    for bid in bids.clone() {
        table.insert(bid.clone()).unwrap();
        tree.insert(bid.clone());
        map.insert(bid.id.clone(), bid);
    }

    group.bench_function("hash table search", |b| {
        b.iter(|| {
            for bid in &bids {
                let _ = table.get(&bid.id);
            }
        });
    });
    group.bench_function("tree search", |b| {
        b.iter(|| {
            for bid in &bids {
                let _ = tree.get(&bid.id);
            }
        });
    });
    group.bench_function("rust std btree search", |b| {
        b.iter(|| {
            for bid in &bids {
                let _ = map.get(&bid.id);
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bid_index_benches);

criterion_main!(benches);
