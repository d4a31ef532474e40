use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use dlc_compiler::{flatten_all, parse_list, ListStore};
use dlc_core::types::ListName;

/// `depth` lists, each including the next and adding `width` domains.
fn chain_store(depth: usize, width: usize) -> ListStore {
    let mut store = ListStore::new();
    for i in 0..depth {
        let mut text = String::new();
        if i + 1 < depth {
            text.push_str(&format!("include:list{}\n", i + 1));
        }
        for j in 0..width {
            text.push_str(&format!("d{i}-{j}.example.com @tag{}\n", j % 4));
        }
        let name = format!("list{i}");
        let directives = parse_list(&ListName::new(&name), &text).expect("generated source parses");
        store.register(&name, directives).expect("fresh store accepts lists");
    }
    store
}

fn bench_flatten(c: &mut Criterion) {
    c.bench_function("flatten_chain_200x50", |b| {
        b.iter_batched(
            || chain_store(200, 50),
            |mut store| black_box(flatten_all(&mut store).expect("chain has no cycles")),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_flatten);
criterion_main!(benches);
