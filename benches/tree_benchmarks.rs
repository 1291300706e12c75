use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use verdict::{find_best_split, Dataset, DecisionTree, Row, Value};

fn synthetic_rows(n_rows: usize, seed: u64) -> Vec<Row> {
    let mut rng = StdRng::seed_from_u64(seed);
    let colors = ["Red", "Green", "Yellow", "Purple"];
    (0..n_rows)
        .map(|_| {
            let color = colors[rng.gen_range(0..colors.len())];
            let diameter = rng.gen_range(1..12) as f64;
            let weight = rng.gen_range(50..200) as f64;
            let label = if diameter >= 6.0 || color == "Purple" {
                "large"
            } else {
                "small"
            };
            Row::new(vec![
                Value::from(color),
                Value::from(diameter),
                Value::from(weight),
                Value::from(label),
            ])
        })
        .collect()
}

pub fn tree_benchmarks(c: &mut Criterion) {
    let rows = synthetic_rows(500, 0);
    let dataset = Dataset::new(rows.clone(), None).unwrap();
    let tree = DecisionTree::fit(dataset.clone()).unwrap();
    println!("{} nodes, depth {}", tree.n_nodes(), tree.depth());

    c.bench_function("Find Best Split", |b| {
        b.iter(|| find_best_split(black_box(&rows), black_box(None)))
    });
    c.bench_function("Fit Tree", |b| {
        b.iter(|| DecisionTree::fit(black_box(dataset.clone())).unwrap())
    });
    c.bench_function("Tree Predict (Single Threaded)", |b| {
        b.iter(|| tree.predict_batch(black_box(&rows), black_box(false)))
    });
    c.bench_function("Tree Predict (Multi Threaded)", |b| {
        b.iter(|| tree.predict_batch(black_box(&rows), black_box(true)))
    });
}

criterion_group!(benches, tree_benchmarks);
criterion_main!(benches);
