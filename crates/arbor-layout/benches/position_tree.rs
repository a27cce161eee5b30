use arbor_layout::{ChartConfig, NodeSpec, Orientation, Tree};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

/// Complete tree with `fanout` children per node; leaf widths vary so apportion has work to do.
fn build_spec(depth: usize, fanout: usize, seed: &mut u64) -> NodeSpec {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let width = 60.0 + (*seed >> 58) as f64 * 5.0;
    let spec = NodeSpec::sized(width, 40.0);
    if depth == 0 {
        return spec;
    }
    // Uneven fanout keeps subtrees from lining up.
    let n = if depth % 2 == 0 {
        fanout
    } else {
        fanout.saturating_sub(1).max(1)
    };
    spec.with_children((0..n).map(|_| build_spec(depth - 1, fanout, seed)).collect())
}

fn bench_position_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_tree");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("d4_f3", 4usize, 3usize, Orientation::North),
        ("d6_f4", 6usize, 4usize, Orientation::North),
        ("d6_f4_west", 6usize, 4usize, Orientation::West),
    ];

    for (name, depth, fanout, orientation) in cases {
        let spec = build_spec(depth, fanout, &mut 7);
        let config = ChartConfig {
            root_orientation: orientation,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("Tree::position_tree", name), &spec, |b, spec| {
            b.iter_batched(
                || Tree::with_config(config.clone(), spec).unwrap(),
                |mut tree| {
                    black_box(tree.position_tree());
                    black_box(tree.nodes().len());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_position_tree);
criterion_main!(benches);
