use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mesh_refine::driver::refine_uniform;
use mesh_refine::mesh::{Element, MeshContext};
use mesh_refine::pattern::LineRefiner;
use mesh_refine::topology::cell_type::CellType;
use mesh_refine::topology::node::{ElementId, NodeId};

fn chain(n: usize) -> Vec<Element> {
    (0..n)
        .map(|i| {
            Element::new(
                ElementId::new(1_000_000 + i as u64).unwrap(),
                CellType::Line2,
                [
                    NodeId::new(i as u64 + 1).unwrap(),
                    NodeId::new(i as u64 + 2).unwrap(),
                ],
            )
            .unwrap()
        })
        .collect()
}

fn bench_uniform_pass(c: &mut Criterion) {
    let mesh = MeshContext::new(2);
    let pattern = LineRefiner::new(&mesh, CellType::Line2).unwrap();

    let mut group = c.benchmark_group("uniform_pass");
    for &n in &[1_000usize, 10_000, 100_000] {
        let parents = chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &parents, |b, parents| {
            b.iter(|| refine_uniform(&pattern, black_box(parents)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_uniform_pass);
criterion_main!(benches);
