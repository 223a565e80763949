use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fleetgraph_bench::synthetic_fleet;
use fleetgraph_core::ResourceKind;
use fleetgraph_events::LayoutAlgorithm;
use fleetgraph_graph::{
    FilterState, Fingerprint, GraphBuilder, GraphView, LayoutSettings, PositionLocks, filter,
    layout_graph,
};
use std::hint::black_box;

const SIZES: [usize; 3] = [16, 128, 512];

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for algorithm in [LayoutAlgorithm::Rank, LayoutAlgorithm::Layered] {
        let settings = LayoutSettings {
            algorithm,
            ..LayoutSettings::default()
        };
        let layouter = settings.layouter();
        let headers = settings.header_placement();
        let locks = PositionLocks::new();

        for size in SIZES {
            let graph = GraphBuilder::default().build(&synthetic_fleet(size));
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", algorithm), size),
                &graph,
                |b, graph| {
                    b.iter(|| {
                        let mut graph = graph.clone();
                        layout_graph(layouter.as_ref(), &mut graph, &locks, &headers);
                        black_box(graph);
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let fleet = synthetic_fleet(512);
    c.bench_function("fingerprint_512_agents", |b| {
        b.iter(|| black_box(Fingerprint::of(black_box(&fleet))))
    });
}

fn bench_refresh_without_changes(c: &mut Criterion) {
    let fleet = synthetic_fleet(512);
    let mut view = GraphView::default();
    view.update(&fleet);

    c.bench_function("refresh_reuses_layout_512_agents", |b| {
        b.iter(|| black_box(view.update(black_box(&fleet))))
    });
}

fn bench_filter(c: &mut Criterion) {
    let graph = GraphBuilder::default().build(&synthetic_fleet(512));
    let state = FilterState::new([ResourceKind::Agent], [], "agent-1");
    c.bench_function("filter_512_agents", |b| {
        b.iter(|| black_box(filter::apply(black_box(&graph), &state)))
    });
}

criterion_group!(
    benches,
    bench_layout,
    bench_fingerprint,
    bench_refresh_without_changes,
    bench_filter
);
criterion_main!(benches);
