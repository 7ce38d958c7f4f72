use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use crmviz::config::Config;
use crmviz::dot::to_dot;
use crmviz::ir::{Edge, Geometry, PositionedGraph, PositionedNode};
use crmviz::layout::compute_placement;
use crmviz::parser::parse_dsl;
use crmviz::positioned_to_scene;
use std::hint::black_box;

fn chain_source(nodes: usize, extra_edges: usize) -> String {
    let mut out = String::from("crm {\n");
    for i in 0..nodes {
        out.push_str(&format!("  N{} \"E22 Human-Made Object | Item {}\"\n", i, i));
    }
    for i in 0..nodes.saturating_sub(1) {
        out.push_str(&format!("  N{} -> N{} : P46 is composed of\n", i, i + 1));
    }
    let mut count = 0usize;
    'outer: for i in 0..nodes {
        for j in (i + 2)..nodes {
            if count >= extra_edges {
                break 'outer;
            }
            out.push_str(&format!("  N{} -> N{} : P130 shows features of\n", i, j));
            count += 1;
        }
    }
    out.push_str("}\n");
    out
}

fn grid_graph(side: usize) -> PositionedGraph {
    let mut graph = PositionedGraph::new();
    for row in 0..side {
        for col in 0..side {
            graph.nodes.push(PositionedNode::new(
                format!("n{row}_{col}"),
                format!("E55 Type | Cell {row},{col}"),
                Geometry {
                    x: col as f64 * 300.0,
                    y: row as f64 * 160.0,
                    ..Geometry::default()
                },
            ));
            if col > 0 {
                graph.edges.push(Edge::new(
                    format!("n{row}_{}", col - 1),
                    format!("n{row}_{col}"),
                    Some("P127 has broader term".to_string()),
                ));
            }
            if row > 0 {
                graph.edges.push(Edge::new(
                    format!("n{}_{col}", row - 1),
                    format!("n{row}_{col}"),
                    None,
                ));
            }
        }
    }
    graph
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for nodes in [10usize, 100, 1000] {
        let input = chain_source(nodes, nodes);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &input, |b, data| {
            b.iter(|| black_box(parse_dsl(black_box(data)).graph.nodes.len()));
        });
    }
    group.finish();
}

fn bench_dot(c: &mut Criterion) {
    let config = Config::default();
    let mut group = c.benchmark_group("dot");
    for nodes in [10usize, 100, 1000] {
        let graph = parse_dsl(&chain_source(nodes, nodes)).graph;
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &graph, |b, graph| {
            b.iter(|| black_box(to_dot(graph, &config.theme, &config.dot).len()));
        });
    }
    group.finish();
}

fn bench_placement(c: &mut Criterion) {
    let config = Config::default();
    let mut group = c.benchmark_group("placement");
    for side in [4usize, 16, 48] {
        let graph = grid_graph(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &graph, |b, graph| {
            b.iter(|| {
                let placement = compute_placement(graph, &config.placement, &config.render);
                black_box(placement.edges.len());
            });
        });
    }
    group.finish();
}

fn bench_scene(c: &mut Criterion) {
    let config = Config::default();
    let graph = grid_graph(16);
    c.bench_function("scene/16", |b| {
        b.iter(|| {
            let scene = positioned_to_scene(black_box(&graph), &config).expect("scene failed");
            black_box(scene.shapes.len());
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_dot, bench_placement, bench_scene
);
criterion_main!(benches);
