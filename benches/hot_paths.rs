use aus_covid_map::braille::BrailleCanvas;
use aus_covid_map::map::geometry::fill_rings;
use aus_covid_map::map::MapRenderer;
use aus_covid_map::model::{RegionShape, RegionTotalsIndex, SelectionState};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use std::collections::HashMap;
use std::hint::black_box;

/// Regular polygon with `n` vertices, roughly the detail of a simplified state outline
fn ring(cx: f64, cy: f64, r: f64, n: usize) -> Vec<DVec2> {
    let mut points: Vec<DVec2> = (0..n)
        .map(|i| {
            let a = i as f64 / n as f64 * std::f64::consts::TAU;
            // Wobble so scanlines cross many edges
            let rr = r * (1.0 + 0.08 * (a * 7.0).sin());
            DVec2::new(cx + rr * a.cos(), cy + rr * a.sin())
        })
        .collect();
    points.push(points[0]);
    points
}

fn shapes() -> Vec<RegionShape> {
    let centres = [
        ("WA", 122.0, -25.0, 8.0),
        ("NT", 133.0, -19.0, 5.0),
        ("SA", 135.0, -30.0, 5.0),
        ("QLD", 144.0, -22.0, 7.0),
        ("NSW", 147.0, -32.5, 4.0),
        ("VIC", 144.5, -37.0, 2.0),
        ("TAS", 146.5, -42.0, 1.2),
        ("ACT", 149.0, -35.5, 0.4),
    ];
    centres
        .iter()
        .map(|&(code, lon, lat, r)| RegionShape {
            code: code.to_string(),
            name: code.to_string(),
            polygons: vec![vec![ring(lon, lat, r, 400)]],
        })
        .collect()
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_rings");
    for n in [64usize, 512, 4096] {
        let rings = vec![ring(160.0, 80.0, 70.0, n)];
        group.bench_with_input(BenchmarkId::from_parameter(n), &rings, |b, rings| {
            b.iter(|| {
                let mut canvas = BrailleCanvas::new(160, 40);
                fill_rings(&mut canvas, black_box(rings));
                black_box(canvas.count_pixels())
            })
        });
    }
    group.finish();
}

fn bench_region_at(c: &mut Criterion) {
    let renderer = MapRenderer::new();
    let shapes = shapes();
    let viewport = renderer.viewport(&shapes, 200, 160);
    c.bench_function("region_at_sweep", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for py in (0..160).step_by(8) {
                for px in (0..200).step_by(8) {
                    if renderer
                        .region_at(&shapes, &viewport, px as f64, py as f64)
                        .is_some()
                    {
                        hits += 1;
                    }
                }
            }
            black_box(hits)
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let renderer = MapRenderer::new();
    let shapes = shapes();
    let deaths: HashMap<String, f64> = shapes
        .iter()
        .enumerate()
        .map(|(i, s)| (s.code.clone(), i as f64 * 900.0))
        .collect();
    let totals = RegionTotalsIndex::new(deaths, HashMap::new());
    let selection = SelectionState::default();
    c.bench_function("map_render_100x40", |b| {
        b.iter(|| {
            let layers = renderer.render(&shapes, 100, 40, &totals, &selection, Some("NSW"));
            black_box(layers.fills.len())
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let renderer = MapRenderer::new();
    c.bench_function("classify_7000", |b| {
        b.iter(|| {
            let mut last = None;
            for v in 0..7000 {
                last = Some(renderer.classify(Some(black_box(v as f64))));
            }
            black_box(last)
        })
    });
}

criterion_group!(benches, bench_fill, bench_region_at, bench_render, bench_classify);
criterion_main!(benches);
