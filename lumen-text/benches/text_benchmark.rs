use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lumen_text::{CosmicLayout, GenerationSettings, GlyphLayout, MonospaceLayout};

const PARAGRAPH: &str = "The quick brown fox <material=shadow x=1 y=-1>jumps</material> over \
    the lazy dog. <color=#ff3300><size=20>Lorem ipsum</size></color> dolor sit amet, \
    consectetur adipiscing elit. <b>Sed do eiusmod</b> tempor incididunt ut labore.";

fn bench_monospace_populate(c: &mut Criterion) {
    let mut engine = MonospaceLayout::new();
    let settings = GenerationSettings::default();
    c.bench_function("monospace_populate", |b| {
        b.iter(|| engine.populate(black_box(PARAGRAPH), black_box(&settings)).len());
    });
}

fn bench_cosmic_populate(c: &mut Criterion) {
    let mut engine = CosmicLayout::new();
    let settings = GenerationSettings::default();
    c.bench_function("cosmic_populate", |b| {
        b.iter(|| engine.populate(black_box(PARAGRAPH), black_box(&settings)).len());
    });
}

fn bench_cosmic_measure_cached(c: &mut Criterion) {
    let mut engine = CosmicLayout::new();
    let settings = GenerationSettings::default();
    c.bench_function("cosmic_preferred_width_cached", |b| {
        b.iter(|| engine.preferred_width(black_box("<size=30>i</size>"), black_box(&settings)));
    });
}

criterion_group!(
    benches,
    bench_monospace_populate,
    bench_cosmic_populate,
    bench_cosmic_measure_cached,
);
criterion_main!(benches);
