use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iq_render::prelude::*;

fn fsk_tones(n: usize) -> Vec<Tone> {
    let mut tones = Vec::with_capacity(n + 1);
    for i in 0..n {
        let hz = if i % 2 == 0 { 50_000 } else { -50_000 };
        tones.push(Tone::new(hz, -3, 0, 200));
    }
    tones.push(TONE_END);
    tones
}

fn render_cu8(tones: &[Tone]) -> (Vec<u8>, RenderStats) {
    let spec = RenderSpec { sample_format: Format::Cu8, ..Default::default() };
    render_to_buffer(&spec, tones, &AbortFlag::new()).unwrap()
}

fn render_cs16(tones: &[Tone]) -> (Vec<u8>, RenderStats) {
    let spec = RenderSpec { sample_format: Format::Cs16, ..Default::default() };
    render_to_buffer(&spec, tones, &AbortFlag::new()).unwrap()
}

fn render_cu12(tones: &[Tone]) -> (Vec<u8>, RenderStats) {
    let spec = RenderSpec { sample_format: Format::Cu12, ..Default::default() };
    render_to_buffer(&spec, tones, &AbortFlag::new()).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let short = fsk_tones(100);
    let long = fsk_tones(10_000);

    c.bench_function("render_cu8_short", |b| b.iter(|| render_cu8(black_box(&short))));
    c.bench_function("render_cu8_long", |b| b.iter(|| render_cu8(black_box(&long))));
    c.bench_function("render_cs16_long", |b| b.iter(|| render_cs16(black_box(&long))));
    c.bench_function("render_cu12_long", |b| b.iter(|| render_cu12(black_box(&long))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
