//! Frame data benchmark: allocation and per-frame resize cost.
//!
//! Target: steady-state frames perform no allocation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use framedata::{BitmapData, DataPool, GlyphKey, GlyphKeyData, Typeface};

fn allocate_vs_zeroed_vec(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");
    for size in [4 * 1024, 256 * 1024, 4 * 1024 * 1024] {
        group.bench_with_input(BenchmarkId::new("data_of_length", size), &size, |b, &size| {
            b.iter(|| BitmapData::data_of_length(black_box(size)));
        });
        group.bench_with_input(BenchmarkId::new("vec_zeroed", size), &size, |b, &size| {
            b.iter(|| vec![0u8; black_box(size)]);
        });
    }
    group.finish();
}

fn shrink_grow_cycle(c: &mut Criterion) {
    let mut data = BitmapData::data_of_length(1024 * 1024);
    c.bench_function("set_length_shrink_grow", |b| {
        b.iter(|| {
            data.set_length(black_box(1024));
            data.set_length(black_box(1024 * 1024));
        });
    });
}

fn glyph_key_frame(c: &mut Criterion) {
    // 200x50 grid, one key per cell
    let cells = 200 * 50;
    let pool = DataPool::<GlyphKey>::new(2);

    c.bench_function("glyph_key_frame_200x50", |b| {
        b.iter(|| {
            let mut keys: GlyphKeyData = pool.acquire(cells);
            let base = keys.base_pointer();
            for i in 0..cells {
                let ch = char::from(b'A' + (i % 26) as u8);
                // SAFETY: `i < cells == len_records()`.
                unsafe { base.add(i).write(GlyphKey::new(ch, Typeface::empty())) };
            }
            keys.set_count(cells);
            keys.check_for_overrun();
            pool.recycle(keys);
        });
    });
}

criterion_group!(benches, allocate_vs_zeroed_vec, shrink_grow_cycle, glyph_key_frame);
criterion_main!(benches);
