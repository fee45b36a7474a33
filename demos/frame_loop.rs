//! Frame loop: reuse glyph-key and attribute buffers across frames of varying size.
//!
//! Run with `RUST_LOG=framedata=trace` to see when storage actually grows.

use framedata::{
    Attributes, AttributesData, BackgroundColorRle, BackgroundColorRlesData, DataPool, GlyphKey,
    GlyphKeyData, Rgb, Typeface,
};
use std::thread;
use tracing_subscriber::EnvFilter;

const WIDTH: usize = 80;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let keys_pool = DataPool::<GlyphKey>::new(2);
    let recycler = keys_pool.recycler();
    let mut attributes = AttributesData::data_of_length(WIDTH * 24);
    let mut runs = BackgroundColorRlesData::data_of_length(WIDTH);

    // Terminal resized between frames: 24 rows, then 10, then 40.
    for (frame, rows) in [24usize, 10, 40, 24].into_iter().enumerate() {
        let cells = WIDTH * rows;
        let mut keys: GlyphKeyData = keys_pool.acquire(cells);
        attributes.set_len_records(cells);
        runs.clear_runs();

        for i in 0..cells {
            let ch = char::from(b'a' + (i % 26) as u8);
            keys.write(i, GlyphKey::new(ch, Typeface::empty()));
            attributes.write(i, Attributes::new(Rgb::WHITE, Rgb::BLACK));
        }
        keys.set_count(cells);
        runs.push_run(BackgroundColorRle::new(Rgb::BLACK, 0, WIDTH as u16));

        keys.check_for_overrun1();
        attributes.check_for_overrun();
        runs.check_for_overrun();

        println!(
            "frame {frame}: {rows} rows, keys capacity {} records, attributes capacity {} records",
            keys.capacity_records(),
            attributes.capacity_records(),
        );

        // Hand the keys to a "submission" thread, which returns them when done.
        let recycler = recycler.clone();
        thread::spawn(move || {
            keys.check_for_overrun2();
            recycler.recycle(keys);
        })
        .join()
        .expect("submission thread panicked");
    }
}
