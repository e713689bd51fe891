//! Image packet assembly benchmark
//!
//! The packet builder runs once per pushed frame, copying the full pixel
//! payload behind a 20-byte header; this tracks that the copy stays the
//! only cost.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use protocol::{BYTES_PER_PIXEL, build_image_packet, decode_lcd_info};

fn bench_build_image_packet(c: &mut Criterion) {
    let pixels = vec![0x7f; 640 * 480 * BYTES_PER_PIXEL];

    c.bench_function("build_image_packet 640x480", |b| {
        b.iter(|| build_image_packet(black_box(640), black_box(480), black_box(&pixels)))
    });
}

fn bench_decode_lcd_info(c: &mut Criterion) {
    let response = [0x80, 0x02, 0xe0, 0x01, 0x01, 0x00, 0x64, 0x00];

    c.bench_function("decode_lcd_info", |b| {
        b.iter(|| decode_lcd_info(black_box(&response)))
    });
}

criterion_group!(benches, bench_build_image_packet, bench_decode_lcd_info);
criterion_main!(benches);
