//! Benchmark suite for the 4bpp tile codec
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench codec

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jaae_benches::{generate_indexed_image, sizes};
use jaae_types::gba::{self, Palette};
use std::hint::black_box;

/// Benchmark packing indexed images into tiles
fn bench_encode_tiles(c: &mut Criterion) {
	let mut group = c.benchmark_group("tile_encode");

	for (name, (width, height)) in [("frame", sizes::FRAME), ("strip", sizes::STRIP), ("tileset", sizes::TILESET)] {
		let image = generate_indexed_image(width, height);
		group.throughput(Throughput::Elements(u64::from(width * height)));
		group.bench_with_input(BenchmarkId::new("encode", name), &image, |b, image| {
			b.iter(|| black_box(gba::encode_tiles(black_box(image))));
		});
	}

	group.finish();
}

/// Benchmark unpacking tiles for display
fn bench_decode_tiles(c: &mut Criterion) {
	let mut group = c.benchmark_group("tile_decode");

	for (name, (width, height)) in [("frame", sizes::FRAME), ("strip", sizes::STRIP), ("tileset", sizes::TILESET)] {
		let packed = match gba::encode_tiles(&generate_indexed_image(width, height)) {
			Ok(packed) => packed,
			Err(e) => {
				eprintln!("Warning: could not encode {name}: {e}");
				continue;
			}
		};
		let tiles_wide = width / gba::TILE_SIZE;
		group.throughput(Throughput::Bytes(packed.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &packed, |b, packed| {
			b.iter(|| black_box(gba::decode_tiles(black_box(packed), tiles_wide)));
		});
	}

	group.finish();
}

/// Benchmark palette decoding and RGBA conversion of a full tileset
fn bench_palette(c: &mut Criterion) {
	let mut group = c.benchmark_group("palette");

	let bytes: Vec<u8> = (0..16 * Palette::SIZE).map(|i| (i * 7) as u8).collect();
	group.bench_function("decode_16_banks", |b| {
		b.iter(|| {
			let palettes: Vec<_> = bytes.chunks(Palette::SIZE).map(Palette::from_bytes).collect();
			black_box(palettes)
		});
	});

	let (width, height) = sizes::TILESET;
	let image = generate_indexed_image(width, height);
	group.throughput(Throughput::Elements(u64::from(width * height)));
	group.bench_function("to_rgba_tileset", |b| {
		b.iter(|| black_box(black_box(&image).to_rgba_image()));
	});

	group.finish();
}

criterion_group!(benches, bench_encode_tiles, bench_decode_tiles, bench_palette);
criterion_main!(benches);
