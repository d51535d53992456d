//! Benchmark suite for LZ77 decompression of tileset graphics
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench lz77

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jaae_benches::{generate_lz77_stream, lz77_output_size, sizes};
use jaae_types::file::lz77;
use std::hint::black_box;

fn bench_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz77_decompress");

	for groups in [1, 16, sizes::LZ77_TILESET_GROUPS] {
		let stream = generate_lz77_stream(groups);
		group.throughput(Throughput::Bytes(lz77_output_size(groups) as u64));
		group.bench_with_input(BenchmarkId::from_parameter(groups), &stream, |b, stream| {
			b.iter(|| black_box(lz77::decompress(black_box(stream))));
		});
	}

	group.finish();
}

/// Decompressing a tileset then unpacking it, as loading one from a ROM does
fn bench_decompress_and_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz77_tileset_load");
	let stream = generate_lz77_stream(sizes::LZ77_TILESET_GROUPS);

	group.bench_function("decompress_decode", |b| {
		b.iter(|| {
			let image = lz77::decompress(black_box(&stream))
				.and_then(|(graphics, _)| jaae_types::gba::decode_tiles(&graphics, 16));
			black_box(image)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_decompress, bench_decompress_and_decode);
criterion_main!(benches);
