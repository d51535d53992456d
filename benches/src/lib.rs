//! Benchmark helper utilities for jaae-rs
//!
//! Synthetic inputs for the tile codec and the LZ77 decoder. Everything is
//! generated, so the suite runs without a ROM.

use jaae_types::gba::{IndexedImage, Palette};

/// Generates an indexed image whose pixels cycle through all 16 colors.
///
/// `width` and `height` should be multiples of 8 so the image encodes.
pub fn generate_indexed_image(width: u32, height: u32) -> IndexedImage {
	let mut image = IndexedImage::new(width, height);
	for y in 0..height {
		for x in 0..width {
			image.set(x, y, ((x * 3 + y * 5) % 16) as u8);
		}
	}
	image.set_palette(&Palette::grayscale());
	image
}

/// Generates an LZ77 stream that expands to `8 + groups * 144` bytes.
///
/// The stream is one block of eight literals followed by `groups` blocks of
/// eight maximum-length back-references, the shape tileset graphics usually have.
pub fn generate_lz77_stream(groups: usize) -> Vec<u8> {
	let size = lz77_output_size(groups);
	let mut data = vec![0x10, size as u8, (size >> 8) as u8, (size >> 16) as u8];

	data.push(0x00);
	data.extend(0..8u8);

	for _ in 0..groups {
		data.push(0xFF);
		for _ in 0..8 {
			// length 18, distance 8
			data.extend_from_slice(&[0xF0, 0x07]);
		}
	}
	data
}

/// Decompressed size of [`generate_lz77_stream`] for the given group count.
pub fn lz77_output_size(groups: usize) -> usize {
	8 + groups * 8 * 18
}

/// Common benchmark sizes
pub mod sizes {
	/// One 4-tile frame: 16x16
	pub const FRAME: (u32, u32) = (16, 16);
	/// A strip of eight 4x4-tile frames: 256x32
	pub const STRIP: (u32, u32) = (256, 32);
	/// A full primary tileset: 128x256 (512 tiles)
	pub const TILESET: (u32, u32) = (128, 256);

	/// LZ77 groups for roughly one tileset of graphics (16 KiB)
	pub const LZ77_TILESET_GROUPS: usize = 114;
}

#[cfg(test)]
mod tests {
	use super::*;
	use jaae_types::file::lz77;
	use jaae_types::gba;

	#[test]
	fn test_generate_indexed_image() {
		let image = generate_indexed_image(16, 8);
		assert_eq!(image.width(), 16);
		assert_eq!(image.height(), 8);
		assert_eq!(image.get(1, 1), Some(8));
		assert_eq!(gba::encode_tiles(&image).unwrap().len(), 2 * gba::TILE_BYTES);
	}

	#[test]
	fn test_generate_lz77_stream_decodes() {
		let stream = generate_lz77_stream(3);
		let (out, used) = lz77::decompress(&stream).unwrap();
		assert_eq!(used, stream.len());
		assert_eq!(out.len(), lz77_output_size(3));
		assert!(out.chunks(8).all(|chunk| chunk == (0..8u8).collect::<Vec<_>>().as_slice()));
	}

	#[test]
	fn test_tileset_sizes() {
		let (width, height) = sizes::TILESET;
		assert_eq!((width / 8) * (height / 8), 512);
		assert!(lz77_output_size(sizes::LZ77_TILESET_GROUPS) >= 16 * 1024);
	}
}
