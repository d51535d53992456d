//! 4bpp tile encoding and decoding.
//!
//! # Packed Layout
//!
//! ```text
//! image (tiles_w × tiles_h tiles, numbered row-major)
//! └── tile (32 bytes)
//!     └── row 0..8 top to bottom (4 bytes)
//!         └── byte = pixel[2i] & 0xF | (pixel[2i + 1] & 0xF) << 4
//! ```
//!
//! The even pixel of each horizontal pair lands in the low nibble.

use super::image::IndexedImage;
use super::palette::Palette;
use crate::file::{JaaeError, JaaeResult};

/// Tile edge length in pixels
pub const TILE_SIZE: u32 = 8;

/// Bytes per packed 4bpp tile
pub const TILE_BYTES: usize = 32;

/// Checks that an image can be packed into 4bpp tiles.
///
/// # Errors
///
/// Returns a format error for non-indexed, empty, or non-multiple-of-8 images.
pub fn validate(image: &IndexedImage) -> JaaeResult<()> {
	if image.palette().is_empty() {
		return Err(JaaeError::ImageFormat("Image is not indexed".into()));
	}
	if image.width() == 0 || image.height() == 0 {
		return Err(JaaeError::ImageFormat("Image is empty".into()));
	}
	if image.width() % TILE_SIZE != 0 || image.height() % TILE_SIZE != 0 {
		return Err(JaaeError::ImageFormat("Image's height and width must be multiple of 8".into()));
	}
	Ok(())
}

/// Packs an indexed image into 4bpp tile data.
///
/// Output length is `tiles_w * tiles_h * 32`. Indices above 15 are truncated to 4 bits.
pub fn encode_tiles(image: &IndexedImage) -> JaaeResult<Vec<u8>> {
	validate(image)?;

	let width = image.width() as usize;
	let tiles_w = width / TILE_SIZE as usize;
	let tiles_h = image.height() as usize / TILE_SIZE as usize;
	let pixels = image.pixels();

	let mut data = Vec::with_capacity(tiles_w * tiles_h * TILE_BYTES);
	for tile in 0..tiles_w * tiles_h {
		let origin = 8 * (tile % tiles_w) + width * 8 * (tile / tiles_w);
		for row in 0..8 {
			let line = origin + row * width;
			for pair in 0..4 {
				let even = pixels[line + 2 * pair] & 0x0F;
				let odd = pixels[line + 2 * pair + 1] & 0x0F;
				data.push(even | (odd << 4));
			}
		}
	}
	Ok(data)
}

/// Unpacks 4bpp tile data into an indexed image `tiles_wide` tiles across.
///
/// The tile count is `data.len() / 32`; trailing bytes that do not fill a tile are
/// ignored. The last tile row is padded with index 0 when the count is not a
/// multiple of `tiles_wide`. The result carries the grayscale placeholder palette.
///
/// # Errors
///
/// Returns a range error if `tiles_wide` is zero, or the image would be wider or
/// taller than `u32::MAX` pixels.
pub fn decode_tiles(data: &[u8], tiles_wide: u32) -> JaaeResult<IndexedImage> {
	let max_tiles_wide = u32::MAX / TILE_SIZE;
	let pixel_width = tiles_wide
		.checked_mul(TILE_SIZE)
		.filter(|_| tiles_wide > 0)
		.ok_or_else(|| JaaeError::out_of_range("tiles wide", tiles_wide, 1u32, max_tiles_wide))?;

	let tile_count = data.len() / TILE_BYTES;
	let tiles_wide = tiles_wide as usize;
	let tiles_high = tile_count.div_ceil(tiles_wide);
	let pixel_height = tiles_high
		.checked_mul(TILE_SIZE as usize)
		.and_then(|height| u32::try_from(height).ok())
		.ok_or_else(|| JaaeError::out_of_range("tile rows", tiles_high as u64, 1u32, max_tiles_wide))?;
	let width = pixel_width as usize;

	let mut pixels = vec![0u8; width * tiles_high * TILE_SIZE as usize];
	for (i, &pair) in data[..tile_count * TILE_BYTES].iter().enumerate() {
		let tile = i / TILE_BYTES;
		let tile_x = tile % tiles_wide;
		let tile_y = tile / tiles_wide;
		let x_in_tile = (i & 0x3) * 2;
		let y_in_tile = (i & 0x1F) >> 2;

		let index = (tile_y * 8 + y_in_tile) * width + tile_x * 8 + x_in_tile;
		pixels[index] = pair & 0x0F;
		pixels[index + 1] = pair >> 4;
	}

	IndexedImage::from_raw(
		pixel_width,
		pixel_height,
		pixels,
		Palette::grayscale().colors().to_vec(),
	)
}

/// Number of whole tiles contained in packed data.
#[inline]
pub fn tile_count(data: &[u8]) -> usize {
	data.len() / TILE_BYTES
}
