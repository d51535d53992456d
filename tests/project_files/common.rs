//! Shared fixtures

use std::path::{Path, PathBuf};

use jaae_rs::prelude::*;

/// Tileset header offset used by [`write_emerald_rom`]
pub const HEADER: u32 = 0x200;

/// Writes a 4 KiB Emerald ROM with one uncompressed primary tileset at [`HEADER`].
///
/// Graphics live at 0x400 and the palettes at 0xC00; color 1 of bank 3 is blue.
pub fn write_emerald_rom(dir: &Path) -> PathBuf {
	let mut rom = vec![0u8; 0x1000];
	rom[0xAC..0xB0].copy_from_slice(b"BPEE");
	let header = HEADER as usize;
	rom[header + 1] = 1;
	rom[header + 4..header + 8].copy_from_slice(&0x0800_0400u32.to_le_bytes());
	rom[header + 8..header + 12].copy_from_slice(&0x0800_0C00u32.to_le_bytes());
	rom[0xC00 + 32 * 3 + 2..0xC00 + 32 * 3 + 4].copy_from_slice(&0x7C00u16.to_le_bytes());
	// first tile: top-left pixel uses color 1
	rom[0x400] = 0x01;

	let path = dir.join("emerald.gba");
	std::fs::write(&path, rom).unwrap();
	path
}

/// A 16x16 image (4 tiles) filled with `color`.
pub fn solid_image(color: u8) -> IndexedImage {
	let mut image = IndexedImage::new(16, 16);
	for y in 0..16 {
		for x in 0..16 {
			image.set(x, y, color);
		}
	}
	image
}

/// Always answers yes.
pub fn yes() -> impl FnMut(&str, &str) -> bool {
	|_: &str, _: &str| true
}
