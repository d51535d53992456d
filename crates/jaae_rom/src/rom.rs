//! ROM images and tileset loading.

use std::path::{Path, PathBuf};

use jaae_types::file::{JaaeError, JaaeResult, lz77};
use jaae_types::gba::{Palette, decode_tiles};
use log::{debug, info, warn};

use crate::region::Region;
use crate::tileset::{
	PALETTE_COUNT, POINTER_MASK, TILESET_TILES_WIDE, Tileset, TilesetHeader, UNCOMPRESSED_GRAPHICS_SIZE,
};

/// A ROM image held in memory together with its detected region.
#[derive(Debug, Clone)]
pub struct Rom {
	path: Option<PathBuf>,
	data: Vec<u8>,
	region: Region,
}

impl Rom {
	/// Reads a ROM file and detects its region.
	///
	/// # Errors
	///
	/// Returns an IO error if the file cannot be read and a configuration error
	/// if its region code is not supported.
	pub fn open(path: impl AsRef<Path>) -> JaaeResult<Self> {
		let path = path.as_ref();
		let mut rom = Self::from_bytes(std::fs::read(path)?)?;
		info!("Opened {} ROM {} ({} bytes)", rom.region, path.display(), rom.data.len());
		rom.path = Some(path.to_path_buf());
		Ok(rom)
	}

	/// Wraps ROM bytes, detecting the region.
	pub fn from_bytes(data: Vec<u8>) -> JaaeResult<Self> {
		let region = Region::from_rom(&data)?;
		Ok(Self {
			path: None,
			data,
			region,
		})
	}

	/// Path the ROM was opened from.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Detected region.
	pub fn region(&self) -> Region {
		self.region
	}

	/// Raw ROM bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// ROM size in bytes.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` for an empty ROM.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Header offset of a map tileset given its number.
	pub fn tileset_header_offset(&self, number: u16) -> u32 {
		self.region.tileset_header_offset(number)
	}

	/// Decodes the tileset whose header lives at `header_offset`.
	///
	/// Bus addresses (`0x08xxxxxx`) are accepted and masked into ROM offsets.
	///
	/// # Errors
	///
	/// - a range error if the header, graphics or palettes lie outside the ROM
	/// - [`JaaeError::InvalidCompressedData`] if compressed graphics cannot be decoded
	pub fn load_tileset(&self, header_offset: u32) -> JaaeResult<Tileset> {
		let offset = header_offset & POINTER_MASK;
		let start = offset as usize;
		let header_bytes =
			self.data.get(start..start + TilesetHeader::SIZE).ok_or_else(|| self.outside("header", offset))?;
		let header = TilesetHeader::from_bytes(header_bytes)?;

		let graphics_start = header.graphics_offset as usize;
		if graphics_start >= self.data.len() {
			return Err(self.outside("image", header.graphics_offset));
		}
		let graphics = if header.compressed {
			let (graphics, consumed) = lz77::decompress(&self.data[graphics_start..]).inspect_err(|e| {
				warn!("Tileset header {offset:#X} points to invalid image data: {e}");
			})?;
			debug!("Decompressed {consumed} bytes of tileset graphics into {}", graphics.len());
			graphics
		} else {
			let end = (graphics_start + UNCOMPRESSED_GRAPHICS_SIZE).min(self.data.len());
			self.data[graphics_start..end].to_vec()
		};
		let image = decode_tiles(&graphics, TILESET_TILES_WIDE)?;

		let palettes_start = header.palettes_offset as usize;
		let palettes_bytes = self
			.data
			.get(palettes_start..palettes_start + PALETTE_COUNT * Palette::SIZE)
			.ok_or_else(|| self.outside("palettes", header.palettes_offset))?;
		let palettes =
			palettes_bytes.chunks_exact(Palette::SIZE).map(Palette::from_bytes).collect::<JaaeResult<Vec<_>>>()?;

		info!(
			"Loaded {} tileset at {offset:#X}: {}x{} pixels{}",
			if header.primary { "primary" } else { "secondary" },
			image.width(),
			image.height(),
			if header.compressed { ", compressed" } else { "" }
		);
		Ok(Tileset::new(offset, header, image, palettes))
	}

	fn outside(&self, what: &'static str, offset: u32) -> JaaeError {
		JaaeError::OffsetOutsideRom {
			what,
			offset,
			rom_size: self.data.len(),
		}
	}
}
