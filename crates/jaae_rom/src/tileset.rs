//! Tileset headers and decoded tilesets.

use jaae_types::file::{FileType, JaaeError, JaaeResult};
use jaae_types::gba::{IndexedImage, Palette};

use crate::region::TILESET_HEADER_SIZE;

/// Mask applied to GBA bus addresses to obtain ROM offsets
pub const POINTER_MASK: u32 = 0x07FF_FFFF;

/// Number of palette banks referenced by a tileset header
pub const PALETTE_COUNT: usize = 16;

/// Bytes read for uncompressed tileset graphics (512 tiles)
pub const UNCOMPRESSED_GRAPHICS_SIZE: usize = 32 * 512;

/// Tiles per row when rendering tileset graphics
pub const TILESET_TILES_WIDE: u32 = 16;

/// Reads a little-endian GBA pointer and masks it into a ROM offset.
#[inline]
pub fn read_pointer(bytes: [u8; 4]) -> u32 {
	u32::from_le_bytes(bytes) & POINTER_MASK
}

/// The fields of a tileset header used by the editor.
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----------------------------------------
/// 0x00    1     graphics compressed (non-zero = LZ77)
/// 0x01    1     secondary flag (0 = primary tileset)
/// 0x04    4     graphics pointer
/// 0x08    4     palettes pointer
/// 0x10/14 4     animation routine pointer (region dependent)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilesetHeader {
	/// Graphics are LZ77 compressed
	pub compressed: bool,
	/// Header describes a primary tileset
	pub primary: bool,
	/// ROM offset of the graphics
	pub graphics_offset: u32,
	/// ROM offset of the 16 palette banks
	pub palettes_offset: u32,
}

impl TilesetHeader {
	/// Size of a tileset header in bytes
	pub const SIZE: usize = TILESET_HEADER_SIZE as usize;

	/// Parses a header.
	///
	/// # Errors
	///
	/// Returns a format error if fewer than [`TilesetHeader::SIZE`] bytes are given.
	pub fn from_bytes(data: &[u8]) -> JaaeResult<Self> {
		if data.len() < Self::SIZE {
			return Err(JaaeError::insufficient_data(FileType::Rom, Self::SIZE, data.len()));
		}
		Ok(Self {
			compressed: data[0] != 0,
			primary: data[1] == 0,
			graphics_offset: read_pointer([data[4], data[5], data[6], data[7]]),
			palettes_offset: read_pointer([data[8], data[9], data[10], data[11]]),
		})
	}
}

/// A tileset decoded from a ROM: its graphics and its palette banks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
	header_offset: u32,
	header: TilesetHeader,
	image: IndexedImage,
	palettes: Vec<Palette>,
}

impl Tileset {
	pub(crate) fn new(header_offset: u32, header: TilesetHeader, image: IndexedImage, palettes: Vec<Palette>) -> Self {
		Self {
			header_offset,
			header,
			image,
			palettes,
		}
	}

	/// ROM offset of the tileset header.
	pub fn header_offset(&self) -> u32 {
		self.header_offset
	}

	/// The parsed header.
	pub fn header(&self) -> &TilesetHeader {
		&self.header
	}

	/// Returns `true` for a primary tileset.
	pub fn is_primary(&self) -> bool {
		self.header.primary
	}

	/// Graphics with the grayscale placeholder palette, 16 tiles wide.
	pub fn image(&self) -> &IndexedImage {
		&self.image
	}

	/// All palette banks.
	pub fn palettes(&self) -> &[Palette] {
		&self.palettes
	}

	/// One palette bank.
	///
	/// # Errors
	///
	/// Returns a range error for indices above 15.
	pub fn palette(&self, index: usize) -> JaaeResult<&Palette> {
		self.palettes
			.get(index)
			.ok_or_else(|| JaaeError::out_of_range("palette index", index as u64, 0u8, (PALETTE_COUNT - 1) as u64))
	}

	/// Graphics rendered with one of the tileset's palettes.
	pub fn image_with_palette(&self, index: usize) -> JaaeResult<IndexedImage> {
		Ok(self.image.with_palette(self.palette(index)?))
	}
}
