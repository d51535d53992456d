//! Region codes and the layout constants they select.
//!
//! The four ASCII bytes at [`REGION_CODE_OFFSET`] identify the game release.
//! Each release keeps its tileset header table at a different address and
//! stores the animation routine pointer at a different field of the header.
//!
//! | Code   | Tileset table | Routine pointer field |
//! |--------|---------------|-----------------------|
//! | `BPEE` | `0x3DF704`    | `+0x14`               |
//! | `BPRE` | `0x2D4A94`    | `+0x10`               |
//! | `AXVE` | `0x286CF4`    | `+0x14`               |

use std::fmt;
use std::str::FromStr;

use jaae_types::file::{FileType, JaaeError, JaaeResult};

/// Offset of the 4-byte region code in the ROM header
pub const REGION_CODE_OFFSET: usize = 0xAC;

/// Length of the region code
pub const REGION_CODE_LEN: usize = 4;

/// Size of one entry in the tileset header table
pub const TILESET_HEADER_SIZE: u32 = 24;

/// Supported game releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
	/// `BPEE`
	Emerald,
	/// `BPRE`
	FireRed,
	/// `AXVE`
	Ruby,
}

impl Region {
	/// Every supported region.
	pub const ALL: [Region; 3] = [Region::Emerald, Region::FireRed, Region::Ruby];

	/// Parses a 4-character region code.
	///
	/// # Errors
	///
	/// Returns [`JaaeError::UnknownRegion`] for unsupported codes.
	pub fn from_code(code: &str) -> JaaeResult<Self> {
		Self::ALL
			.into_iter()
			.find(|region| region.code() == code)
			.ok_or_else(|| JaaeError::UnknownRegion(code.to_string()))
	}

	/// Reads the region code from ROM bytes.
	///
	/// # Errors
	///
	/// Returns a format error if the ROM is too short to hold a header and a
	/// configuration error if the code is not recognized.
	pub fn from_rom(data: &[u8]) -> JaaeResult<Self> {
		let end = REGION_CODE_OFFSET + REGION_CODE_LEN;
		let bytes = data
			.get(REGION_CODE_OFFSET..end)
			.ok_or_else(|| JaaeError::insufficient_data(FileType::Rom, end, data.len()))?;
		Self::from_code(&String::from_utf8_lossy(bytes))
	}

	/// The 4-character code, also passed to the assembler as a symbol.
	pub const fn code(self) -> &'static str {
		match self {
			Self::Emerald => "BPEE",
			Self::FireRed => "BPRE",
			Self::Ruby => "AXVE",
		}
	}

	/// ROM offset of the main tileset header table.
	pub const fn tileset_table_base(self) -> u32 {
		match self {
			Self::Emerald => 0x3D_F704,
			Self::FireRed => 0x2D_4A94,
			Self::Ruby => 0x28_6CF4,
		}
	}

	/// Offset inside a tileset header of the animation routine pointer.
	pub const fn routine_pointer_field(self) -> u32 {
		match self {
			Self::FireRed => 0x10,
			Self::Emerald | Self::Ruby => 0x14,
		}
	}

	/// Header offset of a map tileset given its number.
	pub const fn tileset_header_offset(self, number: u16) -> u32 {
		self.tileset_table_base() + number as u32 * TILESET_HEADER_SIZE
	}
}

impl fmt::Display for Region {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

impl FromStr for Region {
	type Err = JaaeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_code(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use jaae_types::file::ErrorKind;

	#[test]
	fn test_codes() {
		for region in Region::ALL {
			assert_eq!(Region::from_code(region.code()).unwrap(), region);
		}
		assert_eq!("BPRE".parse::<Region>().unwrap(), Region::FireRed);
		assert_eq!(Region::from_code("BPED").unwrap_err().kind(), ErrorKind::Configuration);
	}

	#[test]
	fn test_layout_constants() {
		assert_eq!(Region::FireRed.routine_pointer_field(), 0x10);
		assert_eq!(Region::Emerald.routine_pointer_field(), 0x14);
		assert_eq!(Region::Ruby.routine_pointer_field(), 0x14);
		assert_eq!(Region::Emerald.tileset_header_offset(0), 0x3D_F704);
		assert_eq!(Region::FireRed.tileset_header_offset(2), 0x2D_4A94 + 48);
	}

	#[test]
	fn test_from_rom() {
		let mut rom = vec![0u8; 0x100];
		rom[0xAC..0xB0].copy_from_slice(b"AXVE");
		assert_eq!(Region::from_rom(&rom).unwrap(), Region::Ruby);

		rom[0xAC..0xB0].copy_from_slice(b"ZZZZ");
		assert!(matches!(Region::from_rom(&rom).unwrap_err(), JaaeError::UnknownRegion(code) if code == "ZZZZ"));

		assert!(Region::from_rom(&rom[..0xAE]).unwrap_err().is_format());
	}
}
