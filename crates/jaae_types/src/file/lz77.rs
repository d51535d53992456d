//! GBA BIOS LZ77 decompression.
//!
//! Tileset graphics in the ROM may be stored compressed with the BIOS `LZ77UnComp`
//! scheme. Only decompression is needed.
//!
//! ## Stream Layout
//!
//! | Offset | Size | Field        | Description                            |
//! |--------|------|--------------|----------------------------------------|
//! | 0x00   | 1    | `magic`      | `0x10`                                 |
//! | 0x01   | 3    | `size`       | Decompressed size, little-endian       |
//! | 0x04   | ...  | blocks       | Flag byte followed by up to 8 blocks   |
//!
//! Flag bits are read MSB first. A clear bit is a literal byte; a set bit is a
//! two-byte back-reference:
//!
//! ```text
//! byte 0: LLLL DDDD   length = L + 3
//! byte 1: DDDD DDDD   distance = D + 1
//! ```

use log::trace;

use crate::file::{FileType, JaaeError, JaaeResult};

/// Compression type byte for LZ77 streams
pub const LZ77_MAGIC: u8 = 0x10;

/// Size of the stream header
pub const HEADER_SIZE: usize = 4;

/// Decompresses an LZ77 stream starting at the beginning of `data`.
///
/// Bytes after the end of the stream are ignored.
///
/// # Returns
///
/// The decompressed bytes and the number of input bytes consumed.
///
/// # Errors
///
/// Returns [`JaaeError::InvalidCompressedData`] if the header is wrong, the stream is
/// truncated, or a back-reference points before the start of the output.
pub fn decompress(data: &[u8]) -> JaaeResult<(Vec<u8>, usize)> {
	if data.len() < HEADER_SIZE {
		return Err(JaaeError::InvalidCompressedData(
			JaaeError::insufficient_data(FileType::Lz77, HEADER_SIZE, data.len()).to_string(),
		));
	}
	if data[0] != LZ77_MAGIC {
		return Err(JaaeError::InvalidCompressedData(format!(
			"expected type byte {LZ77_MAGIC:#04X}, found {:#04X}",
			data[0]
		)));
	}

	let size = u32::from_le_bytes([data[1], data[2], data[3], 0]) as usize;
	let mut output = Vec::with_capacity(size);
	let mut cursor = HEADER_SIZE;

	let next = |cursor: &mut usize| -> JaaeResult<u8> {
		let byte = data.get(*cursor).copied().ok_or_else(|| {
			JaaeError::InvalidCompressedData(format!("stream truncated at byte {}", *cursor))
		})?;
		*cursor += 1;
		Ok(byte)
	};

	while output.len() < size {
		let flags = next(&mut cursor)?;
		for bit in (0..8).rev() {
			if output.len() >= size {
				break;
			}

			if flags & (1 << bit) == 0 {
				output.push(next(&mut cursor)?);
				continue;
			}

			let hi = next(&mut cursor)?;
			let lo = next(&mut cursor)?;
			let length = (hi >> 4) as usize + 3;
			let distance = ((((hi & 0x0F) as usize) << 8) | lo as usize) + 1;

			if distance > output.len() {
				return Err(JaaeError::InvalidCompressedData(format!(
					"back-reference distance {distance} exceeds {} decoded bytes",
					output.len()
				)));
			}

			let start = output.len() - distance;
			for i in 0..length {
				if output.len() >= size {
					break;
				}
				// source may overlap the bytes being written
				let byte = output[start + i];
				output.push(byte);
			}
		}
	}

	trace!("LZ77: {} bytes -> {} bytes", cursor, output.len());
	Ok((output, cursor))
}
