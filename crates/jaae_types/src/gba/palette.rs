//! GBA 15-bit palette support.
//!
//! A GBA palette bank holds 16 colors of 2 bytes each (little-endian). Each color
//! packs three 5-bit channels as `R | (G << 5) | (B << 10)`; bit 15 is unused.
//!
//! Conversion from 24-bit RGB keeps the top 5 bits of every channel, and the
//! reverse conversion shifts each channel back into the top 5 bits, so
//! `decode(encode(p))` preserves exactly those bits.

use std::fmt;

use crate::file::{FileType, JaaeError, JaaeResult};

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
}

impl Rgb {
	/// Creates a new RGB color.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self {
			r,
			g,
			b,
		}
	}

	/// Creates a new grayscale color.
	pub const fn gray(value: u8) -> Self {
		Self::new(value, value, value)
	}

	/// Packs the color into a 15-bit GBA color, dropping the low 3 bits of each channel.
	pub const fn to_bgr555(self) -> u16 {
		let r = (self.r >> 3) as u16;
		let g = (self.g >> 3) as u16;
		let b = (self.b >> 3) as u16;
		r | (g << 5) | (b << 10)
	}

	/// Unpacks a 15-bit GBA color. Bit 15 is ignored.
	pub const fn from_bgr555(value: u16) -> Self {
		Self {
			r: ((value & 0x001F) << 3) as u8,
			g: (((value >> 5) & 0x001F) << 3) as u8,
			b: (((value >> 10) & 0x001F) << 3) as u8,
		}
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
	}
}

/// One 16-color palette bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Palette {
	colors: [Rgb; Palette::COLOR_COUNT],
}

impl Palette {
	/// Colors per bank
	pub const COLOR_COUNT: usize = 16;

	/// Encoded size of a bank in bytes
	pub const SIZE: usize = Self::COLOR_COUNT * 2;

	/// Creates a palette from 16 colors.
	pub const fn new(colors: [Rgb; Self::COLOR_COUNT]) -> Self {
		Self {
			colors,
		}
	}

	/// The placeholder palette attached to freshly decoded tiles: index `i` maps to gray `i * 16`.
	pub fn grayscale() -> Self {
		let mut colors = [Rgb::default(); Self::COLOR_COUNT];
		for (i, color) in colors.iter_mut().enumerate() {
			*color = Rgb::gray((i * 16) as u8);
		}
		Self::new(colors)
	}

	/// Returns the colors of this bank.
	#[inline]
	pub fn colors(&self) -> &[Rgb; Self::COLOR_COUNT] {
		&self.colors
	}

	/// Gets a color by index. Indices are truncated to 4 bits.
	#[inline]
	pub fn get(&self, index: u8) -> Rgb {
		self.colors[(index & 0x0F) as usize]
	}

	/// Encodes the palette into 32 bytes of GBA palette memory.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut data = Vec::with_capacity(Self::SIZE);
		for color in &self.colors {
			data.extend_from_slice(&color.to_bgr555().to_le_bytes());
		}
		data
	}

	/// Decodes a palette bank from GBA palette memory.
	///
	/// # Errors
	///
	/// Returns a format error if fewer than 32 bytes are supplied.
	pub fn from_bytes(data: &[u8]) -> JaaeResult<Self> {
		if data.len() < Self::SIZE {
			return Err(JaaeError::insufficient_data(FileType::Image, Self::SIZE, data.len()));
		}

		let mut colors = [Rgb::default(); Self::COLOR_COUNT];
		for (color, chunk) in colors.iter_mut().zip(data.chunks_exact(2)) {
			*color = Rgb::from_bgr555(u16::from_le_bytes([chunk[0], chunk[1]]));
		}
		Ok(Self::new(colors))
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::grayscale()
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Rgb;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[(index & 0x0F) as usize]
	}
}

/// Encodes 16 colors into GBA palette bytes.
pub fn encode_palette(colors: &[Rgb; Palette::COLOR_COUNT]) -> Vec<u8> {
	Palette::new(*colors).to_bytes()
}

/// Decodes GBA palette bytes into 16 colors.
///
/// # Errors
///
/// Returns a format error if fewer than 32 bytes are supplied.
pub fn decode_palette(data: &[u8]) -> JaaeResult<[Rgb; Palette::COLOR_COUNT]> {
	Palette::from_bytes(data).map(|palette| palette.colors)
}
