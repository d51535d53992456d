//! Palette-indexed raster images.
//!
//! [`IndexedImage`] is the editable side of the tile codec: one palette index per
//! pixel plus the palette that gives those indices a color. Images are read from
//! and written to indexed PNG files; RGBA previews are rendered through the
//! `image` crate.

use std::borrow::Cow;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Seek, Write};
use std::path::Path;

use image::{Rgba, RgbaImage};
use log::debug;

use super::palette::{Palette, Rgb};
use crate::file::{FileType, JaaeError, JaaeResult};

/// A palette-indexed image, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
	width: u32,
	height: u32,
	pixels: Vec<u8>,
	palette: Vec<Rgb>,
}

impl IndexedImage {
	/// Creates a new image filled with index 0 and the grayscale placeholder palette.
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			pixels: vec![0; width as usize * height as usize],
			palette: Palette::grayscale().colors().to_vec(),
		}
	}

	/// Creates an image from raw indices and a palette.
	///
	/// # Errors
	///
	/// Returns a format error if `pixels.len() != width * height`.
	pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>, palette: Vec<Rgb>) -> JaaeResult<Self> {
		let expected = width as usize * height as usize;
		if pixels.len() != expected {
			return Err(JaaeError::insufficient_data(FileType::Image, expected, pixels.len()));
		}
		Ok(Self {
			width,
			height,
			pixels,
			palette,
		})
	}

	/// Width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Palette indices in row-major order.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Palette attached to the image.
	pub fn palette(&self) -> &[Rgb] {
		&self.palette
	}

	/// Returns the palette index at `(x, y)`, or `None` outside the image.
	pub fn get(&self, x: u32, y: u32) -> Option<u8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(y as usize * self.width as usize + x as usize).copied()
	}

	/// Sets the palette index at `(x, y)`. Out-of-bounds writes are ignored.
	pub fn set(&mut self, x: u32, y: u32, index: u8) {
		if x < self.width && y < self.height {
			self.pixels[y as usize * self.width as usize + x as usize] = index;
		}
	}

	/// Replaces the palette with a decoded 16-color bank.
	pub fn set_palette(&mut self, palette: &Palette) {
		self.palette = palette.colors().to_vec();
	}

	/// Returns a copy of this image using the given palette.
	pub fn with_palette(&self, palette: &Palette) -> Self {
		let mut image = self.clone();
		image.set_palette(palette);
		image
	}

	/// Renders the image into RGBA. Indices without a palette entry render as opaque black.
	pub fn to_rgba_image(&self) -> RgbaImage {
		RgbaImage::from_fn(self.width, self.height, |x, y| {
			let index = self.pixels[y as usize * self.width as usize + x as usize];
			let color = self.palette.get(index as usize).copied().unwrap_or_default();
			Rgba([color.r, color.g, color.b, 255])
		})
	}

	/// Opens an indexed PNG file.
	///
	/// # Errors
	///
	/// Returns a format error if the file is not a PNG or the PNG is not palette-indexed.
	pub fn open(path: impl AsRef<Path>) -> JaaeResult<Self> {
		let path = path.as_ref();
		let file = fs::File::open(path)?;
		let image = Self::from_png_reader(BufReader::new(file))?;
		debug!("Loaded {}x{} indexed image from {}", image.width, image.height, path.display());
		Ok(image)
	}

	/// Reads an indexed PNG from a reader.
	///
	/// Sub-byte bit depths are expanded to one index per byte.
	pub fn from_png_reader<R: BufRead + Seek>(reader: R) -> JaaeResult<Self> {
		let mut decoder = png::Decoder::new(reader);
		decoder.set_transformations(png::Transformations::IDENTITY);
		let mut reader = decoder.read_info().map_err(png_decoding_error)?;

		let (width, height, color_type, bit_depth, palette) = {
			let info = reader.info();
			(info.width, info.height, info.color_type, info.bit_depth, info.palette.clone())
		};

		if color_type != png::ColorType::Indexed {
			return Err(JaaeError::ImageFormat("Image is not indexed".into()));
		}

		let mut buffer = vec![0u8; reader.output_buffer_size()];
		let frame = reader.next_frame(&mut buffer).map_err(png_decoding_error)?;

		let bits = bit_depth as usize;
		let per_byte = 8 / bits;
		let mask = ((1u16 << bits) - 1) as u8;

		let mut pixels = Vec::with_capacity(width as usize * height as usize);
		for row in buffer[..frame.line_size * height as usize].chunks_exact(frame.line_size) {
			for x in 0..width as usize {
				let byte = row[x / per_byte];
				let shift = 8 - bits * (x % per_byte + 1);
				pixels.push((byte >> shift) & mask);
			}
		}

		let palette = palette
			.map(|raw: Cow<'_, [u8]>| raw.chunks_exact(3).map(|c| Rgb::new(c[0], c[1], c[2])).collect())
			.unwrap_or_default();

		Self::from_raw(width, height, pixels, palette)
	}

	/// Writes the image as an 8-bit indexed PNG.
	pub fn save(&self, path: impl AsRef<Path>) -> JaaeResult<()> {
		let file = fs::File::create(path)?;
		self.write_png(BufWriter::new(file))
	}

	/// Writes the image as an 8-bit indexed PNG to a writer.
	pub fn write_png<W: Write>(&self, writer: W) -> JaaeResult<()> {
		let mut encoder = png::Encoder::new(writer, self.width, self.height);
		encoder.set_color(png::ColorType::Indexed);
		encoder.set_depth(png::BitDepth::Eight);

		let mut palette = Vec::with_capacity(self.palette.len().max(1) * 3);
		for color in &self.palette {
			palette.extend_from_slice(&[color.r, color.g, color.b]);
		}
		if palette.is_empty() {
			palette.extend_from_slice(&[0, 0, 0]);
		}
		encoder.set_palette(palette);

		let mut writer = encoder.write_header().map_err(png_encoding_error)?;
		writer.write_image_data(&self.pixels).map_err(png_encoding_error)?;
		writer.finish().map_err(png_encoding_error)?;
		Ok(())
	}
}

fn png_decoding_error(err: png::DecodingError) -> JaaeError {
	JaaeError::ImageFormat(format!("Not a valid image: {err}"))
}

fn png_encoding_error(err: png::EncodingError) -> JaaeError {
	match err {
		png::EncodingError::IoError(err) => JaaeError::Io(err),
		other => JaaeError::ImageFormat(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn sample() -> IndexedImage {
		let mut image = IndexedImage::new(8, 8);
		for y in 0..8 {
			for x in 0..8 {
				image.set(x, y, ((x + y) % 16) as u8);
			}
		}
		image
	}

	#[test]
	fn test_png_roundtrip() {
		let image = sample();
		let mut bytes = Vec::new();
		image.write_png(&mut bytes).unwrap();

		let loaded = IndexedImage::from_png_reader(Cursor::new(bytes)).unwrap();
		assert_eq!(loaded.width(), 8);
		assert_eq!(loaded.height(), 8);
		assert_eq!(loaded.pixels(), image.pixels());
		assert_eq!(loaded.palette()[15], Rgb::gray(240));
	}

	#[test]
	fn test_four_bit_png_is_expanded() {
		let mut bytes = Vec::new();
		{
			let mut encoder = png::Encoder::new(&mut bytes, 4, 1);
			encoder.set_color(png::ColorType::Indexed);
			encoder.set_depth(png::BitDepth::Four);
			encoder.set_palette(vec![0u8; 16 * 3]);
			let mut writer = encoder.write_header().unwrap();
			writer.write_image_data(&[0x12, 0x3F]).unwrap();
		}

		let image = IndexedImage::from_png_reader(Cursor::new(bytes)).unwrap();
		assert_eq!(image.pixels(), &[1, 2, 3, 15]);
	}

	#[test]
	fn test_rgb_png_is_rejected() {
		let mut bytes = Vec::new();
		{
			let mut encoder = png::Encoder::new(&mut bytes, 1, 1);
			encoder.set_color(png::ColorType::Rgb);
			encoder.set_depth(png::BitDepth::Eight);
			let mut writer = encoder.write_header().unwrap();
			writer.write_image_data(&[1, 2, 3]).unwrap();
		}

		let err = IndexedImage::from_png_reader(Cursor::new(bytes)).unwrap_err();
		assert!(err.is_format());
		assert!(err.to_string().contains("not indexed"));
	}

	#[test]
	fn test_garbage_is_format_error() {
		let err = IndexedImage::from_png_reader(Cursor::new(vec![1u8, 2, 3, 4])).unwrap_err();
		assert!(err.is_format());
	}

	#[test]
	fn test_truncated_png_is_format_error() {
		let mut bytes = Vec::new();
		sample().write_png(&mut bytes).unwrap();
		bytes.truncate(12);

		let err = IndexedImage::from_png_reader(Cursor::new(bytes)).unwrap_err();
		assert!(matches!(err, JaaeError::ImageFormat(ref message) if message.starts_with("Not a valid image")));
	}

	#[test]
	fn test_rgba_render_uses_palette() {
		let mut colors = [Rgb::default(); 16];
		colors[3] = Rgb::new(248, 0, 8);
		let mut image = IndexedImage::new(8, 8);
		image.set(1, 2, 3);
		let rgba = image.with_palette(&Palette::new(colors)).to_rgba_image();
		assert_eq!(rgba.get_pixel(1, 2), &Rgba([248, 0, 8, 255]));
		assert_eq!(rgba.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
	}

	#[test]
	fn test_from_raw_size_check() {
		assert!(IndexedImage::from_raw(8, 8, vec![0; 63], Vec::new()).is_err());
	}
}
