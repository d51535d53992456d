//! Tile and palette codec for the GBA's packed graphics formats.
//!
//! - **Tiles**: 8×8 pixels, 4 bits per pixel, 32 bytes per tile
//! - **Palettes**: 16 colors, 15-bit BGR555, 32 bytes per bank
//!
//! # Examples
//!
//! ```no_run
//! use jaae_types::gba::{self, IndexedImage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = IndexedImage::open("walk.png")?;
//! let packed = gba::encode_tiles(&image)?;
//! let preview = gba::decode_tiles(&packed, image.width() / 8)?;
//! assert_eq!(preview.pixels(), image.pixels());
//! # Ok(())
//! # }
//! ```

pub mod image;
pub mod palette;
pub mod tile;

pub use self::image::IndexedImage;
pub use self::palette::{Palette, Rgb, decode_palette, encode_palette};
pub use self::tile::{TILE_BYTES, TILE_SIZE, decode_tiles, encode_tiles, tile_count};
