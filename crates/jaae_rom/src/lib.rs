//! ROM side of `jaae-rs`: region detection, tileset loading, the patch
//! pipeline that installs animations into a ROM, and the editing [`Session`].
//!
//! # Modules
//!
//! - **region**: Region codes and per-release layout constants
//! - **rom**: ROM images and tileset decoding
//! - **tileset**: Tileset headers and decoded tilesets
//! - **patch**: Source generation, external toolchain, ROM patching
//! - **session**: Explicit editor state tying everything together

pub mod patch;
pub mod region;
pub mod rom;
pub mod session;
pub mod tileset;

pub use region::Region;
pub use rom::Rom;
pub use session::Session;
pub use tileset::{Tileset, TilesetHeader};
