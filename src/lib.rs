#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `jaae-rs` edits animated tiles of Generation III handheld titles and
//! installs them into a ROM.
//!
//! - **Codec**: indexed images to and from packed 4bpp tiles and BGR555 palettes
//! - **Projects**: `.jaae` files holding animations plus their frame library
//! - **Patching**: generates the animation tables, drives the external
//!   assembler and patches the ROM's tileset header
//!
pub use jaae_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use jaae_dylib;
