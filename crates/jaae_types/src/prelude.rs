//! Prelude module for `jaae_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```
//! use jaae_types::prelude::*;
//!
//! let mut set = AnimationSet::new();
//! assert_eq!(set.add_animation().unwrap(), 0);
//! assert_eq!(set.animation(0).unwrap().speed(), Speed::Normal);
//! ```

// Animation model
#[doc(inline)]
pub use crate::anim::{
	Animation, AnimationSet, Confirm, Frame, FrameLibrary, MAX_ANIMATIONS, MAX_SLOTS, MAX_TILE, MIN_SLOTS, SlotRef,
	Speed,
};

// Graphics codec
#[doc(inline)]
pub use crate::gba::{IndexedImage, Palette, Rgb, TILE_BYTES, TILE_SIZE, decode_tiles, encode_tiles};

// Files and errors
#[doc(inline)]
pub use crate::file::{ErrorKind, FileType, JaaeError, JaaeResult, ProjectHeader, open_project, save_project};
