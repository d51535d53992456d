//! This crate provides core data types and file format support for the `jaae-rs` project.
//!
//! # Modules
//!
//! - **anim**: Animation model: animations, frame slots, the frame library and the set that ties them together
//! - **gba**: GBA tile and palette codec plus indexed PNG I/O
//! - **file**: `.jaae` project files, LZ77 decompression and the unified error type
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use jaae_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut set = AnimationSet::new();
//! set.add_animation()?;
//! set.add_frames_from_image("flower", &IndexedImage::open("flower.png")?, 4)?;
//! save_project("flowers.jaae", &set)?;
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use jaae_types::file::jaae;
//!
//! let set = jaae::open("flowers.jaae").unwrap();
//! // ...
//! ```

pub mod anim;
pub mod file;
pub mod gba;

/// `use jaae_types::prelude::*;` to import commonly used items.
pub mod prelude;
