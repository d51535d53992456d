//! Prelude module for `jaae_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use jaae_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let mut session = Session::new();
//! session.add_animation().unwrap();
//! session.set_animation_speed(3).unwrap();
//! assert_eq!(session.animation_speed().unwrap(), Speed::Normal);
//!
//! let mut set = AnimationSet::new();
//! set.add_frame(Frame::new("walk0", vec![0; 32]).unwrap()).unwrap();
//! ```

// Re-export everything from jaae_types::prelude
#[doc(inline)]
pub use jaae_types::prelude::*;

// ROM side
#[doc(inline)]
pub use jaae_rom::patch::{DevkitArm, PatchOutcome, PatchTarget, Stage, ToolOutput, Toolchain, ToolchainConfig};
#[doc(inline)]
pub use jaae_rom::{Region, Rom, Session, Tileset, TilesetHeader};

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use jaae_rom;
#[doc(inline)]
pub use jaae_types;
