//! This module is separated into its own crate to enable simple dynamic linking for `jaae`, and should not be used directly.

/// `use jaae::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use jaae_rom;
pub use jaae_types;

// Re-export commonly used types at crate root
pub use jaae_rom::{Region, Rom, Session, Tileset};
pub use jaae_types::anim::{Animation, AnimationSet, Frame, SlotRef, Speed};
pub use jaae_types::file::{ErrorKind, JaaeError, JaaeResult};
