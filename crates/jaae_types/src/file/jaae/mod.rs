//! `.jaae` project file support.
//!
//! A project file stores an [`AnimationSet`](crate::anim::AnimationSet): the
//! frame library with its packed pixel data, and every animation with its slot
//! labels. All integers are little-endian.
//!
//! # File Structure
//!
//! ```text
//! Offset  Size  Field              Description
//! ------  ----  -----------------  ------------------------------------------
//! 0x00    4     magic              "JAAE"
//! 0x04    1     version            0
//! 0x05    1     animation_count-1
//! 0x06    2     frame_count-1
//! 0x08    2     label_width        Longest label in bytes
//! ```
//!
//! Followed by:
//!
//! - **Frame directory**: `frame_count × [label(label_width) ++ data_length(4)]`
//! - **Frame data**: every frame's bytes, in directory order
//! - **Animation table**: `animation_count × [start(2) end(2) speed(1) slot_count-1(2)
//!   ++ slot_count × label(label_width)]`
//!
//! Labels are UTF-8, right-padded with spaces to `label_width`. A blank slot
//! label marks an unassigned slot.
//!
//! # Examples
//!
//! ```no_run
//! use jaae_types::file::jaae;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let set = jaae::open("flowers.jaae")?;
//! println!("{} animations, {} frames", set.animation_count(), set.frames().len());
//! jaae::save("copy.jaae", &set)?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
mod file;

pub use self::file::{Header, from_bytes, from_reader, open, save, to_bytes};

#[cfg(test)]
mod tests;
