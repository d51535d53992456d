//! In-memory animation model.
//!
//! An [`AnimationSet`] owns up to 20 [`Animation`]s and a [`FrameLibrary`].
//! Animations refer to frames by label, never by ownership, so the set checks
//! every reference when a slot is assigned and when a frame is removed.
//!
//! # Examples
//!
//! ```
//! use jaae_types::anim::{AnimationSet, Frame, SlotRef};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut set = AnimationSet::new();
//! let index = set.add_animation()?;
//! set.add_frame(Frame::new("walk0", vec![0; 4 * 32])?)?;
//!
//! let animation = set.animation_mut(index)?;
//! animation.set_start_tile(0x10)?;
//! animation.set_end_tile(0x13)?;
//! animation.set_speed(3)?;
//!
//! set.set_slot(SlotRef::new(index, 0), Some("walk0"))?;
//! assert!(set.matches_frame(SlotRef::new(index, 0))?);
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod confirm;
pub mod frame;
pub mod set;
pub mod speed;

pub use self::animation::{Animation, MAX_SLOTS, MAX_TILE, MIN_SLOTS, nearest_slot_count};
pub use self::confirm::Confirm;
pub use self::frame::{Frame, FrameLibrary, validate_label, validate_persisted_label};
pub use self::set::{AnimationSet, MAX_ANIMATIONS, SlotRef};
pub use self::speed::Speed;
