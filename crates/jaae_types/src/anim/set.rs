//! The animation set: every animation of a tileset plus the shared frame library.

use log::debug;

use super::animation::Animation;
use super::confirm::Confirm;
use super::frame::{Frame, FrameLibrary, validate_label};
use crate::file::{JaaeError, JaaeResult};
use crate::gba::{IndexedImage, TILE_BYTES, encode_tiles};

/// Maximum number of animations per tileset
pub const MAX_ANIMATIONS: usize = 20;

/// Position of one frame slot inside a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
	/// Animation index
	pub animation: usize,
	/// Slot index within the animation
	pub slot: usize,
}

impl SlotRef {
	/// Creates a slot reference.
	pub const fn new(animation: usize, slot: usize) -> Self {
		Self {
			animation,
			slot,
		}
	}
}

/// Ordered animations plus the frame library they draw from.
///
/// Every assigned slot names a frame in [`AnimationSet::frames`]; all mutators
/// keep that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationSet {
	animations: Vec<Animation>,
	frames: FrameLibrary,
}

impl AnimationSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a set from parsed parts, checking slot references.
	pub(crate) fn from_parts(animations: Vec<Animation>, frames: FrameLibrary) -> JaaeResult<Self> {
		let set = Self {
			animations,
			frames,
		};
		set.validate()?;
		Ok(set)
	}

	/// All animations in order.
	pub fn animations(&self) -> &[Animation] {
		&self.animations
	}

	/// Number of animations.
	pub fn animation_count(&self) -> usize {
		self.animations.len()
	}

	/// Returns an animation by index.
	///
	/// # Errors
	///
	/// Returns a range error if the index does not exist.
	pub fn animation(&self, index: usize) -> JaaeResult<&Animation> {
		let count = self.animations.len();
		self.animations.get(index).ok_or_else(|| invalid_animation(index, count))
	}

	/// Returns an animation by index for editing its range, speed or slot count.
	///
	/// Slot labels are assigned through [`AnimationSet::set_slot`] so they can be checked.
	pub fn animation_mut(&mut self, index: usize) -> JaaeResult<&mut Animation> {
		let count = self.animations.len();
		self.animations.get_mut(index).ok_or_else(|| invalid_animation(index, count))
	}

	/// Returns `true` while another animation fits.
	pub fn can_add_animation(&self) -> bool {
		self.animations.len() < MAX_ANIMATIONS
	}

	/// Appends an empty animation and returns its index.
	///
	/// # Errors
	///
	/// Returns a range error once the set holds 20 animations.
	pub fn add_animation(&mut self) -> JaaeResult<usize> {
		if !self.can_add_animation() {
			return Err(JaaeError::out_of_range(
				"animation count",
				(self.animations.len() + 1) as u64,
				1u8,
				MAX_ANIMATIONS as u64,
			));
		}
		self.animations.push(Animation::new());
		Ok(self.animations.len() - 1)
	}

	/// Removes an animation.
	pub fn remove_animation(&mut self, index: usize) -> JaaeResult<Animation> {
		if index >= self.animations.len() {
			return Err(invalid_animation(index, self.animations.len()));
		}
		Ok(self.animations.remove(index))
	}

	/// The frame library.
	pub fn frames(&self) -> &FrameLibrary {
		&self.frames
	}

	/// Adds one frame to the library.
	pub fn add_frame(&mut self, frame: Frame) -> JaaeResult<()> {
		self.frames.insert(frame)
	}

	/// Converts an image into frames and adds them to the library.
	///
	/// With `split == 1` a single frame named `label` is created. Otherwise the
	/// packed data is cut into `split` equal parts named `label_0`, `label_1`, ...
	/// Nothing is added unless every part can be added.
	///
	/// # Errors
	///
	/// - [`JaaeError::InvalidLabel`] for a malformed or already used label
	/// - a range error for `split == 0`
	/// - a format error if the image cannot be encoded or split evenly
	pub fn add_frames_from_image(&mut self, label: &str, image: &IndexedImage, split: usize) -> JaaeResult<Vec<String>> {
		validate_label(label)?;
		if split < 1 {
			return Err(JaaeError::out_of_range("divisor", 0u8, 1u8, u32::MAX));
		}

		let labels: Vec<String> = if split == 1 {
			vec![label.to_string()]
		} else {
			(0..split).map(|i| format!("{label}_{i}")).collect()
		};

		if let Some(taken) = labels.iter().find(|candidate| self.frames.contains(candidate)) {
			return Err(JaaeError::InvalidLabel {
				label: taken.clone(),
				reason: "label already used",
			});
		}

		let data = encode_tiles(image)?;
		if data.len() % (TILE_BYTES * split) != 0 {
			return Err(JaaeError::ImageFormat(format!("Cannot split image in \"{split}\" frames.")));
		}

		let frame_size = data.len() / split;
		let mut frames = Vec::with_capacity(split);
		for (name, chunk) in labels.iter().zip(data.chunks_exact(frame_size)) {
			frames.push(Frame::new(name.clone(), chunk.to_vec())?);
		}
		for frame in frames {
			self.frames.insert(frame)?;
		}

		debug!("Added {} frame(s) from a {}x{} image", labels.len(), image.width(), image.height());
		Ok(labels)
	}

	/// Every slot currently showing `label`.
	pub fn frame_users(&self, label: &str) -> Vec<SlotRef> {
		let mut users = Vec::new();
		for (a, animation) in self.animations.iter().enumerate() {
			for (s, slot) in animation.slots().iter().enumerate() {
				if slot.as_deref() == Some(label) {
					users.push(SlotRef::new(a, s));
				}
			}
		}
		users
	}

	/// Returns `true` if any slot other than `exclude` shows `label`.
	pub fn is_frame_used(&self, label: &str, exclude: Option<SlotRef>) -> bool {
		self.frame_users(label).into_iter().any(|user| Some(user) != exclude)
	}

	/// Removes a frame from the library.
	///
	/// If slots other than `working` still show the frame, `confirm` is asked
	/// before those slots are cleared; a refusal keeps everything as it was and
	/// returns `Ok(false)`. A reference from `working` alone is cleared silently.
	///
	/// # Errors
	///
	/// Returns [`JaaeError::UnknownLabel`] if no such frame exists.
	pub fn remove_frame(&mut self, label: &str, working: Option<SlotRef>, confirm: &mut impl Confirm) -> JaaeResult<bool> {
		if !self.frames.contains(label) {
			return Err(JaaeError::UnknownLabel(label.to_string()));
		}

		if self.is_frame_used(label, working)
			&& !confirm.confirm(
				"Remove frame",
				"The selected frame is being used for some animations.\nRemove anyways?",
			) {
			return Ok(false);
		}

		let cleared: usize = self.animations.iter_mut().map(|animation| animation.clear_label(label)).sum();
		self.frames.remove(label);
		debug!("Removed frame \"{label}\", cleared {cleared} slot(s)");
		Ok(true)
	}

	/// Label shown in a slot.
	pub fn slot(&self, at: SlotRef) -> JaaeResult<Option<&str>> {
		self.animation(at.animation)?.slot(at.slot)
	}

	/// Assigns a frame to a slot, or clears it with `None`.
	///
	/// # Errors
	///
	/// - [`JaaeError::UnknownLabel`] if the label is not in the library
	/// - a range error if the slot does not exist
	pub fn set_slot(&mut self, at: SlotRef, label: Option<&str>) -> JaaeResult<()> {
		if let Some(label) = label
			&& !self.frames.contains(label)
		{
			return Err(JaaeError::UnknownLabel(label.to_string()));
		}
		self.animation_mut(at.animation)?.set_slot_unchecked(at.slot, label.map(str::to_string))
	}

	/// Soft consistency check: does the slot's frame have as many tiles as the animated range?
	///
	/// Unassigned slots always match.
	pub fn matches_frame(&self, at: SlotRef) -> JaaeResult<bool> {
		let animation = self.animation(at.animation)?;
		let tiles = match animation.slot(at.slot)? {
			Some(label) => {
				Some(self.frames.get(label).ok_or_else(|| JaaeError::UnknownLabel(label.to_string()))?.tile_count())
			}
			None => None,
		};
		Ok(animation.matches_tile_count(tiles))
	}

	/// Checks that every assigned slot names a library frame.
	///
	/// # Errors
	///
	/// Returns [`JaaeError::UnknownLabel`] for the first dangling reference.
	pub fn validate(&self) -> JaaeResult<()> {
		for animation in &self.animations {
			for label in animation.slots().iter().flatten() {
				if !self.frames.contains(label) {
					return Err(JaaeError::UnknownLabel(label.clone()));
				}
			}
		}
		Ok(())
	}
}

fn invalid_animation(index: usize, count: usize) -> JaaeError {
	JaaeError::out_of_range("animation index", index as u64, 0u8, count.saturating_sub(1) as u64)
}
