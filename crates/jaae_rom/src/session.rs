//! Editing session.
//!
//! A [`Session`] holds everything an editor front end works on: the ROM and
//! its loaded tileset, the selected palette, the animation set, and the
//! working animation and slot cursors. Operations that act on "the current"
//! animation or slot go through those cursors.
//!
//! Destructive operations take a [`Confirm`] capability instead of asking the
//! user directly.
//!
//! # Examples
//!
//! ```no_run
//! use jaae_rom::Session;
//! use jaae_rom::patch::{DevkitArm, ToolchainConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! session.set_rom("firered.gba")?;
//! let header = session.tileset_header_offset_for_number(0)?;
//! session.load_tileset(header)?;
//!
//! session.add_animation()?;
//! session.set_animation_start(0x10)?;
//! session.set_animation_end(0x13)?;
//! session.add_frame_from_file("flower", "flower.png", 4)?;
//! for slot in 0..2 {
//! 	session.set_working_slot(slot)?;
//! 	session.set_working_frame_image(Some(&format!("flower_{slot}")))?;
//! }
//!
//! let mut toolchain = DevkitArm::new(ToolchainConfig::load(None)?);
//! let outcome = session.insert_to_rom(0x80_0000, &mut toolchain)?;
//! println!("{}", outcome.log);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use jaae_types::anim::{Animation, AnimationSet, Confirm, SlotRef, Speed};
use jaae_types::file::{FileType, JaaeError, JaaeResult, jaae};
use jaae_types::gba::{IndexedImage, decode_tiles};
use log::{debug, info};

use crate::patch::{self, PatchOutcome, PatchTarget, Toolchain};
use crate::region::Region;
use crate::rom::Rom;
use crate::tileset::{PALETTE_COUNT, Tileset};

const NO_ROM: &str = "No ROM loaded.";
const NO_TILESET: &str = "No tileset loaded.";
const NO_ANIMATION: &str = "There is no animation selected.";
const NO_SLOT: &str = "There is no frame selected.";

/// Explicit editor state.
#[derive(Debug, Clone, Default)]
pub struct Session {
	rom_path: Option<PathBuf>,
	region: Option<Region>,
	tileset: Option<Tileset>,
	selected_palette: usize,
	set: AnimationSet,
	working_animation: Option<usize>,
	working_slot: Option<usize>,
}

impl Session {
	/// Creates an empty session.
	pub fn new() -> Self {
		Self::default()
	}

	// ROM and tileset

	/// Selects the ROM to work on, reading its region code.
	///
	/// Any loaded tileset is dropped. Animations and frames are kept.
	pub fn set_rom(&mut self, path: impl AsRef<Path>) -> JaaeResult<Region> {
		let path = path.as_ref();
		let rom = Rom::open(path)?;
		self.rom_path = Some(path.to_path_buf());
		self.region = Some(rom.region());
		self.tileset = None;
		self.selected_palette = 0;
		Ok(rom.region())
	}

	/// Path of the selected ROM.
	pub fn rom_path(&self) -> Option<&Path> {
		self.rom_path.as_deref()
	}

	/// Region of the selected ROM.
	pub fn region(&self) -> Option<Region> {
		self.region
	}

	/// Returns `true` once a ROM is selected.
	pub fn rom_loaded(&self) -> bool {
		self.rom_path.is_some()
	}

	/// Returns `true` once a tileset is loaded.
	pub fn tileset_loaded(&self) -> bool {
		self.tileset.is_some()
	}

	/// The loaded tileset.
	pub fn tileset(&self) -> Option<&Tileset> {
		self.tileset.as_ref()
	}

	/// Header offset of a map tileset in the selected ROM.
	pub fn tileset_header_offset_for_number(&self, number: u16) -> JaaeResult<u32> {
		let region = self.region.ok_or(JaaeError::InvalidState(NO_ROM))?;
		Ok(region.tileset_header_offset(number))
	}

	/// Loads the tileset whose header lives at `header_offset`.
	///
	/// The ROM is re-read, so a freshly patched file is picked up. The palette
	/// selection resets to 0.
	pub fn load_tileset(&mut self, header_offset: u32) -> JaaeResult<&Tileset> {
		let path = self.rom_path.as_deref().ok_or(JaaeError::InvalidState(NO_ROM))?;
		let rom = Rom::open(path)?;
		let tileset = rom.load_tileset(header_offset)?;
		self.region = Some(rom.region());
		self.selected_palette = 0;
		Ok(self.tileset.insert(tileset))
	}

	/// Tileset graphics rendered with the selected palette.
	pub fn tileset_image(&self) -> JaaeResult<IndexedImage> {
		self.loaded_tileset()?.image_with_palette(self.selected_palette)
	}

	/// Selects the palette used to render the tileset and frames.
	///
	/// # Errors
	///
	/// Returns a range error for indices above 15.
	pub fn set_selected_palette(&mut self, index: usize) -> JaaeResult<()> {
		if index >= PALETTE_COUNT {
			return Err(JaaeError::out_of_range("palette index", index as u64, 0u8, (PALETTE_COUNT - 1) as u64));
		}
		self.selected_palette = index;
		Ok(())
	}

	/// The selected palette index.
	pub fn selected_palette(&self) -> usize {
		self.selected_palette
	}

	fn loaded_tileset(&self) -> JaaeResult<&Tileset> {
		self.tileset.as_ref().ok_or(JaaeError::InvalidState(NO_TILESET))
	}

	// Animations

	/// The animation set being edited.
	pub fn animation_set(&self) -> &AnimationSet {
		&self.set
	}

	/// Number of animations.
	pub fn animation_count(&self) -> usize {
		self.set.animation_count()
	}

	/// Returns `true` while another animation fits.
	pub fn can_add_animation(&self) -> bool {
		self.set.can_add_animation()
	}

	/// Appends an empty animation.
	///
	/// The first animation becomes the working animation; the working slot is
	/// reset when it no longer points into the working animation.
	pub fn add_animation(&mut self) -> JaaeResult<usize> {
		let index = self.set.add_animation()?;
		if self.working_animation.is_none() {
			self.working_animation = Some(0);
		}
		if self.working_slot.is_none_or(|slot| slot >= self.animation_frame_count()) {
			self.working_slot = Some(0);
		}
		Ok(index)
	}

	/// Removes the working animation.
	///
	/// The cursor moves to the animation now at that position, or the new last
	/// one; the working slot resets to 0.
	pub fn remove_working_animation(&mut self) -> JaaeResult<Animation> {
		let index = self.working_animation.ok_or(JaaeError::InvalidState(NO_ANIMATION))?;
		let removed = self.set.remove_animation(index)?;
		if self.set.animations().is_empty() {
			self.working_animation = None;
			self.working_slot = None;
		} else {
			self.working_animation = Some(index.min(self.set.animation_count() - 1));
			self.working_slot = Some(0);
		}
		debug!("Removed animation {index}");
		Ok(removed)
	}

	/// Selects the working animation, clamping the working slot into it.
	pub fn set_working_animation(&mut self, index: usize) -> JaaeResult<()> {
		let slots = self.set.animation(index)?.slot_count();
		self.working_animation = Some(index);
		self.working_slot = Some(self.working_slot.unwrap_or(0).min(slots - 1));
		Ok(())
	}

	/// Index of the working animation.
	pub fn working_animation(&self) -> Option<usize> {
		self.working_animation
	}

	fn working(&self) -> JaaeResult<&Animation> {
		let index = self.working_animation.ok_or(JaaeError::InvalidState(NO_ANIMATION))?;
		self.set.animation(index)
	}

	fn working_mut(&mut self) -> JaaeResult<&mut Animation> {
		let index = self.working_animation.ok_or(JaaeError::InvalidState(NO_ANIMATION))?;
		self.set.animation_mut(index)
	}

	/// First tile of the working animation.
	pub fn animation_start(&self) -> JaaeResult<u16> {
		Ok(self.working()?.start_tile())
	}

	/// Sets the first tile of the working animation.
	pub fn set_animation_start(&mut self, value: u32) -> JaaeResult<()> {
		self.working_mut()?.set_start_tile(value)
	}

	/// Last tile of the working animation.
	pub fn animation_end(&self) -> JaaeResult<u16> {
		Ok(self.working()?.end_tile())
	}

	/// Sets the last tile of the working animation.
	pub fn set_animation_end(&mut self, value: u32) -> JaaeResult<()> {
		self.working_mut()?.set_end_tile(value)
	}

	/// Speed of the working animation.
	pub fn animation_speed(&self) -> JaaeResult<Speed> {
		Ok(self.working()?.speed())
	}

	/// Sets the speed of the working animation from its ordinal.
	pub fn set_animation_speed(&mut self, value: u8) -> JaaeResult<()> {
		self.working_mut()?.set_speed(value)
	}

	/// Number of slots of the working animation, 0 without one.
	pub fn animation_frame_count(&self) -> usize {
		self.working().map_or(0, Animation::slot_count)
	}

	/// Slot count of the working animation as a selector index (2 -> 0 ... 32 -> 4).
	pub fn animation_frame_count_index(&self) -> Option<usize> {
		self.working().ok().map(Animation::slot_count_index)
	}

	/// Changes the slot count of the working animation.
	///
	/// The request is rounded to a power of two; shrinking over assigned slots
	/// asks `confirm`. The working slot is clamped into the new range.
	pub fn set_animation_frame_count(&mut self, requested: usize, confirm: &mut impl Confirm) -> JaaeResult<bool> {
		if !self.working_mut()?.set_slot_count(requested, confirm)? {
			return Ok(false);
		}
		let count = self.animation_frame_count();
		if self.working_slot.is_some_and(|slot| slot >= count) {
			self.working_slot = Some(count - 1);
		}
		Ok(true)
	}

	// Slots and frames

	/// Index of the working slot.
	pub fn working_slot(&self) -> Option<usize> {
		self.working_slot
	}

	/// Selects the working slot of the working animation.
	///
	/// # Errors
	///
	/// Returns a state error without a working animation and a range error for
	/// slots past its frame count.
	pub fn set_working_slot(&mut self, index: usize) -> JaaeResult<()> {
		let count = self.working()?.slot_count();
		if index >= count {
			return Err(JaaeError::out_of_range("frame index", index as u64, 0u8, (count - 1) as u64));
		}
		self.working_slot = Some(index);
		Ok(())
	}

	fn working_ref(&self) -> Option<SlotRef> {
		Some(SlotRef::new(self.working_animation?, self.working_slot?))
	}

	/// Adds frames from an indexed image, optionally split into `split` parts.
	///
	/// Returns the labels that were added.
	pub fn add_frame(&mut self, label: &str, image: &IndexedImage, split: usize) -> JaaeResult<Vec<String>> {
		let labels = self.set.add_frames_from_image(label, image, split)?;
		info!("Added frame(s) {}", labels.join(", "));
		Ok(labels)
	}

	/// Adds frames from an indexed PNG file.
	///
	/// # Errors
	///
	/// Unreadable or non-indexed images are reported as format errors.
	pub fn add_frame_from_file(&mut self, label: &str, path: impl AsRef<Path>, split: usize) -> JaaeResult<Vec<String>> {
		let image = IndexedImage::open(path).map_err(|e| e.into_format(FileType::Image))?;
		self.add_frame(label, &image, split)
	}

	/// Number of frames in the library.
	pub fn frame_count(&self) -> usize {
		self.set.frames().len()
	}

	/// Frame labels in library order.
	pub fn frame_labels(&self) -> impl Iterator<Item = &str> {
		self.set.frames().labels()
	}

	/// Removes a frame.
	///
	/// A frame shown only by the working slot is removed silently; other users
	/// need `confirm`. Returns `Ok(false)` when refused.
	pub fn remove_frame(&mut self, label: &str, confirm: &mut impl Confirm) -> JaaeResult<bool> {
		let working = self.working_ref();
		self.set.remove_frame(label, working, confirm)
	}

	/// Assigns a frame to the working slot, or clears it with `None`.
	pub fn set_working_frame_image(&mut self, label: Option<&str>) -> JaaeResult<()> {
		let at = self.working_ref().ok_or(JaaeError::InvalidState(NO_SLOT))?;
		self.set.set_slot(at, label)
	}

	/// Label shown in the working slot.
	pub fn working_frame_label(&self) -> Option<&str> {
		self.working_ref().and_then(|at| self.set.slot(at).ok().flatten())
	}

	/// The working slot's frame decoded `tiles_wide` tiles per row.
	///
	/// Rendered with the selected tileset palette when a tileset is loaded.
	pub fn working_frame_image(&self, tiles_wide: u32) -> JaaeResult<Option<IndexedImage>> {
		let Some(label) = self.working_frame_label() else {
			return Ok(None);
		};
		let frame = self.set.frames().get(label).ok_or_else(|| JaaeError::UnknownLabel(label.to_string()))?;
		let mut image = decode_tiles(frame.data(), tiles_wide)?;
		if let Some(tileset) = &self.tileset {
			image.set_palette(tileset.palette(self.selected_palette)?);
		}
		Ok(Some(image))
	}

	/// Does the working slot's frame cover exactly the working animation's tiles?
	///
	/// `true` when there is nothing to compare.
	pub fn animation_matches_frame(&self) -> bool {
		self.working_ref().is_none_or(|at| self.set.matches_frame(at).unwrap_or(true))
	}

	// Persistence and insertion

	/// Saves animations and frames to a project file.
	pub fn export_animations(&self, path: impl AsRef<Path>) -> JaaeResult<()> {
		jaae::save(path, &self.set)
	}

	/// Replaces animations and frames with those of a project file.
	///
	/// Nothing changes unless the whole file loads. Both cursors reset to 0.
	///
	/// # Errors
	///
	/// Returns a state error without a loaded tileset and a format error for a
	/// malformed file.
	pub fn import_animations(&mut self, path: impl AsRef<Path>) -> JaaeResult<()> {
		self.loaded_tileset()?;
		let set = jaae::open(path)?;
		self.set = set;
		self.working_animation = Some(0);
		self.working_slot = Some(0);
		Ok(())
	}

	/// Bytes the patch will occupy in the ROM.
	pub fn needed_space(&self) -> usize {
		patch::needed_space(&self.set)
	}

	/// Runs the patch pipeline against the selected ROM and loaded tileset.
	///
	/// # Errors
	///
	/// Returns a state error without a ROM or tileset; see [`patch::insert`]
	/// for the rest.
	pub fn insert_to_rom(&self, offset: u32, toolchain: &mut impl Toolchain) -> JaaeResult<PatchOutcome> {
		let rom_path = self.rom_path.as_deref().ok_or(JaaeError::InvalidState(NO_ROM))?;
		let region = self.region.ok_or(JaaeError::InvalidState(NO_ROM))?;
		let tileset = self.loaded_tileset()?;

		let target = PatchTarget {
			rom_path,
			region,
			tileset_header_offset: tileset.header_offset(),
			primary: tileset.is_primary(),
		};
		patch::insert(offset, &self.set, &target, toolchain)
	}
}
