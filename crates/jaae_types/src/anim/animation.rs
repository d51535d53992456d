//! A single tileset animation.

use std::fmt;

use super::confirm::Confirm;
use super::speed::Speed;
use crate::file::{JaaeError, JaaeResult};

/// Smallest supported number of frame slots
pub const MIN_SLOTS: usize = 2;

/// Largest supported number of frame slots
pub const MAX_SLOTS: usize = 32;

/// Highest tile index an animation may cover
pub const MAX_TILE: u32 = 0xFFFF;

/// Rounds a requested slot count to the nearest supported power of two.
///
/// Ties round up, so 3 becomes 4 and 6 becomes 8.
///
/// # Errors
///
/// Returns a range error for requests outside `2..=32`.
pub fn nearest_slot_count(requested: usize) -> JaaeResult<usize> {
	if !(MIN_SLOTS..=MAX_SLOTS).contains(&requested) {
		return Err(JaaeError::out_of_range("frame count", requested as u64, MIN_SLOTS as u64, MAX_SLOTS as u64));
	}
	if requested.is_power_of_two() {
		return Ok(requested);
	}
	let upper = requested.next_power_of_two();
	let lower = upper / 2;
	if requested - lower < upper - requested {
		Ok(lower)
	} else {
		Ok(upper)
	}
}

/// One animation: a tile range, a speed, and an ordered list of frame slots.
///
/// Each slot holds the label of a frame in the owning set's library, or `None`
/// when unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
	start_tile: u16,
	end_tile: u16,
	speed: Speed,
	slots: Vec<Option<String>>,
}

impl Animation {
	/// Creates an empty animation: tiles 0..=0, two unassigned slots, normal speed.
	pub fn new() -> Self {
		Self {
			start_tile: 0,
			end_tile: 0,
			speed: Speed::default(),
			slots: vec![None; MIN_SLOTS],
		}
	}

	/// Builds an animation from already-validated parts.
	pub(crate) fn from_parts(start_tile: u16, end_tile: u16, speed: Speed, slots: Vec<Option<String>>) -> Self {
		Self {
			start_tile,
			end_tile,
			speed,
			slots,
		}
	}

	/// First animated tile.
	pub fn start_tile(&self) -> u16 {
		self.start_tile
	}

	/// Last animated tile (inclusive).
	pub fn end_tile(&self) -> u16 {
		self.end_tile
	}

	/// Number of tiles covered: `end - start + 1`.
	pub fn tile_span(&self) -> usize {
		(self.end_tile - self.start_tile) as usize + 1
	}

	/// Sets the first tile, raising the last tile to match if needed.
	///
	/// # Errors
	///
	/// Returns a range error for values above `0xFFFF`.
	pub fn set_start_tile(&mut self, value: u32) -> JaaeResult<()> {
		let value = check_tile(value)?;
		self.start_tile = value;
		if value > self.end_tile {
			self.end_tile = value;
		}
		Ok(())
	}

	/// Sets the last tile, lowering the first tile to match if needed.
	///
	/// # Errors
	///
	/// Returns a range error for values above `0xFFFF`.
	pub fn set_end_tile(&mut self, value: u32) -> JaaeResult<()> {
		let value = check_tile(value)?;
		self.end_tile = value;
		if value < self.start_tile {
			self.start_tile = value;
		}
		Ok(())
	}

	/// Animation speed.
	pub fn speed(&self) -> Speed {
		self.speed
	}

	/// Sets the speed from its ordinal.
	///
	/// # Errors
	///
	/// Returns a range error for ordinals above 7.
	pub fn set_speed(&mut self, value: u8) -> JaaeResult<()> {
		self.speed = Speed::from_u8(value)?;
		Ok(())
	}

	/// Number of frame slots.
	pub fn slot_count(&self) -> usize {
		self.slots.len()
	}

	/// Slot count as a selector index: 2 → 0, 4 → 1, ... 32 → 4.
	pub fn slot_count_index(&self) -> usize {
		self.slots.len().trailing_zeros() as usize - 1
	}

	/// Frame slots in playback order.
	pub fn slots(&self) -> &[Option<String>] {
		&self.slots
	}

	/// Label assigned to a slot.
	///
	/// # Errors
	///
	/// Returns a range error if the slot does not exist.
	pub fn slot(&self, index: usize) -> JaaeResult<Option<&str>> {
		self.slots
			.get(index)
			.map(Option::as_deref)
			.ok_or_else(|| JaaeError::out_of_range("frame index", index as u64, 0u8, (self.slots.len() - 1) as u64))
	}

	/// Assigns a slot without checking the label against a library.
	pub(crate) fn set_slot_unchecked(&mut self, index: usize, label: Option<String>) -> JaaeResult<()> {
		let len = self.slots.len();
		let slot = self
			.slots
			.get_mut(index)
			.ok_or_else(|| JaaeError::out_of_range("frame index", index as u64, 0u8, (len - 1) as u64))?;
		*slot = label;
		Ok(())
	}

	/// Clears every slot pointing at `label`, returning how many were cleared.
	pub(crate) fn clear_label(&mut self, label: &str) -> usize {
		let mut cleared = 0;
		for slot in self.slots.iter_mut().filter(|slot| slot.as_deref() == Some(label)) {
			*slot = None;
			cleared += 1;
		}
		cleared
	}

	/// Returns `true` if shrinking to `new_count` slots would drop no assigned frame.
	pub fn can_safely_trim(&self, new_count: usize) -> bool {
		self.slots.iter().skip(new_count).all(Option::is_none)
	}

	/// Changes the number of slots.
	///
	/// The request is rounded to the nearest power of two in `2..=32`. Growing
	/// appends unassigned slots. Shrinking over assigned slots asks `confirm`
	/// first; a refusal leaves the animation untouched.
	///
	/// # Returns
	///
	/// `Ok(true)` if the slot count now matches the rounded request.
	pub fn set_slot_count(&mut self, requested: usize, confirm: &mut impl Confirm) -> JaaeResult<bool> {
		let count = nearest_slot_count(requested)?;
		if !self.can_safely_trim(count)
			&& !confirm.confirm(
				"Change number of frames",
				&format!(
					"There are frames over {count} that are being used.\nDo you wish to delete them anyways?"
				),
			) {
			return Ok(false);
		}
		self.slots.resize(count, None);
		Ok(true)
	}

	/// Returns `true` if the slot's frame has exactly as many tiles as the animated range.
	///
	/// Unassigned slots always match.
	pub fn matches_tile_count(&self, frame_tiles: Option<usize>) -> bool {
		frame_tiles.is_none_or(|tiles| tiles == self.tile_span())
	}
}

impl Default for Animation {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for Animation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"tiles {:#06X}..={:#06X}, {} frames, speed {}",
			self.start_tile,
			self.end_tile,
			self.slots.len(),
			self.speed
		)
	}
}

fn check_tile(value: u32) -> JaaeResult<u16> {
	u16::try_from(value).map_err(|_| JaaeError::out_of_range("tile", value, 0u32, MAX_TILE))
}
