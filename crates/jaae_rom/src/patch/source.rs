//! Assembler source generation for the animation tables.
//!
//! The generated include is pulled in by the support routines. It holds, in
//! order:
//!
//! 1. `AnimHeaderTable`: one `anim_table_entry` per animation (frame table
//!    pointer, start tile, tile count, speed, frame count - 1)
//! 2. `AnimationTable<i>`: per animation, one pointer per slot
//! 3. `frame_img_<label>`: the raw bytes of every frame in the library
//!
//! Pointers are emitted relative to `INSERTION_OFFSET`, which the assembler
//! receives as a symbol definition.

use jaae_types::anim::{Animation, AnimationSet, validate_label};
use jaae_types::file::{JaaeError, JaaeResult};
use log::debug;

/// Size of the support routines in bytes
pub const ROUTINE_SIZE: usize = 0x84;

/// Size of one `anim_table_entry`
pub const ANIMATION_ENTRY_SIZE: usize = 8;

/// Size of one slot pointer
pub const SLOT_POINTER_SIZE: usize = 4;

/// Bytes the patch will occupy in the ROM.
///
/// `0x84 + 8 * animations + 4 * slots + frame bytes`
pub fn needed_space(set: &AnimationSet) -> usize {
	let slots: usize = set.animations().iter().map(Animation::slot_count).sum();
	ROUTINE_SIZE + ANIMATION_ENTRY_SIZE * set.animation_count() + SLOT_POINTER_SIZE * slots + set.frames().total_bytes()
}

/// Builds the include file for the support routines.
///
/// # Errors
///
/// - [`JaaeError::InvalidState`] if the set has no animation
/// - [`JaaeError::UnassignedSlot`] for the first slot without a frame
/// - [`JaaeError::InvalidLabel`] if a frame label is not a valid assembler symbol
pub fn build_source(set: &AnimationSet) -> JaaeResult<String> {
	if set.animations().is_empty() {
		return Err(JaaeError::InvalidState("There are no animations to insert."));
	}
	for (animation, entry) in set.animations().iter().enumerate() {
		if let Some(slot) = entry.slots().iter().position(Option::is_none) {
			return Err(JaaeError::UnassignedSlot {
				animation,
				slot,
			});
		}
	}
	for label in set.frames().labels() {
		validate_label(label)?;
	}

	let mut out = String::from(".align 2\nAnimHeaderTable:\n");
	for (i, animation) in set.animations().iter().enumerate() {
		out.push_str(&format!(
			"anim_table_entry AnimationTable{i} + INSERTION_OFFSET, {}, {}, {}, {}\n",
			animation.start_tile(),
			animation.tile_span(),
			animation.speed().to_u8(),
			animation.slot_count() - 1
		));
	}
	out.push_str("AnimHeaderTableEnd:\n");

	for (i, animation) in set.animations().iter().enumerate() {
		out.push_str(&format!("AnimationTable{i}:\n"));
		for label in animation.slots().iter().flatten() {
			out.push_str(&format!(".4byte frame_img_{label} + INSERTION_OFFSET\n"));
		}
	}

	for frame in set.frames() {
		out.push_str(&format!("frame_img_{}:\n", frame.label()));
		let bytes: Vec<String> = frame.data().iter().map(u8::to_string).collect();
		out.push_str(".byte ");
		out.push_str(&bytes.join(","));
		out.push('\n');
	}

	debug!(
		"Generated {} bytes of source for {} animation(s) and {} frame(s)",
		out.len(),
		set.animation_count(),
		set.frames().len()
	);
	Ok(out)
}
