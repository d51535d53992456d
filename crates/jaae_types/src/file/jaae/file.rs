//! Project file reading and writing.

use std::io::{Cursor, Read};
use std::path::Path;

use log::{debug, info, warn};

use super::constants;
use crate::anim::{Animation, AnimationSet, Frame, FrameLibrary, MAX_ANIMATIONS, Speed, validate_persisted_label};
use crate::file::{FileType, JaaeError, JaaeResult};

/// Project file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	/// Format version
	pub version: u8,
	/// Number of animations (1-256)
	pub animation_count: usize,
	/// Number of frames (1-65536)
	pub frame_count: usize,
	/// Width of every stored label in bytes
	pub label_width: usize,
}

impl Header {
	/// Size of the header in bytes
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Parses the header from the start of a project file.
	///
	/// # Errors
	///
	/// Returns a format error for short data, a wrong magic, or an unknown version.
	pub fn from_bytes(data: &[u8]) -> JaaeResult<Self> {
		if data.len() < Self::SIZE {
			return Err(JaaeError::insufficient_data(FileType::Project, Self::SIZE, data.len()));
		}

		let magic = [data[0], data[1], data[2], data[3]];
		if magic != constants::MAGIC {
			return Err(JaaeError::InvalidMagic(magic));
		}
		if data[4] != constants::VERSION {
			return Err(JaaeError::UnsupportedVersion(data[4]));
		}

		Ok(Self {
			version: data[4],
			animation_count: data[5] as usize + 1,
			frame_count: u16::from_le_bytes([data[6], data[7]]) as usize + 1,
			label_width: u16::from_le_bytes([data[8], data[9]]) as usize,
		})
	}

	/// Serializes the header.
	///
	/// # Errors
	///
	/// Returns a format error if a count or the label width does not fit its field.
	pub fn to_bytes(&self) -> JaaeResult<[u8; constants::HEADER_SIZE]> {
		let animations = u8::try_from(self.animation_count.wrapping_sub(1))
			.map_err(|_| JaaeError::invalid_format(FileType::Project, "animation count does not fit the header"))?;
		let frames = u16::try_from(self.frame_count.wrapping_sub(1))
			.map_err(|_| JaaeError::invalid_format(FileType::Project, "frame count does not fit the header"))?;
		let width = u16::try_from(self.label_width)
			.map_err(|_| JaaeError::invalid_format(FileType::Project, "labels are too long"))?;

		let mut out = [0u8; constants::HEADER_SIZE];
		out[0..4].copy_from_slice(&constants::MAGIC);
		out[4] = self.version;
		out[5] = animations;
		out[6..8].copy_from_slice(&frames.to_le_bytes());
		out[8..10].copy_from_slice(&width.to_le_bytes());
		Ok(out)
	}
}

/// Serializes an animation set into project file bytes.
///
/// Everything is validated before the first byte is produced.
///
/// # Errors
///
/// Returns a format error if the set has no animation or no frame, a label
/// cannot be persisted, or a slot names a frame missing from the library.
pub fn to_bytes(set: &AnimationSet) -> JaaeResult<Vec<u8>> {
	if set.animations().is_empty() {
		return Err(JaaeError::invalid_format(FileType::Project, "No animations given."));
	}
	if set.frames().is_empty() {
		return Err(JaaeError::invalid_format(FileType::Project, "No frames given."));
	}
	for label in set.frames().labels() {
		validate_persisted_label(label)?;
	}
	set.validate()?;

	let header = Header {
		version: constants::VERSION,
		animation_count: set.animation_count(),
		frame_count: set.frames().len(),
		label_width: set.frames().labels().map(str::len).max().unwrap_or(0),
	};
	let header_bytes = header.to_bytes()?;

	let slot_total: usize = set.animations().iter().map(Animation::slot_count).sum();
	let mut out = Vec::with_capacity(
		Header::SIZE
			+ header.frame_count * (header.label_width + constants::DATA_LENGTH_SIZE)
			+ set.frames().total_bytes()
			+ header.animation_count * constants::ANIMATION_RECORD_SIZE
			+ slot_total * header.label_width,
	);
	out.extend_from_slice(&header_bytes);

	for frame in set.frames() {
		write_label(&mut out, frame.label(), header.label_width);
		let length = u32::try_from(frame.len())
			.map_err(|_| JaaeError::invalid_format(FileType::Project, "frame is too large"))?;
		out.extend_from_slice(&length.to_le_bytes());
	}
	for frame in set.frames() {
		out.extend_from_slice(frame.data());
	}

	for animation in set.animations() {
		out.extend_from_slice(&animation.start_tile().to_le_bytes());
		out.extend_from_slice(&animation.end_tile().to_le_bytes());
		out.push(animation.speed().to_u8());
		out.extend_from_slice(&((animation.slot_count() - 1) as u16).to_le_bytes());
		for slot in animation.slots() {
			write_label(&mut out, slot.as_deref().unwrap_or(""), header.label_width);
		}
	}

	debug!(
		"Serialized {} animation(s), {} frame(s), label width {}: {} bytes",
		header.animation_count,
		header.frame_count,
		header.label_width,
		out.len()
	);
	Ok(out)
}

/// Writes an animation set to a project file.
///
/// The file is only created once the whole set has serialized successfully.
pub fn save(path: impl AsRef<Path>, set: &AnimationSet) -> JaaeResult<()> {
	let path = path.as_ref();
	let data = to_bytes(set)?;
	std::fs::write(path, &data)?;
	info!("Saved project to {} ({} bytes)", path.display(), data.len());
	Ok(())
}

/// Opens a project file.
///
/// # Errors
///
/// Any failure to read or decode the file is reported as a format error.
pub fn open(path: impl AsRef<Path>) -> JaaeResult<AnimationSet> {
	let path = path.as_ref();
	let data = std::fs::read(path).map_err(|e| JaaeError::from(e).into_format(FileType::Project))?;
	let set = from_bytes(&data)?;
	info!(
		"Loaded project {}: {} animation(s), {} frame(s)",
		path.display(),
		set.animation_count(),
		set.frames().len()
	);
	Ok(set)
}

/// Reads a project from any reader.
pub fn from_reader<R: Read>(reader: &mut R) -> JaaeResult<AnimationSet> {
	let mut data = Vec::new();
	reader.read_to_end(&mut data).map_err(|e| JaaeError::from(e).into_format(FileType::Project))?;
	from_bytes(&data)
}

/// Decodes a project from bytes.
///
/// Decoding stops at the first integrity violation; nothing is returned partially.
///
/// # Errors
///
/// Returns a format error for a wrong magic or version, truncated data,
/// malformed labels or records, or a slot naming an unknown frame.
pub fn from_bytes(data: &[u8]) -> JaaeResult<AnimationSet> {
	let header = Header::from_bytes(data)?;
	if header.animation_count > MAX_ANIMATIONS {
		return Err(JaaeError::invalid_format(
			FileType::Project,
			format!("{} animations exceed the limit of {MAX_ANIMATIONS}", header.animation_count),
		));
	}
	if header.label_width == 0 {
		return Err(JaaeError::invalid_format(FileType::Project, "label width is zero"));
	}

	let mut cursor = Cursor::new(data);
	cursor.set_position(Header::SIZE as u64);
	decode_body(&mut cursor, &header).map_err(|e| e.into_format(FileType::Project))
}

fn decode_body(cursor: &mut Cursor<&[u8]>, header: &Header) -> JaaeResult<AnimationSet> {
	let mut directory = Vec::with_capacity(header.frame_count);
	for _ in 0..header.frame_count {
		let label = read_label(cursor, header.label_width)?;
		if label.is_empty() {
			return Err(JaaeError::invalid_format(FileType::Project, "frame with a blank label"));
		}
		if directory.iter().any(|(existing, _)| *existing == label) {
			return Err(JaaeError::invalid_format(FileType::Project, format!("duplicate label \"{label}\"")));
		}
		let length = read_u32(cursor)? as usize;
		directory.push((label, length));
	}

	let mut frames = FrameLibrary::new();
	for (label, length) in directory {
		let remaining = (cursor.get_ref().len() as u64).saturating_sub(cursor.position()) as usize;
		if length > remaining {
			return Err(JaaeError::insufficient_data(FileType::Project, length, remaining));
		}
		let mut bytes = vec![0u8; length];
		cursor.read_exact(&mut bytes)?;
		frames.insert(Frame::new(label, bytes)?)?;
	}

	let mut animations = Vec::with_capacity(header.animation_count);
	for index in 0..header.animation_count {
		let start_tile = read_u16(cursor)?;
		let end_tile = read_u16(cursor)?;
		let speed = Speed::from_u8(read_u8(cursor)?).map_err(|_| {
			JaaeError::invalid_format(FileType::Project, format!("animation {index} has an invalid speed"))
		})?;
		let slot_count = read_u16(cursor)? as usize + 1;

		if start_tile > end_tile {
			return Err(JaaeError::invalid_format(
				FileType::Project,
				format!("animation {index} starts at tile {start_tile:#X} after its end {end_tile:#X}"),
			));
		}
		if !slot_count.is_power_of_two() || !(crate::anim::MIN_SLOTS..=crate::anim::MAX_SLOTS).contains(&slot_count) {
			return Err(JaaeError::invalid_format(
				FileType::Project,
				format!("animation {index} has an unsupported frame count {slot_count}"),
			));
		}

		let mut slots = Vec::with_capacity(slot_count);
		for _ in 0..slot_count {
			let label = read_label(cursor, header.label_width)?;
			if label.is_empty() {
				slots.push(None);
			} else if frames.contains(&label) {
				slots.push(Some(label));
			} else {
				return Err(JaaeError::UnknownLabel(label));
			}
		}
		animations.push(Animation::from_parts(start_tile, end_tile, speed, slots));
	}

	let trailing = cursor.get_ref().len() as u64 - cursor.position();
	if trailing > 0 {
		warn!("Ignoring {trailing} trailing byte(s) after the animation table");
	}

	AnimationSet::from_parts(animations, frames)
}

fn write_label(out: &mut Vec<u8>, label: &str, width: usize) {
	out.extend_from_slice(label.as_bytes());
	out.resize(out.len() + (width - label.len()), constants::LABEL_PADDING);
}

fn read_label(cursor: &mut Cursor<&[u8]>, width: usize) -> JaaeResult<String> {
	let mut bytes = vec![0u8; width];
	cursor.read_exact(&mut bytes)?;
	let text = String::from_utf8(bytes)
		.map_err(|_| JaaeError::invalid_format(FileType::Project, "label is not valid UTF-8"))?;
	Ok(text.trim().to_string())
}

fn read_u8(cursor: &mut Cursor<&[u8]>) -> JaaeResult<u8> {
	let mut buf = [0u8; 1];
	cursor.read_exact(&mut buf)?;
	Ok(buf[0])
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> JaaeResult<u16> {
	let mut buf = [0u8; 2];
	cursor.read_exact(&mut buf)?;
	Ok(u16::from_le_bytes(buf))
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> JaaeResult<u32> {
	let mut buf = [0u8; 4];
	cursor.read_exact(&mut buf)?;
	Ok(u32::from_le_bytes(buf))
}
