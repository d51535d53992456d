//! Frames and the frame library.
//!
//! A frame is a blob of packed 4bpp tiles identified by a label. Animation
//! slots refer to frames by label only, so the library is the single owner of
//! the pixel data.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::file::{JaaeError, JaaeResult};
use crate::gba::TILE_BYTES;

/// Checks a label typed by the user: letters, digits and underscores only.
///
/// # Errors
///
/// Returns [`JaaeError::InvalidLabel`] for anything else.
pub fn validate_label(label: &str) -> JaaeResult<()> {
	static PATTERN: OnceLock<Regex> = OnceLock::new();
	let pattern = PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("label pattern is valid"));

	if pattern.is_match(label) {
		Ok(())
	} else {
		Err(JaaeError::InvalidLabel {
			label: label.to_string(),
			reason: "labels can only have letters, numbers and underscores",
		})
	}
}

/// Checks a label that is about to be stored in a project file.
///
/// Labels are space-padded on disk, so they must be non-empty and free of whitespace.
pub fn validate_persisted_label(label: &str) -> JaaeResult<()> {
	if label.is_empty() {
		return Err(JaaeError::InvalidLabel {
			label: String::new(),
			reason: "labels can't be empty",
		});
	}
	if label.chars().any(char::is_whitespace) {
		return Err(JaaeError::InvalidLabel {
			label: label.to_string(),
			reason: "labels can't contain spaces",
		});
	}
	Ok(())
}

/// One packed image usable as an animation keyframe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
	label: String,
	data: Vec<u8>,
}

impl Frame {
	/// Creates a frame from packed 4bpp data.
	///
	/// # Errors
	///
	/// Returns a format error if the label cannot be persisted or the data is not a
	/// non-zero multiple of 32 bytes.
	pub fn new(label: impl Into<String>, data: Vec<u8>) -> JaaeResult<Self> {
		let label = label.into();
		validate_persisted_label(&label)?;
		if data.is_empty() || data.len() % TILE_BYTES != 0 {
			return Err(JaaeError::ImageFormat(format!(
				"frame \"{label}\" is {} bytes, which is not a whole number of tiles",
				data.len()
			)));
		}
		Ok(Self {
			label,
			data,
		})
	}

	/// Frame label.
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Packed tile data.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Number of 8×8 tiles in the frame.
	pub fn tile_count(&self) -> usize {
		self.data.len() / TILE_BYTES
	}

	/// Size in bytes.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the frame holds no data.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({} tiles)", self.label, self.tile_count())
	}
}

/// Ordered collection of frames keyed by label.
///
/// Insertion order is preserved; it is the order frames are written to project
/// files and emitted into the generated patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLibrary {
	frames: Vec<Frame>,
}

impl FrameLibrary {
	/// Creates an empty library.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of frames.
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` when the library holds no frames.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Returns `true` if a frame with this label exists.
	pub fn contains(&self, label: &str) -> bool {
		self.get(label).is_some()
	}

	/// Looks up a frame by label.
	pub fn get(&self, label: &str) -> Option<&Frame> {
		self.frames.iter().find(|frame| frame.label == label)
	}

	/// Adds a frame.
	///
	/// # Errors
	///
	/// Returns [`JaaeError::InvalidLabel`] if the label is already used.
	pub fn insert(&mut self, frame: Frame) -> JaaeResult<()> {
		if self.contains(&frame.label) {
			return Err(JaaeError::InvalidLabel {
				label: frame.label,
				reason: "label already used",
			});
		}
		self.frames.push(frame);
		Ok(())
	}

	/// Removes a frame by label, returning it.
	pub(crate) fn remove(&mut self, label: &str) -> Option<Frame> {
		let index = self.frames.iter().position(|frame| frame.label == label)?;
		Some(self.frames.remove(index))
	}

	/// Iterates over frames in insertion order.
	pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
		self.frames.iter()
	}

	/// Iterates over labels in insertion order.
	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.frames.iter().map(Frame::label)
	}

	/// Total size of all frame data in bytes.
	pub fn total_bytes(&self) -> usize {
		self.frames.iter().map(Frame::len).sum()
	}
}

impl<'a> IntoIterator for &'a FrameLibrary {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
