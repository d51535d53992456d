//! Unified error type for every JAAE operation.
//!
//! All operations report failure through [`JaaeError`]. Each variant belongs to
//! one bucket of the error taxonomy, exposed through [`JaaeError::kind`], so
//! callers can decide how to present a failure without matching every variant.

use std::fmt;

use thiserror::Error;

/// Result alias used across the JAAE crates.
pub type JaaeResult<T> = Result<T, JaaeError>;

/// Artifact being parsed or produced when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.jaae` animation project file
	Project,
	/// GBA ROM image
	Rom,
	/// Raster image (indexed PNG or packed 4bpp data)
	Image,
	/// LZ77 compressed stream
	Lz77,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Project => write!(f, "JAAE project"),
			Self::Rom => write!(f, "ROM"),
			Self::Image => write!(f, "image"),
			Self::Lz77 => write!(f, "LZ77 data"),
		}
	}
}

/// Taxonomy bucket of a [`JaaeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Malformed file, malformed or undersized image, unknown label
	Format,
	/// Tile index, speed, slot count or offset out of bounds
	Range,
	/// Missing toolchain, unassigned frame at patch time, invalid region code
	Configuration,
	/// An external tool exited with a failure status
	ExternalProcess,
	/// Operation attempted before the required animation/frame/tileset exists
	State,
	/// Underlying filesystem failure outside of format decoding
	Io,
}

/// Errors that can occur while editing, loading, saving or inserting animations.
#[derive(Debug, Error)]
pub enum JaaeError {
	/// Not enough data to parse
	#[error("Insufficient {file_type} data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Artifact being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic number
	#[error("Not a JAAE file: invalid magic {0:02X?}")]
	InvalidMagic([u8; 4]),

	/// Unknown file format version
	#[error("Unknown JAAE file format version {0}")]
	UnsupportedVersion(u8),

	/// Structural violation inside a file
	#[error("Invalid {file_type}: {message}")]
	InvalidFormat {
		/// Artifact being parsed
		file_type: FileType,
		/// Description of the violation
		message: String,
	},

	/// Image cannot be converted to the packed tile format
	#[error("Image format error: {0}")]
	ImageFormat(String),

	/// Frame label is malformed or already taken
	#[error("Invalid label \"{label}\": {reason}")]
	InvalidLabel {
		/// Offending label
		label: String,
		/// Why it was rejected
		reason: &'static str,
	},

	/// A slot or lookup names a frame that is not in the library
	#[error("Unknown frame label \"{0}\"")]
	UnknownLabel(String),

	/// Compressed stream is malformed or truncated
	#[error("Invalid compressed data: {0}")]
	InvalidCompressedData(String),

	/// A numeric argument is outside its permitted range
	#[error("Invalid {what}: {value:#X} is outside {min:#X}..={max:#X}")]
	OutOfRange {
		/// Name of the value being validated
		what: &'static str,
		/// Rejected value
		value: u64,
		/// Minimum accepted value
		min: u64,
		/// Maximum accepted value
		max: u64,
	},

	/// Insertion offset does not fall on a 4-byte boundary
	#[error("The offset {0:#X} must be aligned. It has to end in 0, 4, 8 or C.")]
	UnalignedOffset(u32),

	/// A pointer or offset lands outside of the ROM
	#[error("The {what} offset {offset:#X} is too big (ROM size {rom_size:#X})")]
	OffsetOutsideRom {
		/// Which offset was followed
		what: &'static str,
		/// Offending offset
		offset: u32,
		/// ROM size in bytes
		rom_size: usize,
	},

	/// The ROM header does not carry a supported region code
	#[error("Unknown rom code \"{0}\"")]
	UnknownRegion(String),

	/// External toolchain could not be located
	#[error("{0}")]
	MissingToolchain(String),

	/// A slot has no frame assigned when generating the patch
	#[error("In animation {animation}, frame {slot} has no assigned image.")]
	UnassignedSlot {
		/// Animation index
		animation: usize,
		/// Slot index
		slot: usize,
	},

	/// Configuration could not be loaded
	#[error("Configuration error: {0}")]
	Config(String),

	/// External tool exited with a failure status
	#[error("{tool} failed:\n{output}")]
	ExternalProcess {
		/// Tool name
		tool: String,
		/// Combined stdout/stderr of the tool
		output: String,
	},

	/// Operation requires state that does not exist yet
	#[error("{0}")]
	InvalidState(&'static str),

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl JaaeError {
	/// Creates an [`JaaeError::InsufficientData`] error.
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an [`JaaeError::InvalidFormat`] error.
	pub fn invalid_format(file_type: FileType, message: impl Into<String>) -> Self {
		Self::InvalidFormat {
			file_type,
			message: message.into(),
		}
	}

	/// Creates an [`JaaeError::OutOfRange`] error.
	pub fn out_of_range(what: &'static str, value: impl Into<u64>, min: impl Into<u64>, max: impl Into<u64>) -> Self {
		Self::OutOfRange {
			what,
			value: value.into(),
			min: min.into(),
			max: max.into(),
		}
	}

	/// Returns the taxonomy bucket of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::InsufficientData {
				..
			}
			| Self::InvalidMagic(_)
			| Self::UnsupportedVersion(_)
			| Self::InvalidFormat {
				..
			}
			| Self::ImageFormat(_)
			| Self::InvalidLabel {
				..
			}
			| Self::UnknownLabel(_)
			| Self::InvalidCompressedData(_) => ErrorKind::Format,
			Self::OutOfRange {
				..
			}
			| Self::UnalignedOffset(_)
			| Self::OffsetOutsideRom {
				..
			} => ErrorKind::Range,
			Self::UnknownRegion(_)
			| Self::MissingToolchain(_)
			| Self::UnassignedSlot {
				..
			}
			| Self::Config(_) => ErrorKind::Configuration,
			Self::ExternalProcess {
				..
			} => ErrorKind::ExternalProcess,
			Self::InvalidState(_) => ErrorKind::State,
			Self::Io(_) => ErrorKind::Io,
		}
	}

	/// Returns `true` if this is a format error.
	pub fn is_format(&self) -> bool {
		self.kind() == ErrorKind::Format
	}

	/// Maps IO failures into format errors for the given artifact.
	///
	/// Decoders use this so a truncated read surfaces as a malformed file
	/// rather than a raw IO failure.
	pub fn into_format(self, file_type: FileType) -> Self {
		match self {
			Self::Io(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
				Self::invalid_format(file_type, "unexpected end of data")
			}
			Self::Io(err) => Self::invalid_format(file_type, err.to_string()),
			other => other,
		}
	}
}
