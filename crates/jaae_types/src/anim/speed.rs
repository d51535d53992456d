//! Animation speed levels.

use std::fmt;

use crate::file::{JaaeError, JaaeResult};

/// How often an animation advances to its next frame slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Speed {
	/// Advances every tick
	TooFast = 0,
	/// Very fast
	VeryFast = 1,
	/// Fast
	Fast = 2,
	/// Normal speed
	#[default]
	Normal = 3,
	/// Slow
	Slow = 4,
	/// Very slow
	VerySlow = 5,
	/// Too slow
	TooSlow = 6,
	/// So slow it is barely noticeable
	Glacial = 7,
}

impl Speed {
	/// All speeds, fastest first.
	pub const ALL: [Speed; 8] = [
		Self::TooFast,
		Self::VeryFast,
		Self::Fast,
		Self::Normal,
		Self::Slow,
		Self::VerySlow,
		Self::TooSlow,
		Self::Glacial,
	];

	/// Converts a u8 value to `Speed`.
	///
	/// # Errors
	///
	/// Returns a range error for values above 7.
	pub fn from_u8(value: u8) -> JaaeResult<Self> {
		Self::ALL
			.get(value as usize)
			.copied()
			.ok_or_else(|| JaaeError::out_of_range("speed", value, 0u8, 7u8))
	}

	/// Converts `Speed` to u8.
	pub fn to_u8(self) -> u8 {
		self as u8
	}
}

impl TryFrom<u8> for Speed {
	type Error = JaaeError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Self::from_u8(value)
	}
}

impl fmt::Display for Speed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::TooFast => write!(f, "Too fast"),
			Self::VeryFast => write!(f, "Very fast"),
			Self::Fast => write!(f, "Fast"),
			Self::Normal => write!(f, "Normal"),
			Self::Slow => write!(f, "Slow"),
			Self::VerySlow => write!(f, "Very slow"),
			Self::TooSlow => write!(f, "Too slow"),
			Self::Glacial => write!(f, "Is it even changing?"),
		}
	}
}
