//! JAAE project file constants.

/// Magic bytes at the start of every project file
pub const MAGIC: [u8; 4] = *b"JAAE";

/// The only supported format version
pub const VERSION: u8 = 0;

/// Size of the file header (magic + version + counts + label width)
pub const HEADER_SIZE: usize = 4 + 1 + 1 + 2 + 2;

/// Size of the data length field following each directory label
pub const DATA_LENGTH_SIZE: usize = 4;

/// Size of the fixed part of an animation record (start, end, speed, slot count - 1)
pub const ANIMATION_RECORD_SIZE: usize = 2 + 2 + 1 + 2;

/// Byte used to pad labels to the label width
pub const LABEL_PADDING: u8 = b' ';
