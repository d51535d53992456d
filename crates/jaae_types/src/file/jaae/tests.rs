//! Unit tests for project file reading and writing

use super::*;
use crate::anim::{AnimationSet, Frame, SlotRef, Speed};
use crate::file::{ErrorKind, JaaeError};

fn frame_bytes(tiles: usize, seed: u8) -> Vec<u8> {
	(0..tiles * 32).map(|i| (i as u8).wrapping_mul(seed)).collect()
}

fn create_test_set() -> AnimationSet {
	let mut set = AnimationSet::new();
	set.add_frame(Frame::new("walk0", frame_bytes(4, 3)).unwrap()).unwrap();
	set.add_frame(Frame::new("walk1", frame_bytes(4, 5)).unwrap()).unwrap();
	set.add_frame(Frame::new("w", frame_bytes(1, 7)).unwrap()).unwrap();

	let first = set.add_animation().unwrap();
	{
		let animation = set.animation_mut(first).unwrap();
		animation.set_start_tile(0x10).unwrap();
		animation.set_end_tile(0x13).unwrap();
		animation.set_speed(3).unwrap();
		animation.set_slot_count(4, &mut |_: &str, _: &str| true).unwrap();
	}
	for slot in 0..4 {
		let label = if slot % 2 == 0 { "walk0" } else { "walk1" };
		set.set_slot(SlotRef::new(first, slot), Some(label)).unwrap();
	}

	let second = set.add_animation().unwrap();
	{
		let animation = set.animation_mut(second).unwrap();
		animation.set_start_tile(0x1FF).unwrap();
		animation.set_speed(7).unwrap();
	}
	set.set_slot(SlotRef::new(second, 1), Some("w")).unwrap();
	set
}

#[test]
fn test_header_layout() {
	let set = create_test_set();
	let bytes = to_bytes(&set).unwrap();

	assert_eq!(&bytes[0..4], b"JAAE");
	assert_eq!(bytes[4], 0);
	assert_eq!(bytes[5], 1); // two animations
	assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 2); // three frames
	assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 5); // "walk0"

	// first directory entry
	assert_eq!(&bytes[10..15], b"walk0");
	assert_eq!(u32::from_le_bytes(bytes[15..19].try_into().unwrap()), 128);
	// third label is space padded
	assert_eq!(&bytes[28..33], b"w    ");
}

#[test]
fn test_exact_size() {
	let set = create_test_set();
	let bytes = to_bytes(&set).unwrap();
	let directory = 3 * (5 + 4);
	let data = 128 + 128 + 32;
	let animations = (7 + 4 * 5) + (7 + 2 * 5);
	assert_eq!(bytes.len(), 10 + directory + data + animations);
}

#[test_log::test]
fn test_roundtrip() {
	let set = create_test_set();
	let loaded = from_bytes(&to_bytes(&set).unwrap()).unwrap();

	assert_eq!(loaded, set);
	assert_eq!(loaded.animation(0).unwrap().speed(), Speed::Normal);
	assert_eq!(loaded.animation(1).unwrap().slots(), &[None, Some("w".to_string())]);
	assert_eq!(loaded.frames().get("walk1").unwrap().data(), &frame_bytes(4, 5)[..]);
	assert_eq!(loaded.frames().labels().collect::<Vec<_>>(), vec!["walk0", "walk1", "w"]);
}

#[test]
fn test_scenario_walk_animation() {
	let mut set = AnimationSet::new();
	set.add_frame(Frame::new("walk0", frame_bytes(4, 1)).unwrap()).unwrap();
	set.add_animation().unwrap();
	{
		let animation = set.animation_mut(0).unwrap();
		animation.set_start_tile(0x10).unwrap();
		animation.set_end_tile(0x13).unwrap();
		animation.set_speed(3).unwrap();
		animation.set_slot_count(4, &mut |_: &str, _: &str| false).unwrap();
	}
	for slot in 0..4 {
		set.set_slot(SlotRef::new(0, slot), Some("walk0")).unwrap();
	}

	let loaded = from_bytes(&to_bytes(&set).unwrap()).unwrap();
	assert_eq!(loaded.animation(0).unwrap().slot_count(), 4);
	for slot in 0..4 {
		assert!(loaded.matches_frame(SlotRef::new(0, slot)).unwrap());
	}
}

#[test]
fn test_save_requires_animation_and_frame() {
	let mut empty = AnimationSet::new();
	assert_eq!(to_bytes(&empty).unwrap_err().kind(), ErrorKind::Format);

	empty.add_animation().unwrap();
	assert_eq!(to_bytes(&empty).unwrap_err().kind(), ErrorKind::Format);

	let mut frames_only = AnimationSet::new();
	frames_only.add_frame(Frame::new("a", vec![0; 32]).unwrap()).unwrap();
	assert_eq!(to_bytes(&frames_only).unwrap_err().kind(), ErrorKind::Format);
}

#[test_log::test]
fn test_save_is_all_or_nothing() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("empty.jaae");
	assert!(save(&path, &AnimationSet::new()).is_err());
	assert!(!path.exists());

	save(&path, &create_test_set()).unwrap();
	assert_eq!(open(&path).unwrap(), create_test_set());
}

#[test]
fn test_wrong_magic() {
	let mut bytes = to_bytes(&create_test_set()).unwrap();
	bytes[0] = b'X';
	let err = from_bytes(&bytes).unwrap_err();
	assert!(matches!(err, JaaeError::InvalidMagic(_)));
	assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_unknown_version() {
	let mut bytes = to_bytes(&create_test_set()).unwrap();
	bytes[4] = 1;
	assert!(matches!(from_bytes(&bytes).unwrap_err(), JaaeError::UnsupportedVersion(1)));
}

#[test]
fn test_unknown_slot_label() {
	let mut bytes = to_bytes(&create_test_set()).unwrap();
	// the second animation's second slot holds "w    "; rename it to "q"
	let pos = bytes.len() - 5;
	assert_eq!(&bytes[pos..], b"w    ");
	bytes[pos] = b'q';

	let err = from_bytes(&bytes).unwrap_err();
	assert!(matches!(err, JaaeError::UnknownLabel(ref label) if label == "q"));
	assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_truncated_file() {
	let bytes = to_bytes(&create_test_set()).unwrap();
	for cut in [3, 9, 20, 100, bytes.len() - 1] {
		let err = from_bytes(&bytes[..cut]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Format, "cut at {cut}");
	}
}

#[test]
fn test_oversized_data_length() {
	let mut bytes = to_bytes(&create_test_set()).unwrap();
	bytes[15..19].copy_from_slice(&u32::MAX.to_le_bytes());
	assert!(from_bytes(&bytes).unwrap_err().is_format());
}

#[test]
fn test_invalid_slot_count_rejected() {
	let mut bytes = to_bytes(&create_test_set()).unwrap();
	// first animation record starts right after the frame data
	let record = 10 + 3 * 9 + 288;
	assert_eq!(u16::from_le_bytes([bytes[record + 5], bytes[record + 6]]), 3);
	bytes[record + 5] = 2; // three slots
	assert!(from_bytes(&bytes).unwrap_err().is_format());
}

#[test]
fn test_invalid_speed_rejected() {
	let mut bytes = to_bytes(&create_test_set()).unwrap();
	let record = 10 + 3 * 9 + 288;
	bytes[record + 4] = 8;
	assert!(from_bytes(&bytes).unwrap_err().is_format());
}

#[test]
fn test_labels_with_spaces_cannot_exist() {
	assert!(Frame::new("two words", vec![0; 32]).is_err());
}

#[test]
fn test_open_missing_file_is_format_error() {
	let dir = tempfile::tempdir().unwrap();
	let err = open(dir.path().join("missing.jaae")).unwrap_err();
	assert!(err.is_format());
}
