//! Project round trips through the public API

use jaae_rs::prelude::*;

use crate::common::{HEADER, solid_image, write_emerald_rom, yes};

#[test_log::test]
fn walk_animation_survives_export_and_import() {
	let dir = tempfile::tempdir().unwrap();
	let mut session = Session::new();
	session.set_rom(write_emerald_rom(dir.path())).unwrap();
	session.load_tileset(HEADER).unwrap();

	session.add_frame("walk0", &solid_image(2), 1).unwrap();
	session.add_animation().unwrap();
	session.set_animation_start(0x10).unwrap();
	session.set_animation_end(0x13).unwrap();
	session.set_animation_speed(3).unwrap();
	assert!(session.set_animation_frame_count(4, &mut yes()).unwrap());
	for slot in 0..4 {
		session.set_working_slot(slot).unwrap();
		session.set_working_frame_image(Some("walk0")).unwrap();
	}
	assert!(session.animation_matches_frame());

	let project = dir.path().join("walk.jaae");
	session.export_animations(&project).unwrap();

	let mut reloaded = Session::new();
	reloaded.set_rom(dir.path().join("emerald.gba")).unwrap();
	reloaded.load_tileset(HEADER).unwrap();
	reloaded.import_animations(&project).unwrap();

	assert_eq!(reloaded.animation_set(), session.animation_set());
	assert_eq!(reloaded.working_animation(), Some(0));
	assert_eq!(reloaded.working_slot(), Some(0));
	assert_eq!(reloaded.animation_start().unwrap(), 0x10);
	assert_eq!(reloaded.animation_end().unwrap(), 0x13);
	assert_eq!(reloaded.animation_speed().unwrap(), Speed::Normal);
	assert_eq!(reloaded.animation_frame_count(), 4);
	assert_eq!(reloaded.working_frame_label(), Some("walk0"));
}

#[test]
fn indexed_png_imports_as_split_frames() {
	let dir = tempfile::tempdir().unwrap();
	// frames are cut in tile order, so stack them vertically
	let mut strip = IndexedImage::new(16, 32);
	for y in 0..32 {
		for x in 0..16 {
			strip.set(x, y, if y < 16 { 4 } else { 9 });
		}
	}
	strip.set_palette(&Palette::grayscale());
	let png = dir.path().join("strip.png");
	strip.save(&png).unwrap();

	let mut set = AnimationSet::new();
	let image = IndexedImage::open(&png).unwrap();
	let labels = set.add_frames_from_image("flower", &image, 2).unwrap();
	assert_eq!(labels, vec!["flower_0", "flower_1"]);

	let first = set.frames().get("flower_0").unwrap();
	let second = set.frames().get("flower_1").unwrap();
	assert_eq!(first.tile_count(), 4);
	assert!(first.data().iter().all(|&b| b == 0x44));
	assert!(second.data().iter().all(|&b| b == 0x99));

	let preview = decode_tiles(second.data(), 2).unwrap();
	assert_eq!(preview.pixels(), solid_image(9).pixels());
}

#[test]
fn frame_from_missing_file_is_a_format_error() {
	let dir = tempfile::tempdir().unwrap();
	let mut session = Session::new();
	let err = session.add_frame_from_file("ghost", dir.path().join("missing.png"), 1).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Format);
	assert_eq!(session.frame_count(), 0);
}

#[test]
fn wrong_magic_is_rejected_and_leaves_the_session_alone() {
	let dir = tempfile::tempdir().unwrap();
	let mut session = Session::new();
	session.set_rom(write_emerald_rom(dir.path())).unwrap();
	session.load_tileset(HEADER).unwrap();
	session.add_animation().unwrap();
	session.set_animation_start(0x40).unwrap();

	let bogus = dir.path().join("bogus.jaae");
	std::fs::write(&bogus, b"NOPE\x00\x00\x00\x00\x01\x00").unwrap();

	let err = session.import_animations(&bogus).unwrap_err();
	assert!(matches!(err, JaaeError::InvalidMagic(_)));
	assert_eq!(err.kind(), ErrorKind::Format);
	assert_eq!(session.animation_count(), 1);
	assert_eq!(session.animation_start().unwrap(), 0x40);
}

#[test]
fn import_requires_a_tileset() {
	let dir = tempfile::tempdir().unwrap();
	let mut set = AnimationSet::new();
	set.add_animation().unwrap();
	set.add_frame(Frame::new("a", vec![0; 32]).unwrap()).unwrap();
	let project = dir.path().join("a.jaae");
	save_project(&project, &set).unwrap();

	let mut session = Session::new();
	assert_eq!(session.import_animations(&project).unwrap_err().kind(), ErrorKind::State);
	assert_eq!(open_project(&project).unwrap(), set);
}

#[test]
fn tileset_renders_with_selected_palette() {
	let dir = tempfile::tempdir().unwrap();
	let rom = Rom::open(write_emerald_rom(dir.path())).unwrap();
	assert_eq!(rom.region(), Region::Emerald);

	let tileset = rom.load_tileset(HEADER).unwrap();
	assert!(tileset.is_primary());
	assert_eq!(tileset.image().width(), 128);
	assert_eq!(tileset.image().get(0, 0), Some(1));

	let rgba = tileset.image_with_palette(3).unwrap().to_rgba_image();
	let pixel = rgba.get_pixel(0, 0);
	assert_eq!(&pixel.0[..3], &[0, 0, 248]);
	assert!(tileset.image_with_palette(16).is_err());
}
