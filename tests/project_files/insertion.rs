//! End-to-end insertion with a scripted toolchain

use std::path::Path;

use jaae_rs::jaae_rom::patch::{AssembleJob, ROUTINE_SIZE};
use jaae_rs::prelude::*;

use crate::common::{HEADER, solid_image, write_emerald_rom, yes};

/// Writes a fixed routine instead of running the assembler.
struct ScriptedToolchain {
	routine: Vec<u8>,
	assembler_output: Option<&'static str>,
	seen_source: String,
}

impl ScriptedToolchain {
	fn new(routine: Vec<u8>) -> Self {
		Self {
			routine,
			assembler_output: None,
			seen_source: String::new(),
		}
	}
}

impl Toolchain for ScriptedToolchain {
	fn locate(&mut self) -> JaaeResult<()> {
		Ok(())
	}

	fn include_name(&self) -> &str {
		"tmp_animation_table.inc"
	}

	fn assemble(&mut self, job: &AssembleJob<'_>) -> JaaeResult<ToolOutput> {
		self.seen_source = std::fs::read_to_string(job.include_dir.join(self.include_name()))?;
		if let Some(error) = self.assembler_output {
			return Ok(ToolOutput::failed(error));
		}
		std::fs::write(job.object, b"object")?;
		Ok(ToolOutput::ok("as: done"))
	}

	fn convert(&mut self, _object: &Path, binary: &Path) -> JaaeResult<ToolOutput> {
		std::fs::write(binary, &self.routine)?;
		Ok(ToolOutput::ok(""))
	}
}

fn prepared_session(dir: &Path) -> Session {
	let mut session = Session::new();
	session.set_rom(write_emerald_rom(dir)).unwrap();
	session.load_tileset(HEADER).unwrap();
	session.add_frame("walk", &solid_image(5), 1).unwrap();
	session.add_animation().unwrap();
	session.set_animation_start(0x10).unwrap();
	session.set_animation_end(0x13).unwrap();
	assert!(session.set_animation_frame_count(2, &mut yes()).unwrap());
	for slot in 0..2 {
		session.set_working_slot(slot).unwrap();
		session.set_working_frame_image(Some("walk")).unwrap();
	}
	session
}

#[test_log::test]
fn insert_past_the_end_pads_and_links_the_routine() {
	let dir = tempfile::tempdir().unwrap();
	let session = prepared_session(dir.path());
	assert_eq!(session.needed_space(), ROUTINE_SIZE + 8 + 2 * 4 + 128);

	let routine = vec![0xAB; 24];
	let mut toolchain = ScriptedToolchain::new(routine.clone());
	let outcome = session.insert_to_rom(0x1100, &mut toolchain).unwrap();

	assert!(outcome.inserted());
	assert_eq!(outcome.stage, Stage::PatchRom);
	assert!(outcome.log.contains("as: done"));
	assert!(outcome.log.contains("Assembled successfully."));
	assert!(outcome.log.contains("Binary generated successfully."));
	assert!(toolchain.seen_source.contains("walk"));

	let rom = std::fs::read(dir.path().join("emerald.gba")).unwrap();
	assert_eq!(rom.len(), 0x1100 + routine.len());
	// Emerald keeps the routine pointer at +0x14 of the header
	let field = (HEADER + 0x14) as usize;
	assert_eq!(u32::from_le_bytes(rom[field..field + 4].try_into().unwrap()), 0x0800_1101);
	assert!(rom[0x1000..0x1100].iter().all(|&b| b == 0xFF));
	assert_eq!(&rom[0x1100..], &routine[..]);
}

#[test]
fn failed_assembly_leaves_the_rom_untouched() {
	let dir = tempfile::tempdir().unwrap();
	let session = prepared_session(dir.path());
	let before = std::fs::read(dir.path().join("emerald.gba")).unwrap();

	let mut toolchain = ScriptedToolchain::new(vec![0; 4]);
	toolchain.assembler_output = Some("tmp_animation_table.inc:9: Error: junk at end of line");
	let outcome = session.insert_to_rom(0x800, &mut toolchain).unwrap();

	assert_eq!(outcome.stage, Stage::AssembleFailed);
	assert!(outcome.stage.is_failure());
	assert!(outcome.log.contains("Assembling failed."));
	assert_eq!(std::fs::read(dir.path().join("emerald.gba")).unwrap(), before);

	let err = outcome.into_result().unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ExternalProcess);
}

#[test]
fn unaligned_offset_is_rejected_before_any_tool_runs() {
	let dir = tempfile::tempdir().unwrap();
	let session = prepared_session(dir.path());
	let mut toolchain = ScriptedToolchain::new(vec![0; 4]);

	assert_eq!(session.insert_to_rom(0x802, &mut toolchain).unwrap_err().kind(), ErrorKind::Range);
	assert_eq!(session.insert_to_rom(0x1000_0000, &mut toolchain).unwrap_err().kind(), ErrorKind::Range);
	assert!(toolchain.seen_source.is_empty());
}

#[test]
fn unassigned_slot_blocks_insertion() {
	let dir = tempfile::tempdir().unwrap();
	let mut session = prepared_session(dir.path());
	session.set_working_frame_image(None).unwrap();

	let mut toolchain = ScriptedToolchain::new(vec![0; 4]);
	let err = session.insert_to_rom(0x800, &mut toolchain).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Configuration);
	assert!(toolchain.seen_source.is_empty());
}
