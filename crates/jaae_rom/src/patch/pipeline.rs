//! The insertion pipeline.
//!
//! ```text
//! BUILD_SOURCE -> ASSEMBLE -> [fail: ASSEMBLE_FAILED]
//!              -> CONVERT_TO_BINARY -> [fail: CONVERT_FAILED]
//!              -> PATCH_ROM
//! ```
//!
//! Every step before `PATCH_ROM` leaves the ROM untouched. Intermediate files
//! live in a temporary directory owned by one invocation and removed when it
//! returns, whatever the outcome.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use jaae_types::anim::AnimationSet;
use jaae_types::file::{JaaeError, JaaeResult};
use log::{debug, info, warn};

use super::source::build_source;
use super::toolchain::{AssembleJob, Toolchain};
use crate::region::Region;
use crate::tileset::POINTER_MASK;

/// Insertion offsets must be below this bound
pub const MAX_INSERTION_OFFSET: u32 = 0x1000_0000;

/// Address the cartridge ROM is mapped at
pub const ROM_BUS_BASE: u32 = 0x0800_0000;

/// Byte used to fill the gap when the ROM is shorter than the insertion offset
pub const FILLER: u8 = 0xFF;

const OBJECT_NAME: &str = "tmp.o";
const BINARY_NAME: &str = "base_routines.bin";

/// Pipeline states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Generating the include file
	BuildSource,
	/// Running the assembler
	Assemble,
	/// The assembler failed (terminal)
	AssembleFailed,
	/// Running the converter
	ConvertToBinary,
	/// The converter failed (terminal)
	ConvertFailed,
	/// The ROM was patched (terminal)
	PatchRom,
}

impl Stage {
	/// Returns `true` for states the pipeline stops in.
	pub fn is_terminal(self) -> bool {
		matches!(self, Self::AssembleFailed | Self::ConvertFailed | Self::PatchRom)
	}

	/// Returns `true` for the failed terminal states.
	pub fn is_failure(self) -> bool {
		matches!(self, Self::AssembleFailed | Self::ConvertFailed)
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::BuildSource => "BUILD_SOURCE",
			Self::Assemble => "ASSEMBLE",
			Self::AssembleFailed => "ASSEMBLE_FAILED",
			Self::ConvertToBinary => "CONVERT_TO_BINARY",
			Self::ConvertFailed => "CONVERT_FAILED",
			Self::PatchRom => "PATCH_ROM",
		};
		f.write_str(name)
	}
}

/// The ROM and tileset the patch is installed into.
#[derive(Debug, Clone, Copy)]
pub struct PatchTarget<'a> {
	/// ROM file, patched in place
	pub rom_path: &'a Path,
	/// Region of the ROM
	pub region: Region,
	/// ROM offset of the tileset header receiving the routine pointer
	pub tileset_header_offset: u32,
	/// Whether that tileset is primary
	pub primary: bool,
}

impl PatchTarget<'_> {
	/// ROM offset of the routine pointer field.
	pub fn pointer_field(&self) -> u32 {
		self.tileset_header_offset + self.region.routine_pointer_field()
	}
}

/// Terminal state of a pipeline run and everything the tools printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
	/// State the pipeline stopped in
	pub stage: Stage,
	/// Tool output and status lines
	pub log: String,
}

impl PatchOutcome {
	/// Returns `true` if the ROM was patched.
	pub fn inserted(&self) -> bool {
		self.stage == Stage::PatchRom
	}

	/// Turns a failed run into [`JaaeError::ExternalProcess`], returning the log otherwise.
	pub fn into_result(self) -> JaaeResult<String> {
		let tool = match self.stage {
			Stage::AssembleFailed => "assembler",
			Stage::ConvertFailed => "converter",
			_ => return Ok(self.log),
		};
		Err(JaaeError::ExternalProcess {
			tool: tool.to_string(),
			output: self.log,
		})
	}
}

/// Checks an insertion offset and converts it into a ROM offset.
///
/// # Errors
///
/// Returns a range error if the offset is `0x10000000` or above, or not a multiple of 4.
pub fn validate_offset(offset: u32) -> JaaeResult<u32> {
	if offset >= MAX_INSERTION_OFFSET {
		return Err(JaaeError::out_of_range("offset", offset, 0u32, MAX_INSERTION_OFFSET - 1));
	}
	if offset % 4 != 0 {
		return Err(JaaeError::UnalignedOffset(offset));
	}
	Ok(offset & POINTER_MASK)
}

/// Assembles the animation routines for `set` and installs them at `offset`.
///
/// Tool failures are not errors: they come back as a [`PatchOutcome`] in a
/// failed terminal state, with the tool output in its log.
///
/// # Errors
///
/// - a range error for a bad offset, or a pointer field outside the ROM
/// - a configuration error for unassigned slots or a missing toolchain
/// - an IO error if temporary files or the ROM cannot be written
pub fn insert(
	offset: u32,
	set: &AnimationSet,
	target: &PatchTarget<'_>,
	toolchain: &mut impl Toolchain,
) -> JaaeResult<PatchOutcome> {
	let offset = validate_offset(offset)?;

	debug!("{}: {} animation(s)", Stage::BuildSource, set.animation_count());
	let source = build_source(set)?;

	let rom_size = std::fs::metadata(target.rom_path)?.len();
	let pointer_field = target.pointer_field();
	if u64::from(pointer_field) + 4 > rom_size {
		return Err(JaaeError::OffsetOutsideRom {
			what: "routine pointer",
			offset: pointer_field,
			rom_size: rom_size as usize,
		});
	}

	toolchain.locate()?;

	let workdir = tempfile::Builder::new().prefix("jaae-").tempdir()?;
	let include = workdir.path().join(toolchain.include_name());
	let object = workdir.path().join(OBJECT_NAME);
	let binary = workdir.path().join(BINARY_NAME);
	std::fs::write(&include, &source)?;
	debug!("Wrote {} bytes of source to {}", source.len(), include.display());

	let mut log = String::new();

	info!("{}: insertion offset {offset:#X}", Stage::Assemble);
	let job = AssembleJob {
		region: target.region,
		load_address: ROM_BUS_BASE | offset,
		primary: target.primary,
		include_dir: workdir.path(),
		object: &object,
	};
	let assembled = toolchain.assemble(&job)?;
	log.push_str(&assembled.text);
	if !assembled.success {
		log.push_str("\nAssembling failed.\n");
		warn!("{}", Stage::AssembleFailed);
		return Ok(PatchOutcome {
			stage: Stage::AssembleFailed,
			log,
		});
	}
	log.push_str("\nAssembled successfully.\n");

	info!("{}", Stage::ConvertToBinary);
	let converted = toolchain.convert(&object, &binary)?;
	log.push_str(&converted.text);
	if !converted.success {
		log.push_str("\nError generating binary.\n");
		warn!("{}", Stage::ConvertFailed);
		return Ok(PatchOutcome {
			stage: Stage::ConvertFailed,
			log,
		});
	}
	log.push_str("\nBinary generated successfully.\n");

	let routine = std::fs::read(&binary)?;
	patch_rom(target.rom_path, pointer_field, offset, &routine)?;
	info!("{}: {} bytes at {offset:#X}, pointer at {pointer_field:#X}", Stage::PatchRom, routine.len());

	Ok(PatchOutcome {
		stage: Stage::PatchRom,
		log,
	})
}

/// Writes the routine and then the routine pointer into a ROM file.
///
/// The pointer field receives `offset | 0x8000001` (a Thumb address). If the
/// ROM ends before `offset` the gap is filled with `0xFF`. The routine is synced
/// to disk before the pointer is written, so a failed write never leaves the
/// header pointing at missing code.
pub fn patch_rom(path: &Path, pointer_field: u32, offset: u32, routine: &[u8]) -> JaaeResult<()> {
	let mut file = OpenOptions::new().read(true).write(true).open(path)?;
	patch_image(&mut file, pointer_field, offset, routine, |file| file.sync_data())?;
	Ok(())
}

/// Patches any seekable ROM image; `commit` runs between the routine and the pointer.
fn patch_image<W: Write + Seek>(
	out: &mut W,
	pointer_field: u32,
	offset: u32,
	routine: &[u8],
	mut commit: impl FnMut(&mut W) -> io::Result<()>,
) -> io::Result<()> {
	let len = out.seek(SeekFrom::End(0))?;
	if len < u64::from(offset) {
		let gap = (u64::from(offset) - len) as usize;
		debug!("Padding {gap} bytes before the insertion offset");
		out.write_all(&vec![FILLER; gap])?;
	}

	out.seek(SeekFrom::Start(u64::from(offset)))?;
	out.write_all(routine)?;
	out.flush()?;
	commit(out)?;

	out.seek(SeekFrom::Start(u64::from(pointer_field)))?;
	out.write_all(&(offset | ROM_BUS_BASE | 1).to_le_bytes())?;
	out.flush()?;
	commit(out)
}
