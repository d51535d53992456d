//! ROM patch pipeline: assembler source generation, the external toolchain,
//! and the in-place ROM patch.
//!
//! # Examples
//!
//! ```no_run
//! use jaae_rom::patch::{self, DevkitArm, PatchTarget, ToolchainConfig};
//! use jaae_rom::{Region, Rom};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let set = jaae_types::file::jaae::open("flowers.jaae")?;
//! let rom = Rom::open("firered.gba")?;
//! let tileset = rom.load_tileset(rom.tileset_header_offset(0))?;
//!
//! let target = PatchTarget {
//! 	rom_path: Path::new("firered.gba"),
//! 	region: Region::FireRed,
//! 	tileset_header_offset: tileset.header_offset(),
//! 	primary: tileset.is_primary(),
//! };
//! let mut toolchain = DevkitArm::new(ToolchainConfig::load(None)?);
//! let outcome = patch::insert(0x80_0000, &set, &target, &mut toolchain)?;
//! println!("{}", outcome.log);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod pipeline;
pub mod source;
pub mod toolchain;

pub use self::config::ToolchainConfig;
pub use self::pipeline::{PatchOutcome, PatchTarget, Stage, insert, patch_rom, validate_offset};
pub use self::source::{ROUTINE_SIZE, build_source, needed_space};
pub use self::toolchain::{AssembleJob, DevkitArm, ToolOutput, Toolchain};
