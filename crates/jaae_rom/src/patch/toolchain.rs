//! External assembler and converter.
//!
//! The pipeline talks to the toolchain only through the [`Toolchain`] trait;
//! [`DevkitArm`] drives the real `arm-none-eabi` binaries.

use std::path::{Path, PathBuf};
use std::process::Command;

use jaae_types::file::{JaaeError, JaaeResult};
use log::{debug, info};

use super::config::ToolchainConfig;
use crate::region::Region;

/// Exit status and combined stdout/stderr of one tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
	/// The tool exited successfully
	pub success: bool,
	/// Everything the tool printed
	pub text: String,
}

impl ToolOutput {
	/// Successful run with the given output.
	pub fn ok(text: impl Into<String>) -> Self {
		Self {
			success: true,
			text: text.into(),
		}
	}

	/// Failed run with the given output.
	pub fn failed(text: impl Into<String>) -> Self {
		Self {
			success: false,
			text: text.into(),
		}
	}
}

/// Inputs of one assembler run.
#[derive(Debug, Clone, Copy)]
pub struct AssembleJob<'a> {
	/// Region symbol to define
	pub region: Region,
	/// `0x8000000 | offset`, defined as `INSERTION_OFFSET`
	pub load_address: u32,
	/// Defines `PRIMARY` when set, `SECONDARY` otherwise
	pub primary: bool,
	/// Directory holding the generated include
	pub include_dir: &'a Path,
	/// Object file to produce
	pub object: &'a Path,
}

impl AssembleJob<'_> {
	/// The `--defsym` arguments passed to the assembler.
	pub fn symbol_args(&self) -> [String; 6] {
		[
			"--defsym".to_string(),
			format!("{}=1", self.region.code()),
			"--defsym".to_string(),
			format!("INSERTION_OFFSET={}", self.load_address),
			"--defsym".to_string(),
			if self.primary { "PRIMARY=1" } else { "SECONDARY=1" }.to_string(),
		]
	}
}

/// Assembler plus object-to-binary converter.
pub trait Toolchain {
	/// Checks that both tools can be run.
	///
	/// # Errors
	///
	/// Returns [`JaaeError::MissingToolchain`] if a tool cannot be found.
	fn locate(&mut self) -> JaaeResult<()>;

	/// File name the support routines include the generated tables from.
	fn include_name(&self) -> &str;

	/// Assembles the support routines together with the generated include.
	fn assemble(&mut self, job: &AssembleJob<'_>) -> JaaeResult<ToolOutput>;

	/// Converts an object file into a flat binary.
	fn convert(&mut self, object: &Path, binary: &Path) -> JaaeResult<ToolOutput>;
}

/// The devkitARM toolchain, found on the search path or under its install root.
#[derive(Debug, Clone, Default)]
pub struct DevkitArm {
	config: ToolchainConfig,
	assembler: Option<PathBuf>,
	converter: Option<PathBuf>,
}

impl DevkitArm {
	/// Creates a toolchain from its configuration. Nothing is looked up yet.
	pub fn new(config: ToolchainConfig) -> Self {
		Self {
			config,
			assembler: None,
			converter: None,
		}
	}

	/// The configuration in use.
	pub fn config(&self) -> &ToolchainConfig {
		&self.config
	}

	/// Resolved assembler and converter paths, once located.
	pub fn located(&self) -> Option<(&Path, &Path)> {
		Some((self.assembler.as_deref()?, self.converter.as_deref()?))
	}

	/// Looks the tools up on the search path, then in `<install_root>/bin`.
	///
	/// # Errors
	///
	/// Returns [`JaaeError::MissingToolchain`] if a tool is missing from both.
	pub fn locate_with(&mut self, install_root: Option<&Path>) -> JaaeResult<()> {
		let on_path = (which::which(&self.config.assembler), which::which(&self.config.converter));
		let (assembler, converter) = match on_path {
			(Ok(assembler), Ok(converter)) => (assembler, converter),
			_ => {
				let Some(root) = install_root else {
					return Err(JaaeError::MissingToolchain(format!(
						"{} environment variable isn't set.",
						self.config.install_root_var
					)));
				};
				let bin = root.join("bin");
				debug!("Looking for the toolchain in {}", bin.display());
				match (find_tool(&self.config.assembler, &bin), find_tool(&self.config.converter, &bin)) {
					(Some(assembler), Some(converter)) => (assembler, converter),
					_ => return Err(JaaeError::MissingToolchain("DevkitARM isn't set up correctly.".to_string())),
				}
			}
		};

		info!("Using assembler {} and converter {}", assembler.display(), converter.display());
		self.assembler = Some(assembler);
		self.converter = Some(converter);
		Ok(())
	}

	fn tool(path: Option<&PathBuf>) -> JaaeResult<&Path> {
		path.map(PathBuf::as_path).ok_or(JaaeError::InvalidState("The toolchain has not been located."))
	}
}

impl Toolchain for DevkitArm {
	fn locate(&mut self) -> JaaeResult<()> {
		let root = std::env::var_os(&self.config.install_root_var).map(PathBuf::from);
		self.locate_with(root.as_deref())
	}

	fn include_name(&self) -> &str {
		&self.config.include_name
	}

	fn assemble(&mut self, job: &AssembleJob<'_>) -> JaaeResult<ToolOutput> {
		let program = Self::tool(self.assembler.as_ref())?;
		let mut command = Command::new(program);
		command
			.args(job.symbol_args())
			.args(&self.config.assembler_flags)
			.arg(&self.config.routine_source)
			.arg("-I")
			.arg(job.include_dir)
			.arg("-o")
			.arg(job.object)
			.current_dir(&self.config.resource_dir);
		run(&self.config.assembler, &mut command)
	}

	fn convert(&mut self, object: &Path, binary: &Path) -> JaaeResult<ToolOutput> {
		let program = Self::tool(self.converter.as_ref())?;
		let mut command = Command::new(program);
		command.args(["-O", "binary"]).arg(object).arg(binary);
		run(&self.config.converter, &mut command)
	}
}

fn find_tool(name: &str, bin: &Path) -> Option<PathBuf> {
	which::which(name).or_else(|_| which::which_in(name, Some(bin), bin)).ok()
}

fn run(tool: &str, command: &mut Command) -> JaaeResult<ToolOutput> {
	debug!("Running {command:?}");
	let output = command.output().map_err(|e| JaaeError::ExternalProcess {
		tool: tool.to_string(),
		output: e.to_string(),
	})?;

	let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
	text.push_str(&String::from_utf8_lossy(&output.stderr));
	debug!("{tool} exited with {}", output.status);
	Ok(ToolOutput {
		success: output.status.success(),
		text,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn missing_tools() -> ToolchainConfig {
		ToolchainConfig {
			assembler: "jaae-test-missing-as".to_string(),
			converter: "jaae-test-missing-objcopy".to_string(),
			..ToolchainConfig::default()
		}
	}

	#[test]
	fn test_symbol_args() {
		let dir = Path::new("/tmp");
		let job = AssembleJob {
			region: Region::FireRed,
			load_address: 0x0880_0000,
			primary: false,
			include_dir: dir,
			object: dir,
		};
		assert_eq!(
			job.symbol_args(),
			["--defsym", "BPRE=1", "--defsym", "INSERTION_OFFSET=142606336", "--defsym", "SECONDARY=1"]
				.map(String::from)
		);
	}

	#[test]
	fn test_missing_install_root() {
		let mut toolchain = DevkitArm::new(missing_tools());
		let err = toolchain.locate_with(None).unwrap_err();
		assert_eq!(err.to_string(), "DEVKITARM environment variable isn't set.");
		assert!(toolchain.located().is_none());
	}

	#[test]
	fn test_broken_install_root() {
		let root = tempfile::tempdir().unwrap();
		let mut toolchain = DevkitArm::new(missing_tools());
		let err = toolchain.locate_with(Some(root.path())).unwrap_err();
		assert!(matches!(err, JaaeError::MissingToolchain(ref message) if message == "DevkitARM isn't set up correctly."));
	}

	#[test]
	fn test_not_located() {
		let mut toolchain = DevkitArm::new(missing_tools());
		let err = toolchain.convert(Path::new("a.o"), Path::new("a.bin")).unwrap_err();
		assert_eq!(err.kind(), jaae_types::file::ErrorKind::State);
	}

	#[cfg(unix)]
	#[test]
	fn test_found_under_install_root() {
		use std::os::unix::fs::PermissionsExt;

		let root = tempfile::tempdir().unwrap();
		let bin = root.path().join("bin");
		std::fs::create_dir(&bin).unwrap();
		for name in ["jaae-test-missing-as", "jaae-test-missing-objcopy"] {
			let path = bin.join(name);
			std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
			std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
		}

		let mut toolchain = DevkitArm::new(missing_tools());
		toolchain.locate_with(Some(root.path())).unwrap();
		let (assembler, converter) = toolchain.located().unwrap();
		assert_eq!(assembler, bin.join("jaae-test-missing-as"));
		assert_eq!(converter, bin.join("jaae-test-missing-objcopy"));
	}
}
