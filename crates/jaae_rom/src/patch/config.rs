//! Toolchain configuration.
//!
//! Defaults describe a stock devkitARM install. They can be overridden by a
//! TOML file and then by `JAAE_*` environment variables:
//!
//! ```toml
//! assembler = "arm-none-eabi-as"
//! converter = "arm-none-eabi-objcopy"
//! install_root_var = "DEVKITARM"
//! resource_dir = "/opt/jaae"
//! routine_source = "resources/base_routines.s"
//! include_name = "tmp_animation_table.inc"
//! assembler_flags = ["-mthumb"]
//! ```
//!
//! `JAAE_ASSEMBLER_FLAGS` is split on spaces.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use jaae_types::file::{JaaeError, JaaeResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [`ToolchainConfig::load`]
pub const ENV_PREFIX: &str = "JAAE";

/// How the external assembler and converter are found and invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
	/// Assembler program name
	pub assembler: String,
	/// Object-to-binary converter program name
	pub converter: String,
	/// Environment variable naming the toolchain install root; tools are looked up in its `bin`
	pub install_root_var: String,
	/// Working directory of the assembler
	pub resource_dir: PathBuf,
	/// Support-routine source, relative to `resource_dir`
	pub routine_source: PathBuf,
	/// File name of the generated include that the support routines pull in
	pub include_name: String,
	/// Extra assembler flags placed before the source file
	pub assembler_flags: Vec<String>,
}

impl Default for ToolchainConfig {
	fn default() -> Self {
		Self {
			assembler: "arm-none-eabi-as".to_string(),
			converter: "arm-none-eabi-objcopy".to_string(),
			install_root_var: "DEVKITARM".to_string(),
			resource_dir: PathBuf::from("."),
			routine_source: PathBuf::from("resources/base_routines.s"),
			include_name: "tmp_animation_table.inc".to_string(),
			assembler_flags: vec!["-mthumb".to_string()],
		}
	}
}

impl ToolchainConfig {
	/// Loads the configuration from defaults, an optional TOML file and the environment.
	///
	/// # Errors
	///
	/// Returns [`JaaeError::Config`] if the file is missing or malformed, or a value has the wrong type.
	pub fn load(path: Option<&Path>) -> JaaeResult<Self> {
		Self::load_with(path, environment())
	}

	fn load_with(path: Option<&Path>, environment: Environment) -> JaaeResult<Self> {
		let mut builder = Config::builder();
		if let Some(path) = path {
			debug!("Reading toolchain configuration from {}", path.display());
			builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
		}
		builder = builder.add_source(environment);

		let config: Self = builder
			.build()
			.and_then(Config::try_deserialize)
			.map_err(|e| JaaeError::Config(e.to_string()))?;
		debug!("Toolchain configuration: {config:?}");
		Ok(config)
	}

	/// Parses a configuration from TOML text, without consulting the environment.
	pub fn from_toml(text: &str) -> JaaeResult<Self> {
		Config::builder()
			.add_source(File::from_str(text, FileFormat::Toml))
			.build()
			.and_then(Config::try_deserialize)
			.map_err(|e| JaaeError::Config(e.to_string()))
	}

	/// Absolute or `resource_dir`-relative path of the support routines.
	pub fn routine_source_path(&self) -> PathBuf {
		self.resource_dir.join(&self.routine_source)
	}
}

/// The `JAAE_*` overlay; list values are split on spaces.
fn environment() -> Environment {
	Environment::with_prefix(ENV_PREFIX)
		.try_parsing(true)
		.list_separator(" ")
		.with_list_parse_key("assembler_flags")
}
