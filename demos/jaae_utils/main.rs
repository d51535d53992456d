//! JAAE CLI Utility
//!
//! A command-line tool for inspecting and building tileset animation projects
//! and installing them into a ROM.
//!
//! # Features
//!
//! - **info**: Display the animations and frames of a `.jaae` project
//! - **tileset**: Render a ROM tileset with one of its palettes to PNG
//! - **add-frame**: Import an indexed PNG into a project, creating it if needed
//! - **export-frame**: Write one frame of a project to an indexed PNG
//! - **needed-space**: Print how many bytes the patch will take in the ROM
//! - **insert**: Assemble the project and patch it into a ROM
//!
//! # Usage
//!
//! ```bash
//! # Render the first FireRed tileset with palette 2
//! cargo run --example jaae_utils -- tileset firered.gba --number 0 --palette 2 -o tileset.png
//!
//! # Split a 4-frame strip into flower_0..flower_3 and use them for tiles 0x1A0-0x1A3
//! cargo run --example jaae_utils -- add-frame flowers.jaae strip.png flower --split 4 --assign --start 0x1A0
//!
//! # Show the project
//! cargo run --example jaae_utils -- info flowers.jaae --json
//!
//! # Insert at 0x800000 into the tileset with header number 1
//! cargo run --example jaae_utils -- insert flowers.jaae firered.gba --number 1 --offset 0x800000
//! ```
//!
//! The assembler is looked up on `PATH`, then in `$DEVKITARM/bin`. Use
//! `--config jaae.toml` or `JAAE_*` variables to point at other tools.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use jaae_rs::prelude::*;
use jaae_rs::jaae_rom::patch::needed_space;
use log::info;
use serde::Serialize;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(args) => run_info(args),
		Command::Tileset(args) => run_tileset(args),
		Command::AddFrame(args) => run_add_frame(args),
		Command::ExportFrame(args) => run_export_frame(args),
		Command::NeededSpace(args) => run_needed_space(args),
		Command::Insert(args) => run_insert(args),
	}
}

#[derive(Parser)]
#[command(name = "jaae_utils")]
#[command(author = "jaae-rs project")]
#[command(version)]
#[command(about = "Tileset animation utility - inspect projects, import frames, insert into ROMs", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Display information about a project file
	Info(InfoArgs),
	/// Render a ROM tileset to PNG
	Tileset(TilesetArgs),
	/// Import an indexed PNG as one or more frames
	AddFrame(AddFrameArgs),
	/// Export a frame to an indexed PNG
	ExportFrame(ExportFrameArgs),
	/// Print the ROM space the patch needs
	NeededSpace(ProjectArgs),
	/// Assemble a project and patch it into a ROM
	Insert(InsertArgs),
}

/// Which tileset of a ROM to use
#[derive(Args)]
#[group(required = true, multiple = false)]
struct TilesetSelector {
	/// Map tileset number
	#[arg(short, long, value_name = "NUMBER")]
	number: Option<u16>,

	/// Tileset header offset (hex with 0x prefix, or decimal)
	#[arg(long, value_name = "OFFSET", value_parser = parse_number)]
	header: Option<u32>,
}

impl TilesetSelector {
	fn header_offset(&self, region: Region) -> u32 {
		match (self.number, self.header) {
			(_, Some(header)) => header,
			(Some(number), None) => region.tileset_header_offset(number),
			(None, None) => region.tileset_header_offset(0),
		}
	}
}

#[derive(Args)]
struct ProjectArgs {
	/// Project file path
	#[arg(value_name = "PROJECT")]
	project: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
	/// Project file path
	#[arg(value_name = "PROJECT")]
	project: PathBuf,

	/// Print the summary as JSON
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args)]
struct TilesetArgs {
	/// ROM file path
	#[arg(value_name = "ROM")]
	rom: PathBuf,

	#[command(flatten)]
	tileset: TilesetSelector,

	/// Palette bank to render with (0-15)
	#[arg(short, long, default_value_t = 0)]
	palette: usize,

	/// Write an indexed PNG instead of RGBA
	#[arg(long, default_value_t = false)]
	indexed: bool,

	/// Output PNG path
	#[arg(short, long, value_name = "OUTPUT", default_value = "tileset.png")]
	output: PathBuf,
}

#[derive(Args)]
struct AddFrameArgs {
	/// Project file path; created when missing
	#[arg(value_name = "PROJECT")]
	project: PathBuf,

	/// Indexed PNG to import
	#[arg(value_name = "IMAGE")]
	image: PathBuf,

	/// Frame label (letters, digits and underscores)
	#[arg(value_name = "LABEL")]
	label: String,

	/// Split the image into this many equal frames
	#[arg(short, long, default_value_t = 1)]
	split: usize,

	/// Animation the new frames belong to
	#[arg(short, long, default_value_t = 0)]
	animation: usize,

	/// Fill the animation's slots with the new frames, in order
	#[arg(long, default_value_t = false)]
	assign: bool,

	/// First animated tile; the range is sized to one frame
	#[arg(long, value_name = "TILE", value_parser = parse_number)]
	start: Option<u32>,

	/// Animation speed (0 = fastest, 7 = slowest)
	#[arg(long, value_name = "SPEED")]
	speed: Option<u8>,
}

#[derive(Args)]
struct ExportFrameArgs {
	/// Project file path
	#[arg(value_name = "PROJECT")]
	project: PathBuf,

	/// Frame label
	#[arg(value_name = "LABEL")]
	label: String,

	/// Tiles per row (defaults to the whole frame on one row)
	#[arg(short, long, value_name = "TILES")]
	tiles_wide: Option<u32>,

	/// Output PNG path (defaults to `<LABEL>.png`)
	#[arg(short, long, value_name = "OUTPUT")]
	output: Option<PathBuf>,
}

#[derive(Args)]
struct InsertArgs {
	/// Project file path
	#[arg(value_name = "PROJECT")]
	project: PathBuf,

	/// ROM file path, patched in place
	#[arg(value_name = "ROM")]
	rom: PathBuf,

	#[command(flatten)]
	tileset: TilesetSelector,

	/// Insertion offset (hex with 0x prefix, or decimal)
	#[arg(short, long, value_name = "OFFSET", value_parser = parse_number)]
	offset: u32,

	/// Toolchain configuration file
	#[arg(short, long, value_name = "CONFIG")]
	config: Option<PathBuf>,
}

/// Project summary for JSON output
#[derive(Debug, Serialize)]
struct ProjectSummary {
	animations: Vec<AnimationSummary>,
	frames: Vec<FrameSummary>,
	needed_space: usize,
}

#[derive(Debug, Serialize)]
struct AnimationSummary {
	start_tile: u16,
	end_tile: u16,
	speed: u8,
	slots: Vec<Option<String>>,
	matches_frames: bool,
}

#[derive(Debug, Serialize)]
struct FrameSummary {
	label: String,
	tiles: usize,
	bytes: usize,
}

fn parse_number(s: &str) -> Result<u32, String> {
	let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		Some(hex) => u32::from_str_radix(hex, 16),
		None => s.parse(),
	};
	parsed.map_err(|e| format!("invalid number \"{s}\": {e}"))
}

fn summarize(set: &AnimationSet) -> Result<ProjectSummary> {
	let mut animations = Vec::with_capacity(set.animation_count());
	for (index, animation) in set.animations().iter().enumerate() {
		let mut matches_frames = true;
		for slot in 0..animation.slot_count() {
			matches_frames &= set.matches_frame(SlotRef::new(index, slot))?;
		}
		animations.push(AnimationSummary {
			start_tile: animation.start_tile(),
			end_tile: animation.end_tile(),
			speed: animation.speed().to_u8(),
			slots: animation.slots().to_vec(),
			matches_frames,
		});
	}

	let frames = set
		.frames()
		.iter()
		.map(|frame| FrameSummary {
			label: frame.label().to_string(),
			tiles: frame.tile_count(),
			bytes: frame.len(),
		})
		.collect();

	Ok(ProjectSummary {
		animations,
		frames,
		needed_space: needed_space(set),
	})
}

fn run_info(args: InfoArgs) -> Result<()> {
	let set = open_project(&args.project).with_context(|| format!("Failed to open {}", args.project.display()))?;
	let summary = summarize(&set)?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&summary)?);
		return Ok(());
	}

	println!("Project: {}", args.project.display());
	println!("Animations: {}", summary.animations.len());
	for (index, animation) in summary.animations.iter().enumerate() {
		println!(
			"  [{index:2}] tiles {:#06X}-{:#06X}  speed {} ({})  {} frames{}",
			animation.start_tile,
			animation.end_tile,
			animation.speed,
			Speed::from_u8(animation.speed)?,
			animation.slots.len(),
			if animation.matches_frames { "" } else { "  (frame size mismatch)" }
		);
		for (slot, label) in animation.slots.iter().enumerate() {
			println!("       {slot:2}: {}", label.as_deref().unwrap_or("<unassigned>"));
		}
	}
	println!("Frames: {}", summary.frames.len());
	for frame in &summary.frames {
		println!("  {:<24} {:4} tiles  {:6} bytes", frame.label, frame.tiles, frame.bytes);
	}
	println!("Needed space: {:#X} bytes", summary.needed_space);
	Ok(())
}

fn run_tileset(args: TilesetArgs) -> Result<()> {
	let rom = Rom::open(&args.rom).with_context(|| format!("Failed to open ROM {}", args.rom.display()))?;
	let header = args.tileset.header_offset(rom.region());
	let tileset = rom.load_tileset(header).with_context(|| format!("Failed to load tileset at {header:#X}"))?;
	let image = tileset.image_with_palette(args.palette)?;

	if args.indexed {
		image.save(&args.output)?;
	} else {
		image.to_rgba_image().save(&args.output)?;
	}

	info!(
		"Wrote {} tileset ({}x{}) with palette {} to {}",
		if tileset.is_primary() { "primary" } else { "secondary" },
		image.width(),
		image.height(),
		args.palette,
		args.output.display()
	);
	Ok(())
}

fn run_add_frame(args: AddFrameArgs) -> Result<()> {
	let mut set = if args.project.exists() {
		open_project(&args.project)?
	} else {
		info!("Creating new project {}", args.project.display());
		let mut set = AnimationSet::new();
		set.add_animation()?;
		set
	};

	let image = IndexedImage::open(&args.image)
		.with_context(|| format!("Failed to read indexed PNG {}", args.image.display()))?;
	let labels = set.add_frames_from_image(&args.label, &image, args.split)?;
	let tiles = labels.first().and_then(|label| set.frames().get(label)).map_or(0, Frame::tile_count);
	println!("Added {}", labels.join(", "));

	while set.animation_count() <= args.animation {
		set.add_animation()?;
	}
	let animation = set.animation_mut(args.animation)?;
	if let Some(start) = args.start {
		animation.set_start_tile(start)?;
		animation.set_end_tile(start + tiles.max(1) as u32 - 1)?;
	}
	if let Some(speed) = args.speed {
		animation.set_speed(speed)?;
	}

	if args.assign {
		let requested = labels.len().clamp(MIN_SLOTS, MAX_SLOTS);
		if !animation.set_slot_count(requested, &mut |title: &str, question: &str| {
			println!("{title}: {question} (yes)");
			true
		})? {
			bail!("Could not resize animation {}", args.animation);
		}
		let slots = set.animation(args.animation)?.slot_count();
		for slot in 0..slots {
			set.set_slot(SlotRef::new(args.animation, slot), Some(labels[slot % labels.len()].as_str()))?;
		}
	}

	save_project(&args.project, &set)?;
	Ok(())
}

fn run_export_frame(args: ExportFrameArgs) -> Result<()> {
	let set = open_project(&args.project)?;
	let frame = set.frames().get(&args.label).with_context(|| format!("No frame labelled {}", args.label))?;

	let tiles_wide = args.tiles_wide.unwrap_or(frame.tile_count() as u32);
	let image = decode_tiles(frame.data(), tiles_wide)?;
	let output = args.output.unwrap_or_else(|| PathBuf::from(format!("{}.png", args.label)));
	image.save(&output)?;

	info!("Wrote {} ({}x{}) to {}", frame, image.width(), image.height(), output.display());
	Ok(())
}

fn run_needed_space(args: ProjectArgs) -> Result<()> {
	let set = open_project(&args.project)?;
	let bytes = needed_space(&set);
	println!("{bytes:#X} ({bytes}) bytes");
	Ok(())
}

fn run_insert(args: InsertArgs) -> Result<()> {
	let config = ToolchainConfig::load(args.config.as_deref())?;
	let mut toolchain = DevkitArm::new(config);

	let mut session = Session::new();
	let region = session.set_rom(&args.rom)?;
	let header = args.tileset.header_offset(region);
	session.load_tileset(header).with_context(|| format!("Failed to load tileset at {header:#X}"))?;
	session.import_animations(&args.project)?;

	info!("Needed space: {:#X} bytes at {:#X}", session.needed_space(), args.offset);
	let outcome = session.insert_to_rom(args.offset, &mut toolchain)?;
	print!("{}", outcome.log);
	report_outcome(&args.rom, outcome)
}

fn report_outcome(rom: &Path, outcome: PatchOutcome) -> Result<()> {
	if outcome.inserted() {
		println!("Inserted into {}", rom.display());
		return Ok(());
	}
	let stage = outcome.stage;
	outcome.into_result().with_context(|| format!("Insertion stopped at {stage}"))?;
	Ok(())
}
