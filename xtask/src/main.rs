//! Asset tooling for the LED web firmware.
//!
//! Run with: `cargo xtask <command>`

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::{Parser, Subcommand};
use ledweb_core::assets::{image_len, write_image};
use owo_colors::OwoColorize;
use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, ExitCode},
};

/// Offset of the `assets` partition in `partitions.csv`.
const ASSETS_PARTITION_OFFSET: &str = "0x210000";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Asset tooling for the LED web firmware", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a directory of web assets into a flash image
    PackAssets {
        #[arg(long, default_value = "data")]
        input: PathBuf,
        #[arg(long, default_value = "target/assets.bin")]
        output: PathBuf,
    },
    /// Write a packed asset image to the assets partition
    FlashAssets {
        #[arg(long, default_value = "target/assets.bin")]
        image: PathBuf,
        #[arg(long, default_value = ASSETS_PARTITION_OFFSET)]
        offset: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::PackAssets { input, output } => pack_assets(&input, &output),
        Commands::FlashAssets { image, offset } => flash_assets(&image, &offset),
    }
}

fn pack_assets(input: &Path, output: &Path) -> ExitCode {
    println!("{}", format!("==> Packing {}...", input.display()).cyan());

    let mut files = Vec::new();
    if let Err(e) = collect_files(input, input, &mut files) {
        eprintln!("{}", format!("Failed to read {}: {e}", input.display()).red());
        return ExitCode::FAILURE;
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let entries: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(path, data)| (path.as_str(), data.as_slice()))
        .collect();
    for (path, data) in &entries {
        println!("  {}", format!("- {path} ({} bytes)", data.len()).bright_black());
    }

    let mut image = match image_len(&entries) {
        Ok(len) => vec![0u8; len],
        Err(e) => {
            eprintln!("{}", format!("Invalid asset set: {e}").red());
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = write_image(&entries, &mut image) {
        eprintln!("{}", format!("Failed to pack image: {e}").red());
        return ExitCode::FAILURE;
    }

    if let Some(parent) = output.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("{}", format!("Failed to create {}: {e}", parent.display()).red());
            return ExitCode::FAILURE;
        }
    }
    if let Err(e) = fs::write(output, &image) {
        eprintln!("{}", format!("Failed to write {}: {e}", output.display()).red());
        return ExitCode::FAILURE;
    }

    println!(
        "{}",
        format!(
            "==> Wrote {} assets, {} bytes to {}",
            entries.len(),
            image.len(),
            output.display()
        )
        .green()
    );
    ExitCode::SUCCESS
}

/// Collect files under `dir` as `/`-prefixed paths relative to `root`.
fn collect_files(
    root: &Path,
    dir: &Path,
    files: &mut Vec<(String, Vec<u8>)>,
) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(root, &path, files)?;
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .fold(String::new(), |mut acc, part| {
                acc.push('/');
                acc.push_str(&part);
                acc
            });
        files.push((name, fs::read(&path)?));
    }
    Ok(())
}

fn flash_assets(image: &Path, offset: &str) -> ExitCode {
    if !image.is_file() {
        eprintln!(
            "{}",
            format!("{} not found, run `cargo xtask pack-assets` first", image.display()).red()
        );
        return ExitCode::FAILURE;
    }

    println!(
        "{}",
        format!("==> Flashing {} at {offset}...", image.display()).cyan()
    );
    let mut cmd = Command::new("espflash");
    cmd.arg("write-bin").arg(offset).arg(image);
    if !run_command(&mut cmd) {
        return ExitCode::FAILURE;
    }

    println!("{}", "==> Assets flashed".green());
    ExitCode::SUCCESS
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}
