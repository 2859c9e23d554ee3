//! Build automation tasks for the word clock.
//!
//! Run with: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

/// Both boards use an RP2040.
const DEVICE_TARGET: &str = "thumbv6m-none-eabi";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the word clock", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: host tests, library and firmware builds, docs
    CheckAll,
    /// Run the host tests for the clock algorithms
    Test,
    /// Build the library for the device
    Build {
        #[arg(long)]
        wifi: bool,
    },
    /// Build a firmware binary
    Firmware {
        #[arg(value_enum)]
        board: Board,
        #[arg(long)]
        release: bool,
    },
    /// Build UF2 firmware file for flashing to Pico
    Uf2 {
        #[arg(value_enum)]
        board: Board,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Board {
    /// DCF77 receiver, DS1307, serial console
    Radio,
    /// Pico W with NTP
    Wifi,
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Board::Radio => write!(f, "radio"),
            Board::Wifi => write!(f, "wifi"),
        }
    }
}

impl Board {
    fn needs_wifi(self) -> bool {
        matches!(self, Board::Wifi)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Test => report(run_host_tests()),
        Commands::Build { wifi } => report(build_lib(wifi)),
        Commands::Firmware { board, release } => report(build_firmware(board, release)),
        Commands::Uf2 { board } => build_uf2(board),
    }
}

fn check_all() -> ExitCode {
    println!("{}", "==> Running host tests...".cyan());
    if !run_host_tests() {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building library (no wifi)...".cyan());
    if !build_lib(false) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building library (wifi)...".cyan());
    if !build_lib(true) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building firmware...".cyan());
    for board in [Board::Radio, Board::Wifi] {
        println!("  {}", format!("- {board}").bright_black());
        if !build_firmware(board, false) {
            return ExitCode::FAILURE;
        }
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !run_command(Command::new("cargo").current_dir(workspace_root()).args([
        "doc",
        "--lib",
        "--target",
        DEVICE_TARGET,
        "--no-deps",
        "--features",
        "wifi",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed!".green().bold());
    ExitCode::SUCCESS
}

fn run_host_tests() -> bool {
    let mut test_cmd = Command::new("cargo");
    test_cmd
        .current_dir(workspace_root())
        .args(["test", "--package", "word-clock"]);

    match host_target() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
            test_cmd.arg("--target").arg(target);
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    run_command(&mut test_cmd)
}

fn build_lib(wifi: bool) -> bool {
    let mut build_cmd = Command::new("cargo");
    build_cmd.current_dir(workspace_root()).args([
        "build",
        "--package",
        "word-clock",
        "--lib",
        "--target",
        DEVICE_TARGET,
    ]);
    if wifi {
        build_cmd.args(["--features", "wifi"]);
    }
    run_command(&mut build_cmd)
}

fn build_firmware(board: Board, release: bool) -> bool {
    let name = board.to_string();
    let mut build_cmd = Command::new("cargo");
    build_cmd.current_dir(workspace_root()).args([
        "build",
        "--package",
        "word-clock-firmware",
        "--bin",
        &name,
        "--target",
        DEVICE_TARGET,
    ]);
    if board.needs_wifi() {
        build_cmd.args(["--features", "wifi"]);
    }
    if release {
        build_cmd.arg("--release");
    }
    run_command(&mut build_cmd)
}

fn build_uf2(board: Board) -> ExitCode {
    println!("{}", format!("==> Building {board} firmware for UF2...").cyan());
    if !build_firmware(board, true) {
        return ExitCode::FAILURE;
    }

    let elf = format!("target/{DEVICE_TARGET}/release/{board}");
    let uf2 = format!("word-clock-{board}.uf2");
    println!("{}", format!("==> Converting {elf} -> {uf2}").cyan());
    if !run_command(
        Command::new("elf2uf2-rs")
            .current_dir(workspace_root())
            .args([&elf, &uf2]),
    ) {
        eprintln!(
            "{}",
            "elf2uf2-rs failed or is missing (cargo install elf2uf2-rs)".yellow()
        );
        return ExitCode::FAILURE;
    }

    println!("{}", format!("{uf2} is ready; hold BOOTSEL and copy it to the Pico.").green().bold());
    ExitCode::SUCCESS
}

fn report(success: bool) -> ExitCode {
    if success {
        println!("{}", "Done.".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// The xtask crate sits one level below the workspace root.
fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map_or_else(|| manifest_dir.clone(), Path::to_path_buf)
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    output.status.success().then_some(())?;
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|line| line.strip_prefix("host: "))
        .map(|host| host.trim().to_owned())
}

fn run_command(cmd: &mut Command) -> bool {
    println!("  {}", format!("$ {cmd:?}").bright_black());
    cmd.status().map_or_else(
        |err| {
            eprintln!("{}", format!("could not start {:?}: {err}", cmd.get_program()).red());
            false
        },
        |status| status.success(),
    )
}
