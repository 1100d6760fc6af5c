use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

const MACHINES: [&str; 5] = ["amstrad_cpc", "c64", "msx", "zx_spectrum", "apple2"];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for retropunker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fmt, clippy, build and test the whole workspace
    Ci,
    /// Run the criterion benches
    Bench,
    /// Convert one image with every machine, for eyeballing regressions
    Gallery {
        input: PathBuf,
        #[arg(default_value = "target/gallery")]
        out_dir: PathBuf,
        /// Processing width handed to every machine
        #[arg(long, default_value_t = 320)]
        width: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => ci(),
        Commands::Bench => bench(),
        Commands::Gallery {
            input,
            out_dir,
            width,
        } => gallery(&input, &out_dir, width),
    }
}

fn ci() -> Result<()> {
    run_command("cargo", &["fmt", "--all", "--check"])?;
    run_command(
        "cargo",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )?;
    run_command("cargo", &["test", "--workspace"])?;
    Ok(())
}

fn bench() -> Result<()> {
    run_command("cargo", &["bench", "-p", "retropunker"])
}

fn gallery(input: &Path, out_dir: &Path, width: u32) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let input = input.to_string_lossy();

    for machine in MACHINES {
        let config = out_dir.join(format!("{machine}.json"));
        let output = out_dir.join(format!("{machine}.png"));
        fs::write(
            &config,
            format!(r#"{{ "machine": "{machine}", "processing_width": {width}, "output_scale": 2 }}"#),
        )?;
        run_command(
            "cargo",
            &[
                "run",
                "--release",
                "-p",
                "retropunker",
                "--",
                &input,
                &output.to_string_lossy(),
                &config.to_string_lossy(),
            ],
        )?;
    }
    Ok(())
}

fn run_command(cmd: &str, args: &[&str]) -> Result<()> {
    use std::process::Command;
    let status = Command::new(cmd).args(args).status()?;
    if !status.success() {
        anyhow::bail!("Command failed: {} {}", cmd, args.join(" "));
    }
    Ok(())
}
