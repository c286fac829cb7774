use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the endless runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fmt, clippy, tests and docs, in that order
    Check,
    /// cargo fmt --check
    Fmt,
    /// clippy with warnings denied
    Clippy,
    /// Workspace tests
    Test,
    /// Stream tick micro-benchmarks
    Bench,
    /// rustdoc without dependencies
    Doc,
    /// Stream the built-in level for a few seconds
    Smoke,
}

/// (label, cargo arguments) for each step.
const FMT: (&str, &[&str]) = ("fmt --check", &["fmt", "--all", "--", "--check"]);
const CLIPPY: (&str, &[&str]) = (
    "clippy",
    &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
);
const TEST: (&str, &[&str]) = ("test", &["test", "--workspace"]);
const BENCH: (&str, &[&str]) = ("bench", &["bench", "-p", "runner-stream"]);
const DOC: (&str, &[&str]) = ("doc", &["doc", "--workspace", "--no-deps"]);
const SMOKE: (&str, &[&str]) = (
    "smoke run",
    &["run", "-p", "runner-cli", "--", "run", "--frames", "300"],
);

fn cargo((label, args): (&str, &[&str])) -> Result<()> {
    println!("==> cargo {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {label} failed ({status})");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => [FMT, CLIPPY, TEST, DOC].into_iter().try_for_each(cargo)?,
        Commands::Fmt => cargo(FMT)?,
        Commands::Clippy => cargo(CLIPPY)?,
        Commands::Test => cargo(TEST)?,
        Commands::Bench => cargo(BENCH)?,
        Commands::Doc => cargo(DOC)?,
        Commands::Smoke => cargo(SMOKE)?,
    }

    Ok(())
}
