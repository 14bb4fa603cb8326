//! Security Engine - Administrative Console
//!
//! Reads command lines from scripts and stdin and applies them to the
//! process-wide default context while acting as the console principal.

use anyhow::{Context as _, Result};
use clap::Parser;
use se_security::{Console, ContextRegistry, PrincipalScope, SecurityConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// Security engine administrative console
#[derive(Parser)]
#[command(name = "se-console")]
#[command(about = "Manage access control entries and principal inheritance")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "SE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Exit after running scripts instead of reading stdin
    #[arg(long)]
    no_stdin: bool,

    /// Command scripts to execute before reading stdin
    scripts: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SecurityConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SecurityConfig::default(),
    };

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { config.console.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},se_security={}", log_level, log_level).into()),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let context = ContextRegistry::default_context();
    config.apply(&context);
    info!(
        rules = context.rules_len(),
        inheritances = context.inheritances_len(),
        principal = %config.console.principal,
        "console ready"
    );

    let console = Console::new(context);
    let _scope = PrincipalScope::new(config.console.principal.as_str());

    let mut stdout = io::stdout().lock();

    for script in config.exec.iter().chain(cli.scripts.iter()) {
        let output = console
            .exec_file(script)
            .with_context(|| format!("Failed to execute {}", script.display()))?;
        for line in output {
            writeln!(stdout, "{}", line)?;
        }
    }

    if cli.no_stdin {
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        match console.execute(&line) {
            Ok(output) => {
                for line in output {
                    writeln!(stdout, "{}", line)?;
                }
            }
            Err(e) => writeln!(stdout, "{}", e)?,
        }
        stdout.flush()?;
    }

    Ok(())
}
