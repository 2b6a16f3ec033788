// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confab - client-resident real-time message sync engine.
//!
//! This is the binary entry point for the Confab workspace.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod replay;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Confab - client-resident real-time message sync engine.
#[derive(Parser, Debug)]
#[command(name = "confab", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON-lines event script against an in-process store.
    Replay {
        /// Script file, one JSON operation per line.
        #[arg(long)]
        script: PathBuf,
    },
    /// Print the merged configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match confab_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            confab_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Replay { script }) => {
            if let Err(error) = replay::run_replay(config, &script).await {
                eprintln!("confab replay: {error}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(error) => {
                eprintln!("confab config: {error}");
                std::process::exit(1);
            }
        },
        None => {
            println!("confab: use --help for available commands");
        }
    }
}
