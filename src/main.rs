//! mkvtrim episode post-processor
//!
//! Post-processes a downloaded `episode.mkv` in a working directory: removes
//! leading advertisement frames with frame accuracy, re-merges subtitles and
//! language metadata, and runs a structural optimization pass.
//!
//! # Usage
//!
//! ```bash
//! mkvtrim --temp-dir temp --engine-dir engine trim --ad-length 10000 --key-frame 12000
//! mkvtrim --temp-dir temp merge --audio-lang jpn --subtitle-lang eng
//! mkvtrim --temp-dir temp clean
//! mkvtrim --temp-dir temp finish --ad-length 10000 --key-frame 12000 --audio-lang jpn
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use mkvtrim::adapters::{tracing_log, AppConfig};
use mkvtrim::app::DefaultAppContainer;
use mkvtrim::cli::{commands, prompt, Cli, Commands};
use mkvtrim::config_initialization::{initialize_configuration_hierarchy, ConfigOverrides};

/// Main entry point for the mkvtrim CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        config_file: cli.config.clone(),
        engine_dir: cli.engine_dir.clone(),
        log_level: cli.log_level.clone(),
        json_logs: cli.json_logs,
        crf: cli.command.crf(),
        timeout_secs: cli.timeout,
    };
    let config = initialize_configuration_hierarchy(&overrides)
        .context("Failed to load configuration")?;

    // Initialize logging
    tracing_log::init(&config.logging);
    info!("Starting mkvtrim");

    let result = execute(&cli, &config).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }

    if cli.pause {
        let stdin = std::io::stdin();
        prompt::pause(&mut stdin.lock(), &mut std::io::stderr())?;
    }

    result
}

/// Dispatch the requested command
async fn execute(cli: &Cli, config: &AppConfig) -> Result<()> {
    let container = DefaultAppContainer::new(config);
    let workdir = cli.temp_dir.as_path();

    match &cli.command {
        Commands::Trim(args) => {
            info!("Executing trim command");
            commands::trim(&container, workdir, args, cli.report).await?;
        }
        Commands::Merge(args) => {
            info!("Executing merge command");
            commands::merge(&container, workdir, args, cli.report).await?;
        }
        Commands::Clean => {
            info!("Executing clean command");
            commands::clean(&container, workdir, cli.report).await?;
        }
        Commands::Finish(args) => {
            info!("Executing finish command");
            commands::finish(&container, workdir, args, cli.report).await?;
        }
        Commands::Config => commands::show_config(config)?,
    }

    info!("mkvtrim completed successfully");
    Ok(())
}
