//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use convoke_core::telemetry::{self, LogSink};
use convoke_core::{config, interrupt};

mod commands;

#[derive(Parser)]
#[command(name = "convoke")]
#[command(version = "0.1")]
#[command(about = "Terminal boot-sequence teaser")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of $CONVOKE_HOME/config.toml
    #[arg(long, global = true, value_name = "PATH", env = "CONVOKE_CONFIG")]
    config: Option<PathBuf>,

    /// Boot script to play instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Keep the boot sequence silent
    #[arg(long = "no-audio", global = true)]
    no_audio: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Play the looping landing background
    Landing,

    /// Run the boot sequence headless and print its timeline
    Simulate {
        /// Assumed logo clip length in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 4000)]
        clip_ms: u64,
    },

    /// Inspect the boot script
    Script {
        #[command(subcommand)]
        command: ScriptCommands,
    },

    /// Work with the tone bursts
    Tones {
        #[command(subcommand)]
        command: ToneCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ScriptCommands {
    /// Print the effective script as TOML
    Show,
}

#[derive(clap::Subcommand)]
enum ToneCommands {
    /// Render the tone bursts to WAV files
    Export {
        /// Directory to write boot.wav, keystroke.wav and warning.wav into
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::paths::config_path);

    // Config commands work even when the current file is broken.
    if let Some(Commands::Config { command }) = &cli.command {
        let _telemetry = telemetry::init_tracing("warn", LogSink::Stderr);
        return match command {
            ConfigCommands::Path => {
                commands::config::path(&config_path);
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(&config_path),
            ConfigCommands::Generate => commands::config::generate(),
        };
    }

    let mut config = config::Config::load_from(&config_path).context("load config")?;
    if let Some(script) = cli.script {
        config.script_file = Some(script);
    }
    if cli.no_audio {
        config.audio.enabled = false;
    }

    let full_screen = matches!(cli.command, None | Some(Commands::Landing));
    let log_file = config.effective_log_file();
    let sink = if full_screen {
        LogSink::File(&log_file)
    } else {
        LogSink::Stderr
    };
    let _telemetry = telemetry::init_tracing(&config.log_level, sink);

    interrupt::init();

    dispatch(cli.command, &config)
}

fn dispatch(command: Option<Commands>, config: &config::Config) -> Result<()> {
    let Some(command) = command else {
        return commands::play::coming_soon(config);
    };

    match command {
        Commands::Landing => commands::play::landing(config),
        Commands::Simulate { clip_ms } => commands::simulate::run(config, clip_ms),
        Commands::Script { command } => match command {
            ScriptCommands::Show => commands::script::show(config),
        },
        Commands::Tones { command } => match command {
            ToneCommands::Export { out } => commands::tones::export(config, &out),
        },
        // Handled before config loading.
        Commands::Config { .. } => Ok(()),
    }
}
