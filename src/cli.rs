//! Command-line interface for voxlate
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Speech translation client
#[derive(Parser, Debug)]
#[command(name = "voxlate", version, about = "Speech translation client")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: info, -vv: debug diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Audio input device (e.g., pipewire)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Source language code (default: from config). Examples: en, de, es, fr
    #[arg(long, value_name = "LANG")]
    pub from: Option<String>,

    /// Target language code (default: from config). Examples: en, de, es, fr
    #[arg(long, value_name = "LANG")]
    pub to: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio input devices
    Devices,

    /// List languages the speech service supports
    Languages,

    /// Probe the speech service's health endpoint
    Status,

    /// Translate a pre-recorded WAV file instead of the microphone
    File {
        /// Path to the WAV file to upload
        path: PathBuf,
    },
}
