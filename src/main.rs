use anyhow::Result;
use clap::Parser;
use voxlate::app::{
    print_languages, run_devices_command, run_file_command, run_session_command,
    run_status_command,
};
use voxlate::cli::{Cli, Commands};
use voxlate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            run_session_command(config, cli.device, cli.from, cli.to, cli.quiet).await?;
        }
        Some(Commands::Devices) => {
            run_devices_command()?;
        }
        Some(Commands::Languages) => {
            print_languages();
        }
        Some(Commands::Status) => {
            let config = load_config(cli.config.as_deref())?;
            run_status_command(config).await?;
        }
        Some(Commands::File { path }) => {
            let config = load_config(cli.config.as_deref())?;
            run_file_command(config, &path, cli.from, cli.to).await?;
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/voxlate/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    Ok(config.with_env_overrides())
}

/// Route library diagnostics to stderr; verbosity raises the floor.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "voxlate=warn",
        1 => "voxlate=info",
        _ => "voxlate=debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
