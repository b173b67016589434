//! Interactive session entry point.
//!
//! Wires the capture, service, and playback units into a session
//! controller and drives it from a small command loop:
//! record → stop → edit → retranslate → swap → say.

use crate::audio::capture::{CpalCaptureDevice, list_devices};
use crate::audio::take::{TakeBuffer, TakeFormat};
use crate::config::Config;
use crate::error::{Result, VoxlateError};
use crate::languages::list_languages;
use crate::playback::SpeakerOutput;
use crate::service::client::{HttpSpeechService, SpeechService};
use crate::session::controller::SessionController;
use crate::session::RecordingState;
use owo_colors::OwoColorize;
use std::io::{BufRead, Write};
use std::process::Command;
use std::sync::Arc;

/// Run the interactive session loop.
///
/// # Arguments
/// * `config` - Base configuration (can be overridden by CLI args)
/// * `device` - Optional audio device override from CLI
/// * `from` - Optional source language override from CLI
/// * `to` - Optional target language override from CLI
/// * `quiet` - Suppress the banner and command help
///
/// # Returns
/// Ok(()) when the user quits, or an error if the session cannot be set up
pub async fn run_session_command(
    mut config: Config,
    device: Option<String>,
    from: Option<String>,
    to: Option<String>,
    quiet: bool,
) -> Result<()> {
    // Apply CLI overrides
    if let Some(d) = device {
        config.audio.device = Some(d);
    }
    if let Some(lang) = from {
        config.session.source_language = lang;
    }
    if let Some(lang) = to {
        config.session.target_language = lang;
    }

    let service = Arc::new(HttpSpeechService::with_timeout(
        &config.service.base_url,
        config.service.timeout(),
    )?);
    let output = Arc::new(SpeakerOutput::new()?);
    let capture = Box::new(CpalCaptureDevice::new(config.audio.device.as_deref()));

    let mut controller = SessionController::new(
        capture,
        service,
        output,
        &config.session.source_language,
        &config.session.target_language,
    );

    if !quiet {
        eprintln!(
            "voxlate {} — {} → {} via {}",
            crate::version_string(),
            controller.source_language().green(),
            controller.target_language().green(),
            config.service.base_url
        );
        print_help();
    }

    let stdin = std::io::stdin();
    loop {
        eprint!("{} ", "voxlate>".dimmed());
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match command {
            "record" | "r" => match controller.start_recording() {
                Ok(()) => {
                    if controller.recording_state() == RecordingState::Recording {
                        eprintln!("Recording... (type 'stop' to finish)");
                    }
                }
                Err(e) => print_error(&e),
            },
            "stop" | "s" => match controller.stop_recording().await {
                Ok(()) => print_session(&controller),
                Err(e) => print_error(&e),
            },
            "text" | "edit" => {
                controller.set_transcript(rest);
                print_session(&controller);
            }
            "retranslate" | "rt" => match controller.retranslate().await {
                Ok(()) => print_session(&controller),
                Err(e) => print_error(&e),
            },
            "swap" => {
                controller.swap_languages();
                eprintln!(
                    "Languages: {} → {}",
                    controller.source_language().green(),
                    controller.target_language().green()
                );
                print_session(&controller);
            }
            "say" => {
                let (text, lang) = match rest {
                    "target" | "tgt" | "" => {
                        (controller.translation(), controller.target_language())
                    }
                    "source" | "src" => (controller.transcript(), controller.source_language()),
                    other => {
                        eprintln!("Unknown side '{}'; use 'say source' or 'say target'", other);
                        continue;
                    }
                };
                match controller.speak(text, lang) {
                    Some(_handle) => eprintln!("Speaking..."),
                    None => eprintln!("Nothing to speak"),
                }
            }
            "copy" => {
                let text = match rest {
                    "target" | "tgt" | "" => controller.translation(),
                    "source" | "src" => controller.transcript(),
                    other => {
                        eprintln!("Unknown side '{}'; use 'copy source' or 'copy target'", other);
                        continue;
                    }
                };
                match copy_to_clipboard(text) {
                    Ok(()) => eprintln!("Copied."),
                    Err(e) => print_error(&e),
                }
            }
            "status" => print_session(&controller),
            "languages" => print_languages(),
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            other => eprintln!("Unknown command '{}'; type 'help'", other),
        }
    }

    Ok(())
}

/// Translate a pre-recorded WAV file through the audio-translate path.
pub async fn run_file_command(
    config: Config,
    path: &std::path::Path,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    let src = from.unwrap_or(config.session.source_language);
    let tgt = to.unwrap_or(config.session.target_language);

    let bytes = std::fs::read(path)?;
    let mut buffer = TakeBuffer::new(TakeFormat::Wav);
    buffer.push_chunk(bytes);
    let take = buffer.seal()?;

    let service =
        HttpSpeechService::with_timeout(&config.service.base_url, config.service.timeout())?;
    let result = service.translate_audio(take, &src, &tgt).await?;

    println!(
        "{} {}",
        format!("[{}]", src).dimmed(),
        result.transcript.unwrap_or_default()
    );
    println!(
        "{} {}",
        format!("[{}]", tgt).dimmed(),
        result.translation.unwrap_or_default()
    );
    Ok(())
}

/// Probe the service health endpoint and report it.
pub async fn run_status_command(config: Config) -> Result<()> {
    let service =
        HttpSpeechService::with_timeout(&config.service.base_url, config.service.timeout())?;

    match service.health().await {
        Ok(status) => {
            println!("Service:  {}", config.service.base_url);
            println!("Status:   {}", status.status.green());
            println!(
                "Mode:     {}",
                if status.offline_mode {
                    "offline"
                } else {
                    "online"
                }
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Service unreachable: {}", e).red());
            std::process::exit(1);
        }
    }
}

/// List audio input devices.
pub fn run_devices_command() -> Result<()> {
    let devices = list_devices()?;

    if devices.is_empty() {
        eprintln!("No audio input devices found");
        std::process::exit(1);
    }

    println!("Available audio input devices:");
    for (idx, device) in devices.iter().enumerate() {
        println!("  [{}] {}", idx, device);
    }

    Ok(())
}

/// List the language catalog.
pub fn print_languages() {
    println!("Supported languages:");
    for lang in list_languages() {
        println!("  {}  {}", lang.code.green(), lang.name);
    }
}

/// Copy text to the Wayland clipboard via wl-copy.
fn copy_to_clipboard(text: &str) -> Result<()> {
    let status = Command::new("wl-copy")
        .arg(text)
        .status()
        .map_err(|e| VoxlateError::Other(format!("wl-copy not found: {e}")))?;

    if !status.success() {
        return Err(VoxlateError::Other(format!(
            "wl-copy exited with {}",
            status
        )));
    }
    Ok(())
}

fn print_session(controller: &SessionController) {
    println!(
        "{} {}",
        format!("[{}]", controller.source_language()).dimmed(),
        controller.transcript()
    );
    println!(
        "{} {}",
        format!("[{}]", controller.target_language()).dimmed(),
        controller.translation()
    );
}

fn print_error(error: &VoxlateError) {
    eprintln!("{}", format!("Error: {}", error).red());
}

fn print_help() {
    eprintln!("Commands:");
    eprintln!("  record            start a new recording (discards prior results)");
    eprintln!("  stop              stop, transcribe, and translate");
    eprintln!("  text <words>      edit the transcript directly");
    eprintln!("  retranslate       re-translate the current transcript");
    eprintln!("  swap              swap languages and texts");
    eprintln!("  say [source|target]   speak a side aloud");
    eprintln!("  copy [source|target]  copy a side to the clipboard");
    eprintln!("  status            show the current session");
    eprintln!("  languages         list supported languages");
    eprintln!("  quit              exit");
}
