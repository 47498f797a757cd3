//! tonewire CLI - sine tone server, player and renderer
//!
//! This binary serves generated sine waveforms over WebSocket next to a
//! static HTTP page, plays single tones locally, and renders tones to PCM
//! or WAV.

use clap::{Parser, Subcommand};
use std::path::Path;
use std::process::ExitCode;

use tonewire_cli::commands;
use tonewire_cli::commands::render::RenderFormat;
use tonewire_cli::commands::tone::{ToneOptions, DEFAULT_TONE_SECS};
use tonewire_cli::config::ServeConfig;
use tonewire_cli::logging;
use tonewire_synth::render::DEFAULT_RENDER_SECS;
use tonewire_synth::{WaveformRequest, DEFAULT_FREQUENCY, DEFAULT_SAMPLE_RATE};

/// tonewire - sine waves over the wire
#[derive(Parser)]
#[command(name = "tonewire")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the static HTTP page and the sine streaming endpoint
    Serve {
        /// Path to a JSON config file
        #[arg(short, long)]
        config: Option<String>,

        /// Address to bind both listeners to
        #[arg(long)]
        host: Option<std::net::IpAddr>,

        /// Port for the static HTTP responder (default: 8080)
        #[arg(long)]
        http_port: Option<u16>,

        /// Port for the streaming endpoint (default: 8000)
        #[arg(long)]
        ws_port: Option<u16>,

        /// Do not start the static HTTP responder
        #[arg(long)]
        no_http: bool,

        /// Also play every streamed waveform on the local output device
        #[arg(long)]
        play: bool,

        /// Wait for each waveform's duration before reading the next request
        #[arg(long)]
        pace: bool,
    },

    /// Generate one sine tone and play it to completion
    ///
    /// Playing needs a binary built with `--features playback`, which links
    /// the host audio backend (ALSA headers on Linux). Without it, write the
    /// tone with `--out <FILE> --no-play` instead.
    Tone {
        /// Frequency in Hz
        #[arg(short, long, default_value_t = DEFAULT_FREQUENCY)]
        frequency: f64,

        /// Duration in seconds
        #[arg(short, long, default_value_t = DEFAULT_TONE_SECS)]
        duration: f64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,

        /// Also write the tone to this WAV file
        #[arg(short, long)]
        out: Option<String>,

        /// Skip playback (requires --out)
        #[arg(long)]
        no_play: bool,
    },

    /// Render a full-scale faded tone as raw 16-bit PCM or WAV
    Render {
        /// Frequency in Hz (must be at most half the sample rate)
        #[arg(short, long)]
        frequency: f64,

        /// Duration in seconds
        #[arg(short, long, default_value_t = DEFAULT_RENDER_SECS)]
        duration: f64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,

        /// Output format: raw or wav
        #[arg(long, default_value = "raw")]
        format: RenderFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        out: Option<String>,
    },
}

/// Loads the config file (or defaults) and applies flag overrides.
fn serve_config(
    config: Option<&str>,
    host: Option<std::net::IpAddr>,
    http_port: Option<u16>,
    ws_port: Option<u16>,
    no_http: bool,
    play: bool,
    pace: bool,
) -> anyhow::Result<ServeConfig> {
    let mut cfg = match config {
        Some(path) => ServeConfig::from_file(Path::new(path))?,
        None => ServeConfig::default(),
    };
    if let Some(host) = host {
        cfg.host = host;
    }
    if let Some(port) = http_port {
        cfg.http.port = port;
    }
    if let Some(port) = ws_port {
        cfg.ws.port = port;
    }
    if no_http {
        cfg.http.enabled = false;
    }
    cfg.stream.playback |= play;
    cfg.stream.pace |= pace;
    Ok(cfg)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: {}", colored::Colorize::yellow("warning"), e);
    }

    let result = match cli.command {
        Commands::Serve {
            config,
            host,
            http_port,
            ws_port,
            no_http,
            play,
            pace,
        } => serve_config(
            config.as_deref(),
            host,
            http_port,
            ws_port,
            no_http,
            play,
            pace,
        )
        .and_then(commands::serve::run),
        Commands::Tone {
            frequency,
            duration,
            sample_rate,
            out,
            no_play,
        } => commands::tone::run(&ToneOptions {
            frequency,
            duration,
            sample_rate,
            out,
            play: !no_play,
        }),
        Commands::Render {
            frequency,
            duration,
            sample_rate,
            format,
            out,
        } => commands::render::run(
            &WaveformRequest::new(frequency, duration, sample_rate),
            format,
            out.as_deref(),
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
