//! hexchroma CLI
//!
//! `hexchroma serve` runs the HTTP API; `rgb`, `complement`, `triad` and
//! `name` print the same `data` payloads the routes return.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hexchroma_core::HexColor;
use hexchroma_core::api;
use hexchroma_core::config::{Config, LogFormat};
use hexchroma_core::logging::{LogConfig, init_logging};
use hexchroma_core::web::{WebServerConfig, run_web_server};
use serde::Serialize;

/// Exit code for input the color parser rejected.
const EXIT_INVALID_INPUT: u8 = 2;

/// Level used by one-shot commands when `--log-level` is absent.
const ONE_SHOT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(
    name = "hexchroma",
    version,
    about = "HEX/RGB conversions, complementary colors and triadic palettes"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_name = "pretty|json")]
    log_format: Option<LogFormat>,

    /// Also append logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Convert a HEX color to RGB
    Rgb {
        /// Color as RGB, RRGGBB, #RGB or #RRGGBB
        hex: String,
    },

    /// Complementary color (per-channel RGB inversion)
    Complement {
        /// Color as RGB, RRGGBB, #RGB or #RRGGBB
        hex: String,
    },

    /// Triadic palette: the color plus its 120° and 240° hue rotations
    Triad {
        /// Color as RGB, RRGGBB, #RGB or #RRGGBB
        hex: String,
    },

    /// Look up a descriptive name in the built-in table
    Name {
        /// Color as RGB, RRGGBB, #RGB or #RRGGBB
        hex: String,
    },

    /// Print version information
    Version,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Bind host (overrides config and HEXCHROMA_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config and PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Base URL for absolute links in /docs, e.g. https://colors.example.com
    #[arg(long, value_name = "URL")]
    public_base_url: Option<String>,

    /// Allow binding on a non-loopback address
    #[arg(long)]
    dangerous_bind_any: bool,

    /// Path to a hexchroma.toml config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Cli {
        log_level,
        log_format,
        log_file,
        command,
    } = cli;

    let command = match command {
        Commands::Serve(args) => {
            let mut config = Config::load(args.config.as_deref())
                .context("failed to load configuration")?;
            apply_serve_args(&mut config, &args);
            apply_log_flags(&mut config.logging, log_level, log_format, log_file);
            init_logging(&config.logging).context("failed to initialize logging")?;
            tracing::debug!(?config, "effective configuration");

            run_web_server(WebServerConfig::from(&config.server)).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Version => {
            println!("hexchroma {}", hexchroma_core::VERSION);
            return Ok(ExitCode::SUCCESS);
        }
        other => other,
    };

    let mut logging = LogConfig {
        level: ONE_SHOT_LOG_LEVEL.to_string(),
        ..LogConfig::default()
    };
    apply_log_flags(&mut logging, log_level, log_format, log_file);
    init_logging(&logging).context("failed to initialize logging")?;

    run_one_shot(command)
}

fn apply_serve_args(config: &mut Config, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = &args.public_base_url {
        config.server.public_base_url = Some(url.clone());
    }
    if args.dangerous_bind_any {
        config.server.allow_public_bind = true;
    }
}

fn apply_log_flags(
    logging: &mut LogConfig,
    level: Option<String>,
    format: Option<LogFormat>,
    file: Option<PathBuf>,
) {
    if let Some(level) = level {
        logging.level = level;
    }
    if let Some(format) = format {
        logging.format = format;
    }
    if file.is_some() {
        logging.file = file;
    }
}

fn run_one_shot(command: Commands) -> anyhow::Result<ExitCode> {
    let (Commands::Rgb { hex: raw }
    | Commands::Complement { hex: raw }
    | Commands::Triad { hex: raw }
    | Commands::Name { hex: raw }) = &command
    else {
        anyhow::bail!("not a one-shot command: {command:?}");
    };

    let hex = match HexColor::parse(raw) {
        Ok(hex) => hex,
        Err(err) => {
            tracing::debug!(hex = %raw, error_code = err.code(), "rejected color argument");
            eprintln!("Error: {err}");
            eprintln!("Hint: {}", err.hint());
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };

    match command {
        Commands::Rgb { .. } => print_json(&api::hex_to_rgb(hex))?,
        Commands::Complement { .. } => print_json(&api::complementary(hex))?,
        Commands::Triad { .. } => print_json(&api::triadic(hex))?,
        Commands::Name { .. } => match api::name(hex) {
            Ok(hit) => print_json(&hit)?,
            Err(miss) => {
                print_json(&miss)?;
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Serve(_) | Commands::Version => {}
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(payload: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(payload).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}
