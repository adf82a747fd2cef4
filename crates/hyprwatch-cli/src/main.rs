//! hyprwatch CLI
//!
//! Decodes Hyprland socket2 events into JSON lines.
//!
//! hyprwatch does not connect to the compositor itself; feed it the event
//! socket, for example:
//!
//! ```text
//! socat -U - UNIX-CONNECT:$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock \
//!     | hyprwatch window
//! ```

mod output;
mod watch;

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hyprwatch_config::{Config, ConfigError, LogLevel, DEFAULT_CONFIG_PATH};
use hyprwatch_events::{Entity, EventCatalog, FieldSpec, LineDecoder};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use crate::output::JsonSink;
use crate::watch::{spawn_line_reader, Watcher, DEFAULT_CHANNEL_BUFFER};

#[derive(Parser, Debug)]
#[command(name = "hyprwatch")]
#[command(about = "Listens to and decodes Hyprland events")]
#[command(version)]
struct Cli {
    /// Path to configuration file [default: ~/.config/hyprwatch/config.kdl]
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Read event lines from this file instead of stdin ("-" for stdin)
    #[arg(short, long, global = true, default_value = "-")]
    input: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch workspace related events
    #[command(visible_alias = "workspaces")]
    Workspace,

    /// Watch window related events
    #[command(visible_alias = "windows")]
    Window,

    /// Watch monitor related events
    #[command(visible_alias = "monitors")]
    Monitor,

    /// Decode a single event line and print it as JSON
    Decode {
        /// Raw line, e.g. 'workspacev2>>3,web'
        line: String,
    },

    /// List supported events and their fields
    Events,

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    Generate {
        /// Output path (defaults to the configuration path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Display the version
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Expand tilde in config path
    let explicit_config = cli.config.is_some();
    let config_path = resolve_config_path(cli.config.as_deref());

    // Config decides the default log level, so load it before tracing is up
    let loaded = load_config(&config_path, explicit_config);
    let log_level = loaded
        .as_ref()
        .map(|config| config.global.log_level)
        .unwrap_or_default();
    init_tracing(cli.debug, log_level);

    match cli.command {
        None => cmd_watch(loaded?, None, &cli.input).await,
        Some(Commands::Workspace) => cmd_watch(loaded?, Some(Entity::WORKSPACE), &cli.input).await,
        Some(Commands::Window) => cmd_watch(loaded?, Some(Entity::WINDOW), &cli.input).await,
        Some(Commands::Monitor) => cmd_watch(loaded?, Some(Entity::MONITOR), &cli.input).await,
        Some(Commands::Decode { line }) => cmd_decode(&line),
        Some(Commands::Events) => cmd_events(),
        Some(Commands::Validate) => cmd_validate(&config_path),
        Some(Commands::Generate { output, force }) => {
            cmd_generate(&output.unwrap_or(config_path), force)
        }
        Some(Commands::Version) => cmd_version(),
    }
}

fn init_tracing(debug: bool, level: LogLevel) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
    };

    // stdout carries the JSON events
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config_path(config: Option<&str>) -> PathBuf {
    let raw = config.unwrap_or(DEFAULT_CONFIG_PATH);
    shellexpand::tilde(raw).into_owned().into()
}

/// Load the configuration, falling back to defaults when the default file is
/// absent. A missing file that was asked for explicitly is an error.
fn load_config(path: &Path, explicit: bool) -> Result<Config, ConfigError> {
    if !explicit && !path.exists() {
        return Ok(Config::default());
    }

    hyprwatch_config::parse_config(path)
}

/// Input is read with blocking I/O on the reader thread, see `watch`
fn open_input(input: &str) -> miette::Result<Box<dyn BufRead + Send>> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }

    let path = shellexpand::tilde(input).into_owned();
    let file = std::fs::File::open(&path)
        .map_err(|e| miette::miette!("Failed to open input {}: {}", path, e))?;
    Ok(Box::new(BufReader::new(file)))
}

async fn cmd_watch(config: Config, entity: Option<Entity>, input: &str) -> miette::Result<()> {
    let decoder = LineDecoder::new(Arc::new(EventCatalog::builtin()));
    hyprwatch_config::validate_config(&config, decoder.catalog())?;

    let filter = match entity {
        Some(entity) => config.filter_for(entity),
        None => config.entity_filter(),
    };

    tracing::info!(entity = %filter.subscribed(), input, "Watching Hyprland events");

    let lines = spawn_line_reader(open_input(input)?, DEFAULT_CHANNEL_BUFFER).into_diagnostic()?;
    let mut watcher = Watcher::new(decoder, filter);
    let mut sink = JsonSink::new(std::io::stdout());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    watcher
        .run(lines, &mut sink, shutdown)
        .await
        .map_err(|e| miette::miette!("{:#}", e))?;

    Ok(())
}

fn cmd_decode(line: &str) -> miette::Result<()> {
    let decoder = LineDecoder::default();
    let event = decoder.decode(line).into_diagnostic()?;

    let json = serde_json::to_string(&event).into_diagnostic()?;
    println!("{}", json);

    Ok(())
}

fn cmd_events() -> miette::Result<()> {
    let catalog = EventCatalog::builtin();

    for event in catalog.iter() {
        let fields: Vec<String> = event.fields().iter().map(FieldSpec::to_string).collect();
        println!(
            "{:<20} {:<10} {}",
            event.name(),
            event.entity().to_string(),
            fields.join(", ")
        );
    }

    Ok(())
}

fn cmd_validate(config_path: &Path) -> miette::Result<()> {
    println!("Validating configuration: {}", config_path.display());

    let config = hyprwatch_config::parse_config(config_path)?;
    hyprwatch_config::validate_config(&config, &EventCatalog::builtin())?;

    println!("Configuration is valid!");
    println!("  Log level: {}", config.global.log_level);
    println!("  Subscribe: {}", config.global.subscribe);
    if config.events.ignore.is_empty() {
        println!("  Ignored events: none");
    } else {
        println!("  Ignored events: {}", config.events.ignore.join(", "));
    }

    Ok(())
}

fn cmd_generate(path: &Path, force: bool) -> miette::Result<()> {
    if path.exists() && !force {
        return Err(miette::miette!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let content = hyprwatch_config::generate_default_config(&Config::default());

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }

    std::fs::write(path, &content).into_diagnostic()?;

    println!("Generated configuration: {}", path.display());

    Ok(())
}

fn cmd_version() -> miette::Result<()> {
    println!("hyprwatch {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
