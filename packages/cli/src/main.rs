//! `apishape`: response-shaping configuration on the command line.
//!
//! - **`check`**: load and validate a configuration file.
//! - **`success`** / **`error`**: render an envelope from a configuration's
//!   templates, exactly as a service using it would.
//!
//! File arguments accept `-` for stdin.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use apishape::{format_payload, ApiConfig, AttributeMap, ConfigError};
use clap::{Parser, Subcommand};
use serde_json::Value;

/// apishape: response-shaping configuration tool
#[derive(Parser)]
#[command(name = "apishape", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a configuration file.
    ///
    /// Exits 0 and prints a summary if the file loads, 1 otherwise.
    Check {
        /// Path to a JSON configuration file, or `-` for stdin.
        file: PathBuf,
    },

    /// Render a success envelope.
    ///
    /// Example:
    ///   apishape success --code 201 Created
    Success(Render),

    /// Render an error envelope.
    ///
    /// The message is used as JSON when it parses, so structured messages work:
    ///   apishape error --code 422 '{"title": ["The title field is required."]}'
    Error(Render),
}

#[derive(clap::Args)]
struct Render {
    /// Configuration file; defaults apply when absent.
    #[arg(long, env = "APISHAPE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Status code substituted for `:code`.
    #[arg(long, default_value_t = 200)]
    code: u16,

    /// Message substituted for `:message`.
    message: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apishape=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check { file } => match load_config(&file) {
            Ok(config) => {
                println!("valid");
                println!("  pattern:    {}", config.pattern);
                println!("  domain:     {}", config.domain.as_deref().unwrap_or("(none)"));
                println!("  serializer: {:?}", config.serializer);
                println!("  timestamps: {:?}", config.timestamps);
                println!("  headers:    {}", config.default_headers.len());
            }
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        Command::Success(args) => {
            let config = render_config(&args);
            print_payload(render(&config.success_format, &args));
        }
        Command::Error(args) => {
            let config = render_config(&args);
            print_payload(render(&config.error_format, &args));
        }
    }
}

fn render_config(args: &Render) -> ApiConfig {
    match &args.config {
        Some(path) => load_config(path).unwrap_or_else(|e| fatal(&e.to_string())),
        None => ApiConfig::default(),
    }
}

fn render(template: &AttributeMap, args: &Render) -> AttributeMap {
    format_payload(&parse_message(&args.message), args.code, template)
}

fn print_payload(payload: AttributeMap) {
    match serde_json::to_string_pretty(&Value::Object(payload)) {
        Ok(text) => println!("{text}"),
        Err(e) => fatal(&format!("failed to encode payload: {e}")),
    }
}

/// Load a configuration from a file, or from stdin when the path is `"-"`.
fn load_config(path: &Path) -> Result<ApiConfig, ConfigError> {
    tracing::debug!(path = %path.display(), "loading config");
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        ApiConfig::from_json_str(&buf)
    } else {
        ApiConfig::from_file(path)
    }
}

/// JSON when the text parses as JSON, otherwise the text as a string.
fn parse_message(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(2);
}
