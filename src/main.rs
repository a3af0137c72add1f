use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use firmdedup::{DedupFileConfig, DuplicateCheckRequest, TextNormalizer};

#[derive(Parser)]
#[command(
    name = "firmdedup",
    version,
    about = "Company-name normalization and duplicate detection"
)]
struct Cli {
    /// YAML configuration file; built-in defaults when omitted.
    /// FIRMDEDUP__* environment variables override either.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a request (name, identifiers, candidates) for duplicates.
    Check {
        /// JSON request file, or `-` for stdin.
        request: String,
    },
    /// Print the normalized form, tokens and fingerprint of each name.
    Normalize {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Serialize)]
struct NormalizeOutput<'a> {
    input: &'a str,
    normalized: String,
    tokens: firmdedup::TokenSet,
    unique_tokens: firmdedup::TokenSet,
    fingerprint: String,
    degraded: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let file_config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Check { request } => {
            let engine = file_config
                .build_engine()
                .context("building decision engine")?;
            let raw = read_input(request)?;
            let request: DuplicateCheckRequest =
                serde_json::from_str(&raw).context("parsing check request")?;
            let result = engine.check_request(&request);
            print_json(&result, cli.pretty)?;
        }
        Command::Normalize { names } => {
            let normalizer = TextNormalizer::new(&file_config.normalization);
            for name in names {
                let normalized = normalizer.normalize(name);
                let tokens = normalized.tokens();
                let output = NormalizeOutput {
                    input: name,
                    unique_tokens: tokens.without_common(normalizer.common_words()),
                    tokens,
                    fingerprint: normalized.fingerprint(),
                    degraded: normalized.degradation().map(ToString::to_string),
                    normalized: normalized.into_string(),
                };
                print_json(&output, cli.pretty)?;
            }
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DedupFileConfig> {
    let config = match path {
        Some(path) => DedupFileConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DedupFileConfig::load_yaml("version: \"1.0\"\n")
            .context("loading default config")?,
    };
    tracing::debug!(name = ?config.name, "configuration loaded");
    Ok(config)
}

fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading request from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(source).with_context(|| format!("reading request from {source}"))
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
