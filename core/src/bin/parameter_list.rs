//! `parameter-list`: print the parameters of every resource under a
//! Satellite endpoint as a JSON result document.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use satellite_core::{fetch_parameters, AggregatedResult, SessionConfig};

#[derive(Parser)]
#[command(name = "parameter-list", about = "Get a list of parameters from Satellite")]
struct Cli {
    /// JSON file holding the options below as an object. Takes precedence
    /// over the individual flags.
    #[arg(long)]
    args_file: Option<PathBuf>,

    /// Endpoint to retrieve parameters from, e.g. `locations`.
    #[arg(long, required_unless_present = "args_file")]
    name: Option<String>,

    #[arg(long, required_unless_present = "args_file")]
    server_url: Option<String>,

    #[arg(long, required_unless_present = "args_file")]
    username: Option<String>,

    #[arg(long, env = "SATELLITE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    validate_certs: bool,

    /// Report what would run without contacting the server.
    #[arg(long)]
    check: bool,
}

#[derive(Deserialize)]
struct ModuleArgs {
    name: String,
    server_url: String,
    username: String,
    password: String,
    #[serde(default = "default_validate_certs")]
    validate_certs: bool,
}

fn default_validate_certs() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct Outcome {
    changed: bool,
    parameters: Option<AggregatedResult>,
    error: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<String>,
}

impl Outcome {
    fn success(parameters: Option<AggregatedResult>) -> Self {
        Self {
            changed: false,
            parameters,
            error: String::new(),
            failed: false,
            msg: None,
        }
    }

    fn failure(err: &anyhow::Error) -> Self {
        let msg = format!("Error retrieving parameters: {err:#}");
        Self {
            changed: false,
            parameters: None,
            error: msg.clone(),
            failed: true,
            msg: Some(msg),
        }
    }
}

impl Cli {
    fn module_args(self) -> Result<ModuleArgs> {
        if let Some(path) = self.args_file {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            return serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", path.display()));
        }
        Ok(ModuleArgs {
            name: self.name.context("--name is required")?,
            server_url: self.server_url.context("--server-url is required")?,
            username: self.username.context("--username is required")?,
            password: self
                .password
                .context("--password or SATELLITE_PASSWORD is required")?,
            validate_certs: self.validate_certs,
        })
    }
}

/// Resolve the options and, outside check mode, collect the parameters.
fn run(cli: Cli) -> Outcome {
    let check = cli.check;
    let args = match cli.module_args() {
        Ok(args) => args,
        Err(e) => return Outcome::failure(&e),
    };
    if check {
        return Outcome::success(None);
    }

    let config = SessionConfig::new(args.server_url, args.username, args.password)
        .validate_certs(args.validate_certs);
    match fetch_parameters(config, &args.name) {
        Ok(parameters) => Outcome::success(Some(parameters)),
        Err(e) => Outcome::failure(&e.into()),
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let outcome = run(Cli::parse());

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed to serialize result: {e}");
            return ExitCode::FAILURE;
        }
    }
    if outcome.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
