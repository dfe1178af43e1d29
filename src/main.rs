//! tool-mender - repair and validate LLM tool-call arguments
//!
//! Runs as an MCP stdio server by default, or processes one request from a
//! file or stdin with `tool-mender process`.

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use tool_mender::{
    cli::{Cli, Command},
    config::Config,
    mender_core::decode_request,
    server::McpServer,
    setup_tracing,
    tool::descriptor,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup tracing
    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Some(Command::Process { file, strict }) => run_process(&config, file.as_deref(), strict),
        Some(Command::Describe) => print_json(&descriptor()),
        Some(Command::Rules) => {
            for name in config.registry().names() {
                println!("{name}");
            }
            ExitCode::SUCCESS
        }
        Some(Command::Config) => match serde_yaml::to_string(&config) {
            Ok(yaml) => {
                print!("{yaml}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize configuration: {e}");
                ExitCode::FAILURE
            }
        },
        Some(Command::Serve) | None => run_server(config).await,
    }
}

/// Process a single batch request from `file` (or stdin)
fn run_process(config: &Config, file: Option<&Path>, force_strict: bool) -> ExitCode {
    let raw = match read_input(file) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to read request: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut request = match decode_request(&raw) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Rejected request");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if force_strict {
        request.strict_mode = Some(true);
    }

    match config.mender().handle(request) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(file: Option<&Path>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize to JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the stdio MCP server
async fn run_server(config: Config) -> ExitCode {
    let mender = Arc::new(config.mender());
    info!(
        rules = ?mender.registry().names(),
        default_strict = mender.default_strict(),
        "Starting tool-mender"
    );

    let server = McpServer::new(mender, config.server.clone());
    match server.serve_stdio().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
