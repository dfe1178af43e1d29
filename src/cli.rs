//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Repair and validate LLM tool-call arguments
#[derive(Parser, Debug)]
#[command(name = "tool-mender")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "TOOL_MENDER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "info",
        env = "TOOL_MENDER_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "TOOL_MENDER_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to server mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the `enhancetool` MCP tool over stdio (default)
    Serve,

    /// Process one batch request and print the rendered response
    Process {
        /// Request JSON file (`{"tool_calls": [...], "strict_mode": bool}`); stdin if omitted
        file: Option<PathBuf>,

        /// Force strict mode regardless of the request and configuration
        #[arg(long)]
        strict: bool,
    },

    /// Print the tool descriptor advertised over MCP
    Describe,

    /// List tools that have a validation rule
    Rules,

    /// Print the effective configuration as YAML
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_server_mode() {
        let cli = Cli::try_parse_from(["tool-mender"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn process_accepts_file_and_strict_flag() {
        let cli = Cli::try_parse_from(["tool-mender", "process", "req.json", "--strict"]).unwrap();
        match cli.command {
            Some(Command::Process { file, strict }) => {
                assert_eq!(file, Some(PathBuf::from("req.json")));
                assert!(strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_works_after_subcommand() {
        let cli = Cli::try_parse_from(["tool-mender", "rules", "--config", "m.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("m.yaml")));
    }
}
