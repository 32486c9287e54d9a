use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DATA_DIR, ENV_DEBUG, ENV_HOST, ENV_PORT};

#[derive(Parser)]
#[command(name = "wells")]
#[command(version, about = "Water well location query service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (debug-level logging for this crate)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Directory holding per-dataset SQLite files
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// List datasets with their filters and categories
    Datasets,
    /// Print the SQL a request would run, without touching a database
    Explain {
        /// Dataset slug (e.g. alberta, nova-scotia)
        dataset: String,
        /// Request parameters as KEY=VALUE (e.g. use=domestic rate=10:)
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
}

/// Parse a `KEY=VALUE` pair
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Invalid parameter '{}'. Expected KEY=VALUE", s)),
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        debug: cli.debug,
        config: cli.config,
        data_dir: cli.data_dir,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("rate=10:"),
            Ok(("rate".to_string(), "10:".to_string()))
        );
        assert_eq!(
            parse_key_value("completed=2001-01-01..2002-01-01"),
            Ok((
                "completed".to_string(),
                "2001-01-01..2002-01-01".to_string()
            ))
        );
        assert!(parse_key_value("rate").is_err());
        assert!(parse_key_value("=5").is_err());
    }

    #[test]
    fn test_cli_explain_subcommand() {
        let cli = Cli::try_parse_from(["wells", "explain", "alberta", "use=domestic", "page=2"])
            .unwrap();
        match cli.command {
            Some(Commands::Explain { dataset, params }) => {
                assert_eq!(dataset, "alberta");
                assert_eq!(params.len(), 2);
                assert_eq!(params[1], ("page".to_string(), "2".to_string()));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from(["wells", "-H", "0.0.0.0", "-p", "8080", "datasets"]).unwrap();
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(8080));
        assert!(matches!(cli.command, Some(Commands::Datasets)));
    }
}
