//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Leadpage: personalized lead landing pages with a voice-call demo
#[derive(Parser, Debug)]
#[command(name = "leadpage", version)]
#[command(about = "Personalized lead landing pages with a voice-call demo", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Look up a lead by slug and print it as JSON
    Lookup {
        /// Lead slug
        slug: String,
    },

    /// Walk a lead's call widget through a scripted call
    CallDemo {
        /// Lead slug
        slug: String,

        /// Delay before the widget returns to idle, in milliseconds
        #[arg(long, default_value_t = 3000)]
        reset_delay_ms: u64,
    },

    /// Configuration management
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print a value by dotted key, e.g. `server.port`
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Write a default config file
    Init {
        /// Where to write it instead of the default location
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["leadpage", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Serve {
                host: None,
                port: Some(8080)
            }
        ));
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["leadpage", "lookup", "acme-realty", "--config", "/tmp/c.toml"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/c.toml"));
        assert!(matches!(cli.command, Command::Lookup { slug } if slug == "acme-realty"));
    }

    #[test]
    fn test_parse_call_demo_default_delay() {
        let cli = Cli::try_parse_from(["leadpage", "call-demo", "demo"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::CallDemo {
                reset_delay_ms: 3000,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["leadpage", "config", "set", "server.port", "8080"]).unwrap();
        let Command::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        else {
            unreachable!("expected config set");
        };
        assert_eq!(key, "server.port");
        assert_eq!(value, "8080");
    }
}
