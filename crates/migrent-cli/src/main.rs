use clap::{Parser, Subcommand, ValueEnum};
use migrent_core::MigrentConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "migrent", version, about = "MigRent superadmin dashboard")]
struct Cli {
    /// Configuration file [default: migrent.yaml when present]
    #[arg(long, short, global = true, env = "MIGRENT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the admin dashboard.
    Serve {
        /// Override dashboard.port
        #[arg(long)]
        port: Option<u16>,

        /// Override dashboard.host
        #[arg(long)]
        host: Option<String>,
    },

    /// Write a full CSV export of one admin table.
    Export {
        #[arg(value_enum)]
        table: ExportTable,

        /// Directory the CSV file is written into
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Access token used against the hosted backend
        #[arg(long, env = "MIGRENT_ACCESS_TOKEN")]
        token: Option<String>,
    },

    /// Run the superadmin gate once and print the decision.
    CheckAccess {
        /// Existing access token
        #[arg(long, env = "MIGRENT_ACCESS_TOKEN", conflicts_with = "email")]
        token: Option<String>,

        /// Sign in with this email first
        #[arg(long, requires = "password")]
        email: Option<String>,

        #[arg(long, env = "MIGRENT_PASSWORD")]
        password: Option<String>,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration file
    Validate,

    /// Print the effective configuration (defaults filled in)
    Show,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Users,
    Listings,
    Payments,
}

const DEFAULT_CONFIG: &str = "migrent.yaml";

/// Load the named file, else `migrent.yaml` if present, else defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<MigrentConfig> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => {
            let config = MigrentConfig::default();
            config.validate()?;
            return Ok(config);
        }
    };
    Ok(MigrentConfig::load(path)?)
}

fn init_tracing(config: &MigrentConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    if let Command::Config { cmd } = &cli.cmd {
        return match cmd {
            ConfigCommand::Validate => commands::config::validate(config),
            ConfigCommand::Show => commands::config::show(&config?),
        };
    }

    let config = config?;
    init_tracing(&config);

    match cli.cmd {
        Command::Serve { port, host } => commands::serve::run(config, host, port).await?,
        Command::Export { table, out, token } => {
            commands::export::run(&config, table, &out, token.as_deref()).await?
        }
        Command::CheckAccess {
            token,
            email,
            password,
        } => commands::check_access::run(&config, token, email, password).await?,
        Command::Config { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::parse_from(["migrent", "export", "payments", "--out", "/tmp/x"]);
        match cli.cmd {
            Command::Export { table, out, .. } => {
                assert_eq!(table, ExportTable::Payments);
                assert_eq!(out, PathBuf::from("/tmp/x"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn test_explicit_config_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migrent.yaml");
        std::fs::write(&path, "access:\n  required_role: \"\"\n").unwrap();
        assert!(load_config(Some(&path)).is_err());

        std::fs::write(&path, "dashboard:\n  port: 9090\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().dashboard.port, 9090);
    }
}
