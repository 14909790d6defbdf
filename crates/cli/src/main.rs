//! # Feedback Tracker CLI
//!
//! Command-line interface for the feedback tracker API.
//!
//! ## Usage
//!
//! ```bash
//! feedback-tracker serve          # Start the API server (migrates and seeds automatically)
//! feedback-tracker migrate        # Run database migrations
//! feedback-tracker validate       # Check configuration and database
//! feedback-tracker --help         # Show help
//! ```

mod commands;
mod config;
mod serve;

use clap::{CommandFactory as _, Parser};
use commands::Commands;

/// Feedback Tracker - manager to employee feedback API
#[derive(Parser, Debug)]
#[command(name = "feedback-tracker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level or filter directive (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info", global = true)]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "FEEDBACK_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: String,

    /// Also write JSON logs to this file, rotated hourly
    #[arg(long, env = "FEEDBACK_LOG_FILE", global = true)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        commands::completions::completions(args.shell, &mut Cli::command())?;
        return Ok(());
    }

    // Held until exit so buffered file logs are flushed
    let _guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", "Feedback tracker CLI starting...");

    match &cli.command {
        Commands::Serve(args) => serve::serve(args).await?,
        Commands::Migrate(args) => commands::migrate::migrate(args).await?,
        Commands::Validate(args) => commands::validate::validate(args).await?,
        Commands::Completions(_) => {},
    }

    logging::info!(target: "app", "Feedback tracker CLI completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use serial_test::serial;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_cli_definition_is_consistent() { Cli::command().debug_assert(); }

    #[test]
    #[serial]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from([
            "feedback-tracker",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--jwt-secret",
            SECRET,
            "--seed",
            "false",
        ]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 8080);
                assert!(!args.seed);
                assert_eq!(args.jwt.jwt_secret.as_deref(), Some(SECRET));
                assert_eq!(args.database.pool_size, 5);
                assert_eq!(args.retry_attempts, 3);
            },
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    #[serial]
    fn test_serve_reads_environment() {
        // Safe in test context - env access is serialized
        unsafe {
            std::env::set_var("FEEDBACK_PORT", "9100");
            std::env::set_var("FEEDBACK_DATABASE_URL", "sqlite://env.db?mode=rwc");
        }

        let cli = Cli::parse_from(["feedback-tracker", "serve"]);

        // Safe in test context - cleanup after test
        unsafe {
            std::env::remove_var("FEEDBACK_PORT");
            std::env::remove_var("FEEDBACK_DATABASE_URL");
        }

        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 9100);
                assert!(args.seed);
                assert_eq!(args.database.database_url, "sqlite://env.db?mode=rwc");
            },
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    #[serial]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["feedback-tracker", "migrate"]);
        assert_eq!(cli.log_format, "pretty");
        assert!(cli.log_file.is_none());
        match cli.command {
            Commands::Migrate(args) => {
                assert!(!args.rollback);
                assert_eq!(
                    args.database.database_url,
                    migration::db::DEFAULT_DATABASE_URL
                );
            },
            _ => panic!("Expected Migrate command"),
        }
    }

    #[test]
    fn test_migrate_rollback_excludes_seed() {
        let cli = Cli::parse_from(["feedback-tracker", "migrate", "--rollback"]);
        assert!(matches!(cli.command, Commands::Migrate(ref args) if args.rollback));

        let result = Cli::try_parse_from(["feedback-tracker", "migrate", "--rollback", "--seed"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_completions_parse() {
        let cli = Cli::parse_from(["feedback-tracker", "completions", "bash"]);
        assert!(matches!(cli.command, Commands::Completions(_)));
    }

    #[tokio::test]
    async fn test_migrate_in_memory_database() {
        let cli = Cli::parse_from([
            "feedback-tracker",
            "migrate",
            "--database-url",
            "sqlite::memory:",
            "--pool-size",
            "1",
            "--seed",
        ]);
        let Commands::Migrate(args) = cli.command
        else {
            panic!("Expected Migrate command");
        };

        assert!(commands::migrate::migrate(&args).await.is_ok());
    }
}
