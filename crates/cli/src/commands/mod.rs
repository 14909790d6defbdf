//! # CLI Commands
//!
//! Subcommands and their arguments. Every option can also be set through a
//! `FEEDBACK_*` environment variable or a `.env` file.

pub mod completions;
pub mod migrate;
pub mod validate;

use clap::{ArgAction, Args, Subcommand};

/// Available commands for the feedback tracker CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server (runs migrations first)
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Check the serve configuration and database without starting the server
    Validate(ServeArgs),
}

/// Database connection options shared by every command that opens the store
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// SQLite connection URL
    #[arg(long, env = "FEEDBACK_DATABASE_URL", default_value = migration::db::DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "FEEDBACK_DATABASE_POOL_SIZE", default_value = "5")]
    pub pool_size: u32,

    /// How long a writer waits for the database lock, in milliseconds
    #[arg(long, env = "FEEDBACK_DATABASE_BUSY_TIMEOUT_MS", default_value = "5000")]
    pub busy_timeout_ms: u64,
}

/// Access token options
#[derive(Args, Debug, Clone)]
pub struct JwtArgs {
    /// HMAC signing secret, at least 32 bytes
    #[arg(long, env = "FEEDBACK_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Token issuer claim
    #[arg(long, env = "FEEDBACK_JWT_ISSUER", default_value = "feedback-tracker")]
    pub jwt_issuer: String,

    /// Token audience claim
    #[arg(long, env = "FEEDBACK_JWT_AUDIENCE", default_value = "feedback-tracker-api")]
    pub jwt_audience: String,

    /// Token lifetime in seconds
    #[arg(long, env = "FEEDBACK_JWT_EXPIRATION_SECONDS", default_value = "86400")]
    pub jwt_expiration_seconds: u64,
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "FEEDBACK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "FEEDBACK_PORT", default_value = "8000")]
    pub port: u16,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub jwt: JwtArgs,

    /// Insert demo users (only into an empty database) and default tags after migrating
    #[arg(long, env = "FEEDBACK_SEED", default_value_t = true, action = ArgAction::Set)]
    pub seed: bool,

    /// Web client URL used in verification links
    #[arg(long, env = "FEEDBACK_APP_URL", default_value = "http://localhost:3000")]
    pub app_url: String,

    /// Attempts per write when the database is busy
    #[arg(long, env = "FEEDBACK_RETRY_ATTEMPTS", default_value = "3")]
    pub retry_attempts: u32,

    /// Delay before the first write retry, in milliseconds
    #[arg(long, env = "FEEDBACK_RETRY_BASE_DELAY_MS", default_value = "100")]
    pub retry_base_delay_ms: u64,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Roll back the most recent migration instead of applying pending ones
    #[arg(long)]
    pub rollback: bool,

    /// Insert demo users and default tags after migrating
    #[arg(long, conflicts_with = "rollback")]
    pub seed: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
