use clap::Parser;

/// Runtime configuration, resolved from CLI flags or environment variables
/// with defaults suitable for local development.
#[derive(Debug, Clone, Parser)]
#[command(name = "contador-de-dramas")]
#[command(about = "Drama tracker web application", long_about = None)]
pub struct Config {
    /// Database connection URL
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://./dramas.db?mode=rwc"
    )]
    pub database_url: String,

    /// Listening port
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,
}
