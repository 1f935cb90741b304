use clap::{Parser, Subcommand, ValueEnum};

/// csvql CLI - query CSV files with a SQL subset
#[derive(Parser, Debug)]
#[command(name = "csvql")]
#[command(about = "Query CSV files with a SQL subset")]
#[command(version = "0.1.0")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a SQL query against a CSV file
    Query {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: String,

        /// SQL query to execute
        #[arg(value_name = "SQL")]
        sql: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Field delimiter
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show information about a CSV file
    Info {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: String,

        /// Field delimiter
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,
    },
}

/// Output format options
#[derive(ValueEnum, Debug, Clone)]
pub enum OutputFormat {
    /// Formatted table output
    Table,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
