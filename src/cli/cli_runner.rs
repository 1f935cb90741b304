use clap::Parser;
use colored::*;
use std::path::Path;

use crate::cli::{CliArgs, Commands, OutputFormat, OutputFormatter};
use crate::engine::QueryEngine;
use crate::loader::{CsvLoader, Loader};
use crate::utils::config::LoaderConfig;
use crate::utils::error::CsvqlResult;

/// Main CLI runner that handles command execution
pub struct CliRunner;

impl CliRunner {
    /// Load a CSV file, execute a SQL query against it, and return the
    /// formatted result.
    pub async fn execute_query(
        file: &str,
        sql: &str,
        format: &OutputFormat,
        delimiter: char,
        verbose: bool,
    ) -> CsvqlResult<String> {
        if verbose {
            eprintln!(
                "{}",
                OutputFormatter::format_info(&format!("Loading {}", file))
            );
        }

        let loader = CsvLoader::with_config(LoaderConfig {
            delimiter,
            has_headers: true,
        });
        let table = loader.load(Path::new(file)).await?;

        if verbose {
            eprintln!(
                "{}",
                OutputFormatter::format_info(&format!("Loaded {} row(s)", table.len()))
            );
        }

        let engine = QueryEngine::new(table);
        let result = engine.execute(sql)?;

        if verbose {
            eprintln!(
                "{}",
                OutputFormatter::format_info(&format!(
                    "Query executed successfully. {} row(s) returned",
                    result.row_count
                ))
            );
        }

        Ok(OutputFormatter::format_result(&result, format))
    }

    /// Show information about a CSV file
    pub async fn show_info(file: &str, delimiter: char) -> CsvqlResult<String> {
        let loader = CsvLoader::with_config(LoaderConfig {
            delimiter,
            has_headers: true,
        });
        let table = loader.load(Path::new(file)).await?;

        let columns: Vec<String> = table
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default();

        let mut output = String::new();
        output.push_str(&format!("{} {}\n", "File:".bold(), file.cyan()));
        output.push_str(&format!("Columns: {}\n", columns.len()));
        output.push_str(&format!("Rows: {}\n", table.len()));

        if !columns.is_empty() {
            output.push_str(&format!("\n{}\n", "Column names:".bold()));
            for column in &columns {
                output.push_str(&format!("  {} {}\n", "•".green(), column.cyan()));
            }
        }

        Ok(output)
    }
}

/// Main entry point for CLI execution
pub async fn run_cli() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        Commands::Query {
            file,
            sql,
            format,
            delimiter,
            verbose,
        } => {
            match CliRunner::execute_query(&file, &sql, &format, delimiter, verbose).await {
                Ok(output) => {
                    println!("{}", output);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{}", OutputFormatter::format_error(&e));
                    std::process::exit(1);
                }
            }
        }

        Commands::Info { file, delimiter } => {
            match CliRunner::show_info(&file, delimiter).await {
                Ok(output) => {
                    println!("{}", output);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{}", OutputFormatter::format_error(&e));
                    std::process::exit(1);
                }
            }
        }
    }
}
