//! Caduceus operator console for identifier checks and privilege inspection.

#![forbid(unsafe_code)]

mod commands;
mod console_config;
mod seed;

use std::process::ExitCode;

use caduceus_application::PrivilegeResolver;
use caduceus_core::AppError;
use caduceus_domain::identifier;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{Report, build_repository, categories_report, resolve_report, validate_report};
use crate::console_config::ConsoleConfig;

/// Caduceus operator console.
#[derive(Debug, Parser)]
#[command(name = "caduceus", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a platform identifier against the category registry.
    Validate {
        /// Raw platform identifier, e.g. H00000001.
        platform_id: String,
    },
    /// Print an identifier with its category and subtype names.
    Describe {
        /// Raw platform identifier.
        platform_id: String,
    },
    /// Print an example identifier for a category and type code.
    Placeholder {
        /// Single-character category code.
        category: char,
        /// Two-digit type code.
        type_code: String,
    },
    /// List registered categories and subtypes.
    Categories,
    /// Resolve the effective privileges of a principal.
    Resolve {
        /// Platform identifier of the principal.
        principal_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let report = match cli.command {
        Command::Validate { platform_id } => validate_report(platform_id.as_str()),
        Command::Describe { platform_id } => success(identifier::describe(platform_id.as_str())),
        Command::Placeholder {
            category,
            type_code,
        } => success(identifier::placeholder(category, type_code.as_str())),
        Command::Categories => success(categories_report()),
        Command::Resolve { principal_id } => {
            let config = ConsoleConfig::load()?;
            let repository = build_repository(&config.store).await?;
            let resolver = PrivilegeResolver::new(repository);
            resolve_report(&resolver, principal_id.as_str()).await?
        }
    };

    if report.success {
        println!("{}", report.output.trim_end());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", report.output.trim_end());
        Ok(ExitCode::FAILURE)
    }
}

fn success(output: String) -> Report {
    Report {
        output,
        success: true,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
