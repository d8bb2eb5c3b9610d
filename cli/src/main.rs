#![deny(missing_docs)]

//! # Chessgen CLI
//!
//! Command line driver for the client generator.
//!
//! Supported Commands:
//! - `generate`: description tree in, TypeScript client out.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod generator;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Typed TypeScript client generator for the chess API")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compiles an API description tree into a typed TypeScript client.
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Directory holding paths.yaml, tags/ and schemas/.
    #[clap(long, env = "CHESSGEN_SPEC")]
    spec: PathBuf,

    /// Output directory for the generated units.
    #[clap(long, env = "CHESSGEN_OUT")]
    out: PathBuf,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => generator::run(&args.spec, &args.out)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
