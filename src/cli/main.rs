//! pda-export command line

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pda_export::cli::commands::{
    ExportArgs, InputFormat, handle_export, handle_header, handle_schemas,
};

#[derive(Parser)]
#[command(name = "pda-export", version, about = "Export PDA contract applications as semicolon-delimited text")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a records file
    Export(ExportCommand),
    /// Print the header row of a schema
    Header {
        /// Mandate key (case-insensitive)
        #[arg(long)]
        mandate: String,
        /// Contract type id
        #[arg(long, default_value_t = 0)]
        type_id: i64,
    },
    /// List registered schemas
    Schemas,
}

#[derive(Args)]
struct ExportCommand {
    /// Records file, JSON or YAML array (`-` for stdin)
    #[arg(short, long)]
    input: String,
    /// Records format (inferred from the extension by default)
    #[arg(long, value_enum)]
    format: Option<InputFormat>,
    /// Output file (stdout by default)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Skip rows that fail to render instead of aborting
    #[arg(long)]
    skip_failed_rows: bool,
    /// Accept records from different mandates or contract types
    #[arg(long)]
    allow_mixed: bool,
}

impl From<ExportCommand> for ExportArgs {
    fn from(cmd: ExportCommand) -> Self {
        ExportArgs {
            input: cmd.input,
            format: cmd.format,
            output: cmd.output,
            config: cmd.config,
            skip_failed_rows: cmd.skip_failed_rows,
            allow_mixed: cmd.allow_mixed,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Export(cmd) => {
            let args: ExportArgs = cmd.into();
            handle_export(&args).with_context(|| format!("exporting {}", args.input))?
        }
        Commands::Header { mandate, type_id } => handle_header(&mandate, type_id)?,
        Commands::Schemas => handle_schemas()?,
    }

    Ok(())
}
