//! map1 CLI - canonical bytes and identifiers for MAP v1.1 descriptors.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{canon, id, verify};

#[derive(Parser)]
#[command(name = "map1")]
#[command(about = "MAP v1.1 canonicalization and identifier CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the identifier for a JSON descriptor
    Id {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// BIND pointer (repeatable); FULL projection when absent
        #[arg(long = "bind")]
        bind: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Emit canonical bytes for a JSON descriptor, base64-encoded
    Canon {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// BIND pointer (repeatable); FULL projection when absent
        #[arg(long = "bind")]
        bind: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-validate base64 canonical bytes and report their identifier
    Verify {
        /// Input file holding base64 canonical bytes (or stdin)
        input: Option<String>,
        /// Fail unless the identifier equals this value
        #[arg(long)]
        expect: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Id { input, bind, json } => id::run(input, bind, json),
        Commands::Canon { input, bind, json } => canon::run(input, bind, json),
        Commands::Verify {
            input,
            expect,
            json,
        } => verify::run(input, expect, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
