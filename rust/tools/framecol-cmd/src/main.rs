use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "framecol-cmd")]
#[command(about = "Command-line utility for inspecting columnar frames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the header and column regions of a frame file
    Inspect {
        /// Path to the serialized frame
        frame_path: String,
    },

    /// Print the first rows of a frame file as JSON lines
    Head {
        /// Comma-separated column types, e.g. "LONG,STRING,ARRAY<STRING>"
        #[arg(short, long)]
        types: String,

        /// Comma-separated column names (defaults to c0, c1, ...)
        #[arg(long)]
        names: Option<String>,

        /// Number of rows to print
        #[arg(short = 'n', long, default_value_t = 10)]
        rows: usize,

        /// Replace invalid UTF-8 in string columns instead of failing
        #[arg(long)]
        lossy_utf8: bool,

        /// Path to the serialized frame
        frame_path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { frame_path } => commands::inspect::run(frame_path),
        Commands::Head {
            types,
            names,
            rows,
            lossy_utf8,
            frame_path,
        } => commands::head::run(types, names, rows, lossy_utf8, frame_path),
    }
}
