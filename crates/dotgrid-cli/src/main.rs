//! dotgrid - point-pattern fills for SVG shapes
//!
//! Usage:
//!   dotgrid fill <svg|-> [style flags]   Fill every shape with markers
//!   dotgrid swatch [style flags]         Draw a legend swatch
//!   dotgrid patterns                     List available patterns

use anyhow::Result;
use clap::{Parser, Subcommand};

use dotgrid::PatternRegistry;
use dotgrid_cli::cli::{FillArgs, SwatchArgs, cmd_fill, cmd_patterns, cmd_swatch};
use dotgrid_cli::init_logging;

#[derive(Debug, Parser)]
#[command(name = "dotgrid", version, about = "Point-marker pattern fills for SVG shapes")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fill every closed shape of an SVG document
    Fill(FillArgs),
    /// Draw the pattern on a plain square
    Swatch(SwatchArgs),
    /// List available patterns
    Patterns,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = PatternRegistry::builtin();
    match &cli.command {
        Command::Fill(args) => cmd_fill(args, &registry),
        Command::Swatch(args) => cmd_swatch(args, &registry),
        Command::Patterns => {
            cmd_patterns(&registry);
            Ok(())
        }
    }
}
