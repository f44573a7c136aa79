//! Command-line driver for the expansion core
//!
//! Reads a PLA file, runs the selected pass over it, and prints the result
//! (or statistics) to stdout.

use clap::{Parser, ValueEnum};
use espresso_expand::{CoverType, Pla};
use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, ValueEnum)]
enum Command {
    /// Expand every non-prime cube into a prime implicant (default)
    Expand,
    /// Expand input parts only, leaving the output variable untouched
    ExpandNonsparse,
    /// Run the sparse-variable cleanup
    Sparse,
    /// Echo the PLA without modification
    Echo,
    /// Print statistics about the PLA
    Stats,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputType {
    /// ON-set only
    F,
    /// ON-set and don't-care set
    Fd,
    /// ON-set and OFF-set
    Fr,
    /// ON-set, don't-care set, and OFF-set
    Fdr,
}

impl From<OutputType> for CoverType {
    fn from(val: OutputType) -> Self {
        match val {
            OutputType::F => CoverType::F,
            OutputType::Fd => CoverType::FD,
            OutputType::Fr => CoverType::FR,
            OutputType::Fdr => CoverType::FDR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "espresso-expand")]
#[command(about = "Espresso-II expansion step and sparse cleanup", long_about = None)]
#[command(version)]
struct Args {
    /// Input PLA file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Pass to execute
    #[arg(short = 'D', long = "do", value_enum, default_value = "expand")]
    command: Command,

    /// Output format type
    #[arg(short = 'o', long = "output", value_enum, default_value = "f")]
    output_type: OutputType,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if args.verbose && env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "debug");
    }
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(err) = run(args) {
        eprintln!("espresso-expand: {}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), io::Error> {
    let mut pla = Pla::from_pla_file(&args.input)?;

    match args.command {
        Command::Expand => pla.run_expand(false)?,
        Command::ExpandNonsparse => pla.run_expand(true)?,
        Command::Sparse => pla.run_make_sparse()?,
        Command::Echo => {}
        Command::Stats => {
            let cost = pla.cost();
            println!(
                "{}: {} inputs, {} outputs, {} cubes",
                args.input.display(),
                pla.num_inputs(),
                pla.num_outputs(),
                cost.cubes
            );
            println!(
                "literals: {} in, {} out, {} total",
                cost.input_literals, cost.output_parts, cost.total
            );
            return Ok(());
        }
    }

    print!("{}", pla.to_pla_string(args.output_type.into())?);
    Ok(())
}
