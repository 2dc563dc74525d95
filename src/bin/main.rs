use std::path::PathBuf;
use std::process;

use clap::Parser;
use rkro::{compiler::Compiler, repl};

/// Exit status for any failed compilation.
const EXIT_FAILURE: i32 = 64;

/// rkro runs kro programs, either a whole file or line by line in a REPL.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file to compile and run. Starts the REPL when omitted.
    file: Option<PathBuf>,

    /// Print the variable tables to stderr after each compilation.
    #[arg(short, long)]
    dump_context: bool,
}

fn main() {
    let args = Args::parse();

    let Some(file) = args.file else {
        if let Err(err) = repl::run(args.dump_context) {
            eprintln!("{}", err);
            process::exit(EXIT_FAILURE);
        }
        return;
    };

    let mut compiler = Compiler::new();
    let res = compiler.compile_file(&file);

    if args.dump_context {
        eprint!("{}", compiler.environment());
    }

    if let Err(err) = res {
        eprintln!("{}", err);
        process::exit(EXIT_FAILURE);
    }
}
